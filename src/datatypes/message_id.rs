// ABOUTME: Defines the ITS messageID values carried in ItsPduHeader per ETSI TS 102 894-2
// ABOUTME: Names each message family for registry bindings and rendered trees

use num_enum::TryFromPrimitive;

/// ITS application message identifiers
///
/// The messageID space is open-ended: later revisions of the standard keep
/// adding message families, so the registry is keyed by the raw `u8` and this
/// enum only names the values known today.
///
/// ## Support in the standard registration
/// - **Decoded**: DENM, SSEM (partial grammars)
/// - **Registered by name**: CAM, SPATEM, MAPEM, IVIM, EV-RSR, SREM, EVCSN, TISTPG
/// - **Not registered**: POI, SAEM, RTCMEM (rendered as raw data)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Decentralized Environmental Notification Message (ETSI EN 302 637-3)
    Denm = 1,
    /// Cooperative Awareness Message (ETSI EN 302 637-2)
    Cam = 2,
    /// Point of Interest message (ETSI TS 101 556-1)
    Poi = 3,
    /// Signal Phase And Timing Extended Message (ETSI TS 103 301)
    Spatem = 4,
    /// MAP Extended Message (ETSI TS 103 301)
    Mapem = 5,
    /// In-Vehicle Information Message (ETSI TS 103 301)
    Ivim = 6,
    /// Electric Vehicle Recharging Spot Reservation (ETSI TS 101 556-3)
    EvRsr = 7,
    /// Tyre Information System / Tyre Pressure Gauge transaction (ETSI TS 101 556-2)
    TistpgTransaction = 8,
    /// Signal Request Extended Message (ETSI TS 103 301)
    Srem = 9,
    /// Signal request Status Extended Message (ETSI TS 103 301)
    Ssem = 10,
    /// Electric Vehicle Charging Spot Notification (ETSI TS 101 556-1)
    Evcsn = 11,
    /// Service Announcement Extended Message (ETSI TS 102 890-1)
    Saem = 12,
    /// RTCM corrections Extended Message (ETSI TS 103 301)
    Rtcmem = 13,
}

impl MessageId {
    /// Short name used for registry bindings and Decode-As selection
    pub fn short_name(&self) -> &'static str {
        match self {
            MessageId::Denm => "DENM",
            MessageId::Cam => "CAM",
            MessageId::Poi => "POI",
            MessageId::Spatem => "SPATEM",
            MessageId::Mapem => "MAPEM",
            MessageId::Ivim => "IVIM",
            MessageId::EvRsr => "EVRSR",
            MessageId::TistpgTransaction => "TISTPG",
            MessageId::Srem => "SREM",
            MessageId::Ssem => "SSEM",
            MessageId::Evcsn => "EVCSN",
            MessageId::Saem => "SAEM",
            MessageId::Rtcmem => "RTCMEM",
        }
    }

    /// ASN.1 value name as rendered in the header's messageID field
    pub fn asn1_name(&self) -> &'static str {
        match self {
            MessageId::Denm => "denm",
            MessageId::Cam => "cam",
            MessageId::Poi => "poi",
            MessageId::Spatem => "spatem",
            MessageId::Mapem => "mapem",
            MessageId::Ivim => "ivim",
            MessageId::EvRsr => "ev-rsr",
            MessageId::TistpgTransaction => "tistpgtransaction",
            MessageId::Srem => "srem",
            MessageId::Ssem => "ssem",
            MessageId::Evcsn => "evcsn",
            MessageId::Saem => "saem",
            MessageId::Rtcmem => "rtcmem",
        }
    }

    pub fn label_of(raw: u8) -> Option<&'static str> {
        MessageId::try_from(raw).ok().map(|id| id.asn1_name())
    }
}
