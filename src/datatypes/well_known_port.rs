// ABOUTME: BTP well-known destination ports of ITS facilities per ETSI TS 103 248
// ABOUTME: Marks the ports whose payload is an ITS application PDU handled by this crate

use super::ApplicationId;
use num_enum::TryFromPrimitive;

/// Well-known BTP port numbers for facilities services and applications
#[derive(TryFromPrimitive)]
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownPort {
    /// CA (CAM), ETSI EN 302 637-2
    Ca = 2001,
    /// DEN (DENM), ETSI EN 302 637-3
    Den = 2002,
    /// RLT (MAPEM), ETSI TS 103 301
    Rlt = 2003,
    /// TLM (SPATEM), ETSI TS 103 301
    Tlm = 2004,
    /// SA (SAEM), ETSI TS 102 890-1
    Sa = 2005,
    /// IVI (IVIM), ETSI TS 103 301
    Ivi = 2006,
    /// TLC (SREM), ETSI TS 103 301
    TlcSrem = 2007,
    /// TLC (SSEM), ETSI TS 103 301
    TlcSsem = 2008,
    /// Allocated for the Collective Perception Service
    Cps = 2009,
    /// EVCSN POI, ETSI TS 101 556-1
    Evcsn = 2010,
    /// TPG (TRM, TCM, VDRM, VDPM, EOFM), ETSI TS 101 556-2
    Tpg = 2011,
    /// Charging (EV-RSR, SRM, SCM), ETSI TS 101 556-3
    Charging = 2012,
    /// GPC (RTCMEM), ETSI TS 103 301
    Gpc = 2013,
    /// CTL (CTLM), ETSI TS 102 941
    Ctl = 2014,
    /// CRL (CRLM), ETSI TS 102 941
    Crl = 2015,
    /// Certificate request, ETSI TS 102 941
    CertificateRequest = 2016,
}

impl WellKnownPort {
    pub fn service(&self) -> &'static str {
        match self {
            WellKnownPort::Ca => "CA (CAM)",
            WellKnownPort::Den => "DEN (DENM)",
            WellKnownPort::Rlt => "RLT (MAPEM)",
            WellKnownPort::Tlm => "TLM (SPATEM)",
            WellKnownPort::Sa => "SA (SAEM)",
            WellKnownPort::Ivi => "IVI (IVIM)",
            WellKnownPort::TlcSrem => "TLC (SREM)",
            WellKnownPort::TlcSsem => "TLC (SSEM)",
            WellKnownPort::Cps => "CPS",
            WellKnownPort::Evcsn => "EVCSN POI",
            WellKnownPort::Tpg => "TPG",
            WellKnownPort::Charging => "Charging",
            WellKnownPort::Gpc => "GPC (RTCMEM)",
            WellKnownPort::Ctl => "CTL (CTLM)",
            WellKnownPort::Crl => "CRL (CRLM)",
            WellKnownPort::CertificateRequest => "Certificate request",
        }
    }

    /// ITS-AID that secured packets for this service are signed under
    pub fn application_id(&self) -> Option<ApplicationId> {
        match self {
            WellKnownPort::Ca => Some(ApplicationId::Ca),
            WellKnownPort::Den => Some(ApplicationId::Den),
            WellKnownPort::Rlt => Some(ApplicationId::Rlt),
            WellKnownPort::Tlm => Some(ApplicationId::Tlm),
            WellKnownPort::Ivi => Some(ApplicationId::Ivi),
            WellKnownPort::TlcSrem | WellKnownPort::TlcSsem => Some(ApplicationId::Tlc),
            _ => None,
        }
    }

    /// Whether datagrams to this port carry a PDU this crate dispatches
    pub fn is_dissected(&self) -> bool {
        matches!(
            self,
            WellKnownPort::Den
                | WellKnownPort::Ca
                | WellKnownPort::Evcsn
                | WellKnownPort::Charging
                | WellKnownPort::Ivi
                | WellKnownPort::Tpg
                | WellKnownPort::TlcSsem
                | WellKnownPort::TlcSrem
                | WellKnownPort::Rlt
                | WellKnownPort::Tlm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_ports_are_dissected() {
        let dissected = (2001u16..=2016)
            .filter_map(|p| WellKnownPort::try_from(p).ok())
            .filter(WellKnownPort::is_dissected)
            .count();
        assert_eq!(dissected, 10);
        assert!(!WellKnownPort::Sa.is_dissected());
        assert!(WellKnownPort::try_from(2017).is_err());
    }

    #[test]
    fn signal_control_ports_share_one_aid() {
        assert_eq!(WellKnownPort::TlcSrem.application_id(), Some(ApplicationId::Tlc));
        assert_eq!(WellKnownPort::TlcSsem.application_id(), Some(ApplicationId::Tlc));
        assert_eq!(WellKnownPort::Den.application_id(), Some(ApplicationId::Den));
        assert_eq!(WellKnownPort::Evcsn.application_id(), None);
    }
}
