// ABOUTME: Defines DSRC RegionId values and the regional extension slots that open types resolve through
// ABOUTME: RegionKey pairs the two and is the lookup key of the regional extension table

use num_enum::TryFromPrimitive;
use std::fmt;

/// Regional extension profile (RegionId ::= INTEGER (0..255))
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionId {
    /// Sentinel: no regional profile declared
    NoRegion = 0,
    /// USA
    AddGrpA = 1,
    /// Japan
    AddGrpB = 2,
    /// EU
    AddGrpC = 3,
}

impl RegionId {
    pub fn label(&self) -> &'static str {
        match self {
            RegionId::NoRegion => "noRegion",
            RegionId::AddGrpA => "addGrpA",
            RegionId::AddGrpB => "addGrpB",
            RegionId::AddGrpC => "addGrpC",
        }
    }

    pub fn label_of(raw: u8) -> Option<&'static str> {
        RegionId::try_from(raw).ok().map(|r| r.label())
    }
}

/// Logical slot of a regional extension open type.
///
/// Each `Reg-*` information object set of the DSRC module names one slot;
/// the enclosing grammar knows which slot it is decoding. The numbering is
/// local to this crate and never appears on the wire.
#[derive(TryFromPrimitive)]
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegExtKind {
    AdvisorySpeed = 0,
    ComputedLane = 1,
    ConnectionManeuverAssist = 2,
    GenericLane = 3,
    IntersectionGeometry = 4,
    IntersectionState = 5,
    LaneAttributes = 6,
    LaneDataAttribute = 7,
    MapData = 8,
    MovementEvent = 9,
    MovementState = 10,
    NodeAttributeSetLL = 11,
    NodeAttributeSetXY = 12,
    NodeOffsetPointLL = 13,
    NodeOffsetPointXY = 14,
    Position3D = 15,
    RequestorDescription = 16,
    RequestorPositionVector = 17,
    RequestorType = 18,
    RestrictionUserType = 19,
    RoadSegment = 20,
    RtcmCorrections = 21,
    SignalControlZone = 22,
    SignalRequest = 23,
    SignalRequestMessage = 24,
    SignalRequestPackage = 25,
    SignalStatus = 26,
    SignalStatusMessage = 27,
    SignalStatusPackage = 28,
    Spat = 29,
}

impl RegExtKind {
    /// Name of the information object set, e.g. `Reg-IntersectionState`
    pub fn name(&self) -> &'static str {
        match self {
            RegExtKind::AdvisorySpeed => "Reg-AdvisorySpeed",
            RegExtKind::ComputedLane => "Reg-ComputedLane",
            RegExtKind::ConnectionManeuverAssist => "Reg-ConnectionManeuverAssist",
            RegExtKind::GenericLane => "Reg-GenericLane",
            RegExtKind::IntersectionGeometry => "Reg-IntersectionGeometry",
            RegExtKind::IntersectionState => "Reg-IntersectionState",
            RegExtKind::LaneAttributes => "Reg-LaneAttributes",
            RegExtKind::LaneDataAttribute => "Reg-LaneDataAttribute",
            RegExtKind::MapData => "Reg-MapData",
            RegExtKind::MovementEvent => "Reg-MovementEvent",
            RegExtKind::MovementState => "Reg-MovementState",
            RegExtKind::NodeAttributeSetLL => "Reg-NodeAttributeSetLL",
            RegExtKind::NodeAttributeSetXY => "Reg-NodeAttributeSetXY",
            RegExtKind::NodeOffsetPointLL => "Reg-NodeOffsetPointLL",
            RegExtKind::NodeOffsetPointXY => "Reg-NodeOffsetPointXY",
            RegExtKind::Position3D => "Reg-Position3D",
            RegExtKind::RequestorDescription => "Reg-RequestorDescription",
            RegExtKind::RequestorPositionVector => "Reg-RequestorPositionVector",
            RegExtKind::RequestorType => "Reg-RequestorType",
            RegExtKind::RestrictionUserType => "Reg-RestrictionUserType",
            RegExtKind::RoadSegment => "Reg-RoadSegment",
            RegExtKind::RtcmCorrections => "Reg-RTCMcorrections",
            RegExtKind::SignalControlZone => "Reg-SignalControlZone",
            RegExtKind::SignalRequest => "Reg-SignalRequest",
            RegExtKind::SignalRequestMessage => "Reg-SignalRequestMessage",
            RegExtKind::SignalRequestPackage => "Reg-SignalRequestPackage",
            RegExtKind::SignalStatus => "Reg-SignalStatus",
            RegExtKind::SignalStatusMessage => "Reg-SignalStatusMessage",
            RegExtKind::SignalStatusPackage => "Reg-SignalStatusPackage",
            RegExtKind::Spat => "Reg-SPAT",
        }
    }
}

/// Composite key of the regional extension table: (RegionId, extension slot)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionKey {
    pub region: u8,
    pub kind: RegExtKind,
}

impl RegionKey {
    pub fn new(region: u8, kind: RegExtKind) -> Self {
        Self { region, kind }
    }

    /// Single integer form, `(region << 16) + kind`
    pub fn packed(&self) -> u32 {
        (u32::from(self.region) << 16) + self.kind as u32
    }
}

impl From<(RegionId, RegExtKind)> for RegionKey {
    fn from((region, kind): (RegionId, RegExtKind)) -> Self {
        Self::new(region as u8, kind)
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match RegionId::label_of(self.region) {
            Some(region) => write!(f, "{region}/{}", self.kind.name()),
            None => write!(f, "region {}/{}", self.region, self.kind.name()),
        }
    }
}
