// ABOUTME: DSRC (SAE J2735 / ETSI TS 103 301) data frames shared by SSEM and the AddGrpC handlers
// ABOUTME: Node offsets, intersection references, requestor descriptions and response status

use super::{enumerated, extension_additions, integer};
use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::datatypes::RegExtKind;
use crate::regional::decode_regional_extension;
use crate::tree::{FieldNode, FieldValue};

pub(crate) const PRIORITIZATION_RESPONSE_STATUS: &[&str] = &[
    "unknown",
    "requested",
    "processing",
    "watchOtherTraffic",
    "granted",
    "rejected",
    "maxPresence",
    "reserviceLocked",
];

const ALTITUDE_CONFIDENCE: &[&str] = &[
    "alt-000-01",
    "alt-000-02",
    "alt-000-05",
    "alt-000-10",
    "alt-000-20",
    "alt-000-50",
    "alt-001-00",
    "alt-002-00",
    "alt-005-00",
    "alt-010-00",
    "alt-020-00",
    "alt-050-00",
    "alt-100-00",
    "alt-200-00",
    "outOfRange",
    "unavailable",
];

const BASIC_VEHICLE_ROLE: &[&str] = &[
    "basicVehicle",
    "publicTransport",
    "specialTransport",
    "dangerousGoods",
    "roadWork",
    "roadRescue",
    "emergency",
    "safetyCar",
    "none-unknown",
    "truck",
    "motorcycle",
    "roadSideSource",
    "police",
    "fire",
    "ambulance",
    "dot",
    "transit",
    "slowMoving",
    "stopNgo",
    "cyclist",
    "pedestrian",
    "nonMotorized",
    "military",
];

const REQUEST_SUB_ROLE: &[&str] = &[
    "requestSubRoleUnKnown",
    "requestSubRole1",
    "requestSubRole2",
    "requestSubRole3",
    "requestSubRole4",
    "requestSubRole5",
    "requestSubRole6",
    "requestSubRole7",
    "requestSubRole8",
    "requestSubRole9",
    "requestSubRole10",
    "requestSubRole11",
    "requestSubRole12",
    "requestSubRole13",
    "requestSubRole14",
    "requestSubRoleReserved",
];

const REQUEST_IMPORTANCE_LEVEL: &[&str] = &[
    "requestImportanceLevelUnKnown",
    "requestImportanceLevel1",
    "requestImportanceLevel2",
    "requestImportanceLevel3",
    "requestImportanceLevel4",
    "requestImportanceLevel5",
    "requestImportanceLevel6",
    "requestImportanceLevel7",
    "requestImportanceLevel8",
    "requestImportanceLevel9",
    "requestImportanceLevel10",
    "requestImportanceLevel11",
    "requestImportanceLevel12",
    "requestImportanceLevel13",
    "requestImportanceLevel14",
    "requestImportanceReserved",
];

const VEHICLE_TYPE: &[&str] = &[
    "none",
    "unknown",
    "special",
    "moto",
    "car",
    "carOther",
    "bus",
    "axleCnt2",
    "axleCnt3",
    "axleCnt4",
    "axleCnt4Trailer",
    "axleCnt5Trailer",
    "axleCnt6Trailer",
    "axleCnt5MultiTrailer",
    "axleCnt6MultiTrailer",
    "axleCnt7MultiTrailer",
];

/// (alternative name, offset bits) of the Node-XY-* alternatives of NodeOffsetPointXY
const NODE_XY_ALTERNATIVES: &[(&str, u32)] = &[
    ("node-XY1", 10),
    ("node-XY2", 11),
    ("node-XY3", 12),
    ("node-XY4", 13),
    ("node-XY5", 14),
    ("node-XY6", 16),
];

/// NodeOffsetPointXY, a CHOICE of 8 alternatives, the last one regional
pub fn node_offset_point_xy(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    let index = r.read_choice(8, false)?;
    match index {
        0..=5 => {
            let (alternative, bits) = NODE_XY_ALTERNATIVES[index as usize];
            let half = 1i64 << (bits - 1);
            let offset = node.push(FieldNode::new(alternative));
            integer(r, offset, "x", -half, half - 1)?;
            integer(r, offset, "y", -half, half - 1)?;
        }
        6 => {
            let lat_lon = node.push(FieldNode::new("node-LatLon"));
            integer(r, lat_lon, "lon", -1_799_999_999, 1_800_000_001)?;
            integer(r, lat_lon, "lat", -900_000_000, 900_000_001)?;
        }
        7 => {
            let regional = node.push(FieldNode::new("regional"));
            decode_regional_extension(RegExtKind::NodeOffsetPointXY, r, ctx, regional)?;
        }
        _ => {
            return Err(DecodeError::InvalidChoice {
                field: "NodeOffsetPointXY",
                index,
            });
        }
    }
    Ok(())
}

/// `Altitude ::= SEQUENCE { value AltitudeValue, confidence AltitudeConfidence }`
pub fn altitude(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    integer(r, node, "value", -100_000, 800_001)?;
    enumerated(r, node, "confidence", ALTITUDE_CONFIDENCE, false)?;
    Ok(())
}

/// `IntersectionReferenceID ::= SEQUENCE { region RoadRegulatorID OPTIONAL, id IntersectionID }`
pub fn intersection_reference_id(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    let presence = r.read_presence(1)?;
    if presence.is_present(0) {
        integer(r, node, "region", 0, 65535)?;
    }
    integer(r, node, "id", 0, 65535)?;
    Ok(())
}

/// `IntersectionAccessPoint ::= CHOICE { lane, approach, connection, ... }`
pub fn intersection_access_point(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    let index = r.read_choice(3, true)?;
    match index {
        0 => integer(r, node, "lane", 0, 255)?,
        1 => integer(r, node, "approach", 0, 15)?,
        2 => integer(r, node, "connection", 0, 255)?,
        _ => {
            let value = r.read_open_type("IntersectionAccessPoint")?;
            node.push(FieldNode::raw(value));
            return Ok(());
        }
    };
    Ok(())
}

pub fn prioritization_response_status(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<u64, DecodeError> {
    enumerated(r, tree, name, PRIORITIZATION_RESPONSE_STATUS, true)
}

pub fn basic_vehicle_role(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<u64, DecodeError> {
    enumerated(r, tree, name, BASIC_VEHICLE_ROLE, true)
}

/// `VehicleID ::= CHOICE { entityID TemporaryID, stationID StationID }`
pub fn vehicle_id(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    if r.read_choice(2, false)? == 0 {
        let entity = r.read_octets(4)?;
        node.push(FieldNode::leaf("entityID", FieldValue::Bytes(entity)));
    } else {
        integer(r, node, "stationID", 0, u32::MAX as i64)?;
    }
    Ok(())
}

/// RequestorType, with its Reg-RequestorType regional extension
pub fn requestor_type(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(5)?;

    basic_vehicle_role(r, node, "role")?;
    if presence.is_present(0) {
        enumerated(r, node, "subrole", REQUEST_SUB_ROLE, false)?;
    }
    if presence.is_present(1) {
        enumerated(r, node, "request", REQUEST_IMPORTANCE_LEVEL, false)?;
    }
    if presence.is_present(2) {
        integer(r, node, "iso3883", 0, 100)?;
    }
    if presence.is_present(3) {
        enumerated(r, node, "hpmsType", VEHICLE_TYPE, true)?;
    }
    if presence.is_present(4) {
        let regional = node.push(FieldNode::new("regional"));
        decode_regional_extension(RegExtKind::RequestorType, r, ctx, regional)?;
    }
    extension_additions(r, node, extended)
}
