// ABOUTME: Partial DENM grammar (ETSI EN 302 637-3): management, situation and location containers
// ABOUTME: The a-la-carte container is shown as undecoded trailing data

use super::dsrc::altitude;
use super::{enumerated, extension_additions, integer};
use crate::cause::decode_cause_code;
use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::tree::{FieldNode, FieldValue, Severity};

const TERMINATION: &[&str] = &["isCancellation", "isNegation"];

const RELEVANCE_DISTANCE: &[&str] = &[
    "lessThan50m",
    "lessThan100m",
    "lessThan200m",
    "lessThan500m",
    "lessThan1000m",
    "lessThan5km",
    "lessThan10km",
    "over10km",
];

const RELEVANCE_TRAFFIC_DIRECTION: &[&str] = &[
    "allTrafficDirections",
    "upstreamTraffic",
    "downstreamTraffic",
    "oppositeTraffic",
];

const ROAD_TYPE: &[&str] = &[
    "urban-NoStructuralSeparationToOppositeLanes",
    "urban-WithStructuralSeparationToOppositeLanes",
    "nonUrban-NoStructuralSeparationToOppositeLanes",
    "nonUrban-WithStructuralSeparationToOppositeLanes",
];

/// Seconds a DENM stays valid when validityDuration is absent
pub const DEFAULT_VALIDITY: i64 = 600;

/// `DecentralizedEnvironmentalNotificationMessage` body following the ItsPduHeader
pub fn dissect(
    data: &[u8],
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let presence = r.read_presence(3)?;

    management_container(&mut r, tree)?;
    if presence.is_present(0) {
        situation_container(&mut r, ctx, tree)?;
    }
    if presence.is_present(1) {
        location_container(&mut r, tree)?;
    }
    if presence.is_present(2) {
        let rest = r.rest();
        tree.push(FieldNode::new("alacarte"))
            .push(FieldNode::raw(rest))
            .add_note(Severity::Note, "AlacarteContainer not decoded");
        return Ok(data.len());
    }
    Ok(r.consumed_octets())
}

fn management_container(r: &mut PerReader<'_>, tree: &mut FieldNode) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("management"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(5)?;

    let action = node.push(FieldNode::new("actionID"));
    integer(r, action, "originatingStationID", 0, u32::MAX as i64)?;
    integer(r, action, "sequenceNumber", 0, 65535)?;

    integer(r, node, "detectionTime", 0, 4_398_046_511_103)?;
    integer(r, node, "referenceTime", 0, 4_398_046_511_103)?;
    if presence.is_present(0) {
        enumerated(r, node, "termination", TERMINATION, false)?;
    }
    reference_position(r, node, "eventPosition")?;
    if presence.is_present(1) {
        enumerated(r, node, "relevanceDistance", RELEVANCE_DISTANCE, false)?;
    }
    if presence.is_present(2) {
        enumerated(
            r,
            node,
            "relevanceTrafficDirection",
            RELEVANCE_TRAFFIC_DIRECTION,
            false,
        )?;
    }
    if presence.is_present(3) {
        integer(r, node, "validityDuration", 0, 86400)?;
    } else {
        node.push(FieldNode::leaf(
            "validityDuration",
            FieldValue::Unsigned(DEFAULT_VALIDITY as u64),
        ))
        .add_note(Severity::Note, "default value");
    }
    if presence.is_present(4) {
        integer(r, node, "transmissionInterval", 1, 10000)?;
    }
    integer(r, node, "stationType", 0, 255)?;
    extension_additions(r, node, extended)
}

fn situation_container(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("situation"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(2)?;

    integer(r, node, "informationQuality", 0, 7)?;
    decode_cause_code("eventType", r, ctx, node)?;
    if presence.is_present(0) {
        decode_cause_code("linkedCause", r, ctx, node)?;
    }
    if presence.is_present(1) {
        let history = node.push(FieldNode::new("eventHistory"));
        for _ in 0..r.read_size(1, 23)? {
            let point = history.push(FieldNode::new("EventPoint"));
            let fields = r.read_presence(1)?;
            delta_reference_position(r, point, "eventPosition")?;
            if fields.is_present(0) {
                path_delta_time(r, point, "eventDeltaTime")?;
            }
            integer(r, point, "informationQuality", 0, 7)?;
        }
    }
    extension_additions(r, node, extended)
}

fn location_container(r: &mut PerReader<'_>, tree: &mut FieldNode) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new("location"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(3)?;

    if presence.is_present(0) {
        let speed = node.push(FieldNode::new("eventSpeed"));
        integer(r, speed, "speedValue", 0, 16383)?;
        integer(r, speed, "speedConfidence", 1, 127)?;
    }
    if presence.is_present(1) {
        let heading = node.push(FieldNode::new("eventPositionHeading"));
        integer(r, heading, "headingValue", 0, 3601)?;
        integer(r, heading, "headingConfidence", 1, 127)?;
    }
    let traces = node.push(FieldNode::new("traces"));
    for _ in 0..r.read_size(1, 7)? {
        let history = traces.push(FieldNode::new("PathHistory"));
        for _ in 0..r.read_size(0, 40)? {
            let point = history.push(FieldNode::new("PathPoint"));
            let fields = r.read_presence(1)?;
            delta_reference_position(r, point, "pathPosition")?;
            if fields.is_present(0) {
                path_delta_time(r, point, "pathDeltaTime")?;
            }
        }
    }
    if presence.is_present(2) {
        enumerated(r, node, "roadType", ROAD_TYPE, false)?;
    }
    extension_additions(r, node, extended)
}

fn reference_position(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    integer(r, node, "latitude", -900_000_000, 900_000_001)?;
    integer(r, node, "longitude", -1_800_000_000, 1_800_000_001)?;

    let ellipse = node.push(FieldNode::new("positionConfidenceEllipse"));
    integer(r, ellipse, "semiMajorConfidence", 0, 4095)?;
    integer(r, ellipse, "semiMinorConfidence", 0, 4095)?;
    integer(r, ellipse, "semiMajorOrientation", 0, 3601)?;

    altitude(r, node, "altitude")
}

fn delta_reference_position(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    integer(r, node, "deltaLatitude", -131_071, 131_072)?;
    integer(r, node, "deltaLongitude", -131_071, 131_072)?;
    integer(r, node, "deltaAltitude", -12700, 12800)?;
    Ok(())
}

fn path_delta_time(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
) -> Result<(), DecodeError> {
    let value = r.read_constrained_ext(name, 1, 65535)?;
    tree.push(FieldNode::leaf(name, FieldValue::Signed(value)));
    Ok(())
}
