// ABOUTME: EU regional extension (AddGrpC, ETSI TS 103 301) handlers for DSRC open types
// ABOUTME: Each handler decodes one *-addGrpC SEQUENCE from a regExtValue payload

use super::dsrc::{altitude, node_offset_point_xy, prioritization_response_status};
use super::{enumerated, extension_additions, integer};
use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::tree::FieldNode;

/// Signature shared by the regional handlers
pub type Handler =
    fn(&[u8], &mut DispatchContext<'_>, &mut FieldNode) -> Result<usize, DecodeError>;

const PTV_REQUEST_TYPE: &[&str] = &[
    "preRequest",
    "mainRequest",
    "doorCloseRequest",
    "cancelRequest",
    "emergencyRequest",
];

const EMISSION_TYPE: &[&str] = &["euro1", "euro2", "euro3", "euro4", "euro5", "euro6"];

const REJECTED_REASON: &[&str] = &[
    "unknown",
    "exceptionalCondition",
    "maxWaitingTimeExceeded",
    "ptPriorityDisabled",
    "higherPTPriorityGranted",
    "vehicleTrackingUnknown",
];

pub fn connection_maneuver_assist(
    data: &[u8],
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("ConnectionManeuverAssist-addGrpC"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(1)?;

    if presence.is_present(0) {
        let list = node.push(FieldNode::new("itsStationPosition"));
        for _ in 0..r.read_size(1, 5)? {
            let position = list.push(FieldNode::new("ItsStationPosition"));
            let position_extended = r.read_extension_bit()?;
            let fields = r.read_presence(3)?;
            integer(&mut r, position, "stationID", 0, u32::MAX as i64)?;
            if fields.is_present(0) {
                integer(&mut r, position, "laneID", 0, 255)?;
            }
            if fields.is_present(1) {
                node_offset_point_xy(&mut r, ctx, position, "nodeXY")?;
            }
            if fields.is_present(2) {
                integer(&mut r, position, "timeReference", 0, 60000)?;
            }
            extension_additions(&mut r, position, position_extended)?;
        }
    }
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn connection_trajectory(
    data: &[u8],
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("ConnectionTrajectory-addGrpC"));
    let extended = r.read_extension_bit()?;

    let nodes = node.push(FieldNode::new("nodes"));
    for _ in 0..r.read_size(2, 63)? {
        let node_xy = nodes.push(FieldNode::new("NodeXY"));
        let node_extended = r.read_extension_bit()?;
        let presence = r.read_presence(1)?;
        node_offset_point_xy(&mut r, ctx, node_xy, "delta")?;
        if presence.is_present(0) {
            return Err(DecodeError::Unsupported {
                field: "NodeAttributeSetXY",
            });
        }
        extension_additions(&mut r, node_xy, node_extended)?;
    }
    integer(&mut r, node, "connectionID", 0, 255)?;
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn control(
    data: &[u8],
    _ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("Control-addGrpC"));
    let extended = r.read_extension_bit()?;
    enumerated(&mut r, node, "ptvRequest", PTV_REQUEST_TYPE, true)?;
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn intersection_state(
    data: &[u8],
    _ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("IntersectionState-addGrpC"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(1)?;

    if presence.is_present(0) {
        let list = node.push(FieldNode::new("activePrioritizations"));
        for _ in 0..r.read_size(1, 10)? {
            let response = list.push(FieldNode::new("PrioritizationResponse"));
            let response_extended = r.read_extension_bit()?;
            integer(&mut r, response, "stationID", 0, u32::MAX as i64)?;
            prioritization_response_status(&mut r, response, "priorState")?;
            integer(&mut r, response, "signalGroup", 0, 255)?;
            extension_additions(&mut r, response, response_extended)?;
        }
    }
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn map_data(
    data: &[u8],
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("MapData-addGrpC"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(1)?;

    if presence.is_present(0) {
        let list = node.push(FieldNode::new("signalHeadLocations"));
        for _ in 0..r.read_size(1, 64)? {
            let location = list.push(FieldNode::new("SignalHeadLocation"));
            let location_extended = r.read_extension_bit()?;
            node_offset_point_xy(&mut r, ctx, location, "nodeXY")?;
            integer(&mut r, location, "nodeZ", -12700, 12800)?;
            integer(&mut r, location, "signalGroupID", 0, 255)?;
            extension_additions(&mut r, location, location_extended)?;
        }
    }
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn position_3d(
    data: &[u8],
    _ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("Position3D-addGrpC"));
    let extended = r.read_extension_bit()?;
    altitude(&mut r, node, "altitude")?;
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn restriction_user_type(
    data: &[u8],
    _ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("RestrictionUserType-addGrpC"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(2)?;
    if presence.is_present(0) {
        enumerated(&mut r, node, "emission", EMISSION_TYPE, true)?;
    }
    if presence.is_present(1) {
        integer(&mut r, node, "fuel", 0, 15)?;
    }
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

pub fn signal_status_package(
    data: &[u8],
    _ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    let mut r = PerReader::new(data);
    let node = tree.push(FieldNode::new("SignalStatusPackage-addGrpC"));
    let extended = r.read_extension_bit()?;
    let presence = r.read_presence(2)?;
    if presence.is_present(0) {
        integer(&mut r, node, "synchToSchedule", -122, 121)?;
    }
    if presence.is_present(1) {
        enumerated(&mut r, node, "rejectedReason", REJECTED_REASON, true)?;
    }
    extension_additions(&mut r, node, extended)?;
    Ok(r.consumed_octets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PerWriter;
    use crate::datatypes::{RegExtKind, RegionId, RegionKey};
    use crate::dissector::{Dissector, DissectorConfig};
    use crate::registry::Binding;
    use crate::tree::{FieldValue, Severity};

    fn standard() -> Dissector {
        Dissector::standard().unwrap()
    }

    #[test]
    fn intersection_state_prioritizations() {
        let mut w = PerWriter::new();
        w.write_bool(false).write_bool(true); // no extension, list present
        w.write_constrained(1, 1, 10);
        w.write_bool(false)
            .write_bits(0x0102_0304, 32)
            .write_enumerated(4, 8, true)
            .write_bits(7, 8);
        let bytes = w.into_bytes();

        let dissector = standard();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("t");
        let consumed = intersection_state(&bytes, &mut ctx, &mut tree).unwrap();

        assert_eq!(consumed, bytes.len());
        assert_eq!(tree.find("priorState").unwrap().value.label(), Some("granted"));
        assert_eq!(
            tree.find("stationID").unwrap().value,
            FieldValue::Unsigned(0x0102_0304)
        );
        assert_eq!(tree.find("signalGroup").unwrap().value, FieldValue::Unsigned(7));
    }

    #[test]
    fn connection_trajectory_attributes_are_unsupported() {
        let mut w = PerWriter::new();
        w.write_bool(false).write_constrained(2, 2, 63);
        w.write_bool(false).write_bool(true); // NodeXY with attributes
        w.write_bits(0, 3).write_bits(0, 20);
        let bytes = w.into_bytes();

        let dissector = standard();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("t");
        assert_eq!(
            connection_trajectory(&bytes, &mut ctx, &mut tree),
            Err(DecodeError::Unsupported {
                field: "NodeAttributeSetXY"
            })
        );
        assert!(tree.find("node-XY1").is_some());
    }

    #[test]
    fn nested_regional_node_offset_recurses() {
        // inner Reg-NodeOffsetPointXY handler registered for the test
        fn inner(
            data: &[u8],
            _ctx: &mut DispatchContext<'_>,
            tree: &mut FieldNode,
        ) -> Result<usize, DecodeError> {
            tree.push(FieldNode::leaf("inner", FieldValue::Unsigned(data.len() as u64)));
            Ok(data.len())
        }

        let mut builder = Dissector::builder(DissectorConfig::default());
        builder
            .with_standard_grammars()
            .unwrap()
            .register_region(
                RegionKey::from((RegionId::AddGrpC, RegExtKind::NodeOffsetPointXY)),
                Binding::new("INNER", "inner handler", inner),
            )
            .unwrap();
        let dissector = builder.build();

        let mut w = PerWriter::new();
        w.write_bool(false).write_bool(true).write_constrained(1, 1, 64);
        w.write_bool(false);
        w.write_bits(7, 3).write_bits(3, 8).write_open_type(&[0xAA, 0xBB]);
        w.write_constrained(0, -12700, 12800).write_bits(5, 8);
        let bytes = w.into_bytes();

        let mut ctx = DispatchContext::new(&dissector);
        ctx.set_active_region(Some(3));
        let mut tree = FieldNode::new("t");
        map_data(&bytes, &mut ctx, &mut tree).unwrap();

        assert_eq!(
            tree.find("inner").unwrap().value,
            FieldValue::Unsigned(2)
        );
        assert_eq!(tree.find("signalGroupID").unwrap().value, FieldValue::Unsigned(5));
        assert_eq!(tree.worst_severity(), None);
    }

    #[test]
    fn position_3d_altitude() {
        let mut w = PerWriter::new();
        w.write_bool(false)
            .write_constrained(-50, -100_000, 800_001)
            .write_bits(3, 4);
        let bytes = w.into_bytes();

        let dissector = standard();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("t");
        position_3d(&bytes, &mut ctx, &mut tree).unwrap();

        assert_eq!(tree.find("value").unwrap().value, FieldValue::Signed(-50));
        assert_eq!(tree.find("confidence").unwrap().value.label(), Some("alt-000-10"));
    }

    #[test]
    fn truncated_payload_is_incomplete() {
        let dissector = standard();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("t");
        let err = signal_status_package(&[0b0110_0000], &mut ctx, &mut tree).unwrap_err();

        assert!(matches!(err, DecodeError::Incomplete { .. }));
        let mut node = FieldNode::new("n");
        node.add_fault(&err);
        assert_eq!(node.worst_severity(), Some(Severity::Error));
    }
}
