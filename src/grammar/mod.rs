// ABOUTME: Built-in message grammars and the standard registration of versions, messages and regions
// ABOUTME: DENM and SSEM are decoded, the other message families are bound by name with an opaque body

pub mod addgrpc;
pub mod denm;
pub mod dsrc;
pub mod ssem;

use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::datatypes::{MessageId, RegExtKind, RegionId, RegionKey};
use crate::dissector::{DissectorBuilder, its_pdu_header};
use crate::registry::{Binding, RegistryError};
use crate::tree::{FieldNode, FieldValue};
use bytes::Bytes;

/// Protocol name of the AddGrpC regional handlers
pub const ADDGRPC_DESCRIPTION: &str = "DSRC Addition Grp C (EU)";

/// Message families bound by name only: (id, short name, protocol layer)
const NAMED_BODIES: &[(MessageId, &str, &str)] = &[
    (MessageId::Cam, "CAM", "ITS message - CAM"),
    (MessageId::Spatem, "SPATEM", "ITS message - SPATEM"),
    (MessageId::Mapem, "MAPEM", "ITS message - MAPEM"),
    (MessageId::Ivim, "IVIM", "ITS message - IVIM"),
    (MessageId::EvRsr, "EVRSR", "ITS message - EVRSR"),
    (MessageId::TistpgTransaction, "TISTPG", "ITS message - TISTPG"),
    (MessageId::Srem, "SREM", "ITS message - SREM"),
    (MessageId::Evcsn, "EVCSN", "ITS message - EVCSN"),
];

/// AddGrpC handlers by the regional extension slot they decode
const ADDGRPC_HANDLERS: &[(RegExtKind, &str, addgrpc::Handler)] = &[
    (
        RegExtKind::ConnectionManeuverAssist,
        "ConnectionManeuverAssist-addGrpC",
        addgrpc::connection_maneuver_assist,
    ),
    (
        RegExtKind::GenericLane,
        "ConnectionTrajectory-addGrpC",
        addgrpc::connection_trajectory,
    ),
    (
        RegExtKind::NodeAttributeSetXY,
        "Control-addGrpC",
        addgrpc::control,
    ),
    (
        RegExtKind::IntersectionState,
        "IntersectionState-addGrpC",
        addgrpc::intersection_state,
    ),
    (RegExtKind::MapData, "MapData-addGrpC", addgrpc::map_data),
    (
        RegExtKind::Position3D,
        "Position3D-addGrpC",
        addgrpc::position_3d,
    ),
    (
        RegExtKind::RestrictionUserType,
        "RestrictionUserType-addGrpC",
        addgrpc::restriction_user_type,
    ),
    (
        RegExtKind::SignalStatusPackage,
        "SignalStatusPackage-addGrpC",
        addgrpc::signal_status_package,
    ),
];

/// Register the standard versions, message families and AddGrpC handlers
pub fn register_standard(builder: &mut DissectorBuilder) -> Result<(), RegistryError> {
    for version in builder.config().standard_versions.clone() {
        builder.register_version(
            version,
            Binding::new("ItsPduHeader", "ITS PDU header", its_pdu_header),
        )?;
    }

    builder
        .register_message(
            MessageId::Denm as u8,
            Binding::new("DENM", "ITS message - DENM", denm::dissect),
        )?
        .register_message(
            MessageId::Ssem as u8,
            Binding::new("SSEM", "ITS message - SSEM", ssem::dissect),
        )?;
    for &(id, name, description) in NAMED_BODIES {
        builder.register_message(id as u8, Binding::new(name, description, opaque_body))?;
    }

    for &(kind, name, handler) in ADDGRPC_HANDLERS {
        builder.register_region(
            RegionKey::from((RegionId::AddGrpC, kind)),
            Binding::new(name, ADDGRPC_DESCRIPTION, handler),
        )?;
    }
    Ok(())
}

/// Body of a message family whose grammar is not compiled in
fn opaque_body(
    data: &[u8],
    _ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<usize, DecodeError> {
    tree.push(FieldNode::raw(Bytes::copy_from_slice(data)));
    Ok(data.len())
}

/// Read an ENUMERATED with `labels.len()` root values and render it as `name`
pub(crate) fn enumerated(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
    labels: &'static [&'static str],
    extensible: bool,
) -> Result<u64, DecodeError> {
    let value = r.read_enumerated(labels.len() as u32, extensible)?;
    let label = labels.get(value as usize).copied();
    tree.push(FieldNode::leaf(name, FieldValue::enumerated(value, label)));
    Ok(value)
}

/// Read a constrained whole number and render it as `name`
pub(crate) fn integer(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    name: &'static str,
    lower: i64,
    upper: i64,
) -> Result<i64, DecodeError> {
    let value = r.read_constrained(lower, upper)?;
    let rendered = if lower < 0 {
        FieldValue::Signed(value)
    } else {
        FieldValue::Unsigned(value as u64)
    };
    tree.push(FieldNode::leaf(name, rendered));
    Ok(value)
}

/// Skip the extension additions of a SEQUENCE whose extension bit was set, showing them as data
pub(crate) fn extension_additions(
    r: &mut PerReader<'_>,
    tree: &mut FieldNode,
    extended: bool,
) -> Result<(), DecodeError> {
    if extended {
        for addition in r.read_extension_additions()? {
            tree.push(FieldNode::raw(addition));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dissector::{Dissector, DissectorConfig};

    #[test]
    fn standard_registration() {
        let dissector = Dissector::standard().unwrap();

        let mut versions = dissector.versions().keys();
        versions.sort();
        assert_eq!(versions, vec![1, 2]);

        let mut ids = dissector.messages().keys();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(
            dissector.messages().get(&10).unwrap().description(),
            "ITS message - SSEM"
        );

        assert_eq!(dissector.regional().len(), 8);
        for key in dissector.regional().keys() {
            assert_eq!(key.region, RegionId::AddGrpC as u8);
        }
    }

    #[test]
    fn custom_versions_are_registered() {
        let dissector =
            Dissector::with_config(DissectorConfig::default().standard_versions(vec![3])).unwrap();
        assert_eq!(dissector.versions().keys(), vec![3]);
    }

    #[test]
    fn standard_registration_twice_is_a_duplicate() {
        let mut builder = Dissector::builder(DissectorConfig::default());
        register_standard(&mut builder).unwrap();
        assert!(matches!(
            register_standard(&mut builder),
            Err(RegistryError::Duplicate { table: "its.version", .. })
        ));
    }

    #[test]
    fn enumerated_label_lookup() {
        let data = [0b1000_0000];
        let mut r = PerReader::new(&data);
        let mut tree = FieldNode::new("t");
        let value = enumerated(&mut r, &mut tree, "status", &["a", "b", "c"], true).unwrap();

        // extension bit 1, normally small 0 -> first extension addition
        assert_eq!(value, 3);
        assert_eq!(tree.children[0].value, FieldValue::enumerated(3, None));
    }
}
