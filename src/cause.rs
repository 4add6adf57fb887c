// ABOUTME: Resolves which SubCauseCode label table applies to a CauseCode value
// ABOUTME: Also decodes the CauseCode SEQUENCE, threading the cause through DispatchContext

use crate::codec::{DecodeError, PerReader};
use crate::context::DispatchContext;
use crate::datatypes::*;
use crate::tree::{FieldNode, FieldValue};

/// Direct cause → sub-cause vocabulary. Causes not listed use [`GENERIC`].
static CAUSE_TO_SUB_CAUSE: &[(CauseCodeType, &SubCauseVocabulary)] = &[
    (CauseCodeType::TrafficCondition, &TRAFFIC_CONDITION),
    (CauseCodeType::Accident, &ACCIDENT),
    (CauseCodeType::Roadworks, &ROADWORKS),
    (CauseCodeType::AdverseWeatherConditionAdhesion, &ADVERSE_WEATHER_ADHESION),
    (CauseCodeType::HazardousLocationSurfaceCondition, &HAZARDOUS_SURFACE_CONDITION),
    (CauseCodeType::HazardousLocationObstacleOnTheRoad, &HAZARDOUS_OBSTACLE_ON_THE_ROAD),
    (CauseCodeType::HazardousLocationAnimalOnTheRoad, &HAZARDOUS_ANIMAL_ON_THE_ROAD),
    (CauseCodeType::HumanPresenceOnTheRoad, &HUMAN_PRESENCE_ON_THE_ROAD),
    (CauseCodeType::WrongWayDriving, &WRONG_WAY_DRIVING),
    (CauseCodeType::RescueAndRecoveryWorkInProgress, &RESCUE_AND_RECOVERY),
    (CauseCodeType::AdverseWeatherConditionExtremeWeatherCondition, &ADVERSE_WEATHER_EXTREME),
    (CauseCodeType::AdverseWeatherConditionVisibility, &ADVERSE_WEATHER_VISIBILITY),
    (CauseCodeType::AdverseWeatherConditionPrecipitation, &ADVERSE_WEATHER_PRECIPITATION),
    (CauseCodeType::SlowVehicle, &SLOW_VEHICLE),
    (CauseCodeType::DangerousEndOfQueue, &DANGEROUS_END_OF_QUEUE),
    (CauseCodeType::VehicleBreakdown, &VEHICLE_BREAKDOWN),
    (CauseCodeType::PostCrash, &POST_CRASH),
    (CauseCodeType::HumanProblem, &HUMAN_PROBLEM),
    (CauseCodeType::StationaryVehicle, &STATIONARY_VEHICLE),
    (CauseCodeType::EmergencyVehicleApproaching, &EMERGENCY_VEHICLE_APPROACHING),
    (CauseCodeType::HazardousLocationDangerousCurve, &HAZARDOUS_DANGEROUS_CURVE),
    (CauseCodeType::CollisionRisk, &COLLISION_RISK),
    (CauseCodeType::SignalViolation, &SIGNAL_VIOLATION),
    (CauseCodeType::DangerousSituation, &DANGEROUS_SITUATION),
];

/// Sub-cause vocabulary for a raw causeCode value.
///
/// Reserved and unknown values map to the generic vocabulary; this never fails.
pub fn vocabulary_for(cause: u8) -> &'static SubCauseVocabulary {
    CAUSE_TO_SUB_CAUSE
        .iter()
        .find(|(c, _)| *c as u8 == cause)
        .map(|(_, vocabulary)| *vocabulary)
        .unwrap_or(&GENERIC)
}

/// Decode a `CauseCode ::= SEQUENCE { causeCode, subCauseCode, ... }` into a node called `name`
pub fn decode_cause_code(
    name: &'static str,
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let node = tree.push(FieldNode::new(name));
    let extended = r.read_extension_bit()?;

    let cause = r.read_bits(8)? as u8;
    ctx.set_active_cause(cause);
    node.push(FieldNode::leaf(
        "causeCode",
        FieldValue::enumerated(u64::from(cause), CauseCodeType::label_of(cause)),
    ));

    decode_sub_cause_code(r, ctx, node)?;

    if extended {
        for addition in r.read_extension_additions()? {
            node.push(FieldNode::raw(addition));
        }
    }
    Ok(())
}

/// Decode a SubCauseCodeType using the cause recorded by the preceding causeCode
pub fn decode_sub_cause_code(
    r: &mut PerReader<'_>,
    ctx: &mut DispatchContext<'_>,
    tree: &mut FieldNode,
) -> Result<(), DecodeError> {
    let vocabulary = ctx.sub_cause_vocabulary();
    let value = r.read_bits(8)? as u8;
    tree.push(FieldNode::leaf(
        vocabulary.field,
        FieldValue::enumerated(u64::from(value), vocabulary.label(value)),
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PerWriter;
    use crate::dissector::{Dissector, DissectorConfig};

    #[test]
    fn every_direct_cause_has_its_own_vocabulary() {
        assert_eq!(vocabulary_for(3).field, "roadworksSubCauseCode");
        assert_eq!(vocabulary_for(97).field, "collisionRiskSubCauseCode");
        assert_eq!(CAUSE_TO_SUB_CAUSE.len(), 24);

        for (cause, vocabulary) in CAUSE_TO_SUB_CAUSE {
            assert!(!vocabulary.is_generic(), "{cause:?}");
        }
    }

    #[test]
    fn direct_vocabularies_are_pairwise_distinct() {
        for (i, (cause_a, a)) in CAUSE_TO_SUB_CAUSE.iter().enumerate() {
            for (cause_b, b) in &CAUSE_TO_SUB_CAUSE[i + 1..] {
                assert!(!std::ptr::eq(*a, *b), "{cause_a:?} and {cause_b:?} share a table");
                assert_ne!(a.field, b.field, "{cause_a:?} and {cause_b:?}");
            }
        }
    }

    #[test]
    fn reserved_and_unknown_causes_fall_back_to_generic() {
        assert!(vocabulary_for(CauseCodeType::Reserved as u8).is_generic());
        assert!(vocabulary_for(4).is_generic());
        assert!(vocabulary_for(200).is_generic());
        assert!(vocabulary_for(255).is_generic());
    }

    #[test]
    fn decode_roadworks_cause_code() {
        let mut w = PerWriter::new();
        w.write_bool(false).write_bits(3, 8).write_bits(1, 8);
        let bytes = w.into_bytes();

        let dissector = Dissector::builder(DissectorConfig::default()).build();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("situation");
        let mut r = PerReader::new(&bytes);
        decode_cause_code("eventType", &mut r, &mut ctx, &mut tree).unwrap();

        let cause = tree.find("causeCode").unwrap();
        assert_eq!(cause.value.label(), Some("roadworks"));
        let sub = tree.find("roadworksSubCauseCode").unwrap();
        assert_eq!(sub.value.label(), Some("majorRoadworks"));
        assert_eq!(ctx.active_cause(), Some(3));
    }

    #[test]
    fn unknown_cause_uses_generic_sub_cause_field() {
        let mut w = PerWriter::new();
        w.write_bool(false).write_bits(200, 8).write_bits(7, 8);
        let bytes = w.into_bytes();

        let dissector = Dissector::builder(DissectorConfig::default()).build();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("situation");
        decode_cause_code("eventType", &mut PerReader::new(&bytes), &mut ctx, &mut tree).unwrap();

        assert_eq!(
            tree.find("causeCode").unwrap().value,
            FieldValue::enumerated(200, None)
        );
        assert_eq!(
            tree.find("subCauseCode").unwrap().value,
            FieldValue::enumerated(7, None)
        );
    }

    #[test]
    fn sub_cause_without_cause_uses_generic() {
        let bytes = [0x05];
        let dissector = Dissector::builder(DissectorConfig::default()).build();
        let mut ctx = DispatchContext::new(&dissector);
        let mut tree = FieldNode::new("t");
        decode_sub_cause_code(&mut PerReader::new(&bytes), &mut ctx, &mut tree).unwrap();

        assert_eq!(tree.children[0].name, "subCauseCode");
    }
}
