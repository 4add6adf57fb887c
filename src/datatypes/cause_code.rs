// ABOUTME: Defines the CauseCodeType vocabulary of DENM event classification per ETSI TS 102 894-2
// ABOUTME: Each direct cause selects the label table used for its sibling SubCauseCode field

use num_enum::TryFromPrimitive;

/// Direct cause of a traffic event (CauseCodeType ::= INTEGER (0..255))
///
/// Values not listed here are reserved for future use. A reserved or
/// unknown cause renders its SubCauseCode through the generic vocabulary.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CauseCodeType {
    Reserved = 0,
    TrafficCondition = 1,
    Accident = 2,
    Roadworks = 3,
    AdverseWeatherConditionAdhesion = 6,
    HazardousLocationSurfaceCondition = 9,
    HazardousLocationObstacleOnTheRoad = 10,
    HazardousLocationAnimalOnTheRoad = 11,
    HumanPresenceOnTheRoad = 12,
    WrongWayDriving = 14,
    RescueAndRecoveryWorkInProgress = 15,
    AdverseWeatherConditionExtremeWeatherCondition = 17,
    AdverseWeatherConditionVisibility = 18,
    AdverseWeatherConditionPrecipitation = 19,
    SlowVehicle = 26,
    DangerousEndOfQueue = 27,
    VehicleBreakdown = 91,
    PostCrash = 92,
    HumanProblem = 93,
    StationaryVehicle = 94,
    EmergencyVehicleApproaching = 95,
    HazardousLocationDangerousCurve = 96,
    CollisionRisk = 97,
    SignalViolation = 98,
    DangerousSituation = 99,
}

impl CauseCodeType {
    /// ASN.1 value name
    pub fn label(&self) -> &'static str {
        match self {
            CauseCodeType::Reserved => "reserved",
            CauseCodeType::TrafficCondition => "trafficCondition",
            CauseCodeType::Accident => "accident",
            CauseCodeType::Roadworks => "roadworks",
            CauseCodeType::AdverseWeatherConditionAdhesion => "adverseWeatherCondition-Adhesion",
            CauseCodeType::HazardousLocationSurfaceCondition => {
                "hazardousLocation-SurfaceCondition"
            }
            CauseCodeType::HazardousLocationObstacleOnTheRoad => {
                "hazardousLocation-ObstacleOnTheRoad"
            }
            CauseCodeType::HazardousLocationAnimalOnTheRoad => "hazardousLocation-AnimalOnTheRoad",
            CauseCodeType::HumanPresenceOnTheRoad => "humanPresenceOnTheRoad",
            CauseCodeType::WrongWayDriving => "wrongWayDriving",
            CauseCodeType::RescueAndRecoveryWorkInProgress => "rescueAndRecoveryWorkInProgress",
            CauseCodeType::AdverseWeatherConditionExtremeWeatherCondition => {
                "adverseWeatherCondition-ExtremeWeatherCondition"
            }
            CauseCodeType::AdverseWeatherConditionVisibility => "adverseWeatherCondition-Visibility",
            CauseCodeType::AdverseWeatherConditionPrecipitation => {
                "adverseWeatherCondition-Precipitation"
            }
            CauseCodeType::SlowVehicle => "slowVehicle",
            CauseCodeType::DangerousEndOfQueue => "dangerousEndOfQueue",
            CauseCodeType::VehicleBreakdown => "vehicleBreakdown",
            CauseCodeType::PostCrash => "postCrash",
            CauseCodeType::HumanProblem => "humanProblem",
            CauseCodeType::StationaryVehicle => "stationaryVehicle",
            CauseCodeType::EmergencyVehicleApproaching => "emergencyVehicleApproaching",
            CauseCodeType::HazardousLocationDangerousCurve => "hazardousLocation-DangerousCurve",
            CauseCodeType::CollisionRisk => "collisionRisk",
            CauseCodeType::SignalViolation => "signalViolation",
            CauseCodeType::DangerousSituation => "dangerousSituation",
        }
    }

    pub fn label_of(raw: u8) -> Option<&'static str> {
        CauseCodeType::try_from(raw).ok().map(|c| c.label())
    }
}
