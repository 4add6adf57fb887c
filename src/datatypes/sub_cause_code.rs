// ABOUTME: Label tables for SubCauseCodeType, one per direct cause plus the generic fallback
// ABOUTME: Values follow the ETSI TS 102 894-2 common data dictionary

use crate::macros::sub_cause_vocabulary;

/// Value/label table used to render a SubCauseCode field
///
/// SubCauseCodeType is a plain `INTEGER (0..255)` on the wire; which table
/// applies is only known from the sibling causeCode decoded just before it.
#[derive(Debug, PartialEq, Eq)]
pub struct SubCauseVocabulary {
    /// Rendered field name, e.g. `roadworksSubCauseCode`
    pub field: &'static str,
    pub labels: &'static [(u8, &'static str)],
}

impl SubCauseVocabulary {
    pub fn label(&self, value: u8) -> Option<&'static str> {
        self.labels
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| *label)
    }

    pub fn is_generic(&self) -> bool {
        std::ptr::eq(self, &GENERIC)
    }
}

sub_cause_vocabulary! {
    /// Fallback for reserved and unknown causes: no labels
    GENERIC = "subCauseCode" {}

    TRAFFIC_CONDITION = "trafficConditionSubCauseCode" {
        0 => "unavailable",
        1 => "increasedVolumeOfTraffic",
        2 => "trafficJamSlowlyIncreasing",
        3 => "trafficJamIncreasing",
        4 => "trafficJamStronglyIncreasing",
        5 => "trafficStationary",
        6 => "trafficJamSlightlyDecreasing",
        7 => "trafficJamDecreasing",
        8 => "trafficJamStronglyDecreasing",
    }

    ACCIDENT = "accidentSubCauseCode" {
        0 => "unavailable",
        1 => "multiVehicleAccident",
        2 => "heavyAccident",
        3 => "accidentInvolvingLorry",
        4 => "accidentInvolvingBus",
        5 => "accidentInvolvingHazardousMaterials",
        6 => "accidentOnOppositeLane",
        7 => "unsecuredAccident",
        8 => "assistanceRequested",
    }

    ROADWORKS = "roadworksSubCauseCode" {
        0 => "unavailable",
        1 => "majorRoadworks",
        2 => "roadMarkingWork",
        3 => "slowMovingRoadMaintenance",
        4 => "shortTermStationaryRoadworks",
        5 => "streetCleaning",
        6 => "winterService",
    }

    ADVERSE_WEATHER_ADHESION = "adverseWeatherCondition-AdhesionSubCauseCode" {
        0 => "unavailable",
        1 => "heavyFrostOnRoad",
        2 => "fuelOnRoad",
        3 => "mudOnRoad",
        4 => "snowOnRoad",
        5 => "iceOnRoad",
        6 => "blackIceOnRoad",
        7 => "oilOnRoad",
        8 => "looseChippings",
        9 => "instantBlackIce",
        10 => "roadsSalted",
    }

    HAZARDOUS_SURFACE_CONDITION = "hazardousLocation-SurfaceConditionSubCauseCode" {
        0 => "unavailable",
        1 => "rockfalls",
        2 => "earthquakeDamage",
        3 => "sewerCollapse",
        4 => "subsidence",
        5 => "snowDrifts",
        6 => "stormDamage",
        7 => "burstPipe",
        8 => "volcanoEruption",
        9 => "fallingIce",
    }

    HAZARDOUS_OBSTACLE_ON_THE_ROAD = "hazardousLocation-ObstacleOnTheRoadSubCauseCode" {
        0 => "unavailable",
        1 => "shedLoad",
        2 => "partsOfVehicles",
        3 => "partsOfTyres",
        4 => "bigObjects",
        5 => "fallenTrees",
        6 => "hubCaps",
        7 => "waitingVehicles",
    }

    HAZARDOUS_ANIMAL_ON_THE_ROAD = "hazardousLocation-AnimalOnTheRoadSubCauseCode" {
        0 => "unavailable",
        1 => "wildAnimals",
        2 => "herdOfAnimals",
        3 => "smallAnimals",
        4 => "largeAnimals",
    }

    HUMAN_PRESENCE_ON_THE_ROAD = "humanPresenceOnTheRoadSubCauseCode" {
        0 => "unavailable",
        1 => "childrenOnRoadway",
        2 => "cyclistOnRoadway",
        3 => "motorcyclistOnRoadway",
    }

    WRONG_WAY_DRIVING = "wrongWayDrivingSubCauseCode" {
        0 => "unavailable",
        1 => "wrongLane",
        2 => "wrongDirection",
    }

    RESCUE_AND_RECOVERY = "rescueAndRecoveryWorkInProgressSubCauseCode" {
        0 => "unavailable",
        1 => "emergencyVehicles",
        2 => "rescueHelicopterLanding",
        3 => "policeActivityOngoing",
        4 => "medicalEmergencyOngoing",
        5 => "childAbductionInProgress",
    }

    ADVERSE_WEATHER_EXTREME = "adverseWeatherCondition-ExtremeWeatherConditionSubCauseCode" {
        0 => "unavailable",
        1 => "strongWinds",
        2 => "damagingHail",
        3 => "hurricane",
        4 => "thunderstorm",
        5 => "tornado",
        6 => "blizzard",
    }

    ADVERSE_WEATHER_VISIBILITY = "adverseWeatherCondition-VisibilitySubCauseCode" {
        0 => "unavailable",
        1 => "fog",
        2 => "smoke",
        3 => "heavySnowfall",
        4 => "heavyRain",
        5 => "heavyHail",
        6 => "lowSunGlare",
        7 => "sandstorms",
        8 => "swarmsOfInsects",
    }

    ADVERSE_WEATHER_PRECIPITATION = "adverseWeatherCondition-PrecipitationSubCauseCode" {
        0 => "unavailable",
        1 => "heavyRain",
        2 => "heavySnowfall",
        3 => "softHail",
    }

    SLOW_VEHICLE = "slowVehicleSubCauseCode" {
        0 => "unavailable",
        1 => "maintenanceVehicle",
        2 => "vehiclesSlowingToLookAtAccident",
        3 => "abnormalLoad",
        4 => "abnormalWideLoad",
        5 => "convoy",
        6 => "snowplough",
        7 => "deicing",
        8 => "saltingVehicles",
    }

    DANGEROUS_END_OF_QUEUE = "dangerousEndOfQueueSubCauseCode" {
        0 => "unavailable",
        1 => "suddenEndOfQueue",
        2 => "queueOverHill",
        3 => "queueAroundBend",
        4 => "queueInTunnel",
    }

    VEHICLE_BREAKDOWN = "vehicleBreakdownSubCauseCode" {
        0 => "unavailable",
        1 => "lackOfFuel",
        2 => "lackOfBatteryPower",
        3 => "engineProblem",
        4 => "transmissionProblem",
        5 => "engineCoolingProblem",
        6 => "brakingSystemProblem",
        7 => "steeringProblem",
        8 => "tyrePuncture",
        9 => "tyrePressureProblem",
    }

    POST_CRASH = "postCrashSubCauseCode" {
        0 => "unavailable",
        1 => "accidentWithoutECallTriggered",
        2 => "accidentWithECallManuallyTriggered",
        3 => "accidentWithECallAutomaticallyTriggered",
        4 => "accidentWithECallTriggeredWithoutAccessToCellularNetwork",
    }

    HUMAN_PROBLEM = "humanProblemSubCauseCode" {
        0 => "unavailable",
        1 => "glycemiaProblem",
        2 => "heartProblem",
    }

    STATIONARY_VEHICLE = "stationaryVehicleSubCauseCode" {
        0 => "unavailable",
        1 => "humanProblem",
        2 => "vehicleBreakdown",
        3 => "postCrash",
        4 => "publicTransportStop",
        5 => "carryingDangerousGoods",
    }

    EMERGENCY_VEHICLE_APPROACHING = "emergencyVehicleApproachingSubCauseCode" {
        0 => "unavailable",
        1 => "emergencyVehicleApproaching",
        2 => "prioritizedVehicleApproaching",
    }

    HAZARDOUS_DANGEROUS_CURVE = "hazardousLocation-DangerousCurveSubCauseCode" {
        0 => "unavailable",
        1 => "dangerousLeftTurnCurve",
        2 => "dangerousRightTurnCurve",
        3 => "multipleCurvesStartingWithUnknownTurningDirection",
        4 => "multipleCurvesStartingWithLeftTurn",
        5 => "multipleCurvesStartingWithRightTurn",
    }

    COLLISION_RISK = "collisionRiskSubCauseCode" {
        0 => "unavailable",
        1 => "longitudinalCollisionRisk",
        2 => "crossingCollisionRisk",
        3 => "lateralCollisionRisk",
        4 => "vulnerableRoadUser",
    }

    SIGNAL_VIOLATION = "signalViolationSubCauseCode" {
        0 => "unavailable",
        1 => "stopSignViolation",
        2 => "trafficLightViolation",
        3 => "turningRegulationViolation",
    }

    DANGEROUS_SITUATION = "dangerousSituationSubCauseCode" {
        0 => "unavailable",
        1 => "emergencyElectronicBrakeEngaged",
        2 => "preCrashSystemEngaged",
        3 => "espEngaged",
        4 => "absEngaged",
        5 => "aebEngaged",
        6 => "brakeWarningEngaged",
        7 => "collisionRiskWarningEngaged",
    }
}
