//! Well-known rule types shared by most road networks.

use crate::error::ValidationError;
use crate::id::RuleTypeId;
use crate::rules::registry::RuleRegistry;

/// Type id of rules describing which vehicles may proceed through a zone.
pub const RIGHT_OF_WAY_RULE_TYPE: &str = "Right-Of-Way Rule Type";

/// Type id of rules describing the allowed travel direction on a lane.
pub const DIRECTION_USAGE_RULE_TYPE: &str = "Direction-Usage Rule Type";

/// Type id of rules describing where vehicles may stop or park.
pub const VEHICLE_STOP_IN_ZONE_BEHAVIOR_RULE_TYPE: &str = "Vehicle-Stop-In-Zone-Behavior Rule Type";

/// Type id of speed limits. Range-valued; limits are specific to each network.
pub const SPEED_LIMIT_RULE_TYPE: &str = "Speed-Limit Rule Type";

const RIGHT_OF_WAY_VALUES: [&str; 3] = ["Go", "Stop", "StopThenGo"];

const DIRECTION_USAGE_VALUES: [&str; 7] = [
    "WithS",
    "AgainstS",
    "Bidirectional",
    "BidirectionalTurnOnly",
    "NoUse",
    "Parking",
    "Undefined",
];

const VEHICLE_STOP_IN_ZONE_BEHAVIOR_VALUES: [&str; 7] = [
    "Unconstrained",
    "DoNotStop",
    "5MinuteParking",
    "30MinuteParking",
    "45MinuteParking",
    "1HourParking",
    "2HourParking",
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// The Right-Of-Way rule type and its values.
#[must_use]
pub fn right_of_way_rule_type() -> (RuleTypeId, Vec<String>) {
    (RuleTypeId::new(RIGHT_OF_WAY_RULE_TYPE), owned(&RIGHT_OF_WAY_VALUES))
}

/// The Direction-Usage rule type and its values.
#[must_use]
pub fn direction_usage_rule_type() -> (RuleTypeId, Vec<String>) {
    (RuleTypeId::new(DIRECTION_USAGE_RULE_TYPE), owned(&DIRECTION_USAGE_VALUES))
}

/// The Vehicle-Stop-In-Zone-Behavior rule type and its values.
#[must_use]
pub fn vehicle_stop_in_zone_behavior_rule_type() -> (RuleTypeId, Vec<String>) {
    (
        RuleTypeId::new(VEHICLE_STOP_IN_ZONE_BEHAVIOR_RULE_TYPE),
        owned(&VEHICLE_STOP_IN_ZONE_BEHAVIOR_VALUES),
    )
}

/// Registers every standard discrete-valued rule type.
///
/// # Errors
///
/// `DuplicateRuleType` if one of them is already registered.
pub fn register_standard_discrete_types(registry: &mut RuleRegistry) -> Result<(), ValidationError> {
    for (type_id, values) in [
        right_of_way_rule_type(),
        direction_usage_rule_type(),
        vehicle_stop_in_zone_behavior_rule_type(),
    ] {
        registry.register_discrete_value_rule(type_id, values)?;
    }
    Ok(())
}
