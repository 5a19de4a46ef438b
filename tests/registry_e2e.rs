use proptest::prelude::*;

use roadrules::rules::standard::{
    register_standard_discrete_types, DIRECTION_USAGE_RULE_TYPE, RIGHT_OF_WAY_RULE_TYPE,
};
use roadrules::rules::{RelatedRules, ValueDomain, YIELD_GROUP};
use roadrules::{
    LaneSRange, LaneSRoute, Range, RuleId, RuleRegistry, RuleTypeId, SRange, ValidationError,
};

fn zone() -> LaneSRoute {
    LaneSRoute::new(vec![
        LaneSRange::new("l1", SRange::new(0.0, 50.0)),
        LaneSRange::new("l2", SRange::new(0.0, 10.0)),
    ])
}

fn speed_ranges() -> Vec<Range> {
    vec![
        Range::new("Residential", 0.0, 8.3),
        Range::new("Urban", 8.3, 13.9),
        Range::new("Interstate", 16.6, 27.8),
    ]
}

#[test]
fn registry_builds_rules_for_mixed_types() {
    let mut registry = RuleRegistry::new();
    register_standard_discrete_types(&mut registry).unwrap();
    registry.register_range_value_rule("Speed", speed_ranges()).unwrap();

    assert_eq!(registry.len(), 4);
    assert_eq!(registry.range_value_rule_types().len(), 1);
    assert_eq!(registry.discrete_value_rule_types().len(), 3);

    let right_of_way = registry
        .get_possible_states_of_rule_type(&RuleTypeId::new(RIGHT_OF_WAY_RULE_TYPE))
        .unwrap();
    assert!(matches!(right_of_way.domain, ValueDomain::Discrete(_)));

    let mut related = RelatedRules::new();
    related.insert(YIELD_GROUP.to_string(), vec![RuleId::new("north/stop")]);
    let rule = registry
        .build_discrete_value_rule(
            "south/go",
            RIGHT_OF_WAY_RULE_TYPE,
            zone(),
            related.clone(),
            vec!["Go".into(), "StopThenGo".into()],
        )
        .unwrap();
    assert_eq!(rule.related_rules(), &related);
    assert_eq!(rule.zone().ranges().len(), 2);

    let limit = registry
        .build_range_value_rule(
            "l1/limit",
            "Speed",
            zone(),
            RelatedRules::new(),
            vec![Range::new("Urban", 8.3, 13.9)],
        )
        .unwrap();
    assert_eq!(limit.ranges().len(), 1);

    // Kinds do not mix.
    assert!(matches!(
        registry.build_range_value_rule(
            "x",
            DIRECTION_USAGE_RULE_TYPE,
            zone(),
            RelatedRules::new(),
            speed_ranges()
        ),
        Err(ValidationError::UnregisteredRuleType { .. })
    ));
}

#[test]
fn rule_with_duplicate_values_is_rejected() {
    let mut registry = RuleRegistry::new();
    registry
        .register_discrete_value_rule("T", vec!["a".into(), "b".into()])
        .unwrap();

    assert!(matches!(
        registry.build_discrete_value_rule(
            "r",
            "T",
            zone(),
            RelatedRules::new(),
            vec!["a".into(), "a".into()]
        ),
        Err(ValidationError::DuplicateRuleValue { .. })
    ));
}

#[test]
fn registry_snapshot_is_independent() {
    let mut registry = RuleRegistry::new();
    registry.register_range_value_rule("Speed", speed_ranges()).unwrap();

    let mut snapshot = registry.range_value_rule_types();
    snapshot.clear();
    assert_eq!(registry.range_value_rule_types().len(), 1);
}

proptest! {
    #[test]
    fn prop_nonempty_distinct_subset_always_builds(mask in 1u8..8) {
        let mut registry = RuleRegistry::new();
        registry.register_range_value_rule("Speed", speed_ranges()).unwrap();

        let subset: Vec<Range> = speed_ranges()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, range)| range)
            .collect();

        let rule = registry
            .build_range_value_rule("r", "Speed", zone(), RelatedRules::new(), subset.clone())
            .unwrap();
        prop_assert_eq!(rule.ranges(), &subset[..]);
    }

    #[test]
    fn prop_unregistered_value_never_builds(value in "[a-z]{1,8}") {
        let mut registry = RuleRegistry::new();
        registry
            .register_discrete_value_rule("T", vec!["Go".into(), "Stop".into()])
            .unwrap();

        let result = registry.build_discrete_value_rule(
            "r",
            "T",
            zone(),
            RelatedRules::new(),
            vec!["Go".into(), value],
        );
        let is_not_in_type = matches!(result, Err(ValidationError::DiscreteValueNotInRuleType { .. }));
        prop_assert!(is_not_in_type);
    }
}
