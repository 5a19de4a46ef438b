//! State provider whose states are assigned by hand.
//!
//! The provider holds a shared handle to a rulebook and the only copy of the
//! rule states. States are validated against the values declared by each
//! rule instance.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use tracing::{debug, error, warn};

use crate::config::{AmbiguousMatchPolicy, QueryConfig};
use crate::error::{ExecutionError, RulesError, RulesResult, ValidationError};
use crate::id::{RuleId, RuleTypeId};
use crate::lane::{LaneSRoute, RoadPosition};
use crate::math::Tolerance;
use crate::rules::filter::{by_type, by_zone, filter_rules};
use crate::rules::rule::{DiscreteValueRule, RangeValueRule};
use crate::rules::rulebook::{lock_err, not_found, RoadRulebook};
use crate::rules::state::{NextState, RuleStateProvider, StateEntry, ValueRule};

/// Thread-safe state store for rules of kind `R`.
///
/// Reads run concurrently; `set_state` takes the write lock only after the
/// new entry has been validated.
pub struct ManualStateProvider<R: ValueRule> {
    rulebook: Arc<dyn RoadRulebook>,
    config: QueryConfig,
    states: RwLock<BTreeMap<RuleId, StateEntry<R::Value>>>,
    _kind: PhantomData<fn() -> R>,
}

/// Manual state provider for discrete-valued rules.
pub type ManualDiscreteValueRuleStateProvider = ManualStateProvider<DiscreteValueRule>;

/// Manual state provider for range-valued rules.
pub type ManualRangeValueRuleStateProvider = ManualStateProvider<RangeValueRule>;

impl<R: ValueRule> ManualStateProvider<R> {
    /// Creates an empty provider over `rulebook` with the default query config.
    #[must_use]
    pub fn new(rulebook: Arc<dyn RoadRulebook>) -> Self {
        Self::with_config(rulebook, QueryConfig::default())
    }

    /// Creates an empty provider over `rulebook` with an explicit query config.
    #[must_use]
    pub fn with_config(rulebook: Arc<dyn RoadRulebook>, config: QueryConfig) -> Self {
        Self {
            rulebook,
            config,
            states: RwLock::new(BTreeMap::new()),
            _kind: PhantomData,
        }
    }

    /// The query config in effect.
    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    fn validate_rule_state(rule: &R, state: &R::Value) -> Result<(), ValidationError> {
        if rule.values().contains(state) {
            Ok(())
        } else {
            Err(ValidationError::StateNotInRuleValues {
                rule_id: rule.common().id.clone(),
                value: format!("{state:?}"),
            })
        }
    }

    /// Sets the state of rule `id`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// - `RuleNotFound` if the rulebook has no rule of this kind with `id`.
    /// - `StateNotInRuleValues` if `state` or `next_state` is not one of the
    ///   rule's declared values.
    /// - `DurationWithoutNextState` if `duration_until` is given alone.
    /// - `NonPositiveDuration` if `duration_until <= 0`.
    pub fn set_state(
        &self,
        id: &RuleId,
        state: R::Value,
        next_state: Option<R::Value>,
        duration_until: Option<f64>,
    ) -> RulesResult<()> {
        let rule = self
            .rulebook
            .get_rule(id)?
            .and_then(R::from_rule)
            .ok_or_else(|| not_found(id, Some(R::KIND)))?;

        Self::validate_rule_state(&rule, &state)?;
        let next = match next_state {
            Some(next_state) => {
                Self::validate_rule_state(&rule, &next_state)?;
                if let Some(duration) = duration_until {
                    if duration.is_nan() || duration <= 0.0 {
                        return Err(ValidationError::NonPositiveDuration {
                            rule_id: id.clone(),
                            duration,
                        }
                        .into());
                    }
                }
                Some(NextState {
                    state: next_state,
                    duration_until,
                })
            }
            None if duration_until.is_some() => {
                return Err(ValidationError::DurationWithoutNextState { rule_id: id.clone() }.into());
            }
            None => None,
        };

        let entry = StateEntry { state, next };
        debug!(rule_id = %id, state = ?entry, "set rule state");
        self.states
            .write()
            .map_err(|_| lock_err("state_provider.set_state"))?
            .insert(id.clone(), entry);
        Ok(())
    }

    /// Snapshot of every recorded state, ordered by rule id.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    pub fn states(&self) -> RulesResult<BTreeMap<RuleId, StateEntry<R::Value>>> {
        Ok(self
            .states
            .read()
            .map_err(|_| lock_err("state_provider.states"))?
            .clone())
    }

    /// Rules of this kind and `rule_type` whose zone covers `road_position`,
    /// sorted by id.
    fn matching_rules(
        &self,
        road_position: &RoadPosition,
        rule_type: &RuleTypeId,
        tolerance: Tolerance,
    ) -> RulesResult<Vec<R>> {
        let query = LaneSRoute::at_position(road_position);
        let filters = [by_type(rule_type), by_zone(&query, tolerance)];
        let mut candidates: Vec<R> = filter_rules(self.rulebook.rules()?, &filters)
            .into_iter()
            .filter_map(R::from_rule)
            .collect();
        candidates.sort_by(|a, b| a.common().id.cmp(&b.common().id));
        Ok(candidates)
    }
}

impl<R: ValueRule> RuleStateProvider for ManualStateProvider<R> {
    type Value = R::Value;

    fn get_state(&self, id: &RuleId) -> RulesResult<Option<StateEntry<R::Value>>> {
        let states = self
            .states
            .read()
            .map_err(|_| lock_err("state_provider.get_state"))?;
        Ok(states.get(id).cloned())
    }

    fn get_state_at(
        &self,
        road_position: &RoadPosition,
        rule_type: &RuleTypeId,
        tolerance: f64,
    ) -> RulesResult<Option<StateEntry<R::Value>>> {
        let tolerance = Tolerance::new(tolerance)?;
        let candidates = self.matching_rules(road_position, rule_type, tolerance)?;

        if candidates.len() > 1 {
            warn!(
                rule_type = %rule_type,
                road_position = %road_position,
                matches = candidates.len(),
                "more than one rule matches rule type and road position"
            );
            for rule in &candidates {
                warn!(
                    rule_id = %rule.common().id,
                    rule_type = %rule_type,
                    road_position = %road_position,
                    "rule matches rule type and road position"
                );
            }
            if self.config.ambiguous_match == AmbiguousMatchPolicy::Reject {
                return Err(ExecutionError::AmbiguousRules {
                    type_id: rule_type.clone(),
                    lane_id: road_position.lane_id.clone(),
                    s: road_position.pos.s,
                    candidates: candidates.iter().map(|rule| rule.common().id.clone()).collect(),
                }
                .into());
            }
        }

        let Some(selected) = candidates.first() else {
            return Ok(None);
        };
        let id = &selected.common().id;
        let states = self
            .states
            .read()
            .map_err(|_| lock_err("state_provider.get_state_at"))?;
        match states.get(id) {
            Some(entry) => Ok(Some(entry.clone())),
            None => {
                error!(rule_id = %id, rule_type = %rule_type, "selected rule has no recorded state");
                Err(RulesError::MissingState { id: id.clone() })
            }
        }
    }
}

impl<R: ValueRule> fmt::Debug for ManualStateProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualStateProvider")
            .field("kind", &R::KIND)
            .field("config", &self.config)
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::{LaneSRange, SRange, Zone};
    use crate::rules::rule::{Range, RelatedRules};
    use crate::rules::rulebook::ManualRulebook;
    use crate::rules::state::DiscreteStateEntry;

    const SPEED: &str = "Speed";

    fn zone(lane: &str, s0: f64, s1: f64) -> Zone {
        LaneSRoute::new(vec![LaneSRange::new(lane, SRange::new(s0, s1))])
    }

    fn discrete_rule(id: &str, zone: Zone, values: &[&str]) -> DiscreteValueRule {
        DiscreteValueRule::new(
            RuleId::new(id),
            RuleTypeId::new(SPEED),
            zone,
            RelatedRules::new(),
            values.iter().map(|v| (*v).to_string()).collect(),
        )
        .unwrap()
    }

    fn provider_with(rules: Vec<DiscreteValueRule>) -> ManualDiscreteValueRuleStateProvider {
        let book = ManualRulebook::new();
        for rule in rules {
            book.add_rule(rule).unwrap();
        }
        ManualDiscreteValueRuleStateProvider::new(Arc::new(book))
    }

    fn rule_a() -> DiscreteValueRule {
        discrete_rule("RuleA", zone("L1", 10.0, 20.0), &["Low", "Med"])
    }

    #[test]
    fn test_get_state_without_set_is_none() {
        let provider = provider_with(vec![rule_a()]);
        assert_eq!(provider.get_state(&RuleId::new("RuleA")).unwrap(), None);
        assert_eq!(provider.get_state(&RuleId::new("Unknown")).unwrap(), None);
    }

    #[test]
    fn test_set_and_get_state() {
        let provider = provider_with(vec![rule_a()]);
        let id = RuleId::new("RuleA");

        provider
            .set_state(&id, "Low".into(), Some("Med".into()), Some(5.0))
            .unwrap();
        assert_eq!(
            provider.get_state(&id).unwrap(),
            Some(DiscreteStateEntry {
                state: "Low".into(),
                next: Some(NextState {
                    state: "Med".into(),
                    duration_until: Some(5.0),
                }),
            })
        );

        // Replaces the previous entry.
        provider.set_state(&id, "Med".into(), None, None).unwrap();
        assert_eq!(
            provider.get_state(&id).unwrap(),
            Some(DiscreteStateEntry::current("Med".into()))
        );
    }

    #[test]
    fn test_set_state_unknown_rule_is_not_found() {
        let provider = provider_with(vec![rule_a()]);
        let err = provider
            .set_state(&RuleId::new("Unknown"), "Low".into(), None, None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_state_rejects_values_outside_rule() {
        let provider = provider_with(vec![rule_a()]);
        let id = RuleId::new("RuleA");

        let err = provider.set_state(&id, "High".into(), None, None).unwrap_err();
        assert!(matches!(
            err,
            RulesError::Validation(ValidationError::StateNotInRuleValues { .. })
        ));
        let err = provider
            .set_state(&id, "Low".into(), Some("High".into()), None)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(provider.get_state(&id).unwrap(), None);
    }

    #[test]
    fn test_set_state_duration_rules() {
        let provider = provider_with(vec![rule_a()]);
        let id = RuleId::new("RuleA");

        assert_eq!(
            provider.set_state(&id, "Low".into(), None, Some(1.0)),
            Err(ValidationError::DurationWithoutNextState { rule_id: id.clone() }.into())
        );
        for duration in [0.0, -1.0, f64::NAN] {
            let err = provider
                .set_state(&id, "Low".into(), Some("Med".into()), Some(duration))
                .unwrap_err();
            assert!(matches!(
                err,
                RulesError::Validation(ValidationError::NonPositiveDuration { .. })
            ));
        }
        provider
            .set_state(&id, "Low".into(), Some("Med".into()), None)
            .unwrap();
    }

    #[test]
    fn test_get_state_at_negative_tolerance() {
        let provider = provider_with(vec![rule_a()]);
        let err = provider
            .get_state_at(&RoadPosition::on_centerline("L1", 15.0), &RuleTypeId::new(SPEED), -0.1)
            .unwrap_err();
        assert_eq!(err, ValidationError::NegativeTolerance { tolerance: -0.1 }.into());
    }

    #[test]
    fn test_get_state_at_picks_smallest_id() {
        let provider = provider_with(vec![
            discrete_rule("b", zone("L1", 0.0, 10.0), &["Low"]),
            discrete_rule("a", zone("L1", 5.0, 15.0), &["Med"]),
        ]);
        provider.set_state(&RuleId::new("a"), "Med".into(), None, None).unwrap();
        provider.set_state(&RuleId::new("b"), "Low".into(), None, None).unwrap();

        let position = RoadPosition::on_centerline("L1", 7.0);
        for _ in 0..3 {
            let entry = provider
                .get_state_at(&position, &RuleTypeId::new(SPEED), 0.0)
                .unwrap();
            assert_eq!(entry, Some(DiscreteStateEntry::current("Med".into())));
        }
    }

    #[test]
    fn test_get_state_at_reject_policy() {
        let book = ManualRulebook::new();
        book.add_rule(discrete_rule("b", zone("L1", 0.0, 10.0), &["Low"])).unwrap();
        book.add_rule(discrete_rule("a", zone("L1", 5.0, 15.0), &["Med"])).unwrap();
        let provider = ManualDiscreteValueRuleStateProvider::with_config(
            Arc::new(book),
            QueryConfig {
                ambiguous_match: AmbiguousMatchPolicy::Reject,
            },
        );

        let err = provider
            .get_state_at(&RoadPosition::on_centerline("L1", 7.0), &RuleTypeId::new(SPEED), 0.0)
            .unwrap_err();
        match err {
            RulesError::Execution(ExecutionError::AmbiguousRules { candidates, .. }) => {
                assert_eq!(candidates, vec![RuleId::new("a"), RuleId::new("b")]);
            }
            other => panic!("expected AmbiguousRules, got {other:?}"),
        }
    }

    #[test]
    fn test_get_state_at_without_state_is_internal_error() {
        let provider = provider_with(vec![rule_a()]);
        let err = provider
            .get_state_at(&RoadPosition::on_centerline("L1", 15.0), &RuleTypeId::new(SPEED), 0.0)
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_get_state_at_no_match_is_none() {
        let provider = provider_with(vec![rule_a()]);
        provider.set_state(&RuleId::new("RuleA"), "Low".into(), None, None).unwrap();

        let speed = RuleTypeId::new(SPEED);
        assert_eq!(
            provider.get_state_at(&RoadPosition::on_centerline("L1", 21.5), &speed, 1.0).unwrap(),
            None
        );
        assert_eq!(
            provider.get_state_at(&RoadPosition::on_centerline("L2", 15.0), &speed, 1.0).unwrap(),
            None
        );
        assert_eq!(
            provider
                .get_state_at(&RoadPosition::on_centerline("L1", 15.0), &RuleTypeId::new("Other"), 1.0)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_range_provider_ignores_discrete_rules() {
        let book = ManualRulebook::new();
        book.add_rule(rule_a()).unwrap();
        let limit = Range::new("urban", 0.0, 13.9);
        book.add_rule(
            RangeValueRule::new(
                RuleId::new("limit"),
                RuleTypeId::new(SPEED),
                zone("L1", 10.0, 20.0),
                RelatedRules::new(),
                vec![limit.clone()],
            )
            .unwrap(),
        )
        .unwrap();
        let provider = ManualRangeValueRuleStateProvider::new(Arc::new(book));

        assert!(provider
            .set_state(&RuleId::new("RuleA"), limit.clone(), None, None)
            .unwrap_err()
            .is_not_found());
        provider.set_state(&RuleId::new("limit"), limit.clone(), None, None).unwrap();

        // Only "limit" is a range rule, so there is no ambiguity.
        let entry = provider
            .get_state_at(&RoadPosition::on_centerline("L1", 12.0), &RuleTypeId::new(SPEED), 0.0)
            .unwrap();
        assert_eq!(entry, Some(StateEntry::current(limit)));
        assert_eq!(provider.states().unwrap().len(), 1);
    }
}
