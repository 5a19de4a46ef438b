//! Runtime state of rule instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RulesResult;
use crate::id::{RuleId, RuleTypeId};
use crate::lane::RoadPosition;
use crate::rules::rule::{DiscreteValueRule, Range, RangeValueRule, Rule, RuleCommon, RuleKind};

/// The value a rule will switch to, and optionally when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextState<V> {
    /// The upcoming value.
    pub state: V,

    /// Seconds until the switch. Advisory: nothing in this crate counts it down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_until: Option<f64>,
}

/// Current and scheduled state of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry<V> {
    /// The current value.
    pub state: V,

    /// The scheduled next value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NextState<V>>,
}

impl<V> StateEntry<V> {
    /// An entry with no scheduled change.
    #[must_use]
    pub const fn current(state: V) -> Self {
        Self { state, next: None }
    }
}

/// State of a discrete-valued rule.
pub type DiscreteStateEntry = StateEntry<String>;

/// State of a range-valued rule.
pub type RangeStateEntry = StateEntry<Range>;

/// A rule kind whose instances declare a set of values a state may take.
pub trait ValueRule: Clone + fmt::Debug + Send + Sync + 'static {
    /// The type of a single state value.
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Which kind of rule this is.
    const KIND: RuleKind;

    /// The header shared with every rule kind.
    fn common(&self) -> &RuleCommon;

    /// The values this instance declares.
    fn values(&self) -> &[Self::Value];

    /// Extracts a rule of this kind, or `None` for the other kind.
    fn from_rule(rule: Rule) -> Option<Self>;
}

impl ValueRule for DiscreteValueRule {
    type Value = String;

    const KIND: RuleKind = RuleKind::Discrete;

    fn common(&self) -> &RuleCommon {
        DiscreteValueRule::common(self)
    }

    fn values(&self) -> &[String] {
        DiscreteValueRule::values(self)
    }

    fn from_rule(rule: Rule) -> Option<Self> {
        match rule {
            Rule::Discrete(rule) => Some(rule),
            Rule::Range(_) => None,
        }
    }
}

impl ValueRule for RangeValueRule {
    type Value = Range;

    const KIND: RuleKind = RuleKind::Range;

    fn common(&self) -> &RuleCommon {
        RangeValueRule::common(self)
    }

    fn values(&self) -> &[Range] {
        self.ranges()
    }

    fn from_rule(rule: Rule) -> Option<Self> {
        match rule {
            Rule::Range(rule) => Some(rule),
            Rule::Discrete(_) => None,
        }
    }
}

/// Answers state queries for rules of one kind.
pub trait RuleStateProvider: Send + Sync {
    /// The type of a single state value.
    type Value;

    /// State of rule `id`, or `None` if none was ever recorded.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    fn get_state(&self, id: &RuleId) -> RulesResult<Option<StateEntry<Self::Value>>>;

    /// State of the rule of type `rule_type` that applies at `road_position`.
    ///
    /// Returns `None` when no such rule applies there.
    ///
    /// # Errors
    ///
    /// - `NegativeTolerance` if `tolerance < 0`.
    /// - `MissingState` if the selected rule has no recorded state.
    fn get_state_at(
        &self,
        road_position: &RoadPosition,
        rule_type: &RuleTypeId,
        tolerance: f64,
    ) -> RulesResult<Option<StateEntry<Self::Value>>>;
}
