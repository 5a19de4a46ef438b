//! Error types for roadrules.
//!
//! All errors are strongly typed using thiserror. Validation errors are
//! caller contract violations and are never retried; execution errors carry
//! lookups that failed against a rulebook or store.

use thiserror::Error;

use crate::id::{LaneId, RuleId, RuleTypeId};
use crate::rules::{Range, RuleKind};

/// Validation errors raised when a caller breaks an operation's preconditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A rule type id was registered twice.
    #[error("Rule type '{type_id}' is already registered")]
    DuplicateRuleType {
        /// The rule type.
        type_id: RuleTypeId,
    },

    /// A rule type was registered with no values.
    #[error("Rule type '{type_id}' must declare at least one value")]
    EmptyRuleTypeValues {
        /// The rule type.
        type_id: RuleTypeId,
    },

    /// A range rule type declares the same range twice.
    #[error("Rule type '{type_id}' declares range {range} more than once")]
    DuplicateRange {
        /// The rule type.
        type_id: RuleTypeId,
        /// The range in question.
        range: Range,
    },

    /// A range has `min > max`.
    #[error("Range '{description}' has min ({min}) greater than max ({max})")]
    InvertedRange {
        /// Range description.
        description: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// No rule type of the expected kind has this id.
    #[error("Rule type '{type_id}' is not registered as a {kind} rule type")]
    UnregisteredRuleType {
        /// The rule type.
        type_id: RuleTypeId,
        /// The expected rule kind.
        kind: RuleKind,
    },

    /// A rule uses a range its type doesn't declare.
    #[error("Range {range} of rule '{rule_id}' is not registered for type '{type_id}'")]
    RangeNotInRuleType {
        /// The rule in question.
        rule_id: RuleId,
        /// The rule type.
        type_id: RuleTypeId,
        /// The range in question.
        range: Range,
    },

    /// A rule uses a value its type doesn't declare.
    #[error("Value '{value}' of rule '{rule_id}' is not registered for type '{type_id}'")]
    DiscreteValueNotInRuleType {
        /// The rule in question.
        rule_id: RuleId,
        /// The rule type.
        type_id: RuleTypeId,
        /// The value in question.
        value: String,
    },

    /// A rule declares no values.
    #[error("Rule '{rule_id}' must declare at least one value")]
    EmptyRuleValues {
        /// The rule in question.
        rule_id: RuleId,
    },

    /// A rule declares the same value twice.
    #[error("Rule '{rule_id}' declares value {value} more than once")]
    DuplicateRuleValue {
        /// The rule in question.
        rule_id: RuleId,
        /// The value in question.
        value: String,
    },

    /// A related-rule group repeats an id.
    #[error("Rule '{rule_id}' lists related rule '{related_id}' more than once in group '{group}'")]
    DuplicateRelatedRule {
        /// The rule in question.
        rule_id: RuleId,
        /// Related-rule group name.
        group: String,
        /// The repeated related rule id.
        related_id: RuleId,
    },

    /// A state is not one of the rule's own values.
    #[error("State {value} is not one of rule '{rule_id}' values")]
    StateNotInRuleValues {
        /// The rule in question.
        rule_id: RuleId,
        /// The value in question.
        value: String,
    },

    /// A transition duration was given without a next state.
    #[error("Rule '{rule_id}' has a transition duration but no next state")]
    DurationWithoutNextState {
        /// The rule in question.
        rule_id: RuleId,
    },

    /// A transition duration is zero, negative or NaN.
    #[error("Transition duration for rule '{rule_id}' must be positive, got {duration}")]
    NonPositiveDuration {
        /// The rule in question.
        rule_id: RuleId,
        /// The rejected duration, in seconds.
        duration: f64,
    },

    /// A tolerance is negative or NaN.
    #[error("Tolerance must be non-negative, got {tolerance}")]
    NegativeTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },
}

/// Execution errors raised while looking up or mutating rules and states.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// No rule with this id, or not of the expected kind.
    #[error("Rule not found: {id}{}", expected_kind(.kind))]
    RuleNotFound {
        /// The rule id.
        id: RuleId,
        /// The expected rule kind.
        kind: Option<RuleKind>,
    },

    /// A rulebook already holds a rule with this id.
    #[error("Duplicate rule id: {id}")]
    DuplicateRule {
        /// The rule id.
        id: RuleId,
    },

    /// Several rules match a spatial query under the reject policy.
    #[error(
        "Rules [{}] of type '{type_id}' all apply at lane '{lane_id}', s = {s}",
        join_ids(.candidates)
    )]
    AmbiguousRules {
        /// The rule type.
        type_id: RuleTypeId,
        /// Queried lane.
        lane_id: LaneId,
        /// Queried s coordinate.
        s: f64,
        /// Every matching rule id, sorted.
        candidates: Vec<RuleId>,
    },

    /// A store lock was poisoned.
    #[error("Storage error: {message}")]
    Storage {
        /// What failed.
        message: String,
    },
}

fn expected_kind(kind: &Option<RuleKind>) -> String {
    kind.map(|kind| format!(" (expected a {kind} rule)"))
        .unwrap_or_default()
}

fn join_ids(ids: &[RuleId]) -> String {
    ids.iter()
        .map(RuleId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level error type for roadrules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    /// A precondition was violated.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A lookup or store operation failed.
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// A rule was selected by a spatial query but no state was ever set for it.
    #[error("Internal consistency violation: rule '{id}' has no recorded state")]
    MissingState {
        /// The rule id.
        id: RuleId,
    },
}

impl RulesError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a rule lookup by id failed.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Execution(ExecutionError::RuleNotFound { .. }))
    }

    /// Returns true if this is an internal consistency violation.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::MissingState { .. })
    }

    /// Returns true if this error is retryable.
    ///
    /// Every error in this crate reflects configuration or a logic fault.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

/// Result type alias for roadrules operations.
pub type RulesResult<T> = Result<T, RulesError>;
