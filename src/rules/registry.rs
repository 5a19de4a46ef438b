//! Catalog of rule types and their legal values.
//!
//! The registry maps each rule type to exactly one value universe, either
//! ranges or discrete strings. Rule instances are built through the registry
//! so that their values are checked against that universe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::id::{RuleId, RuleTypeId};
use crate::lane::Zone;
use crate::rules::rule::{DiscreteValueRule, Range, RangeValueRule, RelatedRules, RuleKind};

/// The legal values of a rule type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ValueDomain {
    /// Described scalar ranges.
    Range(Vec<Range>),
    /// Discrete string values.
    Discrete(Vec<String>),
}

impl ValueDomain {
    /// The rule kind this domain belongs to.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Range(_) => RuleKind::Range,
            Self::Discrete(_) => RuleKind::Discrete,
        }
    }
}

/// Answer to [`RuleRegistry::get_possible_states_of_rule_type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleStates {
    /// The queried rule type.
    pub type_id: RuleTypeId,
    /// Its registered values.
    pub domain: ValueDomain,
}

impl PossibleStates {
    /// The registered ranges, if the type is range-valued.
    #[must_use]
    pub fn range_values(&self) -> Option<&[Range]> {
        match &self.domain {
            ValueDomain::Range(ranges) => Some(ranges),
            ValueDomain::Discrete(_) => None,
        }
    }

    /// The registered values, if the type is discrete-valued.
    #[must_use]
    pub fn discrete_values(&self) -> Option<&[String]> {
        match &self.domain {
            ValueDomain::Discrete(values) => Some(values),
            ValueDomain::Range(_) => None,
        }
    }
}

/// Registry of rule types.
///
/// Populate it during initialization through `&mut self`, then share it
/// read-only.
///
/// # Examples
///
/// ```
/// use roadrules::rules::{RelatedRules, RuleRegistry};
/// use roadrules::{LaneSRange, LaneSRoute, SRange};
///
/// let mut registry = RuleRegistry::new();
/// registry
///     .register_discrete_value_rule("Speed", vec!["Low".into(), "Med".into(), "High".into()])
///     .unwrap();
///
/// let zone = LaneSRoute::new(vec![LaneSRange::new("L1", SRange::new(10.0, 20.0))]);
/// let rule = registry
///     .build_discrete_value_rule("RuleA", "Speed", zone, RelatedRules::new(), vec!["Low".into()])
///     .unwrap();
/// assert_eq!(rule.values(), ["Low"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    types: BTreeMap<RuleTypeId, ValueDomain>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unregistered(&self, type_id: &RuleTypeId) -> Result<(), ValidationError> {
        if self.types.contains_key(type_id) {
            return Err(ValidationError::DuplicateRuleType {
                type_id: type_id.clone(),
            });
        }
        Ok(())
    }

    /// Registers a range-valued rule type.
    ///
    /// # Errors
    ///
    /// Fails if the type is already registered, `ranges` is empty, a range
    /// is inverted, or a range appears twice. The registry is left unchanged.
    pub fn register_range_value_rule(
        &mut self,
        type_id: impl Into<RuleTypeId>,
        ranges: Vec<Range>,
    ) -> Result<(), ValidationError> {
        let type_id = type_id.into();
        self.ensure_unregistered(&type_id)?;
        if ranges.is_empty() {
            return Err(ValidationError::EmptyRuleTypeValues { type_id });
        }
        for (i, range) in ranges.iter().enumerate() {
            range.validate()?;
            if ranges[..i].contains(range) {
                return Err(ValidationError::DuplicateRange {
                    type_id,
                    range: range.clone(),
                });
            }
        }

        debug!(type_id = %type_id, ranges = ranges.len(), "registered range value rule type");
        self.types.insert(type_id, ValueDomain::Range(ranges));
        Ok(())
    }

    /// Registers a discrete-valued rule type.
    ///
    /// Repeated values collapse to their first occurrence, keeping order.
    ///
    /// # Errors
    ///
    /// Fails if the type is already registered or `values` is empty.
    pub fn register_discrete_value_rule(
        &mut self,
        type_id: impl Into<RuleTypeId>,
        values: Vec<String>,
    ) -> Result<(), ValidationError> {
        let type_id = type_id.into();
        self.ensure_unregistered(&type_id)?;
        if values.is_empty() {
            return Err(ValidationError::EmptyRuleTypeValues { type_id });
        }

        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        debug!(type_id = %type_id, values = unique.len(), "registered discrete value rule type");
        self.types.insert(type_id, ValueDomain::Discrete(unique));
        Ok(())
    }

    /// Snapshot of all range-valued rule types.
    #[must_use]
    pub fn range_value_rule_types(&self) -> BTreeMap<RuleTypeId, Vec<Range>> {
        self.types
            .iter()
            .filter_map(|(type_id, domain)| match domain {
                ValueDomain::Range(ranges) => Some((type_id.clone(), ranges.clone())),
                ValueDomain::Discrete(_) => None,
            })
            .collect()
    }

    /// Snapshot of all discrete-valued rule types.
    #[must_use]
    pub fn discrete_value_rule_types(&self) -> BTreeMap<RuleTypeId, Vec<String>> {
        self.types
            .iter()
            .filter_map(|(type_id, domain)| match domain {
                ValueDomain::Discrete(values) => Some((type_id.clone(), values.clone())),
                ValueDomain::Range(_) => None,
            })
            .collect()
    }

    /// Returns the legal values of `type_id`, or `None` if unregistered.
    #[must_use]
    pub fn get_possible_states_of_rule_type(&self, type_id: &RuleTypeId) -> Option<PossibleStates> {
        self.types.get(type_id).map(|domain| PossibleStates {
            type_id: type_id.clone(),
            domain: domain.clone(),
        })
    }

    /// Whether `type_id` is registered, of either kind.
    #[must_use]
    pub fn is_registered(&self, type_id: &RuleTypeId) -> bool {
        self.types.contains_key(type_id)
    }

    /// Number of registered rule types of both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no rule type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Builds a range-valued rule whose ranges are all registered for `type_id`.
    ///
    /// # Errors
    ///
    /// Fails if `type_id` is not a registered range type, a range is not in
    /// its universe, or the rule itself is invalid (see [`RangeValueRule::new`]).
    pub fn build_range_value_rule(
        &self,
        id: impl Into<RuleId>,
        type_id: impl Into<RuleTypeId>,
        zone: Zone,
        related_rules: RelatedRules,
        ranges: Vec<Range>,
    ) -> Result<RangeValueRule, ValidationError> {
        let id = id.into();
        let type_id = type_id.into();
        let Some(ValueDomain::Range(universe)) = self.types.get(&type_id) else {
            return Err(ValidationError::UnregisteredRuleType {
                type_id,
                kind: RuleKind::Range,
            });
        };
        if let Some(range) = ranges.iter().find(|range| !universe.contains(range)) {
            return Err(ValidationError::RangeNotInRuleType {
                rule_id: id,
                type_id,
                range: range.clone(),
            });
        }
        RangeValueRule::new(id, type_id, zone, related_rules, ranges)
    }

    /// Builds a discrete-valued rule whose values are all registered for `type_id`.
    ///
    /// # Errors
    ///
    /// Fails if `type_id` is not a registered discrete type, a value is not
    /// in its universe, or the rule itself is invalid.
    pub fn build_discrete_value_rule(
        &self,
        id: impl Into<RuleId>,
        type_id: impl Into<RuleTypeId>,
        zone: Zone,
        related_rules: RelatedRules,
        values: Vec<String>,
    ) -> Result<DiscreteValueRule, ValidationError> {
        let id = id.into();
        let type_id = type_id.into();
        let Some(ValueDomain::Discrete(universe)) = self.types.get(&type_id) else {
            return Err(ValidationError::UnregisteredRuleType {
                type_id,
                kind: RuleKind::Discrete,
            });
        };
        if let Some(value) = values.iter().find(|value| !universe.contains(value)) {
            return Err(ValidationError::DiscreteValueNotInRuleType {
                rule_id: id,
                type_id,
                value: value.clone(),
            });
        }
        DiscreteValueRule::new(id, type_id, zone, related_rules, values)
    }
}
