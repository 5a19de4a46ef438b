//! Rule instances.
//!
//! A rule binds a rule type to a zone and carries the subset of the type's
//! legal values that this instance may take. Range-valued and
//! discrete-valued rules share a common header, [`RuleCommon`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{RuleId, RuleTypeId};
use crate::lane::Zone;

/// Related rules grouped by relation name, e.g. `"Yield Group"`.
pub type RelatedRules = BTreeMap<String, Vec<RuleId>>;

/// Group name used to list the rules a right-of-way rule yields to.
pub const YIELD_GROUP: &str = "Yield Group";

/// Which kind of value universe a rule type declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Values are described scalar ranges.
    Range,
    /// Values are discrete strings.
    Discrete,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range => write!(f, "range"),
            Self::Discrete => write!(f, "discrete"),
        }
    }
}

/// A described scalar interval, e.g. a posted speed limit.
///
/// Ranges are equal when all three fields are equal. Deserialization
/// rejects inverted ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr")]
pub struct Range {
    /// Human-readable label, e.g. `"Interstate"`.
    pub description: String,
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

#[derive(Deserialize)]
struct RangeRepr {
    description: String,
    min: f64,
    max: f64,
}

impl TryFrom<RangeRepr> for Range {
    type Error = ValidationError;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        let range = Self::new(repr.description, repr.min, repr.max);
        range.validate()?;
        Ok(range)
    }
}

impl Range {
    /// Creates a range. Bounds are checked by [`Range::validate`].
    #[must_use]
    pub fn new(description: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            description: description.into(),
            min,
            max,
        }
    }

    /// Checks that `min <= max`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvertedRange` otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(ValidationError::InvertedRange {
                description: self.description.clone(),
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Orders by `min`, then `max`, then description.
    #[must_use]
    pub fn cmp_bounds(&self, other: &Self) -> std::cmp::Ordering {
        self.min
            .total_cmp(&other.min)
            .then_with(|| self.max.total_cmp(&other.max))
            .then_with(|| self.description.cmp(&other.description))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' [{}, {}]", self.description, self.min, self.max)
    }
}

/// Fields shared by every rule kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleCommonRepr")]
pub struct RuleCommon {
    /// Unique id within a rulebook.
    pub id: RuleId,
    /// The rule type this instance belongs to.
    pub type_id: RuleTypeId,
    /// Where the rule applies.
    pub zone: Zone,
    /// Other rules this one relates to, by group.
    #[serde(default)]
    pub related_rules: RelatedRules,
}

#[derive(Deserialize)]
struct RuleCommonRepr {
    id: RuleId,
    type_id: RuleTypeId,
    zone: Zone,
    #[serde(default)]
    related_rules: RelatedRules,
}

impl TryFrom<RuleCommonRepr> for RuleCommon {
    type Error = ValidationError;

    fn try_from(repr: RuleCommonRepr) -> Result<Self, Self::Error> {
        let common = Self {
            id: repr.id,
            type_id: repr.type_id,
            zone: repr.zone,
            related_rules: repr.related_rules,
        };
        common.validate()?;
        Ok(common)
    }
}

impl RuleCommon {
    fn validate(&self) -> Result<(), ValidationError> {
        for (group, ids) in &self.related_rules {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return Err(ValidationError::DuplicateRelatedRule {
                        rule_id: self.id.clone(),
                        group: group.clone(),
                        related_id: id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn find_duplicate<T: PartialEq>(values: &[T]) -> Option<&T> {
    values
        .iter()
        .enumerate()
        .find(|&(i, v)| values[..i].contains(v))
        .map(|(_, v)| v)
}

/// A rule whose values are described scalar ranges.
///
/// Deserialization applies the same checks as [`RangeValueRule::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeValueRuleRepr")]
pub struct RangeValueRule {
    #[serde(flatten)]
    common: RuleCommon,
    ranges: Vec<Range>,
}

#[derive(Deserialize)]
struct RangeValueRuleRepr {
    #[serde(flatten)]
    common: RuleCommon,
    ranges: Vec<Range>,
}

impl TryFrom<RangeValueRuleRepr> for RangeValueRule {
    type Error = ValidationError;

    fn try_from(repr: RangeValueRuleRepr) -> Result<Self, Self::Error> {
        let RuleCommon {
            id,
            type_id,
            zone,
            related_rules,
        } = repr.common;
        Self::new(id, type_id, zone, related_rules, repr.ranges)
    }
}

impl RangeValueRule {
    /// Creates a range-valued rule.
    ///
    /// This checks the instance on its own; use
    /// [`RuleRegistry::build_range_value_rule`](crate::rules::RuleRegistry::build_range_value_rule)
    /// to also check the ranges against the rule type.
    ///
    /// # Errors
    ///
    /// Fails if `ranges` is empty, repeats a range, contains an inverted
    /// range, or a related-rule group repeats an id.
    pub fn new(
        id: RuleId,
        type_id: RuleTypeId,
        zone: Zone,
        related_rules: RelatedRules,
        ranges: Vec<Range>,
    ) -> Result<Self, ValidationError> {
        let common = RuleCommon {
            id,
            type_id,
            zone,
            related_rules,
        };
        common.validate()?;
        if ranges.is_empty() {
            return Err(ValidationError::EmptyRuleValues { rule_id: common.id });
        }
        for range in &ranges {
            range.validate()?;
        }
        if let Some(range) = find_duplicate(&ranges) {
            return Err(ValidationError::DuplicateRuleValue {
                rule_id: common.id.clone(),
                value: range.to_string(),
            });
        }
        Ok(Self { common, ranges })
    }

    /// The shared rule header.
    #[must_use]
    pub const fn common(&self) -> &RuleCommon {
        &self.common
    }

    /// The rule id.
    #[must_use]
    pub const fn id(&self) -> &RuleId {
        &self.common.id
    }

    /// The rule type.
    #[must_use]
    pub const fn type_id(&self) -> &RuleTypeId {
        &self.common.type_id
    }

    /// Where the rule applies.
    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.common.zone
    }

    /// Related rules, by group.
    #[must_use]
    pub const fn related_rules(&self) -> &RelatedRules {
        &self.common.related_rules
    }

    /// The ranges this rule may take.
    #[must_use]
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }
}

/// A rule whose values are drawn from a set of strings.
///
/// Deserialization applies the same checks as [`DiscreteValueRule::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiscreteValueRuleRepr")]
pub struct DiscreteValueRule {
    #[serde(flatten)]
    common: RuleCommon,
    values: Vec<String>,
}

#[derive(Deserialize)]
struct DiscreteValueRuleRepr {
    #[serde(flatten)]
    common: RuleCommon,
    values: Vec<String>,
}

impl TryFrom<DiscreteValueRuleRepr> for DiscreteValueRule {
    type Error = ValidationError;

    fn try_from(repr: DiscreteValueRuleRepr) -> Result<Self, Self::Error> {
        let RuleCommon {
            id,
            type_id,
            zone,
            related_rules,
        } = repr.common;
        Self::new(id, type_id, zone, related_rules, repr.values)
    }
}

impl DiscreteValueRule {
    /// Creates a discrete-valued rule.
    ///
    /// # Errors
    ///
    /// Fails if `values` is empty or repeats a value, or if a related-rule
    /// group repeats an id.
    pub fn new(
        id: RuleId,
        type_id: RuleTypeId,
        zone: Zone,
        related_rules: RelatedRules,
        values: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let common = RuleCommon {
            id,
            type_id,
            zone,
            related_rules,
        };
        common.validate()?;
        if values.is_empty() {
            return Err(ValidationError::EmptyRuleValues { rule_id: common.id });
        }
        if let Some(value) = find_duplicate(&values) {
            return Err(ValidationError::DuplicateRuleValue {
                rule_id: common.id.clone(),
                value: format!("'{value}'"),
            });
        }
        Ok(Self { common, values })
    }

    /// The shared rule header.
    #[must_use]
    pub const fn common(&self) -> &RuleCommon {
        &self.common
    }

    /// The rule id.
    #[must_use]
    pub const fn id(&self) -> &RuleId {
        &self.common.id
    }

    /// The rule type.
    #[must_use]
    pub const fn type_id(&self) -> &RuleTypeId {
        &self.common.type_id
    }

    /// Where the rule applies.
    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.common.zone
    }

    /// Related rules, by group.
    #[must_use]
    pub const fn related_rules(&self) -> &RelatedRules {
        &self.common.related_rules
    }

    /// The values this rule may take.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Any rule held by a rulebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// A range-valued rule.
    Range(RangeValueRule),
    /// A discrete-valued rule.
    Discrete(DiscreteValueRule),
}

impl Rule {
    /// The shared rule header.
    #[must_use]
    pub const fn common(&self) -> &RuleCommon {
        match self {
            Self::Range(rule) => rule.common(),
            Self::Discrete(rule) => rule.common(),
        }
    }

    /// The rule id.
    #[must_use]
    pub const fn id(&self) -> &RuleId {
        &self.common().id
    }

    /// The rule type.
    #[must_use]
    pub const fn type_id(&self) -> &RuleTypeId {
        &self.common().type_id
    }

    /// Where the rule applies.
    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.common().zone
    }

    /// Which kind of rule this is.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Range(_) => RuleKind::Range,
            Self::Discrete(_) => RuleKind::Discrete,
        }
    }
}

impl From<RangeValueRule> for Rule {
    fn from(rule: RangeValueRule) -> Self {
        Self::Range(rule)
    }
}

impl From<DiscreteValueRule> for Rule {
    fn from(rule: DiscreteValueRule) -> Self {
        Self::Discrete(rule)
    }
}
