//! Rulebooks: the collections of rule instances for a road network.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{ExecutionError, RulesError, RulesResult};
use crate::id::RuleId;
use crate::lane::LaneSRoute;
use crate::math::Tolerance;
use crate::rules::rule::{DiscreteValueRule, RangeValueRule, Rule, RuleKind};

/// Read access to the rules of a road network.
///
/// Implementations should handle concurrent access safely.
pub trait RoadRulebook: Send + Sync {
    /// All rules, ordered by id.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    fn rules(&self) -> RulesResult<Vec<Rule>>;

    /// Rules whose zone intersects `zone` within `tolerance`, ordered by id.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    fn find_rules(&self, zone: &LaneSRoute, tolerance: Tolerance) -> RulesResult<Vec<Rule>> {
        Ok(self
            .rules()?
            .into_iter()
            .filter(|rule| rule.zone().intersects(zone, tolerance))
            .collect())
    }

    /// Get a rule of any kind by id.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    fn get_rule(&self, id: &RuleId) -> RulesResult<Option<Rule>>;

    /// Get a discrete-valued rule by id.
    ///
    /// # Errors
    ///
    /// `RuleNotFound` if no discrete-valued rule has this id.
    fn get_discrete_value_rule(&self, id: &RuleId) -> RulesResult<DiscreteValueRule> {
        match self.get_rule(id)? {
            Some(Rule::Discrete(rule)) => Ok(rule),
            _ => Err(not_found(id, Some(RuleKind::Discrete))),
        }
    }

    /// Get a range-valued rule by id.
    ///
    /// # Errors
    ///
    /// `RuleNotFound` if no range-valued rule has this id.
    fn get_range_value_rule(&self, id: &RuleId) -> RulesResult<RangeValueRule> {
        match self.get_rule(id)? {
            Some(Rule::Range(rule)) => Ok(rule),
            _ => Err(not_found(id, Some(RuleKind::Range))),
        }
    }
}

pub(crate) fn not_found(id: &RuleId, kind: Option<RuleKind>) -> RulesError {
    ExecutionError::RuleNotFound {
        id: id.clone(),
        kind,
    }
    .into()
}

pub(crate) fn lock_err(context: &'static str) -> RulesError {
    ExecutionError::Storage {
        message: format!("poisoned lock: {context}"),
    }
    .into()
}

/// Thread-safe in-memory rulebook populated by hand.
#[derive(Debug, Default)]
pub struct ManualRulebook {
    rules: RwLock<BTreeMap<RuleId, Rule>>,
}

impl ManualRulebook {
    /// Create a new empty rulebook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    ///
    /// # Errors
    ///
    /// `DuplicateRule` if a rule with the same id is already present.
    pub fn add_rule(&self, rule: impl Into<Rule>) -> RulesResult<()> {
        let rule = rule.into();
        let mut rules = self.rules.write().map_err(|_| lock_err("rulebook.add_rule"))?;
        if rules.contains_key(rule.id()) {
            return Err(ExecutionError::DuplicateRule {
                id: rule.id().clone(),
            }
            .into());
        }
        debug!(rule_id = %rule.id(), type_id = %rule.type_id(), kind = %rule.kind(), "added rule");
        rules.insert(rule.id().clone(), rule);
        Ok(())
    }

    /// Removes a rule, returning it.
    ///
    /// # Errors
    ///
    /// `RuleNotFound` if no rule has this id.
    pub fn remove_rule(&self, id: &RuleId) -> RulesResult<Rule> {
        let mut rules = self.rules.write().map_err(|_| lock_err("rulebook.remove_rule"))?;
        rules.remove(id).ok_or_else(|| not_found(id, None))
    }

    /// Removes every rule.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    pub fn remove_all(&self) -> RulesResult<()> {
        self.rules
            .write()
            .map_err(|_| lock_err("rulebook.remove_all"))?
            .clear();
        Ok(())
    }

    /// Number of rules held.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    pub fn len(&self) -> RulesResult<usize> {
        Ok(self.rules.read().map_err(|_| lock_err("rulebook.len"))?.len())
    }

    /// Whether the rulebook holds no rules.
    ///
    /// # Errors
    ///
    /// `Storage` if the lock is poisoned.
    pub fn is_empty(&self) -> RulesResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl RoadRulebook for ManualRulebook {
    fn rules(&self) -> RulesResult<Vec<Rule>> {
        let rules = self.rules.read().map_err(|_| lock_err("rulebook.rules"))?;
        Ok(rules.values().cloned().collect())
    }

    fn get_rule(&self, id: &RuleId) -> RulesResult<Option<Rule>> {
        let rules = self.rules.read().map_err(|_| lock_err("rulebook.get_rule"))?;
        Ok(rules.get(id).cloned())
    }
}
