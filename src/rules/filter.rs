//! Composable predicates over rules.

use crate::id::RuleTypeId;
use crate::lane::LaneSRoute;
use crate::math::Tolerance;
use crate::rules::rule::Rule;

/// A predicate deciding whether a rule is kept.
pub type RuleFilter<'a> = Box<dyn Fn(&Rule) -> bool + 'a>;

/// Keeps rules of the given type.
#[must_use]
pub fn by_type(type_id: &RuleTypeId) -> RuleFilter<'_> {
    Box::new(move |rule| rule.type_id() == type_id)
}

/// Keeps rules whose zone intersects `zone` within `tolerance`.
#[must_use]
pub fn by_zone(zone: &LaneSRoute, tolerance: Tolerance) -> RuleFilter<'_> {
    Box::new(move |rule| rule.zone().intersects(zone, tolerance))
}

/// Keeps the rules that pass every filter, in their original order.
pub fn filter_rules<I>(rules: I, filters: &[RuleFilter<'_>]) -> Vec<Rule>
where
    I: IntoIterator<Item = Rule>,
{
    rules
        .into_iter()
        .filter(|rule| filters.iter().all(|keep| keep(rule)))
        .collect()
}
