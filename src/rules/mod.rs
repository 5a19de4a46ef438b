//! Rule types, rule instances, rulebooks and rule state.

pub mod filter;
mod manual_state_provider;
mod registry;
mod rule;
mod rulebook;
pub mod standard;
mod state;

pub use manual_state_provider::{
    ManualDiscreteValueRuleStateProvider, ManualRangeValueRuleStateProvider, ManualStateProvider,
};
pub use registry::{PossibleStates, RuleRegistry, ValueDomain};
pub use rule::{
    DiscreteValueRule, Range, RangeValueRule, RelatedRules, Rule, RuleCommon, RuleKind, YIELD_GROUP,
};
pub use rulebook::{ManualRulebook, RoadRulebook};
pub use state::{
    DiscreteStateEntry, NextState, RangeStateEntry, RuleStateProvider, StateEntry, ValueRule,
};
