//! # roadrules - Traffic rule resolution for road-network models
//!
//! roadrules answers two questions at simulation rate: which rule types and
//! legal values exist for a road network, and what the current state is of a
//! given rule, or of whichever rule of a given type governs a road position.
//!
//! ## Core Concepts
//!
//! - **Rule type**: a category of traffic constraint with a declared universe
//!   of legal values, either ranges or discrete strings ([`RuleRegistry`])
//! - **Rule**: a zoned instance of a rule type carrying a validated subset of
//!   the type's values ([`DiscreteValueRule`], [`RangeValueRule`])
//! - **Rulebook**: the rules of a road network ([`RoadRulebook`])
//! - **State provider**: current and next state per rule, queried by id or by
//!   road position ([`ManualDiscreteValueRuleStateProvider`])
//! - **Bounding region**: containment and overlap classification over any
//!   position type ([`math::BoundingRegion`])
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use roadrules::rules::{ManualDiscreteValueRuleStateProvider, ManualRulebook, RelatedRules};
//! use roadrules::{LaneSRange, LaneSRoute, RoadPosition, RuleRegistry, RuleStateProvider, RuleTypeId, SRange};
//!
//! let mut registry = RuleRegistry::new();
//! registry.register_discrete_value_rule("Speed", vec!["Low".into(), "Med".into(), "High".into()])?;
//!
//! let zone = LaneSRoute::new(vec![LaneSRange::new("L1", SRange::new(10.0, 20.0))]);
//! let rule = registry.build_discrete_value_rule(
//!     "RuleA",
//!     "Speed",
//!     zone,
//!     RelatedRules::new(),
//!     vec!["Low".into(), "Med".into()],
//! )?;
//!
//! let rulebook = ManualRulebook::new();
//! rulebook.add_rule(rule)?;
//! let provider = ManualDiscreteValueRuleStateProvider::new(Arc::new(rulebook));
//! provider.set_state(&"RuleA".into(), "Low".into(), Some("Med".into()), Some(5.0))?;
//!
//! let entry = provider
//!     .get_state_at(&RoadPosition::on_centerline("L1", 19.999), &RuleTypeId::new("Speed"), 0.01)?
//!     .unwrap();
//! assert_eq!(entry.state, "Low");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod id;
pub mod lane;
pub mod math;
pub mod rules;

// Re-export primary types at crate root for convenience
pub use config::{AmbiguousMatchPolicy, ConfigError, QueryConfig, RulesConfig};
pub use error::{ExecutionError, RulesError, RulesResult, ValidationError};
pub use id::{LaneId, RuleId, RuleTypeId};
pub use lane::{LanePosition, LaneSRange, LaneSRoute, RoadPosition, SRange, Zone};
pub use math::{BoundingRegion, OverlappingType, Tolerance};
pub use rules::{
    DiscreteValueRule, ManualDiscreteValueRuleStateProvider, ManualRangeValueRuleStateProvider,
    ManualRulebook, Range, RangeValueRule, RoadRulebook, Rule, RuleRegistry, RuleStateProvider,
    StateEntry,
};
