//! String identifiers for rules, rule types and lanes.
//!
//! Identifiers are opaque: two ids are equal iff their strings are equal,
//! and they order lexicographically by string.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Unique identifier of a rule instance within a rulebook.
    RuleId
}

string_id! {
    /// Identifier of a rule type; the key of the rule registry.
    RuleTypeId
}

string_id! {
    /// Identifier of a lane in the road network.
    LaneId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_lexicographically() {
        let mut ids = vec![RuleId::new("b"), RuleId::new("a/2"), RuleId::new("a/10")];
        ids.sort();
        assert_eq!(ids, vec![RuleId::new("a/10"), RuleId::new("a/2"), RuleId::new("b")]);
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = RuleTypeId::from("Right-Of-Way Rule Type");
        assert_eq!(id.to_string(), "Right-Of-Way Rule Type");
        assert_eq!(id.as_str(), "Right-Of-Way Rule Type");
        assert_eq!(LaneId::from(String::from("l1")), LaneId::new("l1"));
    }
}
