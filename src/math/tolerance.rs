//! Non-negative distance slack for geometric comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated, non-negative distance used to inflate geometric tests.
///
/// # Examples
///
/// ```
/// use roadrules::Tolerance;
///
/// let tolerance = Tolerance::new(0.01).unwrap();
/// assert_eq!(tolerance.value(), 0.01);
/// assert!(Tolerance::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Exact comparisons.
    pub const ZERO: Self = Self(0.0);

    /// Creates a tolerance.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativeTolerance` if `value` is negative or NaN.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::NegativeTolerance { tolerance: value })
        }
    }

    /// The tolerance as a plain distance.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
