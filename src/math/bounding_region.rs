//! Abstract spatial regions.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How one region relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlappingType {
    /// The regions share no point.
    Disjointed,
    /// The regions share some points but neither encloses the other.
    Intersected,
    /// This region is fully enclosed by the other one.
    Contained,
    /// This region fully encloses the other one.
    Contains,
}

impl OverlappingType {
    /// Returns true unless the regions are disjoint.
    #[must_use]
    pub const fn is_overlapping(self) -> bool {
        !matches!(self, Self::Disjointed)
    }
}

impl fmt::Display for OverlappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disjointed => write!(f, "disjointed"),
            Self::Intersected => write!(f, "intersected"),
            Self::Contained => write!(f, "contained"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// A spatial object over positions of type `P`.
///
/// Implementations classify overlap in a fixed order: `Contains` when this
/// region covers the other (equal regions included), then `Contained`, then
/// `Intersected` when any point is shared, otherwise `Disjointed`.
///
/// The trait is object safe. Through `dyn BoundingRegion<P>`, overlap is
/// classified with [`overlaps_dyn`](#method.overlaps_dyn).
pub trait BoundingRegion<P>: AnyRegion<P> {
    /// Representative position of the region.
    fn position(&self) -> P;

    /// Whether `point` lies inside the region.
    fn contains(&self, point: &P) -> bool;

    /// Classifies how this region overlaps `other`.
    fn overlaps(&self, other: &Self) -> OverlappingType
    where
        Self: Sized;
}

/// Type-erased overlap support, implemented for every `'static`
/// [`BoundingRegion`].
pub trait AnyRegion<P> {
    /// This region as `Any`.
    fn as_any(&self) -> &dyn Any;

    /// [`BoundingRegion::overlaps`] against `other` if it is the same
    /// concrete type, otherwise `None`.
    fn overlaps_any(&self, other: &dyn Any) -> Option<OverlappingType>;
}

impl<P, R> AnyRegion<P> for R
where
    R: BoundingRegion<P> + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn overlaps_any(&self, other: &dyn Any) -> Option<OverlappingType> {
        other.downcast_ref::<R>().map(|other| self.overlaps(other))
    }
}

impl<P> dyn BoundingRegion<P> + '_ {
    /// Classifies how this region overlaps `other`.
    ///
    /// Returns `None` when the two regions are of different concrete types.
    #[must_use]
    pub fn overlaps_dyn(&self, other: &dyn BoundingRegion<P>) -> Option<OverlappingType> {
        self.overlaps_any(other.as_any())
    }
}

/// Classifies two closed intervals `[a_min, a_max]` and `[b_min, b_max]`.
pub(crate) fn classify_intervals(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> OverlappingType {
    if a_min <= b_min && b_max <= a_max {
        OverlappingType::Contains
    } else if b_min <= a_min && a_max <= b_max {
        OverlappingType::Contained
    } else if a_min <= b_max && b_min <= a_max {
        OverlappingType::Intersected
    } else {
        OverlappingType::Disjointed
    }
}
