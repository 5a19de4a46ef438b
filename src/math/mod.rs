//! Geometric primitives and the bounding-region abstraction.

mod bounding_box;
mod bounding_region;
mod tolerance;
mod vector;

pub use bounding_box::BoundingBox;
pub(crate) use bounding_region::classify_intervals;
pub use bounding_region::{AnyRegion, BoundingRegion, OverlappingType};
pub use tolerance::Tolerance;
pub use vector::Vector3;
