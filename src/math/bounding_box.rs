//! Axis-aligned boxes in 3-D space.

use serde::{Deserialize, Serialize};

use crate::math::bounding_region::{BoundingRegion, OverlappingType};
use crate::math::{Tolerance, Vector3};

/// An axis-aligned box centered at `position`.
///
/// `box_size` holds the full extent along each axis. Containment is inflated
/// by `tolerance` on every face.
///
/// # Examples
///
/// ```
/// use roadrules::math::{BoundingBox, BoundingRegion, OverlappingType, Tolerance, Vector3};
///
/// let outer = BoundingBox::new(Vector3::zero(), Vector3::new(4.0, 4.0, 4.0), Tolerance::ZERO);
/// let inner = BoundingBox::new(Vector3::ones(), Vector3::ones(), Tolerance::ZERO);
///
/// assert!(outer.contains(&Vector3::new(2.0, -2.0, 0.0)));
/// assert_eq!(outer.overlaps(&inner), OverlappingType::Contains);
/// assert_eq!(inner.overlaps(&outer), OverlappingType::Contained);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    position: Vector3,
    box_size: Vector3,
    tolerance: Tolerance,
}

impl BoundingBox {
    /// Creates a box. Negative extents are taken by magnitude.
    #[must_use]
    pub fn new(position: Vector3, box_size: Vector3, tolerance: Tolerance) -> Self {
        Self {
            position,
            box_size: box_size.abs(),
            tolerance,
        }
    }

    /// Full extent along each axis.
    #[must_use]
    pub const fn box_size(&self) -> Vector3 {
        self.box_size
    }

    /// Slack added to every face.
    #[must_use]
    pub const fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Minimum and maximum corners, inflated by the tolerance.
    #[must_use]
    pub fn bounds(&self) -> (Vector3, Vector3) {
        let half = self.box_size * 0.5;
        let slack = Vector3::ones() * self.tolerance.value();
        (self.position - half - slack, self.position + half + slack)
    }
}

impl BoundingRegion<Vector3> for BoundingBox {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn contains(&self, point: &Vector3) -> bool {
        let (min, max) = self.bounds();
        let (min, max, p) = (min.to_array(), max.to_array(), point.to_array());
        (0..3).all(|axis| min[axis] <= p[axis] && p[axis] <= max[axis])
    }

    fn overlaps(&self, other: &Self) -> OverlappingType {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        let (a_min, a_max) = (a_min.to_array(), a_max.to_array());
        let (b_min, b_max) = (b_min.to_array(), b_max.to_array());

        if (0..3).all(|i| a_min[i] <= b_min[i] && b_max[i] <= a_max[i]) {
            OverlappingType::Contains
        } else if (0..3).all(|i| b_min[i] <= a_min[i] && a_max[i] <= b_max[i]) {
            OverlappingType::Contained
        } else if (0..3).all(|i| a_min[i] <= b_max[i] && b_min[i] <= a_max[i]) {
            OverlappingType::Intersected
        } else {
            OverlappingType::Disjointed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f64, y: f64, z: f64) -> BoundingBox {
        BoundingBox::new(Vector3::new(x, y, z), Vector3::ones(), Tolerance::ZERO)
    }

    #[test]
    fn test_contains_respects_tolerance() {
        let exact = unit_box_at(0.0, 0.0, 0.0);
        let loose = BoundingBox::new(Vector3::zero(), Vector3::ones(), Tolerance::new(0.1).unwrap());
        let p = Vector3::new(0.55, 0.0, 0.0);

        assert!(exact.contains(&Vector3::new(0.5, 0.5, -0.5)));
        assert!(!exact.contains(&p));
        assert!(loose.contains(&p));
    }

    #[test]
    fn test_negative_size_is_normalized() {
        let b = BoundingBox::new(Vector3::zero(), Vector3::new(-2.0, 2.0, -2.0), Tolerance::ZERO);
        assert_eq!(b.box_size(), Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_overlaps_classification() {
        let a = unit_box_at(0.0, 0.0, 0.0);

        assert_eq!(a.overlaps(&a), OverlappingType::Contains);
        assert_eq!(a.overlaps(&unit_box_at(0.5, 0.5, 0.5)), OverlappingType::Intersected);
        assert_eq!(a.overlaps(&unit_box_at(1.0, 0.0, 0.0)), OverlappingType::Intersected);
        assert_eq!(a.overlaps(&unit_box_at(2.0, 0.0, 0.0)), OverlappingType::Disjointed);
        // Overlapping on two axes is not enough.
        assert_eq!(a.overlaps(&unit_box_at(0.0, 0.0, 3.0)), OverlappingType::Disjointed);
    }

    #[test]
    fn test_position() {
        assert_eq!(unit_box_at(1.0, 2.0, 3.0).position(), Vector3::new(1.0, 2.0, 3.0));
    }
}
