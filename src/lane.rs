//! Lane-relative positions, intervals and zones.
//!
//! A zone is an ordered sequence of longitudinal intervals on named lanes.
//! Zones are how rules describe where they apply.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::LaneId;
use crate::math::{classify_intervals, BoundingRegion, OverlappingType, Tolerance};

/// A longitudinal interval `[s0, s1]` along a lane.
///
/// `s0 > s1` is allowed and describes an interval traversed against the
/// lane's s direction. Geometric predicates use the normalized interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SRange {
    s0: f64,
    s1: f64,
}

impl SRange {
    /// Creates an interval from `s0` to `s1`, in either order.
    #[must_use]
    pub const fn new(s0: f64, s1: f64) -> Self {
        Self { s0, s1 }
    }

    /// A zero-length interval at `s`.
    #[must_use]
    pub const fn at(s: f64) -> Self {
        Self { s0: s, s1: s }
    }

    /// Start coordinate.
    #[must_use]
    pub const fn s0(&self) -> f64 {
        self.s0
    }

    /// End coordinate.
    #[must_use]
    pub const fn s1(&self) -> f64 {
        self.s1
    }

    /// Smaller endpoint.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.s0.min(self.s1)
    }

    /// Larger endpoint.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.s0.max(self.s1)
    }

    /// Absolute length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.s1 - self.s0).abs()
    }

    /// Whether the interval runs in the direction of increasing s.
    #[must_use]
    pub fn with_s(&self) -> bool {
        self.s1 >= self.s0
    }

    /// The normalized interval widened by `tolerance` at both ends.
    #[must_use]
    pub fn inflated(&self, tolerance: Tolerance) -> Self {
        Self::new(self.min() - tolerance.value(), self.max() + tolerance.value())
    }

    /// Whether the gap between the two intervals is at most `tolerance`.
    #[must_use]
    pub fn intersects(&self, other: &Self, tolerance: Tolerance) -> bool {
        self.inflated(tolerance).overlaps(other).is_overlapping()
    }

    /// The shared part of both intervals, if they overlap without slack.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let lo = self.min().max(other.min());
        let hi = self.max().min(other.max());
        (lo <= hi).then(|| Self::new(lo, hi))
    }
}

impl BoundingRegion<f64> for SRange {
    fn position(&self) -> f64 {
        (self.s0 + self.s1) * 0.5
    }

    fn contains(&self, point: &f64) -> bool {
        self.min() <= *point && *point <= self.max()
    }

    fn overlaps(&self, other: &Self) -> OverlappingType {
        classify_intervals(self.min(), self.max(), other.min(), other.max())
    }
}

impl fmt::Display for SRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.s0, self.s1)
    }
}

/// A point on a lane, addressed by lane id and longitudinal coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanePoint {
    /// The lane.
    pub lane_id: LaneId,
    /// Longitudinal coordinate.
    pub s: f64,
}

/// An interval on a specific lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSRange {
    lane_id: LaneId,
    s_range: SRange,
}

impl LaneSRange {
    /// Creates an interval on `lane_id`.
    #[must_use]
    pub fn new(lane_id: impl Into<LaneId>, s_range: SRange) -> Self {
        Self {
            lane_id: lane_id.into(),
            s_range,
        }
    }

    /// The lane the interval lies on.
    #[must_use]
    pub const fn lane_id(&self) -> &LaneId {
        &self.lane_id
    }

    /// The interval along the lane.
    #[must_use]
    pub const fn s_range(&self) -> SRange {
        self.s_range
    }

    /// Absolute length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.s_range.length()
    }

    /// Same lane and intervals within `tolerance` of each other.
    #[must_use]
    pub fn intersects(&self, other: &Self, tolerance: Tolerance) -> bool {
        self.lane_id == other.lane_id && self.s_range.intersects(&other.s_range, tolerance)
    }
}

impl BoundingRegion<LanePoint> for LaneSRange {
    fn position(&self) -> LanePoint {
        LanePoint {
            lane_id: self.lane_id.clone(),
            s: self.s_range.position(),
        }
    }

    fn contains(&self, point: &LanePoint) -> bool {
        self.lane_id == point.lane_id && self.s_range.contains(&point.s)
    }

    fn overlaps(&self, other: &Self) -> OverlappingType {
        if self.lane_id == other.lane_id {
            self.s_range.overlaps(&other.s_range)
        } else {
            OverlappingType::Disjointed
        }
    }
}

impl fmt::Display for LaneSRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.lane_id, self.s_range)
    }
}

/// An ordered sequence of lane intervals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneSRoute {
    ranges: Vec<LaneSRange>,
}

/// The region of the road network where a rule applies.
pub type Zone = LaneSRoute;

impl LaneSRoute {
    /// Creates a route from ordered lane intervals.
    #[must_use]
    pub fn new(ranges: Vec<LaneSRange>) -> Self {
        Self { ranges }
    }

    /// A single-lane, zero-length route at a road position.
    #[must_use]
    pub fn at_position(position: &RoadPosition) -> Self {
        Self::new(vec![LaneSRange::new(
            position.lane_id.clone(),
            SRange::at(position.pos.s),
        )])
    }

    /// The intervals, in route order.
    #[must_use]
    pub fn ranges(&self) -> &[LaneSRange] {
        &self.ranges
    }

    /// Sum of the interval lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.ranges.iter().map(LaneSRange::length).sum()
    }

    /// Whether any pair of same-lane intervals intersects within `tolerance`.
    #[must_use]
    pub fn intersects(&self, other: &Self, tolerance: Tolerance) -> bool {
        self.ranges
            .iter()
            .any(|range| other.ranges.iter().any(|o| range.intersects(o, tolerance)))
    }
}

impl FromIterator<LaneSRange> for LaneSRoute {
    fn from_iter<I: IntoIterator<Item = LaneSRange>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Lane-frame coordinates: longitudinal `s`, lateral `r`, height `h`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LanePosition {
    /// Longitudinal coordinate.
    pub s: f64,
    /// Lateral offset from the centerline.
    pub r: f64,
    /// Height above the road surface.
    pub h: f64,
}

impl LanePosition {
    /// Creates lane-frame coordinates.
    #[must_use]
    pub const fn new(s: f64, r: f64, h: f64) -> Self {
        Self { s, r, h }
    }
}

impl fmt::Display for LanePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(s = {}, r = {}, h = {})", self.s, self.r, self.h)
    }
}

/// A position on a specific lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadPosition {
    /// The lane.
    pub lane_id: LaneId,
    /// Coordinates within the lane.
    pub pos: LanePosition,
}

impl RoadPosition {
    /// Creates a position on `lane_id`.
    #[must_use]
    pub fn new(lane_id: impl Into<LaneId>, pos: LanePosition) -> Self {
        Self {
            lane_id: lane_id.into(),
            pos,
        }
    }

    /// A position on the lane centerline at longitudinal coordinate `s`.
    #[must_use]
    pub fn on_centerline(lane_id: impl Into<LaneId>, s: f64) -> Self {
        Self::new(lane_id, LanePosition::new(s, 0.0, 0.0))
    }
}

impl fmt::Display for RoadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[LaneId: {}, LanePos: {}]", self.lane_id, self.pos)
    }
}
