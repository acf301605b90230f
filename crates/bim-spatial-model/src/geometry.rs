// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding box algebra
//!
//! All coordinates are in one internal length unit system; the math here is
//! unit-agnostic. Intersection uses closed-interval semantics: boxes that
//! share exactly one boundary face intersect at tolerance 0, and degenerate
//! (zero-volume) boxes follow the same rule.

use serde::{Deserialize, Serialize};

/// Coordinate axis in model space
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index into a `[f64; 3]` coordinate triple
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-aligned box in 3D model space
///
/// Invariant: `min[axis] <= max[axis]` for each axis. Immutable once
/// constructed; derived boxes come from [`BoundingBox::merged_with`],
/// [`merge_boxes`] or [`BoundingBox::extend_max`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: [f64; 3],
    /// Maximum corner (x, y, z)
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Create a box from its corners
    ///
    /// # Panics
    /// Panics in debug builds if `min > max` on any axis.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        debug_assert!(
            min.iter().zip(&max).all(|(lo, hi)| lo <= hi),
            "bounding box min must not exceed max"
        );
        Self { min, max }
    }

    /// Smallest box containing both `self` and `other`
    pub fn merged_with(&self, other: &BoundingBox) -> BoundingBox {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for axis in 0..3 {
            min[axis] = self.min[axis].min(other.min[axis]);
            max[axis] = self.max[axis].max(other.max[axis]);
        }
        BoundingBox { min, max }
    }

    /// Box with `max` on one axis raised by `amount`
    ///
    /// Used for the topmost story's upward clearance. `amount` is in the
    /// same length unit as the box coordinates.
    ///
    /// # Panics
    /// Panics in debug builds if `amount` is negative.
    pub fn extend_max(&self, axis: Axis, amount: f64) -> BoundingBox {
        debug_assert!(amount >= 0.0, "extension amount must be non-negative");
        let mut max = self.max;
        max[axis.index()] += amount;
        BoundingBox { min: self.min, max }
    }

    /// Closed-interval intersection test
    ///
    /// Two boxes intersect when on every axis
    /// `a.min <= b.max + tolerance && b.min <= a.max + tolerance`.
    /// Tolerance 0 counts touching faces as intersecting; a positive
    /// tolerance treats near-adjacent boxes as intersecting too.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (0..3).all(|axis| {
            self.min[axis] <= other.max[axis] + tolerance
                && other.min[axis] <= self.max[axis] + tolerance
        })
    }

    /// Full containment test: `inner` lies completely within `self`
    ///
    /// The location-mismatch rule deliberately uses [`Self::intersects`],
    /// not containment, so elements crossing a level boundary are not
    /// flagged. This is the complement check only.
    #[inline]
    pub fn contains(&self, inner: &BoundingBox) -> bool {
        (0..3).all(|axis| self.min[axis] <= inner.min[axis] && inner.max[axis] <= self.max[axis])
    }

    /// Center point of the box
    #[inline]
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }
}

/// Merge a non-empty sequence of boxes into their common bounds
///
/// Componentwise min of all `min` corners and max of all `max` corners.
/// A single box merges to an equal copy. Returns `None` for an empty
/// sequence.
pub fn merge_boxes(boxes: &[BoundingBox]) -> Option<BoundingBox> {
    let (first, rest) = boxes.split_first()?;
    Some(rest.iter().fold(*first, |acc, b| acc.merged_with(b)))
}
