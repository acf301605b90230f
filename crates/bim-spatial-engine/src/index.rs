// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index over labeled bounding boxes
//!
//! Insertion-ordered boxes with a uniform-grid broad phase over the X/Y
//! plane (building footprints spread laterally; levels stack in Z, so two
//! grid axes already prune most candidates). The grid is an accelerator
//! only: every candidate is confirmed with the exact closed-interval
//! predicate, and query results come back in insertion order so callers
//! relying on encounter-order semantics see exactly what a brute-force
//! scan would produce.

use bim_spatial_model::{BoundingBox, ElementId};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Labeled axis-aligned boxes answering intersection queries
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    entries: Vec<(ElementId, BoundingBox)>,
    cells: FxHashMap<(i64, i64), Vec<usize>>,
}

impl SpatialIndex {
    /// Create an empty index with the given broad-phase cell size
    ///
    /// # Panics
    /// Panics if `cell_size` is not strictly positive.
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            entries: Vec::new(),
            cells: FxHashMap::default(),
        }
    }

    /// Number of boxes in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a labeled box
    ///
    /// Boxes are never removed; the index lives for one invocation.
    pub fn insert(&mut self, id: ElementId, bbox: BoundingBox) {
        let slot = self.entries.len();
        self.entries.push((id, bbox));
        for key in self.cells_for(&bbox, 0.0) {
            self.cells.entry(key).or_default().push(slot);
        }
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &BoundingBox)> {
        self.entries.iter().map(|(id, bbox)| (*id, bbox))
    }

    /// Labels of all boxes intersecting `probe` at the given tolerance
    ///
    /// Results are in insertion order.
    pub fn query(&self, probe: &BoundingBox, tolerance: f64) -> Vec<ElementId> {
        self.query_slots(probe, tolerance)
            .into_iter()
            .map(|slot| self.entries[slot].0)
            .collect()
    }

    /// Slots of all boxes intersecting `probe`, ascending (= insertion order)
    pub fn query_slots(&self, probe: &BoundingBox, tolerance: f64) -> Vec<usize> {
        // BTreeSet dedups candidates listed in several cells and hands
        // them back in ascending slot order.
        let mut candidates = BTreeSet::new();
        for key in self.cells_for(probe, tolerance) {
            if let Some(slots) = self.cells.get(&key) {
                candidates.extend(slots.iter().copied());
            }
        }
        candidates
            .into_iter()
            .filter(|&slot| self.entries[slot].1.intersects(probe, tolerance))
            .collect()
    }

    /// Entry at a slot
    pub fn entry(&self, slot: usize) -> (ElementId, &BoundingBox) {
        let (id, bbox) = &self.entries[slot];
        (*id, bbox)
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        let i = v as i64;
        if (i as f64) > v {
            i - 1
        } else {
            i
        }
    }

    #[inline]
    fn key_for(&self, x: f64, y: f64) -> (i64, i64) {
        (
            Self::floor_to_i64(x / self.cell_size),
            Self::floor_to_i64(y / self.cell_size),
        )
    }

    /// Grid cells covered by a box grown by `margin` on X and Y
    fn cells_for(&self, bbox: &BoundingBox, margin: f64) -> Vec<(i64, i64)> {
        let (min_x, min_y) = self.key_for(bbox.min[0] - margin, bbox.min[1] - margin);
        let (max_x, max_y) = self.key_for(bbox.max[0] + margin, bbox.max[1] + margin);
        let mut keys = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                keys.push((x, y));
            }
        }
        keys
    }
}
