// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level ordering and inclusion volumes
//!
//! Only story-flagged levels participate. Each story's inclusion volume is
//! its own box merged with the next story's box, so an element assigned to
//! a floor is expected between its level and the one above; the topmost
//! story gets its box extended upward by a fixed clearance instead.

use bim_spatial_model::{
    Axis, BoundingBox, CheckError, HostModel, Level, LevelId, Result,
};
use rustc_hash::FxHashMap;

/// Story levels ordered by elevation
#[derive(Debug, Clone)]
pub struct LevelStack {
    ordered: Vec<Level>,
}

impl LevelStack {
    /// Build a stack from the host's level set
    ///
    /// Filters to building-story levels and sorts ascending by elevation.
    /// The sort is stable: levels sharing an elevation keep their input
    /// order. Fails with [`CheckError::NoLevels`] when nothing remains.
    pub fn build(levels: Vec<Level>) -> Result<Self> {
        let mut ordered: Vec<Level> = levels
            .into_iter()
            .filter(|level| level.is_building_story)
            .collect();
        if ordered.is_empty() {
            return Err(CheckError::NoLevels);
        }
        ordered.sort_by(|a, b| {
            a.elevation
                .partial_cmp(&b.elevation)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(Self { ordered })
    }

    /// Stories in ascending elevation order
    pub fn ordered(&self) -> &[Level] {
        &self.ordered
    }

    /// Number of stories in the stack
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the stack is empty (never true for a built stack)
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Derive one inclusion volume per story
    ///
    /// Every story's box must be obtainable from the host; a missing box is
    /// fatal for the whole computation. `clearance` is the upward extension
    /// for the topmost story, in internal units.
    pub fn inclusion_volumes(
        &self,
        host: &dyn HostModel,
        clearance: f64,
    ) -> Result<FxHashMap<LevelId, BoundingBox>> {
        let mut boxes = Vec::with_capacity(self.ordered.len());
        for level in &self.ordered {
            let bbox = host
                .level_bounding_box(level.id)
                .ok_or_else(|| CheckError::missing_level(level.id, level.name.clone()))?;
            boxes.push(bbox);
        }

        let mut volumes = FxHashMap::default();
        for (i, level) in self.ordered.iter().enumerate() {
            let volume = if i + 1 < boxes.len() {
                boxes[i].merged_with(&boxes[i + 1])
            } else {
                boxes[i].extend_max(Axis::Z, clearance)
            };
            volumes.insert(level.id, volume);
        }
        Ok(volumes)
    }
}
