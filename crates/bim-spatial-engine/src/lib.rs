// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bim-spatial-engine - AABB containment and spatial assignment for BIM checks
//!
//! The engine answers the one non-trivial question shared by the location
//! check, the floor-buildup transfer and the join planner: which elements'
//! bounding boxes fall inside, or touch, which other volumes.
//!
//! # Components
//!
//! - [`SpatialIndex`] - labeled boxes with a uniform-grid broad phase
//! - [`LevelStack`] - story levels ordered by elevation with derived
//!   inclusion volumes
//! - [`AssignmentEngine`] - level-mismatch detection and attribute transfer
//! - [`plan_joins`] - all-pairs intersection planning for geometry joins
//!
//! The engine is single-threaded, synchronous and cooperatively cancellable.
//! It holds no host resources and performs no writes: every operation
//! returns buffered decisions the caller applies inside one host
//! transaction. Whole-model runs are O(subjects x targets) even with the
//! broad phase trimming candidates; callers are expected to limit the input
//! to a visible subset.

pub mod assign;
pub mod index;
pub mod join;
pub mod levels;
pub mod options;

pub use assign::*;
pub use index::*;
pub use join::*;
pub use levels::*;
pub use options::*;
