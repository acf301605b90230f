// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration

use serde::{Deserialize, Serialize};

/// Tuning knobs for one engine invocation
///
/// All lengths are internal units; callers convert display-unit thresholds
/// through the host before building the options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Upward clearance added above the topmost story's box
    pub top_clearance: f64,
    /// Tolerance for the all-pairs join test (near-adjacent counts)
    pub join_tolerance: f64,
    /// Cell size of the broad-phase grid
    pub grid_cell_size: f64,
}

impl EngineOptions {
    /// Standard check behavior: 5-unit top clearance, 10-unit join tolerance
    pub fn standard() -> Self {
        Self {
            top_clearance: 5.0,
            join_tolerance: 10.0,
            grid_cell_size: 10.0,
        }
    }

    /// Set the top clearance
    pub fn with_top_clearance(mut self, clearance: f64) -> Self {
        self.top_clearance = clearance;
        self
    }

    /// Set the join tolerance
    pub fn with_join_tolerance(mut self, tolerance: f64) -> Self {
        self.join_tolerance = tolerance;
        self
    }

    /// Set the broad-phase cell size
    pub fn with_grid_cell_size(mut self, cell_size: f64) -> Self {
        self.grid_cell_size = cell_size;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::standard()
    }
}
