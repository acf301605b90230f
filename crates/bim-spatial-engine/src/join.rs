// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! All-pairs join planning
//!
//! Finds every unordered pair of elements whose boxes intersect at the
//! join tolerance (10 internal units by default, so near-adjacent
//! structure still counts as joinable) and records the adjacency in both
//! directions. The host performs the actual geometry join; this pass only
//! plans it.

use crate::{RunStatus, SpatialIndex};
use bim_spatial_model::{BoundingBox, CancelToken, ElementId, ElementInfo, HostModel};
use log::debug;
use serde::{Deserialize, Serialize};

/// Symmetric intersection adjacency over one element set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JoinPlan {
    /// Per element, the elements it intersects; both directions recorded,
    /// outer list and neighbor lists in encounter order
    pub adjacency: Vec<(ElementId, Vec<ElementId>)>,
    /// Number of unordered intersecting pairs
    pub pair_count: usize,
    /// Elements dropped for missing geometry
    pub skipped: Vec<ElementId>,
    /// Completed or cancelled
    pub status: RunStatus,
}

impl JoinPlan {
    /// Neighbors of one element, if it intersects anything
    pub fn neighbors(&self, id: ElementId) -> Option<&[ElementId]> {
        self.adjacency
            .iter()
            .find(|(element, _)| *element == id)
            .map(|(_, neighbors)| neighbors.as_slice())
    }
}

/// Plan joins over one element set at the given tolerance
///
/// Cancellation is polled once per outer element; pairs recorded so far
/// stay on the plan.
pub fn plan_joins(
    host: &dyn HostModel,
    elements: &[ElementInfo],
    tolerance: f64,
    grid_cell_size: f64,
    cancel: &CancelToken,
) -> JoinPlan {
    let mut skipped = Vec::new();
    let mut boxed: Vec<(ElementId, BoundingBox)> = Vec::with_capacity(elements.len());
    let mut index = SpatialIndex::new(grid_cell_size);
    for element in elements {
        match host.bounding_box(element.id) {
            Some(bbox) => {
                boxed.push((element.id, bbox));
                index.insert(element.id, bbox);
            }
            None => {
                debug!("{} has no geometry, excluded from join", element.id);
                skipped.push(element.id);
            }
        }
    }

    let mut neighbors: Vec<Vec<ElementId>> = vec![Vec::new(); boxed.len()];
    let mut pair_count = 0;
    let mut status = RunStatus::Completed;

    for (i, (id, bbox)) in boxed.iter().enumerate() {
        if cancel.is_cancelled() {
            status = RunStatus::Cancelled;
            break;
        }
        // slots are ascending, so keeping j > i visits each pair once
        for j in index.query_slots(bbox, tolerance) {
            if j <= i {
                continue;
            }
            let (other_id, _) = index.entry(j);
            neighbors[i].push(other_id);
            neighbors[j].push(*id);
            pair_count += 1;
        }
    }

    let adjacency = boxed
        .iter()
        .zip(neighbors)
        .filter(|(_, list)| !list.is_empty())
        .map(|((id, _), list)| (*id, list))
        .collect();

    JoinPlan {
        adjacency,
        pair_count,
        skipped,
        status,
    }
}
