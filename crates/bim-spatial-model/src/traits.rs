// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-access trait
//!
//! The engine never reaches for an ambient document handle; every entry
//! point takes a [`HostModel`] reference supplied by the caller for one
//! invocation. Writes are not on this trait: the engine returns decisions
//! and the caller applies them inside its own host transaction.

use crate::{BoundingBox, CategoryFilter, ElementId, ElementInfo, FieldValue, Level, LevelId};

/// Read-only access to the authoring host's model
///
/// # Example
///
/// ```ignore
/// use bim_spatial_model::{HostModel, CategoryFilter, Category};
///
/// fn count_boxless(host: &dyn HostModel) -> usize {
///     host.elements(&CategoryFilter::of(Category::Door))
///         .iter()
///         .filter(|e| host.bounding_box(e.id).is_none())
///         .count()
/// }
/// ```
pub trait HostModel: Send + Sync {
    /// World-space bounding box of an element
    ///
    /// Returns `None` for ungeometric elements; the engine records those
    /// as skipped, never as mismatches.
    fn bounding_box(&self, id: ElementId) -> Option<BoundingBox>;

    /// Bounding box of a level, taken from the host's reference 3D view
    ///
    /// Story levels must all have boxes; the level stack treats a missing
    /// one as a fatal precondition failure, not a skip.
    fn level_bounding_box(&self, id: LevelId) -> Option<BoundingBox>;

    /// Read a named data field
    ///
    /// `None` means the element has no such field or it is empty.
    fn field(&self, id: ElementId, name: &str) -> Option<FieldValue>;

    /// Elements passing a category filter
    ///
    /// The returned collection is flat and homogeneous; any nested host
    /// collections are flattened by the adapter, not by the engine.
    fn elements(&self, filter: &CategoryFilter) -> Vec<ElementInfo>;

    /// All levels in the model, story-flagged or not
    fn levels(&self) -> Vec<Level>;

    /// Convert a display-unit length to internal units
    fn to_internal_units(&self, value: f64) -> f64;

    /// Convert an internal-unit length to display units
    fn to_display_units(&self, value: f64) -> f64;
}
