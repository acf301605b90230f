// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bim-spatial-model - Shared types and host-access traits for BIM spatial checks
//!
//! This crate provides the data model for the spatial containment engine:
//! axis-aligned bounding boxes, element and level handles, and the traits a
//! host adapter implements so the engine never touches the authoring
//! application directly.
//!
//! # Architecture
//!
//! - [`BoundingBox`] - axis-aligned box algebra (merge, extend, intersect)
//! - [`HostModel`] - read-only access to elements, levels, fields and units
//! - [`CheckError`] - structural failures that abort an invocation
//! - [`CancelToken`] - advisory cooperative cancellation
//!
//! Recoverable conditions (an element without geometry, a dangling level
//! reference) are not errors here; the engine resolves them into counted
//! skip outcomes on its reports.

pub mod cancel;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod traits;
pub mod types;
pub mod units;

// Re-export all public types
pub use cancel::*;
pub use error::*;
pub use fields::*;
pub use geometry::*;
pub use traits::*;
pub use types::*;
pub use units::*;
