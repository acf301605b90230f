// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Well-known host field names
//!
//! Different element categories store their nominal level under different
//! built-in parameters; the location check tries these in priority order
//! and uses the first non-empty one.

/// Level-reference field names, in lookup priority order
///
/// Family instances first, then wall base constraint, generic level,
/// schedule level, and the stair/railing variants.
pub const LEVEL_REFERENCE_FIELDS: &[&str] = &[
    "FAMILY_LEVEL_PARAM",
    "WALL_BASE_CONSTRAINT",
    "LEVEL_PARAM",
    "SCHEDULE_LEVEL_PARAM",
    "STAIRS_BASE_LEVEL_PARAM",
    "FAMILY_BASE_LEVEL_PARAM",
    "STAIRS_RAILING_BASE_LEVEL_PARAM",
];

/// Floor thickness field read during attribute transfer
pub const FLOOR_THICKNESS_FIELD: &str = "FLOOR_ATTR_THICKNESS_PARAM";

/// Door output field for the floor-buildup thickness
pub const FLOOR_BUILDUP_FIELD: &str = "H_TÜ_Fußbodenaufbau";

/// Door sill height field, zeroed by the caller before a transfer run
pub const SILL_HEIGHT_FIELD: &str = "INSTANCE_SILL_HEIGHT_PARAM";
