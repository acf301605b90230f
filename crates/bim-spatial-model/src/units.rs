// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit conversion at the host boundary
//!
//! The engine's internal math is unit-agnostic as long as all boxes share
//! one unit system. Conversion happens only where the caller supplies
//! numeric thresholds (e.g. the topmost-level clearance) in display units.

/// Linear unit scale: display units per internal unit
///
/// A host adapter implements its `to_internal_units`/`to_display_units`
/// with one of these, or with the host's own conversion API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitScale {
    /// Meters per internal unit
    pub meters_per_internal: f64,
}

impl UnitScale {
    /// Identity scale (internal unit is the meter)
    pub const METRIC: UnitScale = UnitScale {
        meters_per_internal: 1.0,
    };

    /// Imperial hosts keep internal lengths in feet
    pub const IMPERIAL_FEET: UnitScale = UnitScale {
        meters_per_internal: scales::FOOT,
    };

    /// Convert a display-unit (meter) value to internal units
    #[inline]
    pub fn to_internal(&self, value: f64) -> f64 {
        value / self.meters_per_internal
    }

    /// Convert an internal-unit value to display units (meters)
    #[inline]
    pub fn to_display(&self, value: f64) -> f64 {
        value * self.meters_per_internal
    }

    /// Convert and round to a number of digits, for report output
    pub fn to_display_rounded(&self, value: f64, digits: u32) -> f64 {
        let factor = 10f64.powi(digits as i32);
        (self.to_display(value) * factor).round() / factor
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        UnitScale::METRIC
    }
}

/// Common unit scales for reference
pub mod scales {
    /// Meters to meters (identity)
    pub const METRE: f64 = 1.0;
    /// Millimeters to meters
    pub const MILLIMETRE: f64 = 0.001;
    /// Centimeters to meters
    pub const CENTIMETRE: f64 = 0.01;
    /// Inches to meters
    pub const INCH: f64 = 0.0254;
    /// Feet to meters
    pub const FOOT: f64 = 0.3048;
}
