// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for spatial check operations
//!
//! Only structural preconditions are errors: a check run with no usable
//! levels, or a story level whose bounding box the host cannot produce.
//! Per-element conditions (missing geometry, a dangling level reference)
//! degrade to counted skips on the engine reports and never abort a batch.
//! Cancellation is a run status, not an error.

use crate::LevelId;
use thiserror::Error;

/// Result type alias for check operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that abort a check invocation
#[derive(Error, Debug)]
pub enum CheckError {
    /// No story-flagged levels were supplied
    #[error("no building-story levels available")]
    NoLevels,

    /// A story level has no retrievable bounding box
    ///
    /// Levels are few and must all be valid; inclusion volumes cannot be
    /// derived around a hole in the stack.
    #[error("level {id} ({name}) has no bounding box")]
    MissingLevelData {
        /// The level without geometry
        id: LevelId,
        /// Its display name, for the report
        name: String,
    },

    /// The host adapter failed outright
    #[error("host error: {0}")]
    Host(String),
}

impl CheckError {
    /// Create a missing-level-data error
    pub fn missing_level(id: LevelId, name: impl Into<String>) -> Self {
        CheckError::MissingLevelData {
            id,
            name: name.into(),
        }
    }

    /// Create a host error
    pub fn host(msg: impl Into<String>) -> Self {
        CheckError::Host(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CheckError::missing_level(LevelId(4), "OG 02");
        assert_eq!(err.to_string(), "level L#4 (OG 02) has no bounding box");
        assert_eq!(CheckError::NoLevels.to_string(), "no building-story levels available");
    }
}
