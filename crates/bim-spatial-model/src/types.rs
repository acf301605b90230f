// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for BIM element and level representation
//!
//! This module defines the fundamental handles the engine works with. An
//! element's category is resolved once when the host adapter ingests the
//! model; the engine branches on the enum, never on dynamic field probing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe element identifier
///
/// Wraps the raw host element ID (e.g. a Revit ElementId integer value).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(id: u64) -> Self {
        ElementId(id)
    }
}

impl From<ElementId> for u64 {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

/// Type-safe level identifier
///
/// Distinct from [`ElementId`] so a level reference read from an element
/// field cannot be confused with an ordinary element handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct LevelId(pub u64);

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L#{}", self.0)
    }
}

impl From<u64> for LevelId {
    fn from(id: u64) -> Self {
        LevelId(id)
    }
}

/// Element category, resolved once at ingestion
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Door,
    Window,
    Wall,
    Floor,
    Ceiling,
    Room,
    Stair,
    Railing,
    StructuralColumn,
    StructuralFraming,
    StructuralFoundation,
    CurtainWallPanel,
    CurtainWallMullion,
    Furniture,
    FurnitureSystem,
    /// Any category the checks do not branch on, kept with its host name
    Other(String),
}

impl Category {
    /// Display name for reports
    pub fn display_name(&self) -> &str {
        match self {
            Category::Door => "Door",
            Category::Window => "Window",
            Category::Wall => "Wall",
            Category::Floor => "Floor",
            Category::Ceiling => "Ceiling",
            Category::Room => "Room",
            Category::Stair => "Stair",
            Category::Railing => "Railing",
            Category::StructuralColumn => "Structural Column",
            Category::StructuralFraming => "Structural Framing",
            Category::StructuralFoundation => "Structural Foundation",
            Category::CurtainWallPanel => "Curtain Wall Panel",
            Category::CurtainWallMullion => "Curtain Wall Mullion",
            Category::Furniture => "Furniture",
            Category::FurnitureSystem => "Furniture System",
            Category::Other(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lightweight element handle handed to the engine
///
/// Geometry is not carried here; the engine asks the host for a bounding
/// box on demand and treats a missing box as a counted skip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Host element ID
    pub id: ElementId,
    /// Category resolved at ingestion
    pub category: Category,
    /// Type name (e.g. "GFB Estrich 60mm"), used by name filters
    pub type_name: String,
}

impl ElementInfo {
    /// Create a new element handle
    pub fn new(id: ElementId, category: Category, type_name: impl Into<String>) -> Self {
        Self {
            id,
            category,
            type_name: type_name.into(),
        }
    }
}

/// A building story reference plane
///
/// Immutable input for one engine invocation: the set is read once from the
/// host, sorted, and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Host level ID
    pub id: LevelId,
    /// Level name (e.g. "EG", "OG 01")
    pub name: String,
    /// Elevation in internal length units, ascending sort key
    pub elevation: f64,
    /// Whether the host marks this level as an occupiable building story
    pub is_building_story: bool,
}

impl Level {
    /// Create a new level
    pub fn new(id: LevelId, name: impl Into<String>, elevation: f64, is_building_story: bool) -> Self {
        Self {
            id,
            name: name.into(),
            elevation,
            is_building_story,
        }
    }
}

/// Value of a named element field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Numeric field (lengths are internal units)
    Number(f64),
    /// Text field
    Text(String),
    /// Reference to a level
    LevelRef(LevelId),
    /// Reference to another element
    ElementRef(ElementId),
}

impl FieldValue {
    /// Numeric value, if this is a number field
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Level reference, if this field points at a level
    pub fn as_level_ref(&self) -> Option<LevelId> {
        match self {
            FieldValue::LevelRef(id) => Some(*id),
            _ => None,
        }
    }
}

/// Category filter for host element queries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct CategoryFilter {
    /// Categories to include; empty means all
    pub categories: Vec<Category>,
}

impl CategoryFilter {
    /// Filter matching a single category
    pub fn of(category: Category) -> Self {
        Self {
            categories: vec![category],
        }
    }

    /// Filter matching any of the given categories
    pub fn any_of(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    /// Check whether a category passes the filter
    pub fn matches(&self, category: &Category) -> bool {
        self.categories.is_empty() || self.categories.contains(category)
    }
}

/// Type-name substring filter
///
/// Matches when the element's type name contains any of the patterns.
/// Case-sensitive, like the host's parameter-contains filter rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct NameFilter {
    /// Substrings, any one of which is a match
    pub contains_any: Vec<String>,
}

impl NameFilter {
    /// Create a filter from substring patterns
    pub fn contains_any(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            contains_any: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// The finishing-floor filter used by the floor-buildup and join checks
    pub fn finishing_floors() -> Self {
        Self::contains_any(["GFB", "GDA", "DAD"])
    }

    /// Check whether a type name passes the filter
    ///
    /// An empty pattern list matches nothing; a filter that excludes
    /// everything is a configuration mistake better surfaced early.
    pub fn matches(&self, type_name: &str) -> bool {
        self.contains_any.iter().any(|p| type_name.contains(p))
    }
}
