//! Clip categories and the category → file-list map.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// The closed set of clip categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryLabel {
    Rain,
    Thunder,
    WhiteNoise,
    Nature,
    Water,
    Other,
}

impl CategoryLabel {
    /// All labels, in scoring order.
    pub const ALL: [CategoryLabel; 6] = [
        CategoryLabel::Rain,
        CategoryLabel::Thunder,
        CategoryLabel::WhiteNoise,
        CategoryLabel::Nature,
        CategoryLabel::Water,
        CategoryLabel::Other,
    ];

    /// Returns the snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Rain => "rain",
            CategoryLabel::Thunder => "thunder",
            CategoryLabel::WhiteNoise => "white_noise",
            CategoryLabel::Nature => "nature",
            CategoryLabel::Water => "water",
            CategoryLabel::Other => "other",
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryLabel {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| SpecError::UnknownCategory(s.to_string()))
    }
}

/// Category → source file paths.
pub type CategoryMap = BTreeMap<CategoryLabel, Vec<PathBuf>>;

/// Total number of paths across all categories.
pub fn total_clips(map: &CategoryMap) -> usize {
    map.values().map(Vec::len).sum()
}
