//! Load category definitions
//!
//! Every beam load carries a category so that combinations can factor dead
//! and live loads separately (e.g. 1.4D + 1.7L in strength design).

use serde::{Deserialize, Serialize};

/// Load categories used by load combinations
///
/// # Example
/// ```
/// use cba_core::loads::LoadCategory;
///
/// let dead = LoadCategory::Dead;
/// assert_eq!(dead.code(), "D");
/// assert_eq!(dead.description(), "Dead load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadCategory {
    /// D - Dead load (self-weight, finishes, permanent attachments)
    #[default]
    Dead,
    /// L - Live load (occupancy)
    Live,
    /// O - Other loads, typically already factored (e.g. applied end moments)
    Other,
}

impl LoadCategory {
    /// All load categories in standard order
    pub const ALL: [LoadCategory; 3] = [LoadCategory::Dead, LoadCategory::Live, LoadCategory::Other];

    /// Standard abbreviation code (D, L, O)
    pub fn code(&self) -> &'static str {
        match self {
            LoadCategory::Dead => "D",
            LoadCategory::Live => "L",
            LoadCategory::Other => "O",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadCategory::Dead => "Dead load",
            LoadCategory::Live => "Live load",
            LoadCategory::Other => "Other load",
        }
    }
}

impl std::fmt::Display for LoadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = LoadCategory::ALL.iter().map(|c| c.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), LoadCategory::ALL.len());
    }

    #[test]
    fn test_default_is_dead() {
        assert_eq!(LoadCategory::default(), LoadCategory::Dead);
        assert_eq!(LoadCategory::Live.to_string(), "L");
    }
}
