//! Load Combinations
//!
//! A combination scales every load by the factor of its category before the
//! beam is solved. The engine is linear, so a combination is simply a
//! weighted superposition of the category results.
//!
//! ## Presets
//!
//! - `SVC`: D + L + O (service, unfactored)
//! - `SDM`: 1.4D + 1.7L + O (strength design method, ACI 318-99 / Thai
//!   practice). Other loads are taken as already factored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::load_types::LoadCategory;
use crate::errors::{CbaError, CbaResult};

/// A load combination with factors for each load category
///
/// # Example
/// ```
/// use cba_core::loads::{LoadCategory, LoadCombination};
///
/// let combo = LoadCombination::new("U", "1.4D + 1.7L")
///     .with_factor(LoadCategory::Dead, 1.4)
///     .with_factor(LoadCategory::Live, 1.7);
///
/// assert_eq!(combo.get_factor(LoadCategory::Live), 1.7);
/// assert_eq!(combo.get_factor(LoadCategory::Other), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "SVC", "SDM")
    pub name: String,

    /// Human-readable equation for display (e.g., "1.4D + 1.7L")
    #[serde(default)]
    pub equation: String,

    /// Load factors keyed by category
    pub factors: HashMap<LoadCategory, f64>,
}

impl LoadCombination {
    /// Create a new load combination with no factors
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: HashMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, category: LoadCategory, factor: f64) -> Self {
        self.factors.insert(category, factor);
        self
    }

    /// Every category at factor 1.0
    pub fn unfactored() -> Self {
        LoadCategory::ALL
            .iter()
            .fold(LoadCombination::new("SVC", "D + L + O"), |combo, category| {
                combo.with_factor(*category, 1.0)
            })
    }

    /// Strength design combination 1.4D + 1.7L (other loads unfactored)
    pub fn sdm() -> Self {
        LoadCombination::new("SDM", "1.4D + 1.7L + O")
            .with_factor(LoadCategory::Dead, 1.4)
            .with_factor(LoadCategory::Live, 1.7)
            .with_factor(LoadCategory::Other, 1.0)
    }

    /// Get the factor for a category (0.0 if not in combination)
    pub fn get_factor(&self, category: LoadCategory) -> f64 {
        self.factors.get(&category).copied().unwrap_or(0.0)
    }

    /// Check that every factor is a finite number
    pub fn validate(&self) -> CbaResult<()> {
        for (category, factor) in &self.factors {
            if !factor.is_finite() {
                return Err(CbaError::invalid_input(
                    format!("combinations[{}].factors.{}", self.name, category.code()),
                    factor.to_string(),
                    "Load factor must be finite",
                ));
            }
        }
        Ok(())
    }
}

impl Default for LoadCombination {
    fn default() -> Self {
        LoadCombination::unfactored()
    }
}

/// Service and strength combinations used by the dashboards
///
/// # Example
/// ```
/// use cba_core::loads::standard_combinations;
///
/// let combos = standard_combinations();
/// assert_eq!(combos[0].name, "SVC");
/// assert_eq!(combos[1].name, "SDM");
/// ```
pub fn standard_combinations() -> Vec<LoadCombination> {
    vec![LoadCombination::unfactored(), LoadCombination::sdm()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfactored_has_unit_factors() {
        let combo = LoadCombination::unfactored();
        for category in LoadCategory::ALL {
            assert_eq!(combo.get_factor(category), 1.0);
        }
    }

    #[test]
    fn test_sdm_factors() {
        let combo = LoadCombination::sdm();
        assert_eq!(combo.get_factor(LoadCategory::Dead), 1.4);
        assert_eq!(combo.get_factor(LoadCategory::Live), 1.7);
        assert_eq!(combo.get_factor(LoadCategory::Other), 1.0);
    }

    #[test]
    fn test_validate_rejects_nan_factor() {
        let combo = LoadCombination::new("bad", "").with_factor(LoadCategory::Live, f64::NAN);
        assert!(matches!(combo.validate(), Err(CbaError::InvalidInput { .. })));
        assert!(LoadCombination::sdm().validate().is_ok());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let combo = LoadCombination::sdm();
        let json = serde_json::to_string(&combo).unwrap();
        let back: LoadCombination = serde_json::from_str(&json).unwrap();
        assert_eq!(combo, back);
    }
}
