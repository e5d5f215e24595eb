//! Discrete Load Entries
//!
//! A beam load is a tagged variant with one case per load kind, each
//! carrying only the fields it needs. Every load names exactly one span by
//! its 1-based index; positions are fractions of that span's length.
//!
//! ## Position Domain
//!
//! Fractions lie in `[0, 1]` inclusive. A point load or couple at `0.0` or
//! `1.0` acts at the node at that end of the named span; it is carried by
//! that span's fixed-end forces, so the same node load can be entered on
//! either neighbouring span with identical results.

use serde::{Deserialize, Serialize};

use super::load_types::LoadCategory;
use crate::errors::{CbaError, CbaResult};

// ============================================================================
// Load Kinds
// ============================================================================

/// How a load is applied along its span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LoadKind {
    /// Uniform load over the full span (force per length, positive down)
    Uniform { magnitude: f64 },

    /// Uniform load over `[start, end]` (fractions of the span)
    PartialUniform { magnitude: f64, start: f64, end: f64 },

    /// Linearly varying load over `[start, end]`
    Trapezoidal {
        start_magnitude: f64,
        end_magnitude: f64,
        start: f64,
        end: f64,
    },

    /// Concentrated force at `position` (positive down)
    Point { magnitude: f64, position: f64 },

    /// Concentrated couple at `position` (positive counterclockwise)
    Moment { magnitude: f64, position: f64 },
}

impl LoadKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadKind::Uniform { .. } => "Uniform",
            LoadKind::PartialUniform { .. } => "Partial Uniform",
            LoadKind::Trapezoidal { .. } => "Trapezoidal",
            LoadKind::Point { .. } => "Point",
            LoadKind::Moment { .. } => "Moment",
        }
    }

    fn magnitudes(&self) -> Vec<f64> {
        match self {
            LoadKind::Uniform { magnitude }
            | LoadKind::PartialUniform { magnitude, .. }
            | LoadKind::Point { magnitude, .. }
            | LoadKind::Moment { magnitude, .. } => vec![*magnitude],
            LoadKind::Trapezoidal {
                start_magnitude,
                end_magnitude,
                ..
            } => vec![*start_magnitude, *end_magnitude],
        }
    }

    fn extent(&self) -> Option<(f64, f64)> {
        match self {
            LoadKind::Uniform { .. } => None,
            LoadKind::PartialUniform { start, end, .. }
            | LoadKind::Trapezoidal { start, end, .. } => Some((*start, *end)),
            LoadKind::Point { position, .. } | LoadKind::Moment { position, .. } => {
                Some((*position, *position))
            }
        }
    }
}

// ============================================================================
// Beam Load
// ============================================================================

/// A single load entry on a continuous beam
///
/// # Example
/// ```
/// use cba_core::loads::{BeamLoad, LoadCategory};
///
/// let load = BeamLoad::point(2, 50.0, 0.25).with_category(LoadCategory::Live);
/// assert_eq!(load.span, 2);
/// assert!(load.validate(0, 3).is_ok());
/// assert!(load.validate(0, 1).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamLoad {
    /// Span index, 1-based
    pub span: usize,

    /// Category used by load combinations
    #[serde(default)]
    pub category: LoadCategory,

    /// Load kind and its parameters
    #[serde(flatten)]
    pub kind: LoadKind,
}

impl BeamLoad {
    /// Create a load from its parts
    pub fn new(span: usize, kind: LoadKind) -> Self {
        Self {
            span,
            category: LoadCategory::default(),
            kind,
        }
    }

    /// Full-span uniform load
    pub fn uniform(span: usize, magnitude: f64) -> Self {
        Self::new(span, LoadKind::Uniform { magnitude })
    }

    /// Uniform load between two span fractions
    pub fn partial_uniform(span: usize, magnitude: f64, start: f64, end: f64) -> Self {
        Self::new(span, LoadKind::PartialUniform { magnitude, start, end })
    }

    /// Linearly varying load between two span fractions
    pub fn trapezoidal(
        span: usize,
        start_magnitude: f64,
        end_magnitude: f64,
        start: f64,
        end: f64,
    ) -> Self {
        Self::new(
            span,
            LoadKind::Trapezoidal {
                start_magnitude,
                end_magnitude,
                start,
                end,
            },
        )
    }

    /// Point load at a span fraction
    pub fn point(span: usize, magnitude: f64, position: f64) -> Self {
        Self::new(span, LoadKind::Point { magnitude, position })
    }

    /// Applied couple at a span fraction
    pub fn moment(span: usize, magnitude: f64, position: f64) -> Self {
        Self::new(span, LoadKind::Moment { magnitude, position })
    }

    /// Set category and return self (builder pattern)
    pub fn with_category(mut self, category: LoadCategory) -> Self {
        self.category = category;
        self
    }

    /// Validate against a beam with `span_count` spans
    ///
    /// `index` is the position of this load in the caller's list and is only
    /// used in the error report.
    pub fn validate(&self, index: usize, span_count: usize) -> CbaResult<()> {
        if self.span == 0 || self.span > span_count {
            return Err(CbaError::invalid_load(
                index,
                format!("span index {} is out of range 1..={}", self.span, span_count),
            ));
        }

        for magnitude in self.kind.magnitudes() {
            if !magnitude.is_finite() {
                return Err(CbaError::invalid_load(
                    index,
                    format!("{} magnitude {} is not finite", self.kind.display_name(), magnitude),
                ));
            }
        }

        if let Some((start, end)) = self.kind.extent() {
            for fraction in [start, end] {
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(CbaError::invalid_load(
                        index,
                        format!("position fraction {} is outside [0, 1]", fraction),
                    ));
                }
            }
            if start > end {
                return Err(CbaError::invalid_load(
                    index,
                    format!("load starts at {} after it ends at {}", start, end),
                ));
            }
        }

        Ok(())
    }

    /// Total downward force of the load on a span of the given length
    pub fn total_force(&self, span_length: f64) -> f64 {
        match &self.kind {
            LoadKind::Uniform { magnitude } => magnitude * span_length,
            LoadKind::PartialUniform { magnitude, start, end } => {
                magnitude * (end - start) * span_length
            }
            LoadKind::Trapezoidal {
                start_magnitude,
                end_magnitude,
                start,
                end,
            } => (start_magnitude + end_magnitude) / 2.0 * (end - start) * span_length,
            LoadKind::Point { magnitude, .. } => *magnitude,
            LoadKind::Moment { .. } => 0.0,
        }
    }
}
