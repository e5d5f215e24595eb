//! Analysis options
//!
//! Everything that tunes an analysis without changing the beam itself:
//! how densely the curves are sampled, how strict the singularity check
//! is and which serviceability deflection limits are checked. All fields
//! have defaults, so `{}` is a valid options document.

use serde::{Deserialize, Serialize};

use crate::errors::{CbaError, CbaResult};

/// Default number of evenly spaced samples per span
pub const DEFAULT_POINTS_PER_SPAN: usize = 101;

/// Upper bound on the regular samples of a single span
pub const MAX_POINTS_PER_SPAN: usize = 1_000_000;

/// Default relative pivot tolerance of the scaled Cholesky factorization
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

/// Default serviceability limits, as `n` in `L/n`
pub const DEFAULT_DEFLECTION_LIMITS: [f64; 3] = [250.0, 300.0, 400.0];

/// Sampling density of the result curves
///
/// Load discontinuities and nodes are always sampled in addition to the
/// regular grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Fixed number of evenly spaced points on every span, ends included
    PointsPerSpan(usize),

    /// Target spacing; each span gets `ceil(L / dx) + 1` evenly spaced points
    Step(f64),
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::PointsPerSpan(DEFAULT_POINTS_PER_SPAN)
    }
}

impl Resolution {
    /// Number of grid segments on a span of length `l`
    ///
    /// # Errors
    /// * `InvalidInput` - the span would get more than [`MAX_POINTS_PER_SPAN`] samples
    pub fn segments(&self, l: f64) -> CbaResult<usize> {
        let segments = match *self {
            Resolution::PointsPerSpan(n) => n.saturating_sub(1).max(1) as f64,
            Resolution::Step(dx) => (l / dx).ceil().max(1.0),
        };
        // Checked in f64 so a huge ratio never reaches the cast
        if !(segments.is_finite() && segments < MAX_POINTS_PER_SPAN as f64) {
            return Err(CbaError::invalid_input(
                "resolution",
                format!("{:?} on a {} m span", self, l),
                format!("At most {} samples per span are allowed", MAX_POINTS_PER_SPAN),
            ));
        }
        Ok(segments as usize)
    }

    /// Evenly spaced span-local positions for a span of length `l`
    pub fn grid(&self, l: f64) -> CbaResult<Vec<f64>> {
        let segments = self.segments(l)?;
        Ok((0..=segments)
            .map(|k| l * k as f64 / segments as f64)
            .collect())
    }
}

/// Options for [`ContinuousBeam::analyze_with`](super::ContinuousBeam::analyze_with)
///
/// # Example
/// ```
/// use cba_core::calculations::{AnalysisOptions, Resolution};
///
/// let options = AnalysisOptions::default().with_resolution(Resolution::Step(0.05));
/// assert!(options.validate().is_ok());
///
/// let parsed: AnalysisOptions = serde_json::from_str("{}").unwrap();
/// assert_eq!(parsed, AnalysisOptions::default());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Sampling density of the result curves
    pub resolution: Resolution,

    /// Smallest acceptable squared pivot of the Jacobi-scaled factorization
    pub pivot_tolerance: f64,

    /// Whether the rotation curve is computed and returned
    pub include_rotation: bool,

    /// Deflection limits checked per span, as `n` in `L/n`
    pub deflection_limits: Vec<f64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            include_rotation: true,
            deflection_limits: DEFAULT_DEFLECTION_LIMITS.to_vec(),
        }
    }
}

impl AnalysisOptions {
    /// Set resolution (builder pattern)
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set pivot tolerance (builder pattern)
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Enable or disable the rotation curve (builder pattern)
    pub fn with_rotation(mut self, include: bool) -> Self {
        self.include_rotation = include;
        self
    }

    /// Set the deflection limits (builder pattern)
    pub fn with_deflection_limits(mut self, limits: Vec<f64>) -> Self {
        self.deflection_limits = limits;
        self
    }

    /// Validate option values
    pub fn validate(&self) -> CbaResult<()> {
        match self.resolution {
            Resolution::PointsPerSpan(n) if n < 2 => {
                return Err(CbaError::invalid_input(
                    "resolution",
                    n.to_string(),
                    "At least 2 points per span are required",
                ));
            }
            Resolution::PointsPerSpan(n) if n > MAX_POINTS_PER_SPAN => {
                return Err(CbaError::invalid_input(
                    "resolution",
                    n.to_string(),
                    format!("At most {} points per span are allowed", MAX_POINTS_PER_SPAN),
                ));
            }
            Resolution::Step(dx) if !(dx.is_finite() && dx > 0.0) => {
                return Err(CbaError::invalid_input(
                    "resolution",
                    dx.to_string(),
                    "Step must be a positive finite length",
                ));
            }
            _ => {}
        }

        if !(self.pivot_tolerance.is_finite()
            && self.pivot_tolerance > 0.0
            && self.pivot_tolerance < 1.0)
        {
            return Err(CbaError::invalid_input(
                "pivot_tolerance",
                self.pivot_tolerance.to_string(),
                "Pivot tolerance must lie in (0, 1)",
            ));
        }

        if let Some(&limit) = self
            .deflection_limits
            .iter()
            .find(|n| !(n.is_finite() && **n > 0.0))
        {
            return Err(CbaError::invalid_input(
                "deflection_limits",
                limit.to_string(),
                "Deflection limits must be positive and finite",
            ));
        }

        Ok(())
    }

    /// Validate the options against the span lengths of a beam
    ///
    /// Adds the per-span sample count check, which depends on the lengths
    /// when sampling by step.
    pub fn validate_for_spans(&self, lengths: &[f64]) -> CbaResult<()> {
        self.validate()?;
        for &l in lengths {
            self.resolution.segments(l)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_per_span_grid() {
        let grid = Resolution::PointsPerSpan(5).grid(8.0).unwrap();
        assert_eq!(grid, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_step_grid_covers_span() {
        let grid = Resolution::Step(0.3).grid(1.0).unwrap();
        // ceil(1.0 / 0.3) = 4 segments
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[4], 1.0);
    }

    #[test]
    fn test_validation() {
        assert!(AnalysisOptions::default().validate().is_ok());
        assert!(AnalysisOptions::default()
            .with_resolution(Resolution::PointsPerSpan(1))
            .validate()
            .is_err());
        assert!(AnalysisOptions::default()
            .with_resolution(Resolution::Step(0.0))
            .validate()
            .is_err());
        assert!(AnalysisOptions::default()
            .with_pivot_tolerance(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_sample_count_is_bounded() {
        let tiny = AnalysisOptions::default().with_resolution(Resolution::Step(1e-300));
        assert!(tiny.validate().is_ok());
        let err = tiny.validate_for_spans(&[10.0]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(Resolution::Step(1e-300).grid(10.0).is_err());

        // 10 m at 1e-9 would need 10^10 samples
        assert!(Resolution::Step(1e-9).grid(10.0).is_err());
        // 10 m at 1e-5 reaches the limit in segments, one sample too many
        assert!(Resolution::Step(1e-5).segments(10.0).is_err());
        assert_eq!(Resolution::Step(0.5).segments(10.0).unwrap(), 20);

        assert!(AnalysisOptions::default()
            .with_resolution(Resolution::PointsPerSpan(MAX_POINTS_PER_SPAN + 1))
            .validate()
            .is_err());
        assert!(AnalysisOptions::default()
            .with_resolution(Resolution::PointsPerSpan(MAX_POINTS_PER_SPAN))
            .validate_for_spans(&[10.0])
            .is_ok());
    }

    #[test]
    fn test_deflection_limits_validated() {
        assert_eq!(
            AnalysisOptions::default().deflection_limits,
            vec![250.0, 300.0, 400.0]
        );
        assert!(AnalysisOptions::default()
            .with_deflection_limits(vec![360.0, 0.0])
            .validate()
            .is_err());
        assert!(AnalysisOptions::default()
            .with_deflection_limits(Vec::new())
            .validate()
            .is_ok());
    }

    #[test]
    fn test_partial_json() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"resolution": {"Step": 0.1}}"#).unwrap();
        assert_eq!(options.resolution, Resolution::Step(0.1));
        assert_eq!(options.pivot_tolerance, DEFAULT_PIVOT_TOLERANCE);
        assert!(options.include_rotation);
        assert_eq!(options.deflection_limits, DEFAULT_DEFLECTION_LIMITS.to_vec());
    }
}
