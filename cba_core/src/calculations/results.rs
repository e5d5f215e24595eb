//! # Analysis Results
//!
//! Sampled internal-force and displacement curves, support reactions, a
//! summary of the extreme values with per-span serviceability deflection
//! checks, plus envelopes over several load combinations.
//!
//! ## Curves
//!
//! `x`, `shear`, `moment`, `deflection` and `rotation` are parallel arrays.
//! Positions are non-decreasing: where shear or moment jumps (point load,
//! applied couple, interior node) the same position appears twice, first
//! with the value just left of it and then with the value just right of it.

use serde::{Deserialize, Serialize};

use crate::errors::{CbaError, CbaResult};

// =============================================================================
// REACTIONS AND NODAL DISPLACEMENTS
// =============================================================================

/// Degree of freedom at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dof {
    /// Vertical displacement / vertical force
    Vertical,
    /// Rotation / moment
    Rotation,
}

impl Dof {
    /// DOF kind of a global DOF index
    pub fn of_index(dof: usize) -> Self {
        if dof % 2 == 0 {
            Dof::Vertical
        } else {
            Dof::Rotation
        }
    }

    /// Global DOF index at a node
    pub fn index(&self, node: usize) -> usize {
        match self {
            Dof::Vertical => 2 * node,
            Dof::Rotation => 2 * node + 1,
        }
    }
}

/// What produces a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionSource {
    /// Rigid restraint
    Support,
    /// Elastic spring
    Spring,
}

/// A support reaction (force positive up, moment positive counterclockwise)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Node index, 0-based
    pub node: usize,
    /// Node position from the left end
    pub x: f64,
    /// Restrained DOF
    pub dof: Dof,
    /// Reaction value
    pub value: f64,
    /// Rigid support or spring
    pub source: ReactionSource,
}

/// Displacement of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Node index, 0-based
    pub node: usize,
    /// Node position from the left end
    pub x: f64,
    /// Vertical displacement (positive up)
    pub deflection: f64,
    /// Rotation (positive counterclockwise)
    pub rotation: f64,
}

// =============================================================================
// SUMMARY
// =============================================================================

/// An extreme value and where it occurs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extreme {
    pub value: f64,
    pub x: f64,
}

impl Extreme {
    fn select(x: &[f64], values: &[f64], better: impl Fn(f64, f64) -> bool) -> Self {
        let mut best: Option<Extreme> = None;
        for (&x, &value) in x.iter().zip(values) {
            match best {
                Some(current) if !better(value, current.value) => {}
                _ => best = Some(Extreme { value, x }),
            }
        }
        best.unwrap_or_default()
    }

    /// Largest value (first occurrence)
    pub fn max_of(x: &[f64], values: &[f64]) -> Self {
        Self::select(x, values, |candidate, current| candidate > current)
    }

    /// Smallest value (first occurrence)
    pub fn min_of(x: &[f64], values: &[f64]) -> Self {
        Self::select(x, values, |candidate, current| candidate < current)
    }

    /// Value of largest magnitude, sign kept
    pub fn abs_max_of(x: &[f64], values: &[f64]) -> Self {
        Self::select(x, values, |candidate, current| candidate.abs() > current.abs())
    }
}

// =============================================================================
// DEFLECTION CHECKS
// =============================================================================

/// A serviceability limit `L/n` applied to one span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeflectionLimit {
    /// `n` in `L/n`
    pub ratio: f64,
    /// Allowable deflection `L/n` (m)
    pub allowable: f64,
    /// `|δ_max| <= L/n`
    pub passes: bool,
}

/// Deflection check of a single span against every configured limit
///
/// Each span is checked against its own length, so a short span next to a
/// long one is not judged by the total length of the beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanDeflectionCheck {
    /// Span number, 1-based
    pub span: usize,
    /// Span length (m)
    pub length: f64,
    /// Deflection of largest magnitude within the span
    pub max_deflection: Extreme,
    /// `L/|δ_max|`, `None` when the span does not deflect
    pub span_ratio: Option<f64>,
    pub limits: Vec<DeflectionLimit>,
}

impl SpanDeflectionCheck {
    /// Check every span between consecutive node positions
    ///
    /// Samples at a shared node count for both adjacent spans.
    pub fn for_spans(
        x: &[f64],
        deflection: &[f64],
        node_positions: &[f64],
        ratios: &[f64],
    ) -> Vec<Self> {
        node_positions
            .windows(2)
            .enumerate()
            .map(|(i, ends)| {
                let (start, end) = (ends[0], ends[1]);
                let length = end - start;
                let tol = 1e-9 * end.abs().max(1.0);
                let (xs, values): (Vec<f64>, Vec<f64>) = x
                    .iter()
                    .zip(deflection)
                    .filter(|(xi, _)| **xi >= start - tol && **xi <= end + tol)
                    .map(|(xi, v)| (*xi, *v))
                    .unzip();

                let max_deflection = Extreme::abs_max_of(&xs, &values);
                let magnitude = max_deflection.value.abs();
                let limits = ratios
                    .iter()
                    .map(|&ratio| {
                        let allowable = length / ratio;
                        DeflectionLimit {
                            ratio,
                            allowable,
                            passes: magnitude <= allowable,
                        }
                    })
                    .collect();

                SpanDeflectionCheck {
                    span: i + 1,
                    length,
                    max_deflection,
                    span_ratio: (magnitude > 0.0).then(|| length / magnitude),
                    limits,
                }
            })
            .collect()
    }

    /// True if the span meets every limit
    pub fn passes(&self) -> bool {
        self.limits.iter().all(|limit| limit.passes)
    }

    /// Outcome for the limit `L/ratio`, if that limit was checked
    pub fn passes_limit(&self, ratio: f64) -> Option<bool> {
        self.limits
            .iter()
            .find(|limit| limit.ratio == ratio)
            .map(|limit| limit.passes)
    }
}

/// Extreme values of a result, for reports and design checks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSummary {
    pub max_shear: Extreme,
    pub min_shear: Extreme,
    /// Largest sagging moment
    pub max_moment: Extreme,
    /// Largest hogging moment (most negative)
    pub min_moment: Extreme,
    /// Deflection of largest magnitude
    pub max_deflection: Extreme,
    /// Total downward applied load
    pub total_load: f64,
    /// Sum of vertical reactions, springs included
    pub total_vertical_reaction: f64,
    /// Serviceability deflection checks, one per span
    #[serde(default)]
    pub deflection_checks: Vec<SpanDeflectionCheck>,
}

impl ResultSummary {
    /// Summarize sampled curves
    pub fn from_curves(
        x: &[f64],
        shear: &[f64],
        moment: &[f64],
        deflection: &[f64],
        total_load: f64,
        total_vertical_reaction: f64,
    ) -> Self {
        Self {
            max_shear: Extreme::max_of(x, shear),
            min_shear: Extreme::min_of(x, shear),
            max_moment: Extreme::max_of(x, moment),
            min_moment: Extreme::min_of(x, moment),
            max_deflection: Extreme::abs_max_of(x, deflection),
            total_load,
            total_vertical_reaction,
            deflection_checks: Vec::new(),
        }
    }

    /// Attach per-span deflection checks (builder pattern)
    pub fn with_deflection_checks(mut self, checks: Vec<SpanDeflectionCheck>) -> Self {
        self.deflection_checks = checks;
        self
    }

    /// Vertical equilibrium residual `ΣR - ΣP`
    pub fn equilibrium_error(&self) -> f64 {
        self.total_vertical_reaction - self.total_load
    }

    /// True if every span meets every deflection limit
    pub fn deflection_ok(&self) -> bool {
        self.deflection_checks.iter().all(SpanDeflectionCheck::passes)
    }
}

// =============================================================================
// ANALYSIS RESULT
// =============================================================================

/// Result of analysing a beam under one load combination
///
/// Owned by the caller and never modified after it is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    combination: String,
    x: Vec<f64>,
    shear: Vec<f64>,
    moment: Vec<f64>,
    deflection: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rotation: Vec<f64>,
    reactions: Vec<Reaction>,
    reaction_vector: Vec<f64>,
    nodal_displacements: Vec<NodeDisplacement>,
    summary: ResultSummary,
}

/// Sampled curves of a result, in `AnalysisResult` order
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Curves {
    pub x: Vec<f64>,
    pub shear: Vec<f64>,
    pub moment: Vec<f64>,
    pub deflection: Vec<f64>,
    pub rotation: Vec<f64>,
}

impl AnalysisResult {
    pub(crate) fn new(
        combination: String,
        curves: Curves,
        reactions: Vec<Reaction>,
        reaction_vector: Vec<f64>,
        nodal_displacements: Vec<NodeDisplacement>,
        total_load: f64,
        deflection_limits: &[f64],
    ) -> Self {
        let total_vertical_reaction = reactions
            .iter()
            .filter(|r| r.dof == Dof::Vertical)
            .map(|r| r.value)
            .sum();
        let summary = ResultSummary::from_curves(
            &curves.x,
            &curves.shear,
            &curves.moment,
            &curves.deflection,
            total_load,
            total_vertical_reaction,
        );
        let nodes: Vec<f64> = nodal_displacements.iter().map(|n| n.x).collect();
        let summary = summary.with_deflection_checks(SpanDeflectionCheck::for_spans(
            &curves.x,
            &curves.deflection,
            &nodes,
            deflection_limits,
        ));
        Self {
            combination,
            x: curves.x,
            shear: curves.shear,
            moment: curves.moment,
            deflection: curves.deflection,
            rotation: curves.rotation,
            reactions,
            reaction_vector,
            nodal_displacements,
            summary,
        }
    }

    /// Name of the load combination that produced this result
    pub fn combination(&self) -> &str {
        &self.combination
    }

    /// Sample positions from the left end of the beam (non-decreasing)
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Shear force at each sample
    pub fn shear(&self) -> &[f64] {
        &self.shear
    }

    /// Bending moment at each sample (sagging positive)
    pub fn moment(&self) -> &[f64] {
        &self.moment
    }

    /// Vertical displacement at each sample (positive up)
    pub fn deflection(&self) -> &[f64] {
        &self.deflection
    }

    /// Rotation at each sample; empty when disabled in the options
    pub fn rotation(&self) -> &[f64] {
        &self.rotation
    }

    /// Reactions at restrained and sprung DOFs
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Reactions indexed by global DOF, `2 * nodes` entries, zero where free
    pub fn reaction_vector(&self) -> &[f64] {
        &self.reaction_vector
    }

    /// Displacement and rotation of every node
    pub fn nodal_displacements(&self) -> &[NodeDisplacement] {
        &self.nodal_displacements
    }

    /// Extreme values
    pub fn summary(&self) -> &ResultSummary {
        &self.summary
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reaction at a node and DOF, if that DOF is restrained or sprung
    pub fn reaction_at(&self, node: usize, dof: Dof) -> Option<f64> {
        self.reactions
            .iter()
            .find(|r| r.node == node && r.dof == dof)
            .map(|r| r.value)
    }

    /// Indices of the samples at position `x` (two at a discontinuity)
    pub fn indices_at(&self, x: f64) -> Vec<usize> {
        let tol = 1e-9 * x.abs().max(1.0);
        self.x
            .iter()
            .enumerate()
            .filter(|(_, xi)| (*xi - x).abs() <= tol)
            .map(|(i, _)| i)
            .collect()
    }

    /// Shear at a sampled position (left limit at a discontinuity)
    pub fn shear_at(&self, x: f64) -> Option<f64> {
        self.indices_at(x).first().map(|&i| self.shear[i])
    }

    /// Moment at a sampled position (left limit at a discontinuity)
    pub fn moment_at(&self, x: f64) -> Option<f64> {
        self.indices_at(x).first().map(|&i| self.moment[i])
    }

    /// Deflection at a sampled position
    pub fn deflection_at(&self, x: f64) -> Option<f64> {
        self.indices_at(x).first().map(|&i| self.deflection[i])
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Pointwise maximum and minimum over several results
///
/// All results must be sampled at identical positions, which holds for
/// combinations of the same beam analysed with the same options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Combination names, in input order
    pub combinations: Vec<String>,
    pub x: Vec<f64>,
    pub shear_max: Vec<f64>,
    pub shear_min: Vec<f64>,
    pub moment_max: Vec<f64>,
    pub moment_min: Vec<f64>,
    pub deflection_max: Vec<f64>,
    pub deflection_min: Vec<f64>,
}

impl Envelope {
    /// Build the envelope of a set of results
    ///
    /// # Errors
    /// * `InvalidInput` - no results given
    /// * `DimensionMismatch` - results sampled at different positions
    pub fn from_results(results: &[AnalysisResult]) -> CbaResult<Self> {
        let Some(first) = results.first() else {
            return Err(CbaError::invalid_input(
                "results",
                "empty",
                "An envelope needs at least one result",
            ));
        };

        let mut envelope = Envelope {
            combinations: Vec::with_capacity(results.len()),
            x: first.x.clone(),
            shear_max: first.shear.clone(),
            shear_min: first.shear.clone(),
            moment_max: first.moment.clone(),
            moment_min: first.moment.clone(),
            deflection_max: first.deflection.clone(),
            deflection_min: first.deflection.clone(),
        };
        envelope.combinations.push(first.combination.clone());

        for (index, result) in results.iter().enumerate().skip(1) {
            if result.x.len() != envelope.x.len() || result.x != envelope.x {
                return Err(CbaError::dimension_mismatch(
                    format!("results[{}].x", index),
                    envelope.x.len(),
                    result.x.len(),
                ));
            }
            envelope.combinations.push(result.combination.clone());
            for i in 0..envelope.x.len() {
                envelope.shear_max[i] = envelope.shear_max[i].max(result.shear[i]);
                envelope.shear_min[i] = envelope.shear_min[i].min(result.shear[i]);
                envelope.moment_max[i] = envelope.moment_max[i].max(result.moment[i]);
                envelope.moment_min[i] = envelope.moment_min[i].min(result.moment[i]);
                envelope.deflection_max[i] = envelope.deflection_max[i].max(result.deflection[i]);
                envelope.deflection_min[i] = envelope.deflection_min[i].min(result.deflection[i]);
            }
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, x: Vec<f64>, scale: f64) -> AnalysisResult {
        let shear: Vec<f64> = x.iter().map(|xi| scale * (1.0 - xi)).collect();
        let moment: Vec<f64> = x.iter().map(|xi| scale * xi * (1.0 - xi)).collect();
        let deflection: Vec<f64> = moment.iter().map(|m| -m / 10.0).collect();
        AnalysisResult::new(
            name.to_string(),
            Curves {
                x,
                shear,
                moment,
                deflection,
                rotation: Vec::new(),
            },
            vec![Reaction {
                node: 0,
                x: 0.0,
                dof: Dof::Vertical,
                value: scale,
                source: ReactionSource::Support,
            }],
            vec![scale, 0.0, 0.0, 0.0],
            Vec::new(),
            scale,
            &[250.0],
        )
    }

    #[test]
    fn test_dof_indices() {
        assert_eq!(Dof::of_index(4), Dof::Vertical);
        assert_eq!(Dof::of_index(5), Dof::Rotation);
        assert_eq!(Dof::Rotation.index(2), 5);
    }

    #[test]
    fn test_extremes() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let v = [1.0, -4.0, 3.0, -4.0];
        assert_eq!(Extreme::max_of(&x, &v), Extreme { value: 3.0, x: 2.0 });
        assert_eq!(Extreme::min_of(&x, &v), Extreme { value: -4.0, x: 1.0 });
        assert_eq!(Extreme::abs_max_of(&x, &v), Extreme { value: -4.0, x: 1.0 });
        assert_eq!(Extreme::max_of(&[], &[]), Extreme::default());
    }

    #[test]
    fn test_summary_and_lookup() {
        let r = result("A", vec![0.0, 0.5, 0.5, 1.0], 2.0);
        assert_eq!(r.summary().max_moment, Extreme { value: 0.5, x: 0.5 });
        assert_eq!(r.summary().equilibrium_error(), 0.0);
        assert_eq!(r.indices_at(0.5), vec![1, 2]);
        assert_eq!(r.moment_at(0.5), Some(0.5));
        assert_eq!(r.moment_at(0.25), None);
        assert_eq!(r.reaction_at(0, Dof::Vertical), Some(2.0));
        assert_eq!(r.reaction_at(0, Dof::Rotation), None);
        assert!(r.rotation().is_empty());
    }

    #[test]
    fn test_deflection_checks_per_span() {
        // Span 1 is 4 m deflecting 12 mm, span 2 is 4 m deflecting 40 mm
        let x = [0.0, 2.0, 4.0, 4.0, 6.0, 8.0];
        let deflection = [0.0, -0.012, 0.0, 0.0, -0.04, 0.0];
        let checks =
            SpanDeflectionCheck::for_spans(&x, &deflection, &[0.0, 4.0, 8.0], &[250.0, 400.0]);

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].span, 1);
        assert_eq!(checks[0].max_deflection, Extreme { value: -0.012, x: 2.0 });
        assert!((checks[0].span_ratio.unwrap() - 4.0 / 0.012).abs() < 1e-9);
        assert!((checks[0].limits[0].allowable - 0.016).abs() < 1e-12);
        assert_eq!(checks[0].passes_limit(250.0), Some(true));
        assert_eq!(checks[0].passes_limit(400.0), Some(false));
        assert_eq!(checks[0].passes_limit(300.0), None);
        assert!(!checks[0].passes());

        assert_eq!(checks[1].max_deflection.x, 6.0);
        assert!((checks[1].span_ratio.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(checks[1].passes_limit(250.0), Some(false));

        let summary = ResultSummary::default().with_deflection_checks(checks);
        assert!(!summary.deflection_ok());
    }

    #[test]
    fn test_undeflected_span_has_no_ratio() {
        let checks = SpanDeflectionCheck::for_spans(&[0.0, 5.0], &[0.0, 0.0], &[0.0, 5.0], &[250.0]);
        assert_eq!(checks[0].span_ratio, None);
        assert!(checks[0].passes());
        assert!(ResultSummary::default().deflection_ok());
    }

    #[test]
    fn test_envelope() {
        let x = vec![0.0, 0.5, 1.0];
        let results = vec![result("A", x.clone(), 1.0), result("B", x, -2.0)];
        let envelope = Envelope::from_results(&results).unwrap();

        assert_eq!(envelope.combinations, vec!["A", "B"]);
        assert_eq!(envelope.moment_max, vec![0.0, 0.25, 0.0]);
        assert_eq!(envelope.moment_min, vec![0.0, -0.5, 0.0]);
        assert_eq!(envelope.shear_max[0], 1.0);
        assert_eq!(envelope.shear_min[0], -2.0);
    }

    #[test]
    fn test_envelope_position_mismatch() {
        let results = vec![
            result("A", vec![0.0, 1.0], 1.0),
            result("B", vec![0.0, 0.5, 1.0], 1.0),
        ];
        let err = Envelope::from_results(&results).unwrap_err();
        assert_eq!(err, CbaError::dimension_mismatch("results[1].x", 2, 3));

        assert!(Envelope::from_results(&[]).is_err());
    }

    #[test]
    fn test_rotation_omitted_from_json_when_empty() {
        let r = result("A", vec![0.0, 1.0], 1.0);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("rotation").is_none());
        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
