//! # Internal-Force Reconstruction
//!
//! Recovers shear, moment, rotation and deflection along every span from
//! the solved nodal displacements.
//!
//! ## Method
//!
//! The left-end forces of a span follow from its end displacements,
//! `f = k_e · d_e + FEF`. Integrating from the left end with the exact load
//! terms (Macaulay brackets) then gives closed-form curves:
//!
//! ```text
//! V(x) = F1 + V_p(x)
//! M(x) = -M1 + F1·x + M_p(x)
//! θ(x) = θ1 + [-M1·x + F1·x²/2 + S_p(x)] / EI
//! v(x) = v1 + θ1·x + [-M1·x²/2 + F1·x³/6 + D_p(x)] / EI
//! ```
//!
//! No discretisation error is introduced; the sampling density only
//! controls how many points of the exact curves are reported.

use serde::{Deserialize, Serialize};

use super::assembly::span_dofs;
use super::continuous_beam::{Restraint, Span};
use super::options::{AnalysisOptions, Resolution};
use super::results::{AnalysisResult, Curves, Dof, NodeDisplacement, Reaction, ReactionSource};
use super::solver::SystemSolution;
use crate::equations::{element_stiffness, Side};
use crate::errors::{CbaError, CbaResult};
use crate::loads::SpanLoading;

// =============================================================================
// SOLVED SPAN
// =============================================================================

/// A span with its solved end state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedSpan {
    /// Position of the left end from the left end of the beam
    pub start: f64,
    pub length: f64,
    pub ei: f64,
    /// Factored loads on this span
    pub loading: SpanLoading,
    /// `[v1, θ1, v2, θ2]`
    pub end_displacements: [f64; 4],
    /// `[F1, M1, F2, M2]` acting on the span
    pub end_forces: [f64; 4],
}

impl SolvedSpan {
    fn new(start: f64, span: &Span, loading: SpanLoading, end_displacements: [f64; 4]) -> Self {
        let k = element_stiffness(span.ei, span.length);
        let mut end_forces = loading.fixed_end.0;
        for (i, force) in end_forces.iter_mut().enumerate() {
            *force += (0..4).map(|j| k[i][j] * end_displacements[j]).sum::<f64>();
        }
        Self {
            start,
            length: span.length,
            ei: span.ei,
            loading,
            end_displacements,
            end_forces,
        }
    }

    /// Shear at local position `x`
    pub fn shear(&self, x: f64, side: Side) -> f64 {
        self.end_forces[0] + self.loading.shear(x, side)
    }

    /// Moment at local position `x`
    pub fn moment(&self, x: f64, side: Side) -> f64 {
        let [f1, m1, _, _] = self.end_forces;
        -m1 + f1 * x + self.loading.moment(x, side)
    }

    /// Rotation at local position `x`
    pub fn rotation(&self, x: f64) -> f64 {
        let [f1, m1, _, _] = self.end_forces;
        let theta1 = self.end_displacements[1];
        theta1 + (-m1 * x + f1 * x * x / 2.0 + self.loading.slope_integral(x)) / self.ei
    }

    /// Deflection at local position `x`
    pub fn deflection(&self, x: f64) -> f64 {
        let [f1, m1, _, _] = self.end_forces;
        let [v1, theta1, _, _] = self.end_displacements;
        let x2 = x * x;
        v1 + theta1 * x
            + (-m1 * x2 / 2.0 + f1 * x2 * x / 6.0 + self.loading.deflection_integral(x)) / self.ei
    }

    /// Local sample positions with the side of the limit to take
    ///
    /// The span start is taken from the right and the span end from the
    /// left. A point load or couple strictly inside the span yields two
    /// samples at its position.
    ///
    /// # Errors
    /// * `InvalidInput` - the resolution asks for too many samples on this span
    pub fn sample_points(&self, resolution: &Resolution) -> CbaResult<Vec<(f64, Side)>> {
        let l = self.length;
        let tol = 1e-9 * l;

        let mut positions = resolution.grid(l)?;
        for term in &self.loading.terms {
            positions.extend(term.breakpoints());
        }
        positions.sort_by(f64::total_cmp);
        positions.dedup_by(|a, b| (*a - *b).abs() <= tol);

        let jumps: Vec<f64> = self
            .loading
            .terms
            .iter()
            .filter_map(|t| t.jump_position())
            .collect();

        let mut points = Vec::with_capacity(positions.len() + 2 * jumps.len());
        for x in positions {
            if x <= tol {
                points.push((0.0, Side::Right));
            } else if x >= l - tol {
                points.push((l, Side::Left));
            } else if let Some(&at) = jumps.iter().find(|at| (x - **at).abs() <= tol) {
                points.push((at, Side::Left));
                points.push((at, Side::Right));
            } else {
                points.push((x, Side::Right));
            }
        }
        Ok(points)
    }
}

// =============================================================================
// BEAM SOLUTION
// =============================================================================

/// A solved beam: nodal displacements, reactions and per-span end state
///
/// Sampling is a pure function of the solution, so the same solution can be
/// sampled at several resolutions with identical values at shared positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSolution {
    combination: String,
    spans: Vec<SolvedSpan>,
    restraints: Vec<Restraint>,
    node_positions: Vec<f64>,
    displacements: Vec<f64>,
    reaction_vector: Vec<f64>,
}

impl BeamSolution {
    pub(crate) fn new(
        combination: String,
        spans: &[Span],
        restraints: &[Restraint],
        loadings: Vec<SpanLoading>,
        solution: SystemSolution,
    ) -> CbaResult<Self> {
        let displacements: Vec<f64> = solution.displacements.iter().copied().collect();
        let reaction_vector: Vec<f64> = solution.reactions.iter().copied().collect();

        let mut node_positions = Vec::with_capacity(spans.len() + 1);
        let mut solved = Vec::with_capacity(spans.len());
        let mut start = 0.0;
        node_positions.push(start);
        for (index, (span, loading)) in spans.iter().zip(loadings).enumerate() {
            let dofs = span_dofs(index);
            let end_displacements = dofs.map(|dof| displacements[dof]);
            let solved_span = SolvedSpan::new(start, span, loading, end_displacements);
            if solved_span.end_forces.iter().any(|f| !f.is_finite()) {
                return Err(CbaError::non_finite(format!(
                    "end forces of span {}",
                    index + 1
                )));
            }
            solved.push(solved_span);
            start += span.length;
            node_positions.push(start);
        }

        Ok(Self {
            combination,
            spans: solved,
            restraints: restraints.to_vec(),
            node_positions,
            displacements,
            reaction_vector,
        })
    }

    /// Name of the load combination
    pub fn combination(&self) -> &str {
        &self.combination
    }

    /// Solved spans, left to right
    pub fn spans(&self) -> &[SolvedSpan] {
        &self.spans
    }

    /// Global displacement vector `[v0, θ0, v1, θ1, ...]`
    pub fn displacements(&self) -> &[f64] {
        &self.displacements
    }

    /// Reactions indexed by global DOF
    pub fn reaction_vector(&self) -> &[f64] {
        &self.reaction_vector
    }

    /// Node positions from the left end
    pub fn node_positions(&self) -> &[f64] {
        &self.node_positions
    }

    /// Total downward applied load
    pub fn total_load(&self) -> f64 {
        self.spans.iter().map(|s| s.loading.total_force()).sum()
    }

    /// Reactions at restrained and sprung DOFs, in DOF order
    pub fn reactions(&self) -> Vec<Reaction> {
        self.restraints
            .iter()
            .enumerate()
            .filter_map(|(dof, restraint)| {
                let source = match restraint {
                    Restraint::Fixed => ReactionSource::Support,
                    Restraint::Spring(_) => ReactionSource::Spring,
                    Restraint::Free => return None,
                };
                let node = dof / 2;
                Some(Reaction {
                    node,
                    x: self.node_positions[node],
                    dof: Dof::of_index(dof),
                    value: self.reaction_vector[dof],
                    source,
                })
            })
            .collect()
    }

    /// Displacement and rotation of every node
    pub fn nodal_displacements(&self) -> Vec<NodeDisplacement> {
        self.node_positions
            .iter()
            .enumerate()
            .map(|(node, &x)| NodeDisplacement {
                node,
                x,
                deflection: self.displacements[Dof::Vertical.index(node)],
                rotation: self.displacements[Dof::Rotation.index(node)],
            })
            .collect()
    }

    /// Sample the curves along the whole beam
    ///
    /// # Errors
    /// * `InvalidInput` - invalid options
    /// * `NonFiniteResult` - a sampled value is NaN or infinite
    pub fn sample(&self, options: &AnalysisOptions) -> CbaResult<AnalysisResult> {
        options.validate()?;

        let mut curves = Curves::default();
        for span in &self.spans {
            for (x, side) in span.sample_points(&options.resolution)? {
                curves.x.push(span.start + x);
                curves.shear.push(span.shear(x, side));
                curves.moment.push(span.moment(x, side));
                curves.deflection.push(span.deflection(x));
                if options.include_rotation {
                    curves.rotation.push(span.rotation(x));
                }
            }
        }

        for (name, values) in [
            ("shear", &curves.shear),
            ("moment", &curves.moment),
            ("deflection", &curves.deflection),
            ("rotation", &curves.rotation),
        ] {
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(CbaError::non_finite(format!(
                    "{} at x = {}",
                    name, curves.x[i]
                )));
            }
        }

        log::debug!(
            "sampled {} points over {} spans",
            curves.x.len(),
            self.spans.len()
        );

        Ok(AnalysisResult::new(
            self.combination.clone(),
            curves,
            self.reactions(),
            self.reaction_vector.clone(),
            self.nodal_displacements(),
            self.total_load(),
            &options.deflection_limits,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{encode_loads, BeamLoad, LoadCombination};
    use approx::assert_relative_eq;

    fn fixed_fixed_span(loads: &[BeamLoad]) -> SolvedSpan {
        let loading = encode_loads(&[4.0], loads, &LoadCombination::unfactored())
            .unwrap()
            .remove(0);
        SolvedSpan::new(0.0, &Span::new(4.0, 10.0), loading, [0.0; 4])
    }

    #[test]
    fn test_fixed_fixed_uniform_curves() {
        // w = 6, L = 4: end moments -wL²/12 = -8, midspan +wL²/24 = 4
        let span = fixed_fixed_span(&[BeamLoad::uniform(1, 6.0)]);
        assert_relative_eq!(span.moment(0.0, Side::Right), -8.0, epsilon = 1e-12);
        assert_relative_eq!(span.moment(2.0, Side::Right), 4.0, epsilon = 1e-12);
        assert_relative_eq!(span.moment(4.0, Side::Left), -8.0, epsilon = 1e-12);
        assert_relative_eq!(span.shear(0.0, Side::Right), 12.0, epsilon = 1e-12);
        assert_relative_eq!(span.shear(4.0, Side::Left), -12.0, epsilon = 1e-12);
        // Clamped ends: no rotation or deflection at either end
        assert_relative_eq!(span.rotation(4.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(span.deflection(4.0), 0.0, epsilon = 1e-12);
        // Midspan deflection wL⁴/384EI downward
        assert_relative_eq!(span.deflection(2.0), -6.0 * 256.0 / 3840.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_points_double_at_interior_point_load() {
        let span = fixed_fixed_span(&[BeamLoad::point(1, 5.0, 0.3)]);
        let points = span.sample_points(&Resolution::PointsPerSpan(5)).unwrap();

        assert_eq!(points.first(), Some(&(0.0, Side::Right)));
        assert_eq!(points.last(), Some(&(4.0, Side::Left)));
        let at_load: Vec<_> = points.iter().filter(|(x, _)| *x == 1.2).collect();
        assert_eq!(at_load, vec![&(1.2, Side::Left), &(1.2, Side::Right)]);
        assert!(points.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_load_at_span_end_is_single_sample() {
        let span = fixed_fixed_span(&[BeamLoad::point(1, 5.0, 1.0)]);
        let points = span.sample_points(&Resolution::PointsPerSpan(3)).unwrap();
        assert_eq!(
            points,
            vec![(0.0, Side::Right), (2.0, Side::Right), (4.0, Side::Left)]
        );
        // Carried straight into the support: no bending anywhere
        assert_relative_eq!(span.moment(2.0, Side::Right), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_load_edges_are_sampled() {
        let span = fixed_fixed_span(&[BeamLoad::partial_uniform(1, 2.0, 0.1, 0.35)]);
        let points = span.sample_points(&Resolution::PointsPerSpan(2)).unwrap();
        let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
        assert_eq!(xs.len(), 4);
        assert_relative_eq!(xs[1], 0.4, epsilon = 1e-12);
        assert_relative_eq!(xs[2], 1.4, epsilon = 1e-12);
    }
}
