//! # Load Encoder
//!
//! Turns the typed load list into per-span [`SpanLoading`]: the fixed-end
//! force vector `[F1, M1, F2, M2]` used by the assembler, plus the exact
//! loads as [`LoadTerm`]s in span-local coordinates so the reconstructor can
//! integrate them without discretisation error.
//!
//! Each term knows its own contribution to shear, moment and the first and
//! second integrals of moment, measured from the left end of its span and
//! written with Macaulay brackets:
//!
//! | Load            | `V_p(x)`        | `M_p(x)`          |
//! |-----------------|-----------------|-------------------|
//! | Point `P` at a  | `-P<x-a>⁰`      | `-P<x-a>`         |
//! | Couple `C` at a | `0`             | `-C<x-a>⁰`        |
//! | Trapezoid s..e  | `-∫w`           | `-∫∫w`            |
//!
//! Combination factors are applied here, so everything downstream sees
//! factored magnitudes only.

use serde::{Deserialize, Serialize};

use super::combinations::LoadCombination;
use super::discrete::{BeamLoad, LoadKind};
use crate::equations::{
    fem_applied_moment, fem_from_compatibility, fem_point_load, fem_uniform_full, macaulay, step,
    Side,
};
use crate::errors::CbaResult;

// =============================================================================
// LOAD TERMS
// =============================================================================

/// A single load in span-local coordinates (positions in length units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LoadTerm {
    /// Downward force `force` at `at`
    Point { force: f64, at: f64 },

    /// Counterclockwise couple `moment` at `at`
    Couple { moment: f64, at: f64 },

    /// Linearly varying downward intensity from `start` to `end`
    Distributed {
        start_intensity: f64,
        end_intensity: f64,
        start: f64,
        end: f64,
    },
}

impl LoadTerm {
    /// Shear contribution `V_p(x)` (one-sided at a point load)
    pub fn shear(&self, x: f64, side: Side) -> f64 {
        match *self {
            LoadTerm::Point { force, at } => -force * step(x, at, side),
            LoadTerm::Couple { .. } => 0.0,
            LoadTerm::Distributed { .. } => -self.distributed_integral(x, 1),
        }
    }

    /// Moment contribution `M_p(x)` (one-sided at a couple)
    pub fn moment(&self, x: f64, side: Side) -> f64 {
        match *self {
            LoadTerm::Point { force, at } => -force * macaulay(x, at, 1),
            LoadTerm::Couple { moment, at } => -moment * step(x, at, side),
            LoadTerm::Distributed { .. } => -self.distributed_integral(x, 2),
        }
    }

    /// `S_p(x) = ∫₀ˣ M_p`
    pub fn slope_integral(&self, x: f64) -> f64 {
        match *self {
            LoadTerm::Point { force, at } => -force * macaulay(x, at, 2) / 2.0,
            LoadTerm::Couple { moment, at } => -moment * macaulay(x, at, 1),
            LoadTerm::Distributed { .. } => -self.distributed_integral(x, 3),
        }
    }

    /// `D_p(x) = ∫₀ˣ S_p`
    pub fn deflection_integral(&self, x: f64) -> f64 {
        match *self {
            LoadTerm::Point { force, at } => -force * macaulay(x, at, 3) / 6.0,
            LoadTerm::Couple { moment, at } => -moment * macaulay(x, at, 2) / 2.0,
            LoadTerm::Distributed { .. } => -self.distributed_integral(x, 4),
        }
    }

    /// Resultant downward force
    pub fn total_force(&self) -> f64 {
        match *self {
            LoadTerm::Point { force, .. } => force,
            LoadTerm::Couple { .. } => 0.0,
            LoadTerm::Distributed {
                start_intensity,
                end_intensity,
                start,
                end,
            } => (start_intensity + end_intensity) / 2.0 * (end - start),
        }
    }

    /// Position where shear or moment jumps, if any
    pub fn jump_position(&self) -> Option<f64> {
        match *self {
            LoadTerm::Point { at, .. } | LoadTerm::Couple { at, .. } => Some(at),
            LoadTerm::Distributed { .. } => None,
        }
    }

    /// Positions the sampler must hit exactly (loads and load edges)
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            LoadTerm::Point { at, .. } | LoadTerm::Couple { at, .. } => vec![at],
            LoadTerm::Distributed { start, end, .. } => vec![start, end],
        }
    }

    /// Fixed-end forces `[F1, M1, F2, M2]` on a clamped span of length `l`
    pub fn fixed_end_forces(&self, l: f64) -> [f64; 4] {
        match *self {
            LoadTerm::Point { force, at } => fem_point_load(force, at, l),
            LoadTerm::Couple { moment, at } => fem_applied_moment(moment, at, l),
            LoadTerm::Distributed {
                start_intensity,
                end_intensity,
                start,
                end,
            } if start == 0.0 && end == l && start_intensity == end_intensity => {
                fem_uniform_full(start_intensity, l)
            }
            LoadTerm::Distributed { .. } => fem_from_compatibility(
                l,
                self.slope_integral(l),
                self.deflection_integral(l),
                self.total_force(),
                self.moment(l, Side::Right),
            ),
        }
    }

    /// n-th repeated integral of a trapezoidal intensity from 0 to `x`
    ///
    /// Written as the superposition of a ramp starting at `start` and an
    /// equal and opposite ramp starting at `end`:
    /// `w1<x-s>ⁿ/n! + k<x-s>ⁿ⁺¹/(n+1)! - w2<x-e>ⁿ/n! - k<x-e>ⁿ⁺¹/(n+1)!`
    fn distributed_integral(&self, x: f64, n: i32) -> f64 {
        let LoadTerm::Distributed {
            start_intensity: w1,
            end_intensity: w2,
            start: s,
            end: e,
        } = *self
        else {
            return 0.0;
        };
        if e <= s {
            return 0.0;
        }
        let k = (w2 - w1) / (e - s);
        let n_fact = factorial(n);
        let n1_fact = n_fact * f64::from(n + 1);
        w1 * macaulay(x, s, n) / n_fact + k * macaulay(x, s, n + 1) / n1_fact
            - w2 * macaulay(x, e, n) / n_fact
            - k * macaulay(x, e, n + 1) / n1_fact
    }
}

fn factorial(n: i32) -> f64 {
    (1..=n).map(f64::from).product()
}

// =============================================================================
// SPAN LOADING
// =============================================================================

/// Fixed-end forces `[F1, M1, F2, M2]` of a span
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixedEndForces(pub [f64; 4]);

impl FixedEndForces {
    /// Left-end vertical force
    pub fn f1(&self) -> f64 {
        self.0[0]
    }

    /// Left-end moment
    pub fn m1(&self) -> f64 {
        self.0[1]
    }

    /// Right-end vertical force
    pub fn f2(&self) -> f64 {
        self.0[2]
    }

    /// Right-end moment
    pub fn m2(&self) -> f64 {
        self.0[3]
    }

    fn accumulate(&mut self, other: [f64; 4]) {
        for (acc, value) in self.0.iter_mut().zip(other) {
            *acc += value;
        }
    }
}

/// Encoded loading of one span
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpanLoading {
    /// Exact loads, factored, in span-local coordinates
    pub terms: Vec<LoadTerm>,

    /// Sum of the terms' fixed-end forces
    pub fixed_end: FixedEndForces,
}

impl SpanLoading {
    /// Sum of `V_p` over all terms
    pub fn shear(&self, x: f64, side: Side) -> f64 {
        self.terms.iter().map(|t| t.shear(x, side)).sum()
    }

    /// Sum of `M_p` over all terms
    pub fn moment(&self, x: f64, side: Side) -> f64 {
        self.terms.iter().map(|t| t.moment(x, side)).sum()
    }

    /// Sum of `S_p` over all terms
    pub fn slope_integral(&self, x: f64) -> f64 {
        self.terms.iter().map(|t| t.slope_integral(x)).sum()
    }

    /// Sum of `D_p` over all terms
    pub fn deflection_integral(&self, x: f64) -> f64 {
        self.terms.iter().map(|t| t.deflection_integral(x)).sum()
    }

    /// Total downward load on the span
    pub fn total_force(&self) -> f64 {
        self.terms.iter().map(LoadTerm::total_force).sum()
    }
}

/// Convert one load entry into its span-local term
fn to_term(load: &BeamLoad, l: f64, factor: f64) -> LoadTerm {
    match load.kind {
        LoadKind::Uniform { magnitude } => LoadTerm::Distributed {
            start_intensity: factor * magnitude,
            end_intensity: factor * magnitude,
            start: 0.0,
            end: l,
        },
        LoadKind::PartialUniform { magnitude, start, end } => LoadTerm::Distributed {
            start_intensity: factor * magnitude,
            end_intensity: factor * magnitude,
            start: start * l,
            end: end * l,
        },
        LoadKind::Trapezoidal {
            start_magnitude,
            end_magnitude,
            start,
            end,
        } => LoadTerm::Distributed {
            start_intensity: factor * start_magnitude,
            end_intensity: factor * end_magnitude,
            start: start * l,
            end: end * l,
        },
        LoadKind::Point { magnitude, position } => LoadTerm::Point {
            force: factor * magnitude,
            at: position * l,
        },
        LoadKind::Moment { magnitude, position } => LoadTerm::Couple {
            moment: factor * magnitude,
            at: position * l,
        },
    }
}

/// Encode a load list for spans of the given lengths
///
/// Every load is validated first; the first bad entry fails the whole call
/// with [`CbaError::InvalidLoad`](crate::errors::CbaError::InvalidLoad).
/// Loads whose category has a zero factor in `combination` are kept with
/// zero magnitude, so every combination of a beam samples the same positions.
///
/// # Example
/// ```
/// use cba_core::loads::{encode_loads, BeamLoad, LoadCombination};
///
/// let loads = vec![BeamLoad::uniform(1, 10.0), BeamLoad::point(2, 20.0, 0.5)];
/// let encoded = encode_loads(&[6.0, 4.0], &loads, &LoadCombination::unfactored()).unwrap();
///
/// assert_eq!(encoded.len(), 2);
/// assert!((encoded[0].fixed_end.m1() - 30.0).abs() < 1e-9);   // wL²/12
/// assert!((encoded[1].fixed_end.m1() - 10.0).abs() < 1e-9);   // PL/8
/// ```
pub fn encode_loads(
    lengths: &[f64],
    loads: &[BeamLoad],
    combination: &LoadCombination,
) -> CbaResult<Vec<SpanLoading>> {
    for (index, load) in loads.iter().enumerate() {
        load.validate(index, lengths.len())?;
    }
    combination.validate()?;

    let mut encoded = vec![SpanLoading::default(); lengths.len()];
    for load in loads {
        let factor = combination.get_factor(load.category);
        let span = load.span - 1;
        let l = lengths[span];
        let term = to_term(load, l, factor);
        let loading = &mut encoded[span];
        if l > 0.0 {
            loading.fixed_end.accumulate(term.fixed_end_forces(l));
        }
        loading.terms.push(term);
    }

    log::debug!(
        "encoded {} loads onto {} spans ({})",
        loads.len(),
        lengths.len(),
        combination.name
    );
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CbaError;
    use crate::loads::LoadCategory;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON * b.abs().max(1.0)
    }

    fn assert_fef(actual: [f64; 4], expected: [f64; 4]) {
        for i in 0..4 {
            assert!(
                approx_eq(actual[i], expected[i]),
                "component {}: {} vs {}",
                i,
                actual[i],
                expected[i]
            );
        }
    }

    #[test]
    fn test_uniform_uses_closed_form() {
        let encoded =
            encode_loads(&[6.0], &[BeamLoad::uniform(1, 10.0)], &LoadCombination::unfactored())
                .unwrap();
        assert_fef(encoded[0].fixed_end.0, [30.0, 30.0, 30.0, -30.0]);
    }

    #[test]
    fn test_integrals_match_uniform_closed_form() {
        let l = 5.0;
        let term = LoadTerm::Distributed {
            start_intensity: 4.0,
            end_intensity: 4.0,
            start: 0.0,
            end: l,
        };
        let generic = fem_from_compatibility(
            l,
            term.slope_integral(l),
            term.deflection_integral(l),
            term.total_force(),
            term.moment(l, Side::Right),
        );
        assert_fef(generic, fem_uniform_full(4.0, l));
    }

    #[test]
    fn test_partial_uniform_fixed_end_forces() {
        // w over the left half of a fixed-fixed span:
        // M1 = 11wL²/192, M2 = -5wL²/192, F1 = 13wL/32, F2 = 3wL/32
        let (w, l) = (12.0, 8.0);
        let term = LoadTerm::Distributed {
            start_intensity: w,
            end_intensity: w,
            start: 0.0,
            end: l / 2.0,
        };
        let fef = term.fixed_end_forces(l);
        assert_fef(
            fef,
            [
                13.0 * w * l / 32.0,
                11.0 * w * l * l / 192.0,
                3.0 * w * l / 32.0,
                -5.0 * w * l * l / 192.0,
            ],
        );
    }

    #[test]
    fn test_triangular_fixed_end_forces() {
        // Triangle rising to w at the right end:
        // M1 = wL²/30, M2 = -wL²/20, F1 = 3wL/20, F2 = 7wL/20
        let (w, l) = (9.0, 5.0);
        let term = LoadTerm::Distributed {
            start_intensity: 0.0,
            end_intensity: w,
            start: 0.0,
            end: l,
        };
        assert_fef(
            term.fixed_end_forces(l),
            [
                3.0 * w * l / 20.0,
                w * l * l / 30.0,
                7.0 * w * l / 20.0,
                -w * l * l / 20.0,
            ],
        );
    }

    #[test]
    fn test_distributed_shear_and_moment() {
        let term = LoadTerm::Distributed {
            start_intensity: 2.0,
            end_intensity: 6.0,
            start: 1.0,
            end: 3.0,
        };
        // Before the load
        assert_eq!(term.shear(0.5, Side::Right), 0.0);
        // After the load: full resultant (2+6)/2·2 = 8
        assert!(approx_eq(term.shear(4.0, Side::Left), -8.0));
        assert!(approx_eq(term.total_force(), 8.0));
        // Centroid at s + L'(w1 + 2w2)/(3(w1 + w2)) = 1 + 2·14/24
        let centroid = 1.0 + 2.0 * 14.0 / 24.0;
        assert!(approx_eq(term.moment(4.0, Side::Left), -8.0 * (4.0 - centroid)));
    }

    #[test]
    fn test_zero_length_distributed_contributes_nothing() {
        let term = LoadTerm::Distributed {
            start_intensity: 5.0,
            end_intensity: 5.0,
            start: 2.0,
            end: 2.0,
        };
        assert_eq!(term.shear(3.0, Side::Right), 0.0);
        assert_eq!(term.deflection_integral(3.0), 0.0);
        assert_eq!(term.total_force(), 0.0);
        assert_fef(term.fixed_end_forces(4.0), [0.0; 4]);
    }

    #[test]
    fn test_point_and_couple_jumps() {
        let point = LoadTerm::Point { force: 10.0, at: 2.0 };
        assert_eq!(point.shear(2.0, Side::Left), 0.0);
        assert_eq!(point.shear(2.0, Side::Right), -10.0);
        assert_eq!(point.jump_position(), Some(2.0));

        let couple = LoadTerm::Couple { moment: 5.0, at: 1.0 };
        assert_eq!(couple.moment(1.0, Side::Left), 0.0);
        assert_eq!(couple.moment(1.0, Side::Right), -5.0);
        assert_eq!(couple.shear(1.0, Side::Right), 0.0);
    }

    #[test]
    fn test_combination_factors() {
        let loads = vec![
            BeamLoad::uniform(1, 10.0),
            BeamLoad::uniform(1, 5.0).with_category(LoadCategory::Live),
        ];
        let encoded = encode_loads(&[4.0], &loads, &LoadCombination::sdm()).unwrap();
        assert_eq!(encoded[0].terms.len(), 2);
        assert!(approx_eq(encoded[0].total_force(), (1.4 * 10.0 + 1.7 * 5.0) * 4.0));

        let dead_only = LoadCombination::new("D", "D").with_factor(LoadCategory::Dead, 1.0);
        let encoded = encode_loads(&[4.0], &loads, &dead_only).unwrap();
        // Unfactored categories stay as zero-magnitude terms
        assert_eq!(encoded[0].terms.len(), 2);
        assert!(approx_eq(encoded[0].total_force(), 40.0));
    }

    #[test]
    fn test_invalid_load_reports_index() {
        let loads = vec![BeamLoad::uniform(1, 10.0), BeamLoad::point(3, 1.0, 0.5)];
        let err = encode_loads(&[4.0, 4.0], &loads, &LoadCombination::unfactored()).unwrap_err();
        assert!(matches!(err, CbaError::InvalidLoad { index: 1, .. }));
    }

    #[test]
    fn test_span_loading_sums_terms() {
        let loads = vec![BeamLoad::point(1, 6.0, 0.5), BeamLoad::moment(1, 3.0, 0.25)];
        let encoded = encode_loads(&[4.0], &loads, &LoadCombination::unfactored()).unwrap();
        let loading = &encoded[0];
        assert!(approx_eq(loading.total_force(), 6.0));
        assert!(approx_eq(loading.moment(3.0, Side::Right), -6.0 * 1.0 - 3.0));
        assert_fef(
            loading.fixed_end.0,
            {
                let p = fem_point_load(6.0, 2.0, 4.0);
                let c = fem_applied_moment(3.0, 1.0, 4.0);
                [p[0] + c[0], p[1] + c[1], p[2] + c[2], p[3] + c[3]]
            },
        );
    }
}
