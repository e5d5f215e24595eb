//! # Beam Element Formulas
//!
//! Closed-form Euler-Bernoulli beam equations used by the load encoder,
//! the assembler and the reconstructor.
//!
//! ## Notation
//!
//! - `L` = Span length
//! - `x` = Position along the span from its left end
//! - `a` = Load position from the left end, `b = L - a`
//! - `P` = Point load (positive downward)
//! - `w` = Distributed load intensity (positive downward)
//! - `C` = Applied couple (positive counterclockwise)
//! - `EI` = Flexural rigidity
//!
//! ## End Force Vector
//!
//! Element end quantities are ordered `[F1, M1, F2, M2]`: vertical force and
//! moment at the left end, then at the right end. Forces act on the element,
//! upward positive; moments are counterclockwise positive. Fixed-end forces
//! are the forces the clamps exert on a fully restrained span.
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1
//! - Structural Analysis by R.C. Hibbeler, Chapter 15 (beam stiffness)

use serde::{Deserialize, Serialize};

/// Which one-sided limit to take at a discontinuity
///
/// Shear jumps at point loads and moment jumps at applied couples. A sample
/// exactly at the load position reports the `Left` limit (load not yet
/// applied) or the `Right` limit (load applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

// =============================================================================
// SINGULARITY FUNCTIONS
// =============================================================================

/// Macaulay bracket `<x - a>ⁿ` for `n ≥ 1`
///
/// Continuous in `x`, so the side of the limit does not matter.
#[inline]
pub fn macaulay(x: f64, a: f64, n: i32) -> f64 {
    if x > a {
        (x - a).powi(n)
    } else {
        0.0
    }
}

/// Heaviside step `<x - a>⁰`, taking the requested one-sided limit at `x = a`
#[inline]
pub fn step(x: f64, a: f64, side: Side) -> f64 {
    let on = match side {
        Side::Left => x > a,
        Side::Right => x >= a,
    };
    if on {
        1.0
    } else {
        0.0
    }
}

// =============================================================================
// ELEMENT STIFFNESS
// =============================================================================

/// Euler-Bernoulli beam element stiffness matrix
///
/// DOF order `[v1, θ1, v2, θ2]`:
///
/// ```text
///          ┌ 12    6L   -12    6L  ┐
///  EI/L³ · │ 6L    4L²  -6L    2L² │
///          │-12   -6L    12   -6L  │
///          └ 6L    2L²  -6L    4L² ┘
/// ```
pub fn element_stiffness(ei: f64, l: f64) -> [[f64; 4]; 4] {
    let l2 = l * l;
    let k = ei / (l2 * l);
    [
        [12.0 * k, 6.0 * l * k, -12.0 * k, 6.0 * l * k],
        [6.0 * l * k, 4.0 * l2 * k, -6.0 * l * k, 2.0 * l2 * k],
        [-12.0 * k, -6.0 * l * k, 12.0 * k, -6.0 * l * k],
        [6.0 * l * k, 2.0 * l2 * k, -6.0 * l * k, 4.0 * l2 * k],
    ]
}

// =============================================================================
// FIXED-END FORCES
// =============================================================================

/// Fixed-end forces for a uniform load `w` over the full span
///
/// # Formulas
/// - F1 = F2 = wL/2
/// - M1 = +wL²/12, M2 = -wL²/12
#[inline]
pub fn fem_uniform_full(w: f64, l: f64) -> [f64; 4] {
    let f = w * l / 2.0;
    let m = w * l * l / 12.0;
    [f, m, f, -m]
}

/// Fixed-end forces for a point load `P` at distance `a` from the left end
///
/// ```text
///          P
///          ↓
///  ▐───────┬──────────▌
///  ▐   a   │    b     ▌
/// ```
///
/// # Formulas
/// - F1 = P·b²(3a + b)/L³,  M1 = +P·a·b²/L²
/// - F2 = P·a²(a + 3b)/L³,  M2 = -P·a²·b/L²
#[inline]
pub fn fem_point_load(p: f64, a: f64, l: f64) -> [f64; 4] {
    let b = l - a;
    let l2 = l * l;
    let l3 = l2 * l;
    [
        p * b * b * (3.0 * a + b) / l3,
        p * a * b * b / l2,
        p * a * a * (a + 3.0 * b) / l3,
        -p * a * a * b / l2,
    ]
}

/// Fixed-end forces for a counterclockwise couple `C` at distance `a`
///
/// # Formulas
/// - F1 = 6C·a·b/L³,        M1 = C·b(2a - b)/L²
/// - F2 = -6C·a·b/L³,       M2 = C·a(2b - a)/L²
#[inline]
pub fn fem_applied_moment(c: f64, a: f64, l: f64) -> [f64; 4] {
    let b = l - a;
    let l2 = l * l;
    let f = 6.0 * c * a * b / (l2 * l);
    [f, c * b * (2.0 * a - b) / l2, -f, c * a * (2.0 * b - a) / l2]
}

/// Fixed-end forces for an arbitrary load from clamped-end compatibility
///
/// Treats the span as clamped at the left end only and releases the right
/// end. With the left-end reactions `F1`, `M1` unknown, the right end must
/// come back to zero slope and zero deflection:
///
/// ```text
/// F1·L²/2 - M1·L   + S(L) = 0
/// F1·L³/6 - M1·L²/2 + D(L) = 0
/// ```
///
/// where `S(L) = ∫₀ᴸ M_p dx` and `D(L) = ∫₀ᴸ∫ M_p dx²` are the first and
/// second integrals of the load's own moment `M_p` (moment at `x` from the
/// loads left of `x`, sagging positive). The right-end values follow from
/// statics.
///
/// # Arguments
/// * `l` - Span length
/// * `slope_integral` - `S(L)`
/// * `deflection_integral` - `D(L)`
/// * `total_force` - Resultant of the load (positive downward)
/// * `end_moment` - `M_p(L)`, right limit
pub fn fem_from_compatibility(
    l: f64,
    slope_integral: f64,
    deflection_integral: f64,
    total_force: f64,
    end_moment: f64,
) -> [f64; 4] {
    let l2 = l * l;
    let f1 = (12.0 * deflection_integral - 6.0 * slope_integral * l) / (l2 * l);
    let m1 = (f1 * l2 / 2.0 + slope_integral) / l;
    let f2 = total_force - f1;
    let m2 = -m1 + f1 * l + end_moment;
    [f1, m1, f2, m2]
}

// =============================================================================
// REFERENCE CASES
// Used to check the stiffness solution against textbook results
// =============================================================================

/// Maximum moment of a simply-supported span under full uniform load
///
/// # Formula
/// M_max = wL²/8 at midspan
#[inline]
pub fn uniform_load_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Midspan deflection of a simply-supported span under full uniform load
///
/// # Formula
/// δ_max = 5wL⁴ / (384EI)  (downward)
#[inline]
pub fn uniform_load_max_deflection(w: f64, l: f64, ei: f64) -> f64 {
    5.0 * w * l.powi(4) / (384.0 * ei)
}

/// Tip deflection of a cantilever with a point load at the free end
///
/// # Formula
/// δ_tip = PL³ / (3EI)  (downward)
#[inline]
pub fn cantilever_point_tip_deflection(p: f64, l: f64, ei: f64) -> f64 {
    p * l.powi(3) / (3.0 * ei)
}

/// Interior support moment of a two-span continuous beam, equal spans, full UDL
///
/// # Formula
/// M_B = -wL²/8  (hogging)
#[inline]
pub fn two_span_uniform_support_moment(w: f64, l: f64) -> f64 {
    -w * l * l / 8.0
}

// =============================================================================
// UNIT TESTS
// =============================================================================
