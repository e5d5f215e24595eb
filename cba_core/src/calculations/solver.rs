//! Linear system solver
//!
//! Solves `K_ff · u_f = F_f` for the free DOFs with a dense Cholesky
//! factorization, then recovers support reactions from the full system.
//!
//! The free block is Jacobi-scaled first (`D^-1/2 · K_ff · D^-1/2`, unit
//! diagonal), which makes the pivot check independent of units and of the
//! span/EI magnitudes. A squared pivot below the tolerance means a
//! rigid-body mode or a mechanism.

use nalgebra::{Cholesky, DMatrix, DVector};

use super::assembly::AssembledSystem;
use crate::errors::{CbaError, CbaResult};

/// Squared pivot below which the system is reported as poorly conditioned
const WEAK_PIVOT: f64 = 1e-6;

/// Displacements and reactions of the full DOF set
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSolution {
    /// Displacement of every DOF (zero at restrained DOFs)
    pub displacements: DVector<f64>,

    /// Reaction at every DOF (zero at free DOFs without a spring)
    pub reactions: DVector<f64>,
}

/// Solve the assembled system
///
/// # Errors
/// * `SingularSystem` - the free block is not positive definite within tolerance
/// * `NonFiniteResult` - NaN or infinity in displacements or reactions
pub fn solve(system: &AssembledSystem, pivot_tolerance: f64) -> CbaResult<SystemSolution> {
    let n = system.dof_count();
    let free = &system.free;
    let mut displacements = DVector::<f64>::zeros(n);

    if free.is_empty() {
        log::debug!("all {} DOFs restrained, skipping factorization", n);
    } else {
        let u_free = solve_free_block(system, pivot_tolerance)?;
        for (i, &dof) in free.iter().enumerate() {
            displacements[dof] = u_free[i];
        }
    }

    if let Some(dof) = displacements.iter().position(|u| !u.is_finite()) {
        return Err(CbaError::non_finite(format!("displacement of DOF {}", dof)));
    }

    let internal = &system.stiffness * &displacements + &system.fixed_end;
    let mut reactions = DVector::<f64>::zeros(n);
    for &dof in &system.restrained {
        reactions[dof] = internal[dof];
    }
    for &(dof, k) in &system.springs {
        reactions[dof] = -k * displacements[dof];
    }

    if let Some(dof) = reactions.iter().position(|r| !r.is_finite()) {
        return Err(CbaError::non_finite(format!("reaction at DOF {}", dof)));
    }

    log::info!(
        "solved {} free DOFs, total vertical reaction {:.6}",
        free.len(),
        reactions.iter().step_by(2).sum::<f64>()
    );

    Ok(SystemSolution {
        displacements,
        reactions,
    })
}

fn solve_free_block(system: &AssembledSystem, pivot_tolerance: f64) -> CbaResult<DVector<f64>> {
    let free = &system.free;
    let m = free.len();

    let mut scale = DVector::<f64>::zeros(m);
    for (i, &dof) in free.iter().enumerate() {
        let diagonal = system.stiffness[(dof, dof)];
        if !(diagonal > 0.0) {
            return Err(CbaError::singular(format!(
                "DOF {} has no stiffness (diagonal {})",
                dof, diagonal
            )));
        }
        scale[i] = 1.0 / diagonal.sqrt();
    }

    let scaled = DMatrix::<f64>::from_fn(m, m, |i, j| {
        scale[i] * system.stiffness[(free[i], free[j])] * scale[j]
    });
    let rhs = DVector::<f64>::from_fn(m, |i, _| scale[i] * system.loads[free[i]]);

    let Some(chol) = Cholesky::new(scaled) else {
        return Err(CbaError::singular(
            "stiffness matrix is not positive definite; the beam is not sufficiently restrained",
        ));
    };

    let l = chol.l();
    let min_pivot = (0..m)
        .map(|i| l[(i, i)] * l[(i, i)])
        .fold(f64::INFINITY, f64::min);
    if !(min_pivot >= pivot_tolerance) {
        return Err(CbaError::singular(format!(
            "smallest scaled pivot {:.3e} is below tolerance {:.1e}; a rigid-body mode remains",
            min_pivot, pivot_tolerance
        )));
    }
    if min_pivot < WEAK_PIVOT {
        log::warn!(
            "stiffness matrix is poorly conditioned (smallest scaled pivot {:.3e})",
            min_pivot
        );
    }

    let y = chol.solve(&rhs);
    Ok(y.component_mul(&scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::assembly::assemble;
    use crate::calculations::continuous_beam::{Restraint, Span};
    use crate::loads::{encode_loads, BeamLoad, LoadCombination};
    use approx::assert_relative_eq;

    fn solve_beam(
        spans: &[Span],
        restraints: &[Restraint],
        loads: &[BeamLoad],
    ) -> CbaResult<SystemSolution> {
        let lengths: Vec<f64> = spans.iter().map(|s| s.length).collect();
        let loadings = encode_loads(&lengths, loads, &LoadCombination::unfactored())?;
        let system = assemble(spans, restraints, &loadings)?;
        solve(&system, 1e-10)
    }

    #[test]
    fn test_cantilever_tip_displacement() {
        // PL³/3EI downward, PL²/2EI clockwise
        let (p, l, ei) = (3.0, 2.0, 8.0);
        let solution = solve_beam(
            &[Span::new(l, ei)],
            &[Restraint::Fixed, Restraint::Fixed, Restraint::Free, Restraint::Free],
            &[BeamLoad::point(1, p, 1.0)],
        )
        .unwrap();

        assert_relative_eq!(solution.displacements[2], -p * l.powi(3) / (3.0 * ei), epsilon = 1e-12);
        assert_relative_eq!(solution.displacements[3], -p * l * l / (2.0 * ei), epsilon = 1e-12);
        // Wall reaction: P upward and PL counterclockwise
        assert_relative_eq!(solution.reactions[0], p, epsilon = 1e-12);
        assert_relative_eq!(solution.reactions[1], p * l, epsilon = 1e-12);
    }

    #[test]
    fn test_fully_fixed_skips_solve() {
        let solution = solve_beam(
            &[Span::new(6.0, 1.0)],
            &[Restraint::Fixed; 4],
            &[BeamLoad::uniform(1, 10.0)],
        )
        .unwrap();

        assert!(solution.displacements.iter().all(|u| *u == 0.0));
        assert_relative_eq!(solution.reactions[0], 30.0);
        assert_relative_eq!(solution.reactions[1], 30.0);
        assert_relative_eq!(solution.reactions[3], -30.0);
    }

    #[test]
    fn test_free_floating_is_singular() {
        let err = solve_beam(
            &[Span::new(5.0, 1.0)],
            &[Restraint::Free; 4],
            &[BeamLoad::uniform(1, 1.0)],
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "SINGULAR_SYSTEM");
    }

    #[test]
    fn test_single_pin_is_singular() {
        // Rotation about the pin is a mechanism
        let err = solve_beam(
            &[Span::new(5.0, 1.0), Span::new(5.0, 1.0)],
            &[
                Restraint::Free,
                Restraint::Free,
                Restraint::Fixed,
                Restraint::Free,
                Restraint::Free,
                Restraint::Free,
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CbaError::SingularSystem { .. }));
    }

    #[test]
    fn test_spring_reaction() {
        // Cantilever propped by a spring at the tip
        let (w, l, ei, k) = (2.0, 3.0, 50.0, 40.0);
        let solution = solve_beam(
            &[Span::new(l, ei)],
            &[Restraint::Fixed, Restraint::Fixed, Restraint::Spring(k), Restraint::Free],
            &[BeamLoad::uniform(1, w)],
        )
        .unwrap();

        let tip = solution.displacements[2];
        assert!(tip < 0.0);
        assert_relative_eq!(solution.reactions[2], -k * tip, epsilon = 1e-12);
        // Spring and wall together carry the load
        assert_relative_eq!(solution.reactions[0] + solution.reactions[2], w * l, epsilon = 1e-9);
    }
}
