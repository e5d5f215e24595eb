//! Global stiffness assembly
//!
//! Each span contributes its 4×4 element stiffness to the DOF block of its
//! two nodes; fixed-end forces enter the load vector with opposite sign.
//! Springs add their stiffness to the diagonal and remain free DOFs.

use nalgebra::{DMatrix, DVector};

use super::continuous_beam::{Restraint, Span};
use crate::equations::element_stiffness;
use crate::errors::{CbaError, CbaResult};
use crate::loads::SpanLoading;

/// DOFs per node: vertical displacement, rotation
pub const DOF_PER_NODE: usize = 2;

/// Global DOF indices `[v1, θ1, v2, θ2]` of a span
pub fn span_dofs(span: usize) -> [usize; 4] {
    let first = DOF_PER_NODE * span;
    [first, first + 1, first + 2, first + 3]
}

/// Assembled global system with its DOF partition
#[derive(Debug, Clone)]
pub struct AssembledSystem {
    /// Global stiffness, springs included
    pub stiffness: DMatrix<f64>,

    /// Consistent load vector `-Σ FEF`
    pub loads: DVector<f64>,

    /// Global sum of fixed-end forces, `Σ FEF`
    pub fixed_end: DVector<f64>,

    /// DOFs solved for (free and sprung)
    pub free: Vec<usize>,

    /// DOFs prescribed to zero
    pub restrained: Vec<usize>,

    /// Sprung DOFs and their stiffness
    pub springs: Vec<(usize, f64)>,
}

impl AssembledSystem {
    /// Total number of DOFs
    pub fn dof_count(&self) -> usize {
        self.loads.len()
    }
}

/// Assemble the global stiffness matrix and load vector
///
/// # Errors
/// * `DimensionMismatch` - restraint or loading count does not match the spans
/// * `SingularSystem` - a span has zero length
/// * `NonFiniteResult` - a span has zero EI (infinite flexibility)
pub fn assemble(
    spans: &[Span],
    restraints: &[Restraint],
    loadings: &[SpanLoading],
) -> CbaResult<AssembledSystem> {
    let num_dofs = DOF_PER_NODE * (spans.len() + 1);
    if restraints.len() != num_dofs {
        return Err(CbaError::dimension_mismatch(
            "restraints",
            num_dofs,
            restraints.len(),
        ));
    }
    if loadings.len() != spans.len() {
        return Err(CbaError::dimension_mismatch(
            "loadings",
            spans.len(),
            loadings.len(),
        ));
    }

    let mut stiffness = DMatrix::<f64>::zeros(num_dofs, num_dofs);
    let mut fixed_end = DVector::<f64>::zeros(num_dofs);

    for (index, (span, loading)) in spans.iter().zip(loadings).enumerate() {
        if span.length == 0.0 {
            return Err(CbaError::singular(format!(
                "span {} has zero length",
                index + 1
            )));
        }
        if span.ei == 0.0 {
            return Err(CbaError::non_finite(format!(
                "flexibility of span {} (EI = 0)",
                index + 1
            )));
        }

        let dof_map = span_dofs(index);
        let local = element_stiffness(span.ei, span.length);
        for i in 0..4 {
            for j in 0..4 {
                stiffness[(dof_map[i], dof_map[j])] += local[i][j];
            }
            fixed_end[dof_map[i]] += loading.fixed_end.0[i];
        }
    }

    let mut free = Vec::new();
    let mut restrained = Vec::new();
    let mut springs = Vec::new();
    for (dof, restraint) in restraints.iter().enumerate() {
        match restraint {
            Restraint::Fixed => restrained.push(dof),
            Restraint::Free => free.push(dof),
            Restraint::Spring(k) => {
                stiffness[(dof, dof)] += k;
                springs.push((dof, *k));
                free.push(dof);
            }
        }
    }

    log::debug!(
        "assembled {} DOFs: {} free ({} sprung), {} restrained",
        num_dofs,
        free.len(),
        springs.len(),
        restrained.len()
    );

    Ok(AssembledSystem {
        stiffness,
        loads: -&fixed_end,
        fixed_end,
        free,
        restrained,
        springs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{encode_loads, BeamLoad, LoadCombination};

    fn two_span_system() -> AssembledSystem {
        let spans = [Span::new(4.0, 100.0), Span::new(6.0, 200.0)];
        let restraints = [
            Restraint::Fixed,
            Restraint::Free,
            Restraint::Spring(50.0),
            Restraint::Free,
            Restraint::Fixed,
            Restraint::Fixed,
        ];
        let loadings = encode_loads(
            &[4.0, 6.0],
            &[BeamLoad::uniform(1, 3.0), BeamLoad::point(2, 10.0, 0.5)],
            &LoadCombination::unfactored(),
        )
        .unwrap();
        assemble(&spans, &restraints, &loadings).unwrap()
    }

    #[test]
    fn test_partition() {
        let system = two_span_system();
        assert_eq!(system.dof_count(), 6);
        assert_eq!(system.free, vec![1, 2, 3]);
        assert_eq!(system.restrained, vec![0, 4, 5]);
        assert_eq!(system.springs, vec![(2, 50.0)]);
    }

    #[test]
    fn test_overlap_and_spring_on_shared_node() {
        let system = two_span_system();
        // Node 1 vertical: 12EI/L³ from both spans plus the spring
        let expected = 12.0 * 100.0 / 64.0 + 12.0 * 200.0 / 216.0 + 50.0;
        assert!((system.stiffness[(2, 2)] - expected).abs() < 1e-9);
        // Stiffness stays symmetric
        assert_eq!(system.stiffness, system.stiffness.transpose());
    }

    #[test]
    fn test_load_vector_is_negated_fixed_end_forces() {
        let system = two_span_system();
        // Node 1 vertical: wL/2 from span 1 plus P/2 from span 2
        assert!((system.fixed_end[2] - (6.0 + 5.0)).abs() < 1e-9);
        assert_eq!(system.loads, -system.fixed_end.clone());
    }

    #[test]
    fn test_degenerate_spans() {
        let restraints = [Restraint::Fixed; 4];
        let loadings = vec![SpanLoading::default()];

        let err = assemble(&[Span::new(0.0, 1.0)], &restraints, &loadings).unwrap_err();
        assert_eq!(err.error_code(), "SINGULAR_SYSTEM");

        let err = assemble(&[Span::new(3.0, 0.0)], &restraints, &loadings).unwrap_err();
        assert_eq!(err.error_code(), "NON_FINITE_RESULT");
    }
}
