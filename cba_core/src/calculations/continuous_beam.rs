//! # Continuous Beam Model
//!
//! Multi-span beam definition: spans laid end to end, one restraint per
//! degree of freedom, and the load list. Construction validates everything
//! that can be checked without solving; the stiffness solve itself lives in
//! [`assembly`](super::assembly) and [`solver`](super::solver).
//!
//! ## Notation
//!
//! - N spans creates N+1 nodes (support locations)
//! - Nodes are numbered 0 to N (left to right)
//! - Node `i` owns DOF `2i` (vertical displacement) and `2i + 1` (rotation)
//! - Loads refer to spans by 1-based index
//!
//! ```text
//! Node 0    Node 1    Node 2    Node 3
//!   |--------|---------|---------|
//!    Span 1    Span 2    Span 3
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cba_core::calculations::{ContinuousBeam, SupportType};
//! use cba_core::loads::BeamLoad;
//!
//! // Two-span continuous beam: 6 m + 6 m, pinned at all supports
//! let beam = ContinuousBeam::with_supports(
//!     vec![6.0, 6.0],
//!     30_000.0,
//!     &[SupportType::Pinned, SupportType::Pinned, SupportType::Roller],
//!     vec![BeamLoad::uniform(1, 10.0), BeamLoad::uniform(2, 10.0)],
//! )
//! .unwrap();
//!
//! let result = beam.analyze().unwrap();
//! // Interior support moment -wL²/8
//! let at_support = result.moment_at(6.0).unwrap();
//! assert!((at_support + 45.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use super::options::AnalysisOptions;
use super::reconstruction::BeamSolution;
use super::results::{AnalysisResult, Envelope};
use super::{assembly, solver};
use crate::errors::{CbaError, CbaResult};
use crate::loads::{encode_loads, BeamLoad, LoadCombination};

// =============================================================================
// SUPPORT TYPE
// =============================================================================

/// Support condition at a node
///
/// A convenience over per-DOF [`Restraint`]s: each preset expands into the
/// pair `[vertical, rotation]` for its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SupportType {
    /// Free end - no restraint (cantilever tip)
    Free,

    /// Pinned/hinged support - restrains vertical displacement, allows rotation
    #[default]
    Pinned,

    /// Roller support - same as pinned for vertical beam analysis
    Roller,

    /// Fixed support - restrains both displacement and rotation
    Fixed,
}

impl SupportType {
    /// Returns true if this support restrains vertical displacement
    pub fn restrains_vertical(&self) -> bool {
        matches!(
            self,
            SupportType::Pinned | SupportType::Roller | SupportType::Fixed
        )
    }

    /// Returns true if this support restrains rotation
    pub fn restrains_rotation(&self) -> bool {
        matches!(self, SupportType::Fixed)
    }

    /// Restraints `[vertical, rotation]` for this support
    pub fn restraints(&self) -> [Restraint; 2] {
        let of = |restrained: bool| {
            if restrained {
                Restraint::Fixed
            } else {
                Restraint::Free
            }
        };
        [of(self.restrains_vertical()), of(self.restrains_rotation())]
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportType::Free => "Free",
            SupportType::Pinned => "Pinned",
            SupportType::Roller => "Roller",
            SupportType::Fixed => "Fixed",
        }
    }
}

impl std::fmt::Display for SupportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// RESTRAINT
// =============================================================================

/// Boundary condition of a single degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Restraint {
    /// Displacement/rotation is unknown; the applied force is zero
    Free,

    /// Displacement/rotation is prescribed zero; the reaction is unknown
    Fixed,

    /// Elastic support of the given stiffness (force/length or moment/radian)
    Spring(f64),
}

impl Restraint {
    /// Parse an integer-style restraint code
    ///
    /// `-1` is fixed, `0` is free, and a positive value is a spring of that
    /// stiffness. Anything else is rejected.
    ///
    /// # Example
    /// ```
    /// use cba_core::calculations::Restraint;
    ///
    /// assert_eq!(Restraint::from_code(-1.0).unwrap(), Restraint::Fixed);
    /// assert_eq!(Restraint::from_code(0.0).unwrap(), Restraint::Free);
    /// assert_eq!(Restraint::from_code(500.0).unwrap(), Restraint::Spring(500.0));
    /// assert!(Restraint::from_code(-2.0).is_err());
    /// ```
    pub fn from_code(code: f64) -> CbaResult<Self> {
        if code == -1.0 {
            Ok(Restraint::Fixed)
        } else if code == 0.0 {
            Ok(Restraint::Free)
        } else if code.is_finite() && code > 0.0 {
            Ok(Restraint::Spring(code))
        } else {
            Err(CbaError::invalid_input(
                "restraints",
                code.to_string(),
                "Restraint code must be -1 (fixed), 0 (free) or a positive spring stiffness",
            ))
        }
    }

    /// Spring stiffness, if this is a spring
    pub fn spring_stiffness(&self) -> Option<f64> {
        match self {
            Restraint::Spring(k) => Some(*k),
            _ => None,
        }
    }
}

// =============================================================================
// SPANS AND FLEXURAL RIGIDITY
// =============================================================================

/// A single span between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Span length
    pub length: f64,

    /// Flexural rigidity EI
    pub ei: f64,
}

impl Span {
    /// Create a span
    pub fn new(length: f64, ei: f64) -> Self {
        Self { length, ei }
    }

    /// Reject negative or non-finite properties
    ///
    /// Zero length and zero EI pass: they are detected by the solve and
    /// reported as `SingularSystem` and `NonFiniteResult` respectively.
    pub fn validate(&self, index: usize) -> CbaResult<()> {
        if !(self.length.is_finite() && self.length >= 0.0) {
            return Err(CbaError::invalid_input(
                format!("spans[{}].length", index),
                self.length.to_string(),
                "Span length must be a non-negative finite number",
            ));
        }
        if !(self.ei.is_finite() && self.ei >= 0.0) {
            return Err(CbaError::invalid_input(
                format!("spans[{}].ei", index),
                self.ei.to_string(),
                "Flexural rigidity must be a non-negative finite number",
            ));
        }
        Ok(())
    }
}

/// Flexural rigidity for the whole beam or for each span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexuralRigidity {
    /// Same EI on every span
    Uniform(f64),

    /// One EI per span, left to right
    PerSpan(Vec<f64>),
}

impl FlexuralRigidity {
    /// Expand to one value per span
    pub fn per_span(&self, span_count: usize) -> CbaResult<Vec<f64>> {
        match self {
            FlexuralRigidity::Uniform(ei) => Ok(vec![*ei; span_count]),
            FlexuralRigidity::PerSpan(values) if values.len() == span_count => Ok(values.clone()),
            FlexuralRigidity::PerSpan(values) => Err(CbaError::dimension_mismatch(
                "ei",
                span_count,
                values.len(),
            )),
        }
    }
}

impl From<f64> for FlexuralRigidity {
    fn from(ei: f64) -> Self {
        FlexuralRigidity::Uniform(ei)
    }
}

impl From<Vec<f64>> for FlexuralRigidity {
    fn from(values: Vec<f64>) -> Self {
        FlexuralRigidity::PerSpan(values)
    }
}

impl From<crate::units::KiloNewtonSquareMeters> for FlexuralRigidity {
    fn from(ei: crate::units::KiloNewtonSquareMeters) -> Self {
        FlexuralRigidity::Uniform(ei.value())
    }
}

// =============================================================================
// CONTINUOUS BEAM
// =============================================================================

/// A validated continuous beam, ready to solve
///
/// Immutable once built. Solving never modifies the beam, so one beam can be
/// analysed repeatedly (different combinations or resolutions) and shared
/// across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousBeam {
    spans: Vec<Span>,
    restraints: Vec<Restraint>,
    loads: Vec<BeamLoad>,
}

impl ContinuousBeam {
    /// Build and validate a beam
    ///
    /// # Arguments
    /// * `lengths` - Span lengths, left to right
    /// * `ei` - Flexural rigidity, uniform or per span
    /// * `restraints` - One restraint per DOF, length `2 * (spans + 1)`
    /// * `loads` - Load entries referencing spans by 1-based index
    ///
    /// # Errors
    /// * `InvalidInput` - no spans, negative/non-finite length or EI, bad spring
    /// * `DimensionMismatch` - wrong EI list or restraint vector length
    /// * `InvalidLoad` - a load fails validation
    pub fn new(
        lengths: Vec<f64>,
        ei: impl Into<FlexuralRigidity>,
        restraints: Vec<Restraint>,
        loads: Vec<BeamLoad>,
    ) -> CbaResult<Self> {
        if lengths.is_empty() {
            return Err(CbaError::invalid_input(
                "spans",
                "empty",
                "At least one span is required",
            ));
        }

        let ei = ei.into().per_span(lengths.len())?;
        let spans: Vec<Span> = lengths
            .iter()
            .zip(&ei)
            .map(|(length, ei)| Span::new(*length, *ei))
            .collect();
        for (i, span) in spans.iter().enumerate() {
            span.validate(i)?;
        }

        let expected = 2 * (spans.len() + 1);
        if restraints.len() != expected {
            return Err(CbaError::dimension_mismatch(
                "restraints",
                expected,
                restraints.len(),
            ));
        }
        for (dof, restraint) in restraints.iter().enumerate() {
            if let Some(k) = restraint.spring_stiffness() {
                if !(k.is_finite() && k > 0.0) {
                    return Err(CbaError::invalid_input(
                        format!("restraints[{}]", dof),
                        k.to_string(),
                        "Spring stiffness must be positive and finite",
                    ));
                }
            }
        }

        for (index, load) in loads.iter().enumerate() {
            load.validate(index, spans.len())?;
        }

        Ok(Self {
            spans,
            restraints,
            loads,
        })
    }

    /// Build from integer-style restraint codes (`-1` fixed, `0` free, `k > 0` spring)
    pub fn from_codes(
        lengths: Vec<f64>,
        ei: impl Into<FlexuralRigidity>,
        codes: &[f64],
        loads: Vec<BeamLoad>,
    ) -> CbaResult<Self> {
        let restraints = codes
            .iter()
            .map(|code| Restraint::from_code(*code))
            .collect::<CbaResult<Vec<_>>>()?;
        Self::new(lengths, ei, restraints, loads)
    }

    /// Build from one support preset per node
    pub fn with_supports(
        lengths: Vec<f64>,
        ei: impl Into<FlexuralRigidity>,
        supports: &[SupportType],
        loads: Vec<BeamLoad>,
    ) -> CbaResult<Self> {
        if supports.len() != lengths.len() + 1 {
            return Err(CbaError::dimension_mismatch(
                "supports",
                lengths.len() + 1,
                supports.len(),
            ));
        }
        let restraints = supports.iter().flat_map(SupportType::restraints).collect();
        Self::new(lengths, ei, restraints, loads)
    }

    /// Spans, left to right
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Restraint vector, `2 * node_count()` entries
    pub fn restraints(&self) -> &[Restraint] {
        &self.restraints
    }

    /// Load entries as given
    pub fn loads(&self) -> &[BeamLoad] {
        &self.loads
    }

    /// Number of spans
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Number of nodes (always span_count + 1)
    pub fn node_count(&self) -> usize {
        self.spans.len() + 1
    }

    /// Total length of all spans combined
    pub fn total_length(&self) -> f64 {
        self.spans.iter().map(|s| s.length).sum()
    }

    /// Cumulative positions of each node from the left end
    pub fn node_positions(&self) -> Vec<f64> {
        let mut positions = Vec::with_capacity(self.node_count());
        let mut cumulative = 0.0;
        positions.push(cumulative);
        for span in &self.spans {
            cumulative += span.length;
            positions.push(cumulative);
        }
        positions
    }

    /// Solve with all loads at factor 1.0 and default options
    pub fn solve(&self) -> CbaResult<BeamSolution> {
        self.solve_combination(&LoadCombination::unfactored(), &AnalysisOptions::default())
    }

    /// Solve for the given load combination
    ///
    /// # Errors
    /// * `InvalidInput` - invalid options, or too many samples per span
    /// * `InvalidLoad` - invalid combination factors
    /// * `SingularSystem` / `NonFiniteResult` - from assembly and solve
    pub fn solve_combination(
        &self,
        combination: &LoadCombination,
        options: &AnalysisOptions,
    ) -> CbaResult<BeamSolution> {
        let lengths: Vec<f64> = self.spans.iter().map(|s| s.length).collect();
        options.validate_for_spans(&lengths)?;

        let loadings = encode_loads(&lengths, &self.loads, combination)?;
        let system = assembly::assemble(&self.spans, &self.restraints, &loadings)?;
        let solution = solver::solve(&system, options.pivot_tolerance)?;

        BeamSolution::new(
            combination.name.clone(),
            &self.spans,
            &self.restraints,
            loadings,
            solution,
        )
    }

    /// Analyse with all loads at factor 1.0 and default options
    pub fn analyze(&self) -> CbaResult<AnalysisResult> {
        self.analyze_with(&AnalysisOptions::default())
    }

    /// Analyse with all loads at factor 1.0
    pub fn analyze_with(&self, options: &AnalysisOptions) -> CbaResult<AnalysisResult> {
        self.analyze_combination(&LoadCombination::unfactored(), options)
    }

    /// Analyse a single load combination
    pub fn analyze_combination(
        &self,
        combination: &LoadCombination,
        options: &AnalysisOptions,
    ) -> CbaResult<AnalysisResult> {
        self.solve_combination(combination, options)?.sample(options)
    }

    /// Analyse every combination and return the pointwise envelope
    pub fn analyze_envelope(
        &self,
        combinations: &[LoadCombination],
        options: &AnalysisOptions,
    ) -> CbaResult<Envelope> {
        let results = combinations
            .iter()
            .map(|combo| self.analyze_combination(combo, options))
            .collect::<CbaResult<Vec<_>>>()?;
        Envelope::from_results(&results)
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
