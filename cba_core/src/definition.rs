//! # Beam Definition Documents
//!
//! JSON input format for a complete analysis job: geometry, stiffness,
//! supports, loads, combinations and options. Used by `cba_cli` and by any
//! caller that stores beams as documents.
//!
//! ## Example
//!
//! ```json
//! {
//!   "label": "B-1",
//!   "spans": [6.0, 4.5],
//!   "stiffness": { "e_gpa": 25.0, "i_cm4": 213333.0 },
//!   "supports": ["Pinned", "Pinned", "Roller"],
//!   "force_unit": "KilogramForce",
//!   "loads": [
//!     { "span": 1, "type": "Uniform", "magnitude": 1200.0 },
//!     { "span": 2, "type": "Point", "magnitude": 800.0, "position": 0.5, "category": "Live" }
//!   ],
//!   "combinations": [],
//!   "options": { "resolution": { "PointsPerSpan": 51 } }
//! }
//! ```
//!
//! Either `supports` (one preset per node) or `restraints` (one entry per
//! DOF, as a code or a typed restraint) must be given, not both.

use serde::{Deserialize, Serialize};

use crate::calculations::{
    AnalysisOptions, ContinuousBeam, FlexuralRigidity, Restraint, SupportType,
};
use crate::errors::{CbaError, CbaResult};
use crate::loads::{BeamLoad, LoadCombination, LoadKind};
use crate::units::{
    flexural_rigidity, Cm4, GigaPascals, KgfMeters, KgfPerMeter, KiloNewtonMeters, KiloNewtons,
    KiloNewtonsPerMeter, KilogramsForce,
};

/// Flexural rigidity as written in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StiffnessSpec {
    /// EI for every span
    Uniform(f64),
    /// EI per span
    PerSpan(Vec<f64>),
    /// Section properties in SI units, EI in kN·m²
    Section { e_gpa: f64, i_cm4: f64 },
}

impl StiffnessSpec {
    fn to_rigidity(&self) -> FlexuralRigidity {
        match self {
            StiffnessSpec::Uniform(ei) => FlexuralRigidity::Uniform(*ei),
            StiffnessSpec::PerSpan(values) => FlexuralRigidity::PerSpan(values.clone()),
            StiffnessSpec::Section { e_gpa, i_cm4 } => {
                flexural_rigidity(GigaPascals(*e_gpa), Cm4(*i_cm4)).into()
            }
        }
    }
}

/// A restraint entry: integer-style code or typed restraint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RestraintSpec {
    Code(f64),
    Typed(Restraint),
}

impl RestraintSpec {
    fn to_restraint(self) -> CbaResult<Restraint> {
        match self {
            RestraintSpec::Code(code) => Restraint::from_code(code),
            RestraintSpec::Typed(restraint) => Ok(restraint),
        }
    }
}

/// Unit of the load magnitudes in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceUnit {
    /// kN, kN/m, kN·m
    #[default]
    Kilonewton,
    /// kgf, kgf/m, kgf·m (converted to kN on build)
    KilogramForce,
}

impl ForceUnit {
    fn convert(&self, kind: &LoadKind) -> LoadKind {
        if *self == ForceUnit::Kilonewton {
            return kind.clone();
        }
        let per_meter = |w: f64| KiloNewtonsPerMeter::from(KgfPerMeter(w)).value();
        match *kind {
            LoadKind::Uniform { magnitude } => LoadKind::Uniform {
                magnitude: per_meter(magnitude),
            },
            LoadKind::PartialUniform { magnitude, start, end } => LoadKind::PartialUniform {
                magnitude: per_meter(magnitude),
                start,
                end,
            },
            LoadKind::Trapezoidal {
                start_magnitude,
                end_magnitude,
                start,
                end,
            } => LoadKind::Trapezoidal {
                start_magnitude: per_meter(start_magnitude),
                end_magnitude: per_meter(end_magnitude),
                start,
                end,
            },
            LoadKind::Point { magnitude, position } => LoadKind::Point {
                magnitude: KiloNewtons::from(KilogramsForce(magnitude)).value(),
                position,
            },
            LoadKind::Moment { magnitude, position } => LoadKind::Moment {
                magnitude: KiloNewtonMeters::from(KgfMeters(magnitude)).value(),
                position,
            },
        }
    }
}

/// A complete analysis job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDefinition {
    /// User label for this beam
    #[serde(default)]
    pub label: String,

    /// Span lengths, left to right
    pub spans: Vec<f64>,

    /// Flexural rigidity
    pub stiffness: StiffnessSpec,

    /// Support preset per node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports: Option<Vec<SupportType>>,

    /// Restraint per DOF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restraints: Option<Vec<RestraintSpec>>,

    /// Unit of the load magnitudes
    #[serde(default)]
    pub force_unit: ForceUnit,

    /// Loads
    #[serde(default)]
    pub loads: Vec<BeamLoad>,

    /// Combinations to analyse; empty means a single unfactored analysis
    #[serde(default)]
    pub combinations: Vec<LoadCombination>,

    /// Analysis options
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl BeamDefinition {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> CbaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the validated beam
    ///
    /// # Errors
    /// * `InvalidInput` - both or neither of `supports` and `restraints`
    /// * anything [`ContinuousBeam::new`] reports
    pub fn build(&self) -> CbaResult<ContinuousBeam> {
        let ei = self.stiffness.to_rigidity();
        let loads: Vec<BeamLoad> = self
            .loads
            .iter()
            .map(|load| BeamLoad {
                kind: self.force_unit.convert(&load.kind),
                ..load.clone()
            })
            .collect();

        match (&self.supports, &self.restraints) {
            (Some(supports), None) => {
                ContinuousBeam::with_supports(self.spans.clone(), ei, supports, loads)
            }
            (None, Some(specs)) => {
                let restraints = specs
                    .iter()
                    .map(|spec| spec.to_restraint())
                    .collect::<CbaResult<Vec<_>>>()?;
                ContinuousBeam::new(self.spans.clone(), ei, restraints, loads)
            }
            (Some(_), Some(_)) => Err(CbaError::invalid_input(
                "supports",
                "both given",
                "Give either supports or restraints, not both",
            )),
            (None, None) => Err(CbaError::invalid_input(
                "supports",
                "missing",
                "Either supports or restraints is required",
            )),
        }
    }

    /// Combinations to analyse, defaulting to a single unfactored one
    pub fn combinations(&self) -> Vec<LoadCombination> {
        if self.combinations.is_empty() {
            vec![LoadCombination::unfactored()]
        } else {
            self.combinations.clone()
        }
    }
}
