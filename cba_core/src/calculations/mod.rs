//! # Beam Calculations
//!
//! The stiffness-method pipeline, one stage per module:
//!
//! 1. [`loads::encode_loads`](crate::loads::encode_loads) - fixed-end forces and exact load terms
//! 2. [`assembly`] - global stiffness matrix, load vector and DOF partition
//! 3. [`solver`] - scaled Cholesky solve and reactions
//! 4. [`reconstruction`] - shear, moment, rotation and deflection curves
//!
//! [`ContinuousBeam`] drives the whole pipeline; the stages are public for
//! callers that need the intermediate results.
//!
//! All types are designed for JSON consumption:
//! - Inputs and results derive Serialize/Deserialize
//! - Errors are structured ([`CbaError`](crate::errors::CbaError))

pub mod assembly;
pub mod continuous_beam;
pub mod options;
pub mod reconstruction;
pub mod results;
pub mod solver;

// Re-export commonly used types
pub use continuous_beam::{ContinuousBeam, FlexuralRigidity, Restraint, Span, SupportType};
pub use options::{AnalysisOptions, Resolution};
pub use reconstruction::{BeamSolution, SolvedSpan};
pub use results::{
    AnalysisResult, DeflectionLimit, Dof, Envelope, Extreme, NodeDisplacement, Reaction,
    ReactionSource, ResultSummary, SpanDeflectionCheck,
};
