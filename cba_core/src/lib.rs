//! # cba_core - Continuous Beam Analysis Engine
//!
//! `cba_core` analyses multi-span Euler-Bernoulli beams with the stiffness
//! method. Given span lengths, flexural rigidity, per-DOF restraints and a
//! load list it returns sampled shear, moment, deflection and rotation
//! curves together with the support reactions. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: A built beam is immutable; solving and sampling are pure
//! - **Exact**: Curves come from closed-form integration of the actual loads
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use cba_core::calculations::{ContinuousBeam, Restraint};
//! use cba_core::loads::BeamLoad;
//!
//! // Simply-supported 8 m span, EI = 20 000 kN·m², 12 kN/m
//! let beam = ContinuousBeam::new(
//!     vec![8.0],
//!     20_000.0,
//!     vec![Restraint::Fixed, Restraint::Free, Restraint::Fixed, Restraint::Free],
//!     vec![BeamLoad::uniform(1, 12.0)],
//! )
//! .unwrap();
//!
//! let result = beam.analyze().unwrap();
//! let summary = result.summary();
//! assert!((summary.max_moment.value - 96.0).abs() < 1e-9);   // wL²/8
//! assert!((result.reaction_vector()[0] - 48.0).abs() < 1e-9); // wL/2
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"moment\""));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Beam model, assembly, solver, reconstruction and results
//! - [`loads`] - Load entries, categories, combinations and the load encoder
//! - [`equations`] - Closed-form beam formulas and sign conventions
//! - [`definition`] - JSON job documents
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod definition;
pub mod equations;
pub mod errors;
pub mod loads;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{AnalysisOptions, AnalysisResult, ContinuousBeam, Restraint, SupportType};
pub use definition::BeamDefinition;
pub use errors::{CbaError, CbaResult};
pub use loads::{BeamLoad, LoadCategory, LoadCombination};
