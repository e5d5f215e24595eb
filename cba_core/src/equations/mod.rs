//! # Structural Mechanics Equations
//!
//! Closed-form beam equations shared by the analysis pipeline, each checked
//! against textbook values in its tests.
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Applied couples**: Positive counterclockwise
//! - **Moment**: Positive causes tension on bottom fiber (sagging)
//! - **Shear**: `V = dM/dx`, positive when left side moves up relative to right
//! - **Deflection**: Positive upward (a sagging beam deflects negative)
//! - **Rotation**: Positive counterclockwise, `θ = dv/dx`
//! - **Reactions**: Forces positive upward, moments positive counterclockwise

pub mod beam;

pub use beam::{
    element_stiffness,
    fem_applied_moment,
    fem_from_compatibility,
    fem_point_load,
    fem_uniform_full,
    macaulay,
    step,
    Side,
};
