//! Beam loads, load categories and load combinations
//!
//! # Overview
//!
//! - [`BeamLoad`] - A typed load entry on one span (uniform, partial, trapezoidal, point, moment)
//! - [`LoadCategory`] - Dead / Live / Other, used for factoring
//! - [`LoadCombination`] - Category factors applied before the solve
//! - [`encode_loads`] - Per-span fixed-end forces plus the exact loads for reconstruction
//!
//! # Example
//!
//! ```
//! use cba_core::loads::{BeamLoad, LoadCategory, LoadCombination, encode_loads};
//!
//! let loads = vec![
//!     BeamLoad::uniform(1, 12.0),
//!     BeamLoad::uniform(1, 8.0).with_category(LoadCategory::Live),
//! ];
//!
//! let service = encode_loads(&[5.0], &loads, &LoadCombination::unfactored()).unwrap();
//! let strength = encode_loads(&[5.0], &loads, &LoadCombination::sdm()).unwrap();
//!
//! assert!((service[0].total_force() - 100.0).abs() < 1e-9);
//! assert!((strength[0].total_force() - (1.4 * 12.0 + 1.7 * 8.0) * 5.0).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod discrete;
pub mod encoder;
pub mod load_types;

pub use combinations::{standard_combinations, LoadCombination};
pub use discrete::{BeamLoad, LoadKind};
pub use encoder::{encode_loads, FixedEndForces, LoadTerm, SpanLoading};
pub use load_types::LoadCategory;
