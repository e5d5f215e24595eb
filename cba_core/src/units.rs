//! # Unit Types
//!
//! Type-safe wrappers for the SI units used when preparing beam input.
//! The analysis engine itself is unit-agnostic: any consistent set works.
//! These wrappers cover the conversions dashboards typically need before
//! calling it (section properties in GPa and cm⁴, loads in kgf/m).
//!
//! ## Consistent Set
//!
//! - Length: meters (m), deflection reported in millimeters (mm)
//! - Force: kilonewtons (kN)
//! - Distributed load: kilonewtons per meter (kN/m)
//! - Moment: kilonewton-meters (kN·m)
//! - Flexural rigidity: kilonewton square meters (kN·m²)
//!
//! ## Example
//!
//! ```rust
//! use cba_core::units::{flexural_rigidity, Cm4, GigaPascals, KgfPerMeter, KiloNewtonsPerMeter};
//!
//! let ei = flexural_rigidity(GigaPascals(200.0), Cm4(8_000.0));
//! assert!((ei.0 - 16_000.0).abs() < 1e-9);
//!
//! let w: KiloNewtonsPerMeter = KgfPerMeter(1_000.0).into();
//! assert!((w.0 - 9.80665).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Standard gravity (m/s²), used for kilogram-force conversions
pub const STANDARD_GRAVITY: f64 = 9.80665;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Force in kilograms-force
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilogramsForce(pub f64);

impl From<KilogramsForce> for KiloNewtons {
    fn from(kgf: KilogramsForce) -> Self {
        KiloNewtons(kgf.0 * STANDARD_GRAVITY / 1000.0)
    }
}

impl From<KiloNewtons> for KilogramsForce {
    fn from(kn: KiloNewtons) -> Self {
        KilogramsForce(kn.0 * 1000.0 / STANDARD_GRAVITY)
    }
}

// ============================================================================
// Distributed Load Units
// ============================================================================

/// Distributed load in kilonewtons per meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonsPerMeter(pub f64);

/// Distributed load in kilograms-force per meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgfPerMeter(pub f64);

impl From<KgfPerMeter> for KiloNewtonsPerMeter {
    fn from(kgf: KgfPerMeter) -> Self {
        KiloNewtonsPerMeter(kgf.0 * STANDARD_GRAVITY / 1000.0)
    }
}

impl From<KiloNewtonsPerMeter> for KgfPerMeter {
    fn from(kn: KiloNewtonsPerMeter) -> Self {
        KgfPerMeter(kn.0 * 1000.0 / STANDARD_GRAVITY)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

/// Moment in kilogram-force meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgfMeters(pub f64);

impl From<KgfMeters> for KiloNewtonMeters {
    fn from(kgfm: KgfMeters) -> Self {
        KiloNewtonMeters(kgfm.0 * STANDARD_GRAVITY / 1000.0)
    }
}

impl From<KiloNewtonMeters> for KgfMeters {
    fn from(knm: KiloNewtonMeters) -> Self {
        KgfMeters(knm.0 * 1000.0 / STANDARD_GRAVITY)
    }
}

// ============================================================================
// Section and Material Properties
// ============================================================================

/// Modulus of elasticity in gigapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GigaPascals(pub f64);

/// Stress in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

impl From<GigaPascals> for KiloPascals {
    fn from(gpa: GigaPascals) -> Self {
        KiloPascals(gpa.0 * 1.0e6)
    }
}

/// Second moment of area in cm⁴
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cm4(pub f64);

/// Second moment of area in m⁴
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct M4(pub f64);

impl From<Cm4> for M4 {
    fn from(cm4: Cm4) -> Self {
        M4(cm4.0 * 1.0e-8)
    }
}

impl From<M4> for Cm4 {
    fn from(m4: M4) -> Self {
        Cm4(m4.0 * 1.0e8)
    }
}

/// Flexural rigidity in kN·m²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonSquareMeters(pub f64);

/// Flexural rigidity EI from a modulus in GPa and a second moment of area in cm⁴
///
/// ```text
/// EI [kN·m²] = E [GPa] · 10⁶ · I [cm⁴] · 10⁻⁸
/// ```
pub fn flexural_rigidity(e: GigaPascals, i: Cm4) -> KiloNewtonSquareMeters {
    let e_kpa: KiloPascals = e.into();
    let i_m4: M4 = i.into();
    KiloNewtonSquareMeters(e_kpa.0 * i_m4.0)
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(KilogramsForce);
impl_arithmetic!(KiloNewtonsPerMeter);
impl_arithmetic!(KgfPerMeter);
impl_arithmetic!(KiloNewtonMeters);
impl_arithmetic!(KgfMeters);
impl_arithmetic!(GigaPascals);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(Cm4);
impl_arithmetic!(M4);
impl_arithmetic!(KiloNewtonSquareMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let mm: Millimeters = Meters(0.0125).into();
        assert!((mm.0 - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_kgf_to_kilonewtons() {
        let kn: KiloNewtons = KilogramsForce(1000.0).into();
        assert!((kn.0 - STANDARD_GRAVITY).abs() < 1e-12);

        let back: KilogramsForce = kn.into();
        assert!((back.0 - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_flexural_rigidity() {
        // 200 GPa steel, I = 8000 cm⁴ -> 200e6 kN/m² * 8e-5 m⁴ = 16000 kN·m²
        let ei = flexural_rigidity(GigaPascals(200.0), Cm4(8000.0));
        assert!((ei.0 - 16_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = KiloNewtonsPerMeter(10.0);
        let b = KiloNewtonsPerMeter(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 1.4).value(), 14.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let m = Meters(6.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "6.5");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
