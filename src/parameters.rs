//! Free parameters of the Stick compartment.
//!
//! Values are in SI units: diffusivities in m²/s, angles in radians.

use std::f32::consts::PI;

use crate::ops::vector::spherical_to_cartesian;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeParameter {
    pub name: &'static str,
    pub init_value: f32,
    pub lower_bound: f32,
    pub upper_bound: f32,
    /// Period of a circular parameter. When set, `clamp` maps the value to
    /// `|v| mod period` before applying the bounds.
    pub modulus: Option<f32>,
}

impl FreeParameter {
    pub const fn new(
        name: &'static str,
        init_value: f32,
        lower_bound: f32,
        upper_bound: f32,
    ) -> Self {
        Self {
            name,
            init_value,
            lower_bound,
            upper_bound,
            modulus: None,
        }
    }

    pub const fn with_modulus(self, modulus: f32) -> Self {
        Self {
            modulus: Some(modulus),
            ..self
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let value = match self.modulus {
            Some(m) => value.abs() % m,
            None => value,
        };
        value.max(self.lower_bound).min(self.upper_bound)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }
}

/// Diffusivity along the stick.
pub const D: FreeParameter = FreeParameter::new("d", 1.7e-9, 1e-11, 1.0e-8);

/// Polar angle. Wraps as `|theta| mod pi`, so 0 and pi describe the same
/// stick.
pub const THETA: FreeParameter =
    FreeParameter::new("theta", PI / 2.0, 0.0, PI).with_modulus(PI);

/// Azimuth. Limited to [0, pi]; together with theta this covers one
/// hemisphere, which is enough since the stick has no polarity.
pub const PHI: FreeParameter = FreeParameter::new("phi", PI / 2.0, 0.0, PI);

/// One set of stick parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickParameters {
    pub d: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Default for StickParameters {
    fn default() -> Self {
        Self {
            d: D.init_value,
            theta: THETA.init_value,
            phi: PHI.init_value,
        }
    }
}

impl StickParameters {
    pub fn new(d: f32, theta: f32, phi: f32) -> Self {
        Self { d, theta, phi }
    }

    pub fn clamped(&self) -> Self {
        Self {
            d: D.clamp(self.d),
            theta: THETA.clamp(self.theta),
            phi: PHI.clamp(self.phi),
        }
    }

    /// Cartesian fibre direction (`vec0`).
    pub fn direction(&self) -> [f32; 3] {
        spherical_to_cartesian(self.theta, self.phi)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.d, self.theta, self.phi]
    }
}
