use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::debug;

use crate::error::{Result, StickError};
use crate::ops::stick::{stick_protocol, stick_voxels};
use crate::ops::vector::fibre_directions;
use crate::parameters::{FreeParameter, StickParameters, D, PHI, THETA};
use crate::protocol::Protocol;

/// The Stick compartment: diffusion restricted to a single axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stick {
    name: String,
}

impl Default for Stick {
    fn default() -> Self {
        Self::new("Stick")
    }
}

impl Stick {
    /// A stick under a custom name, e.g. `Stick0` when several sticks share
    /// one model.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the device function implementing this compartment.
    pub fn function_name(&self) -> &'static str {
        "cmStick"
    }

    /// Argument order of [`crate::cm_stick`].
    pub fn parameter_names(&self) -> [&'static str; 5] {
        ["g", "b", "d", "theta", "phi"]
    }

    pub fn free_parameters(&self) -> [FreeParameter; 3] {
        [D, THETA, PHI]
    }

    /// Signal for one parameter set over the protocol.
    pub fn evaluate(&self, protocol: &Protocol, params: &StickParameters) -> Array1<f32> {
        stick_protocol(
            &protocol.gradients(),
            &protocol.b_values(),
            params.d,
            params.theta,
            params.phi,
        )
    }

    /// Signal for many voxels; `params` rows are `(d, theta, phi)`.
    pub fn simulate(&self, protocol: &Protocol, params: &ArrayView2<f32>) -> Result<Array2<f32>> {
        if params.ncols() != 3 {
            return Err(StickError::ShapeMismatch {
                what: "params",
                expected: vec![params.nrows(), 3],
                got: vec![params.nrows(), params.ncols()],
            });
        }
        debug!(compartment = %self.name, voxels = params.nrows(), "simulating");
        Ok(stick_voxels(
            &protocol.gradients(),
            &protocol.b_values(),
            params,
        ))
    }

    /// Extra maps derived from fitted angles: `<name>.vec0`, the cartesian
    /// fibre direction per voxel.
    pub fn extra_result_maps(
        &self,
        theta: &ArrayView1<f32>,
        phi: &ArrayView1<f32>,
    ) -> Result<HashMap<String, Array2<f32>>> {
        if theta.len() != phi.len() {
            return Err(StickError::ShapeMismatch {
                what: "phi",
                expected: vec![theta.len()],
                got: vec![phi.len()],
            });
        }
        let mut maps = HashMap::new();
        maps.insert(format!("{}.vec0", self.name), fibre_directions(theta, phi));
        Ok(maps)
    }
}
