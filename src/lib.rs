//! Stick compartment model for diffusion MRI.
//!
//! The stick models diffusion confined to a single axis, the usual stand-in
//! for water inside axons. Its predicted signal attenuation for one
//! measurement is
//!
//! `S = exp(-b · d · (g · n)²)`
//!
//! with `n` the unit vector for the orientation `(theta, phi)`.
//!
//! - [`ops`]: the attenuation kernel, scalar and batched over a protocol
//! - [`protocol`]: gradient table and b-values, FSL bvec/bval loading
//! - [`parameters`]: free parameter defaults and bounds
//! - [`compartment`]: the `Stick` compartment descriptor
//!
//! Features: `cuda` builds the device kernel in `src/ops/cuda`, `python`
//! builds the `_rust` extension module.

pub mod compartment;
pub mod config;
pub mod error;
pub mod ops;
pub mod parameters;
pub mod protocol;

#[cfg(feature = "python")]
mod bindings;

pub use compartment::Stick;
pub use config::ProtocolConfig;
pub use error::{Result, StickError};
pub use ops::{cm_stick, spherical_to_cartesian, stick_protocol, stick_voxels, Float4};
pub use parameters::{FreeParameter, StickParameters};
pub use protocol::Protocol;
