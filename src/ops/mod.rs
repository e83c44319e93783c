pub mod batch;
pub mod stick;
pub mod vector;

pub use self::batch::{dot3_batched, norm3_sq_batched};
pub use self::stick::{cm_stick, stick_from_cosine, stick_protocol, stick_voxels};
pub use self::vector::{fibre_directions, spherical_to_cartesian, Float4};

#[cfg(test)]
mod __test__;
