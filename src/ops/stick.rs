use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use num_traits::Float;
use rayon::prelude::*;
use tracing::debug;

use crate::ops::batch::dot3_batched;
use crate::ops::vector::{spherical_to_cartesian, Float4};

/// Signal attenuation of the Stick compartment.
///
/// The stick is a cylinder of zero radius oriented along
/// `n = (sin θ cos φ, sin θ sin φ, cos θ)`, so only the gradient component
/// along `n` attenuates the signal:
///
/// `S = exp(-b · d · (g · n)²)`
///
/// * `g` - protocol gradient `(x, y, z, 0)`, the padding lane is ignored
/// * `b` - protocol b-value
/// * `d` - diffusivity along the stick
/// * `theta`, `phi` - stick orientation in radians
///
/// No argument is validated. Negative `b` or `d` and non-finite angles just
/// propagate through the float arithmetic.
pub fn cm_stick<T: Float>(g: Float4<T>, b: T, d: T, theta: T, phi: T) -> T {
    let n = spherical_to_cartesian(theta, phi);
    stick_from_cosine(b, d, g.dot3(&n))
}

/// `exp(-b · d · cos²)` for a precomputed `g · n`.
#[inline]
pub fn stick_from_cosine<T: Float>(b: T, d: T, cos: T) -> T {
    (-b * d * cos * cos).exp()
}

/// Evaluates one stick over every row of a protocol.
///
/// `gradients` has shape `(n, 3)` or `(n, 4)`, `b` has shape `(n,)`.
/// Returns one attenuation per row.
pub fn stick_protocol(
    gradients: &ArrayView2<f32>,
    b: &ArrayView1<f32>,
    d: f32,
    theta: f32,
    phi: f32,
) -> Array1<f32> {
    let n = spherical_to_cartesian(theta, phi);
    let cos = dot3_batched(gradients, &n);
    let mut result = Array1::zeros(gradients.nrows());

    Zip::from(&mut result)
        .and(b)
        .and(&cos)
        .par_for_each(|s, &b, &c| *s = stick_from_cosine(b, d, c));

    result
}

/// Evaluates one stick per voxel over the whole protocol.
///
/// `params` has shape `(m, 3)` with columns `(d, theta, phi)`.
/// Returns shape `(m, n)`, one row of attenuations per voxel.
pub fn stick_voxels(
    gradients: &ArrayView2<f32>,
    b: &ArrayView1<f32>,
    params: &ArrayView2<f32>,
) -> Array2<f32> {
    let n_voxels = params.nrows();
    let n_measurements = gradients.nrows();
    debug!(n_voxels, n_measurements, "evaluating stick voxels");

    let mut result = Array2::zeros((n_voxels, n_measurements));

    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let d = params[[i, 0]];
            let n = spherical_to_cartesian(params[[i, 1]], params[[i, 2]]);

            for (j, g) in gradients.axis_iter(Axis(0)).enumerate() {
                let cos = g[0] * n[0] + g[1] * n[1] + g[2] * n[2];
                row[j] = stick_from_cosine(b[j], d, cos);
            }
        });

    result
}

#[cfg(feature = "cuda")]
pub mod cuda {
    use crate::error::{Result, StickError};

    #[link(name = "kernel_stick", kind = "static")]
    extern "C" {
        pub fn stick_cuda_launcher(
            out: *mut f32,
            g: *const f32,
            b: *const f32,
            n: libc::c_longlong,
            d: f32,
            theta: f32,
            phi: f32,
        ) -> libc::c_int;
        pub fn stick_voxels_cuda_launcher(
            out: *mut f32,
            g: *const f32,
            b: *const f32,
            params: *const f32,
            n_voxels: libc::c_longlong,
            n_measurements: libc::c_longlong,
        ) -> libc::c_int;
    }

    fn check_launch(code: libc::c_int) -> Result<()> {
        match code {
            0 => Ok(()),
            code => Err(StickError::CudaLaunch { code }),
        }
    }

    /// Launches `cmStick` once per protocol row.
    ///
    /// # Safety
    /// `g` must point to `4 * n` device floats laid out as `float4`, `b` and
    /// `out` to `n` device floats.
    pub unsafe fn stick_cuda(
        out: *mut f32,
        g: *const f32,
        b: *const f32,
        n: i64,
        d: f32,
        theta: f32,
        phi: f32,
    ) -> Result<()> {
        check_launch(stick_cuda_launcher(out, g, b, n, d, theta, phi))
    }

    /// Launches `cmStick` over every `(voxel, measurement)` pair, written
    /// row-major to `out`.
    ///
    /// # Safety
    /// `params` must point to `3 * n_voxels` device floats `(d, theta, phi)`,
    /// `out` to `n_voxels * n_measurements` device floats, `g` and `b` as in
    /// [`stick_cuda`].
    pub unsafe fn stick_voxels_cuda(
        out: *mut f32,
        g: *const f32,
        b: *const f32,
        params: *const f32,
        n_voxels: i64,
        n_measurements: i64,
    ) -> Result<()> {
        check_launch(stick_voxels_cuda_launcher(
            out,
            g,
            b,
            params,
            n_voxels,
            n_measurements,
        ))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_aligned_gradient() {
        let g = Float4::from_xyz(1.0f32, 0.0, 0.0);
        let s = cm_stick(g, 1000.0, 0.002, PI / 2.0, 0.0);
        assert_relative_eq!(s, (-2.0f32).exp(), epsilon = EPSILON);
        assert_relative_eq!(s, 0.1353, epsilon = 1e-4);
    }

    #[test]
    fn test_perpendicular_gradient() {
        let g = Float4::from_xyz(1.0f32, 0.0, 0.0);
        for &(b, d) in &[(1000.0f32, 0.002f32), (3000.0, 3e-3), (1.0, 1.0)] {
            assert_relative_eq!(cm_stick(g, b, d, 0.0, 0.0), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_padding_lane_does_not_matter() {
        let a = cm_stick(Float4::new(0.3f32, 0.4, 0.5, 0.0), 1e3, 1.7e-3, 0.8, 1.9);
        let b = cm_stick(Float4::new(0.3f32, 0.4, 0.5, 7.0), 1e3, 1.7e-3, 0.8, 1.9);
        assert_eq!(a, b);
    }

    #[test]
    fn test_double_precision() {
        let g32 = Float4::from_xyz(0.6f32, 0.0, 0.8);
        let g64 = Float4::from_xyz(0.6f64, 0.0, 0.8);
        let s32 = cm_stick(g32, 2e9, 1.7e-9, 0.4, 0.2);
        let s64 = cm_stick(g64, 2e9, 1.7e-9, 0.4, 0.2);
        assert_relative_eq!(s32 as f64, s64, epsilon = 1e-5);
    }

    #[test]
    fn test_nan_propagates() {
        let g = Float4::from_xyz(1.0f32, 0.0, 0.0);
        assert!(cm_stick(g, 1000.0, 0.002, f32::NAN, 0.0).is_nan());
    }

    #[test]
    fn test_protocol_matches_scalar() {
        let g = arr2(&[
            [1.0f32, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
            [0.6, 0.8, 0.0],
        ]);
        let b = arr1(&[1000.0f32, 2000.0, 3000.0, 0.0, 1500.0]);
        let (d, theta, phi) = (1.7e-3f32, 1.1, 0.4);

        let result = stick_protocol(&g.view(), &b.view(), d, theta, phi);

        assert_eq!(result.len(), 5);
        for i in 0..5 {
            let gi = Float4::from_xyz(g[[i, 0]], g[[i, 1]], g[[i, 2]]);
            assert_relative_eq!(result[i], cm_stick(gi, b[i], d, theta, phi), epsilon = EPSILON);
        }
        assert_relative_eq!(result[3], 1.0);
    }

    #[test]
    fn test_voxels_shape_and_rows() {
        let g = arr2(&[
            [1.0f32, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let b = arr1(&[1000.0f32, 1000.0, 1000.0]);
        let params = arr2(&[[2e-3f32, PI / 2.0, 0.0], [1e-3, 0.0, 0.0]]);

        let result = stick_voxels(&g.view(), &b.view(), &params.view());

        assert_eq!(result.shape(), &[2, 3]);
        for (i, p) in params.rows().into_iter().enumerate() {
            let expected = stick_protocol(&g.view(), &b.view(), p[0], p[1], p[2]);
            assert_relative_eq!(result.row(i), expected.view(), epsilon = EPSILON);
        }
        assert_relative_eq!(result[[0, 0]], (-2.0f32).exp(), epsilon = EPSILON);
        assert_relative_eq!(result[[1, 2]], (-1.0f32).exp(), epsilon = EPSILON);
    }
}
