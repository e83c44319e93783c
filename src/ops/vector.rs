use ndarray::{Array2, ArrayView1, Zip};
use num_traits::Float;

/// Four component vector laid out like a device `float4`.
///
/// Gradient directions are stored as `(x, y, z, 0)`; `w` is alignment padding
/// and never takes part in the arithmetic.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Float4<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

impl<T: Float> Float4<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    /// Builds a padded vector `(x, y, z, 0)`.
    pub fn from_xyz(x: T, y: T, z: T) -> Self {
        Self::new(x, y, z, T::zero())
    }

    pub fn xyz(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product over the first three components.
    pub fn dot3(&self, n: &[T; 3]) -> T {
        self.x * n[0] + self.y * n[1] + self.z * n[2]
    }

    pub fn norm3(&self) -> T {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl<T: Float> From<[T; 3]> for Float4<T> {
    fn from(v: [T; 3]) -> Self {
        Self::from_xyz(v[0], v[1], v[2])
    }
}

impl<T: Float> From<[T; 4]> for Float4<T> {
    fn from(v: [T; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Unit vector for polar angle `theta` and azimuth `phi`.
pub fn spherical_to_cartesian<T: Float>(theta: T, phi: T) -> [T; 3] {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    [sin_theta * cos_phi, sin_theta * sin_phi, cos_theta]
}

/// Row-wise `spherical_to_cartesian`, shape `(m, 3)`.
///
/// Panics if `theta` and `phi` differ in length.
pub fn fibre_directions(theta: &ArrayView1<f32>, phi: &ArrayView1<f32>) -> Array2<f32> {
    let mut result = Array2::zeros((theta.len(), 3));

    Zip::from(result.rows_mut())
        .and(theta)
        .and(phi)
        .par_for_each(|mut row, &t, &p| {
            let n = spherical_to_cartesian(t, p);
            for j in 0..3 {
                row[j] = n[j];
            }
        });

    result
}
