use ndarray::{s, Array1, ArrayView1, ArrayView2, Axis};

/// Dot product of each gradient row `(x, y, z[, w])` with the orientation `n`.
/// Columns past the third are padding and are skipped.
pub fn dot3_batched(gradients: &ArrayView2<f32>, n: &[f32; 3]) -> Array1<f32> {
    let xyz = gradients.slice(s![.., 0..3]);
    xyz.dot(&ArrayView1::from(&n[..]))
}

/// Squared norm of each gradient row over its first three columns.
pub fn norm3_sq_batched(gradients: &ArrayView2<f32>) -> Array1<f32> {
    let xyz = gradients.slice(s![.., 0..3]);
    xyz.map_axis(Axis(1), |row| row.dot(&row))
}
