//! Acquisition protocol: one gradient direction and b-value per measurement.

use std::fs;
use std::path::Path;

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use tracing::{debug, info, warn};

use crate::config::ProtocolConfig;
use crate::error::{Result, StickError};
use crate::ops::batch::norm3_sq_batched;
use crate::ops::vector::Float4;

#[derive(Debug, Clone, PartialEq)]
pub struct Protocol {
    gradients: Array2<f32>,
    b_values: Array1<f32>,
}

impl Protocol {
    /// Builds a protocol from an `(n, 3)` or `(n, 4)` gradient table and
    /// `n` b-values. A fourth gradient column is padding and is dropped.
    pub fn new(gradients: Array2<f32>, b_values: Array1<f32>) -> Result<Self> {
        let (rows, cols) = gradients.dim();
        if cols != 3 && cols != 4 {
            return Err(StickError::ShapeMismatch {
                what: "gradients",
                expected: vec![rows, 3],
                got: vec![rows, cols],
            });
        }
        if b_values.len() != rows {
            return Err(StickError::ShapeMismatch {
                what: "b_values",
                expected: vec![rows],
                got: vec![b_values.len()],
            });
        }
        if rows == 0 {
            return Err(StickError::EmptyProtocol);
        }

        let gradients = if cols == 4 {
            gradients.slice(s![.., 0..3]).to_owned()
        } else {
            gradients
        };

        for (row, g) in gradients.axis_iter(Axis(0)).enumerate() {
            if g.iter().any(|v| !v.is_finite()) {
                return Err(StickError::NonFiniteGradient { row });
            }
        }
        for (row, &value) in b_values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(StickError::InvalidBValue { row, value });
            }
        }

        Ok(Self {
            gradients,
            b_values,
        })
    }

    /// Parses FSL `bvec` and `bval` text.
    ///
    /// The bvec table may be `3 x n` (FSL layout) or `n x 3`.
    pub fn from_bvec_bval(bvec: &str, bval: &str, config: &ProtocolConfig) -> Result<Self> {
        let bvec_rows = parse_table(bvec, "bvec")?;
        let b_values: Vec<f32> = parse_table(bval, "bval")?.into_iter().flatten().collect();
        let n = b_values.len();

        let mut gradients = if bvec_rows.len() == 3 && bvec_rows.iter().all(|r| r.len() == n) {
            let mut g = Array2::zeros((n, 3));
            for (axis, row) in bvec_rows.iter().enumerate() {
                g.column_mut(axis).assign(&ArrayView1::from(&row[..]));
            }
            g
        } else if bvec_rows.len() == n && bvec_rows.iter().all(|r| r.len() == 3) {
            let flat: Vec<f32> = bvec_rows.into_iter().flatten().collect();
            Array2::from_shape_vec((n, 3), flat).map_err(|e| StickError::Parse {
                source_name: "bvec".to_string(),
                line: 0,
                message: e.to_string(),
            })?
        } else {
            return Err(StickError::ShapeMismatch {
                what: "bvec",
                expected: vec![3, n],
                got: vec![bvec_rows.len(), bvec_rows.first().map_or(0, Vec::len)],
            });
        };

        if config.normalize_gradients {
            normalize_rows(&mut gradients, config.zero_gradient_tolerance);
        }
        let b_values = Array1::from(b_values) * config.b_scale;

        let protocol = Self::new(gradients, b_values)?;
        debug!(
            measurements = protocol.len(),
            b0 = protocol.unweighted_indices(0.0).len(),
            "parsed bvec/bval protocol"
        );
        Ok(protocol)
    }

    /// Reads and parses a `bvec`/`bval` file pair.
    pub fn load(
        bvec_path: impl AsRef<Path>,
        bval_path: impl AsRef<Path>,
        config: &ProtocolConfig,
    ) -> Result<Self> {
        let bvec = read_to_string(bvec_path.as_ref())?;
        let bval = read_to_string(bval_path.as_ref())?;
        let protocol = Self::from_bvec_bval(&bvec, &bval, config)?;
        info!(
            bvec = %bvec_path.as_ref().display(),
            measurements = protocol.len(),
            "loaded protocol"
        );
        Ok(protocol)
    }

    pub fn len(&self) -> usize {
        self.b_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b_values.is_empty()
    }

    /// Gradient table of shape `(n, 3)`.
    pub fn gradients(&self) -> ArrayView2<'_, f32> {
        self.gradients.view()
    }

    pub fn b_values(&self) -> ArrayView1<'_, f32> {
        self.b_values.view()
    }

    /// Gradient of row `i` padded to `(x, y, z, 0)`.
    pub fn gradient(&self, i: usize) -> Float4<f32> {
        let g = self.gradients.row(i);
        Float4::from_xyz(g[0], g[1], g[2])
    }

    pub fn b_value(&self, i: usize) -> f32 {
        self.b_values[i]
    }

    /// Rows whose b-value is at most `threshold`.
    pub fn unweighted_indices(&self, threshold: f32) -> Vec<usize> {
        self.b_values
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b <= threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| StickError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_table(text: &str, source_name: &str) -> Result<Vec<Vec<f32>>> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f32>().map_err(|e| StickError::Parse {
                    source_name: source_name.to_string(),
                    line: i + 1,
                    message: format!("{t:?}: {e}"),
                })
            })
            .collect::<Result<Vec<f32>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn normalize_rows(gradients: &mut Array2<f32>, tolerance: f32) {
    let norms = norm3_sq_batched(&gradients.view()).mapv(f32::sqrt);
    let mut zeroed = 0usize;

    for (mut row, &norm) in gradients.axis_iter_mut(Axis(0)).zip(norms.iter()) {
        if norm < tolerance {
            row.fill(0.0);
            zeroed += 1;
        } else {
            row /= norm;
        }
    }

    if zeroed > 0 && zeroed == gradients.nrows() {
        warn!("all gradient directions are zero");
    }
}
