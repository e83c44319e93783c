mod stick;

pub use stick::*;

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::error::StickError;

impl From<StickError> for PyErr {
    fn from(err: StickError) -> PyErr {
        match err {
            StickError::Io { .. } => PyIOError::new_err(err.to_string()),
            StickError::CudaLaunch { .. } => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Stick compartment model for diffusion MRI
#[pymodule]
pub fn _rust(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    // Stick compartment
    stick::register(m)?;
    Ok(())
}
