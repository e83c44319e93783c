use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::compartment::Stick;
use crate::ops::{stick, vector};
use crate::parameters::StickParameters;
use crate::protocol::Protocol;

fn protocol_from_arrays(
    g: PyReadonlyArray2<f32>,
    b: PyReadonlyArray1<f32>,
) -> PyResult<Protocol> {
    Ok(Protocol::new(
        g.as_array().to_owned(),
        b.as_array().to_owned(),
    )?)
}

#[pyfunction]
pub fn cm_stick(g: [f32; 4], b: f32, d: f32, theta: f32, phi: f32) -> f32 {
    stick::cm_stick(vector::Float4::from(g), b, d, theta, phi)
}

#[pyfunction]
pub fn stick_protocol_cpu<'py>(
    py: Python<'py>,
    g: PyReadonlyArray2<f32>,
    b: PyReadonlyArray1<f32>,
    d: f32,
    theta: f32,
    phi: f32,
) -> PyResult<&'py PyArray1<f32>> {
    let protocol = protocol_from_arrays(g, b)?;
    let result = Stick::default().evaluate(&protocol, &StickParameters::new(d, theta, phi));
    Ok(result.into_pyarray(py))
}

#[pyfunction]
pub fn stick_voxels_cpu<'py>(
    py: Python<'py>,
    g: PyReadonlyArray2<f32>,
    b: PyReadonlyArray1<f32>,
    params: PyReadonlyArray2<f32>,
) -> PyResult<&'py PyArray2<f32>> {
    let protocol = protocol_from_arrays(g, b)?;
    let params_arr = params.as_array();
    let result = Stick::default().simulate(&protocol, &params_arr)?;
    Ok(result.into_pyarray(py))
}

#[pyfunction]
pub fn fibre_directions_cpu<'py>(
    py: Python<'py>,
    theta: PyReadonlyArray1<f32>,
    phi: PyReadonlyArray1<f32>,
) -> PyResult<&'py PyArray2<f32>> {
    let theta_arr = theta.as_array();
    let phi_arr = phi.as_array();
    let mut maps = Stick::default().extra_result_maps(&theta_arr, &phi_arr)?;
    let result = maps.remove("Stick.vec0").unwrap_or_default();
    Ok(result.into_pyarray(py))
}

#[cfg(feature = "cuda")]
#[pyfunction]
pub fn stick_protocol_cuda(
    _py: Python,
    g_ptr: usize,
    b_ptr: usize,
    out_ptr: usize,
    n: i64,
    d: f32,
    theta: f32,
    phi: f32,
) -> PyResult<()> {
    let g_ptr_f32 = g_ptr as *const f32;
    let b_ptr_f32 = b_ptr as *const f32;
    let out_ptr_f32 = out_ptr as *mut f32;
    unsafe {
        stick::cuda::stick_cuda(out_ptr_f32, g_ptr_f32, b_ptr_f32, n, d, theta, phi)?;
    }
    Ok(())
}

#[cfg(feature = "cuda")]
#[pyfunction]
pub fn stick_voxels_cuda(
    _py: Python,
    g_ptr: usize,
    b_ptr: usize,
    params_ptr: usize,
    out_ptr: usize,
    n_voxels: i64,
    n_measurements: i64,
) -> PyResult<()> {
    let g_ptr_f32 = g_ptr as *const f32;
    let b_ptr_f32 = b_ptr as *const f32;
    let params_ptr_f32 = params_ptr as *const f32;
    let out_ptr_f32 = out_ptr as *mut f32;
    unsafe {
        stick::cuda::stick_voxels_cuda(
            out_ptr_f32,
            g_ptr_f32,
            b_ptr_f32,
            params_ptr_f32,
            n_voxels,
            n_measurements,
        )?;
    }
    Ok(())
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(cm_stick, m)?)?;
    m.add_function(wrap_pyfunction!(stick_protocol_cpu, m)?)?;
    m.add_function(wrap_pyfunction!(stick_voxels_cpu, m)?)?;
    m.add_function(wrap_pyfunction!(fibre_directions_cpu, m)?)?;
    #[cfg(feature = "cuda")]
    m.add_function(wrap_pyfunction!(stick_protocol_cuda, m)?)?;
    #[cfg(feature = "cuda")]
    m.add_function(wrap_pyfunction!(stick_voxels_cuda, m)?)?;
    Ok(())
}
