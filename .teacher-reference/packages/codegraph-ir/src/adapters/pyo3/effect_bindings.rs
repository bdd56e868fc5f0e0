/// PyO3 bindings for effect analysis
///
/// **NOTE**: Stub implementation - returns Pure for all functions

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyDict;

// #[cfg(feature = "python")]
// use crate::features::effect_analysis::*;
#[cfg(feature = "python")]
use crate::features::cross_file::IRDocument;

/// Analyze effects (stub)
#[cfg(feature = "python")]
#[pyo3::pyfunction]
pub fn analyze_all_effects(py: Python, _ir_doc_dict: PyObject) -> PyResult<PyObject> {
    // Stub: return empty dict
    let result = PyDict::new(py);
    Ok(result.into())
}

/// Register effect analysis functions
#[cfg(feature = "python")]
pub fn register_effect_bindings(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(pyo3::wrap_pyfunction!(analyze_all_effects, m)?)?;
    Ok(())
}
