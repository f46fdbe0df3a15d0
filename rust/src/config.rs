//! Configuration for a network evaluation run.

use chrono::NaiveDate;
use pyo3::prelude::*;

/// Options for [`analyze`](crate::critical_path::analyze).
#[pyclass]
#[derive(Clone, Debug)]
pub struct EvaluationConfig {
    /// Verbosity level: 0=silent, 1=phases, 2=rounds, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Recompute the critical length by matrix relaxation and cross-check it.
    #[pyo3(get, set)]
    pub verify: bool,
    /// Calendar day that time 0 maps to, if event dates are wanted.
    #[pyo3(get, set)]
    pub start_date: Option<NaiveDate>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            verify: true,
            start_date: None,
        }
    }
}

#[pymethods]
impl EvaluationConfig {
    #[new]
    #[pyo3(signature = (verbosity=0, verify=true, start_date=None))]
    fn new(verbosity: u8, verify: bool, start_date: Option<NaiveDate>) -> Self {
        Self {
            verbosity,
            verify,
            start_date,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "EvaluationConfig(verbosity={}, verify={}, start_date={:?})",
            self.verbosity, self.verify, self.start_date
        )
    }
}
