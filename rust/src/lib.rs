//! Critical Path Method scheduling for activity-on-arrow project networks.
//!
//! Event times and activity slacks come from forward and backward sweeps;
//! the critical length is cross-checked by all-pairs longest-path relaxation.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod calendar;
mod config;
pub mod critical_path;
pub mod logging;
mod models;
pub mod network;
pub mod report;

pub use calendar::{anchor_events, CalendarError, EventDates};
pub use config::EvaluationConfig;
pub use critical_path::{
    analyze, cross_check, AnalysisError, DistanceMatrix, NetworkAnalysis, PathVerifier,
    ScheduleEvaluator, ScheduleSummary, Sweep, SweepError, Verification, VerificationError,
};
pub use models::{Activity, ActivityRecord, Node};
pub use network::{reference_node_ids, ActivityDef, Network, NetworkError, REFERENCE_TOPOLOGY};

/// Evaluated network as seen from Python.
#[pyclass(name = "NetworkAnalysis")]
#[derive(Clone, Debug)]
pub struct PyNetworkAnalysis {
    #[pyo3(get)]
    pub nodes: Vec<Node>,
    #[pyo3(get)]
    pub activities: Vec<ActivityRecord>,
    /// Initial distance matrix followed by one matrix per relaxation round;
    /// `None` marks "no path". Empty when verification was disabled.
    #[pyo3(get)]
    pub matrices: Vec<Vec<Vec<Option<i64>>>>,
    #[pyo3(get)]
    pub critical_length: i64,
    #[pyo3(get)]
    pub critical_path: Vec<u32>,
    #[pyo3(get)]
    pub event_dates: Option<Vec<EventDates>>,
    report: String,
}

impl From<&NetworkAnalysis> for PyNetworkAnalysis {
    fn from(analysis: &NetworkAnalysis) -> Self {
        let matrices = analysis
            .verification
            .iter()
            .flat_map(|v| std::iter::once(&v.initial).chain(v.rounds.iter()))
            .map(DistanceMatrix::to_nested)
            .collect();

        Self {
            nodes: analysis.network.nodes().to_vec(),
            activities: analysis.network.activity_records(),
            matrices,
            critical_length: analysis.critical_length(),
            critical_path: analysis.network.critical_path(),
            event_dates: analysis.event_dates.clone(),
            report: report::AnalysisReport(analysis).to_string(),
        }
    }
}

#[pymethods]
impl PyNetworkAnalysis {
    /// Console tables for events, works and relaxation matrices.
    fn report(&self) -> String {
        self.report.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "NetworkAnalysis(nodes={}, activities={}, critical_length={})",
            self.nodes.len(),
            self.activities.len(),
            self.critical_length
        )
    }
}

/// Evaluate a project network.
///
/// # Arguments
/// * `node_ids` - Event ids; the first is the source and the last the sink
/// * `activities` - (from_id, to_id, duration) triples
/// * `config` - Evaluation options (defaults when omitted)
///
/// # Raises
/// * ValueError for unknown node ids, cyclic or disconnected networks, or a
///   failed cross-check
#[pyfunction]
#[pyo3(signature = (node_ids, activities, config=None))]
fn evaluate_network(
    node_ids: Vec<u32>,
    activities: Vec<ActivityDef>,
    config: Option<EvaluationConfig>,
) -> PyResult<PyNetworkAnalysis> {
    let config = config.unwrap_or_default();
    match analyze(&node_ids, &activities, &config) {
        Ok(analysis) => Ok(PyNetworkAnalysis::from(&analysis)),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Node ids and topology of the reference project.
#[pyfunction]
fn reference_network() -> (Vec<u32>, Vec<ActivityDef>) {
    (reference_node_ids(), REFERENCE_TOPOLOGY.to_vec())
}

/// The cpm.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Node>()?;
    m.add_class::<ActivityRecord>()?;
    m.add_class::<EventDates>()?;
    m.add_class::<EvaluationConfig>()?;
    m.add_class::<PyNetworkAnalysis>()?;

    m.add_function(wrap_pyfunction!(evaluate_network, m)?)?;
    m.add_function(wrap_pyfunction!(reference_network, m)?)?;

    Ok(())
}
