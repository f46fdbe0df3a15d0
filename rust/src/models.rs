//! Core data types for the activity-on-arrow network.
//!
//! Nodes and activities live in a [`Network`](crate::network::Network) arena.
//! Activities refer to nodes and to their predecessor activities by index,
//! never by embedded copies.

use pyo3::prelude::*;
use std::hash::{Hash, Hasher};

/// A schedule event.
///
/// Time fields stay `None` until the evaluator computes them.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Node {
    #[pyo3(get)]
    pub id: u32,
    /// Earliest time the event can occur (T_r).
    #[pyo3(get)]
    pub earliest: Option<i64>,
    /// Latest time the event can occur without delaying the project (T_p).
    #[pyo3(get)]
    pub latest: Option<i64>,
    /// `latest - earliest` (R). Zero marks the event as critical.
    #[pyo3(get)]
    pub slack: Option<i64>,
}

impl Node {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            earliest: None,
            latest: None,
            slack: None,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.slack == Some(0)
    }

    pub(crate) fn clear(&mut self) {
        self.earliest = None;
        self.latest = None;
        self.slack = None;
    }
}

#[pymethods]
impl Node {
    fn __repr__(&self) -> String {
        format!(
            "Node(id={}, earliest={:?}, latest={:?}, slack={:?})",
            self.id, self.earliest, self.latest, self.slack
        )
    }
}

// Two nodes are the same event iff they carry the same id, whatever their
// computed times.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A unit of work between two events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    /// Index of the start event in the network's node list.
    pub from: usize,
    /// Index of the finish event in the network's node list.
    pub to: usize,
    pub duration: u32,
    /// Indices of activities whose `to` equals this activity's `from`.
    pub predecessors: Vec<usize>,
    /// Earliest finish (t_ro).
    pub earliest_finish: Option<i64>,
    /// Latest start (t_pn).
    pub latest_start: Option<i64>,
    /// Total slack (r_p): delay allowed without moving the project end.
    pub total_slack: Option<i64>,
    /// Free slack (r_s). Negative values are meaningful.
    pub free_slack: Option<i64>,
}

impl Activity {
    pub fn new(from: usize, to: usize, duration: u32) -> Self {
        Self {
            from,
            to,
            duration,
            predecessors: Vec::new(),
            earliest_finish: None,
            latest_start: None,
            total_slack: None,
            free_slack: None,
        }
    }

    #[inline]
    pub fn length(&self) -> i64 {
        i64::from(self.duration)
    }

    pub fn is_critical(&self) -> bool {
        self.total_slack == Some(0)
    }

    pub(crate) fn clear(&mut self) {
        self.earliest_finish = None;
        self.latest_start = None;
        self.total_slack = None;
        self.free_slack = None;
    }
}

/// Activity with node indices resolved to node ids, for reporting.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityRecord {
    #[pyo3(get)]
    pub from_id: u32,
    #[pyo3(get)]
    pub to_id: u32,
    #[pyo3(get)]
    pub duration: u32,
    /// Predecessor activities as (from_id, to_id) pairs.
    #[pyo3(get)]
    pub predecessors: Vec<(u32, u32)>,
    #[pyo3(get)]
    pub earliest_finish: Option<i64>,
    #[pyo3(get)]
    pub latest_start: Option<i64>,
    #[pyo3(get)]
    pub total_slack: Option<i64>,
    #[pyo3(get)]
    pub free_slack: Option<i64>,
}

impl ActivityRecord {
    /// Label in the `from-to` form used by the report tables.
    pub fn label(&self) -> String {
        format!("{}-{}", self.from_id, self.to_id)
    }
}

#[pymethods]
impl ActivityRecord {
    fn __repr__(&self) -> String {
        format!(
            "ActivityRecord({}, duration={}, total_slack={:?}, free_slack={:?})",
            self.label(),
            self.duration,
            self.total_slack,
            self.free_slack
        )
    }
}
