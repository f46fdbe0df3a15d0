//! Projection of event times onto calendar days.

use chrono::{Days, NaiveDate};
use pyo3::prelude::*;
use thiserror::Error;

use crate::network::Network;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Node {0} has not been scheduled")]
    Unscheduled(u32),
    #[error("Node {0} falls outside the representable date range")]
    OutOfRange(u32),
}

/// Calendar window of one event.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDates {
    #[pyo3(get)]
    pub id: u32,
    #[pyo3(get)]
    pub earliest: NaiveDate,
    #[pyo3(get)]
    pub latest: NaiveDate,
}

#[pymethods]
impl EventDates {
    fn __repr__(&self) -> String {
        format!(
            "EventDates(id={}, earliest={}, latest={})",
            self.id, self.earliest, self.latest
        )
    }
}

fn offset(start: NaiveDate, days: i64, id: u32) -> Result<NaiveDate, CalendarError> {
    let days = u64::try_from(days).map_err(|_| CalendarError::OutOfRange(id))?;
    start
        .checked_add_days(Days::new(days))
        .ok_or(CalendarError::OutOfRange(id))
}

/// Map each evaluated node's times to dates, time 0 being `start` and one
/// time unit being one day.
pub fn anchor_events(network: &Network, start: NaiveDate) -> Result<Vec<EventDates>, CalendarError> {
    network
        .nodes()
        .iter()
        .map(|node| {
            let (Some(earliest), Some(latest)) = (node.earliest, node.latest) else {
                return Err(CalendarError::Unscheduled(node.id));
            };
            Ok(EventDates {
                id: node.id,
                earliest: offset(start, earliest, node.id)?,
                latest: offset(start, latest, node.id)?,
            })
        })
        .collect()
}
