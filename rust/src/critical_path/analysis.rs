//! One-shot evaluation pipeline: build, sweep, verify.

use thiserror::Error;

use crate::calendar::{anchor_events, CalendarError, EventDates};
use crate::config::EvaluationConfig;
use crate::log_phases;
use crate::network::{ActivityDef, Network, NetworkError};

use super::evaluation::{ScheduleEvaluator, ScheduleSummary, SweepError};
use super::verification::{cross_check, PathVerifier, Verification, VerificationError};

/// Any failure of an analysis run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Final state of an evaluated network.
#[derive(Clone, Debug)]
pub struct NetworkAnalysis {
    pub network: Network,
    pub summary: ScheduleSummary,
    /// Present when verification was enabled.
    pub verification: Option<Verification>,
    /// Present when a start date was configured.
    pub event_dates: Option<Vec<EventDates>>,
}

impl NetworkAnalysis {
    pub fn critical_length(&self) -> i64 {
        self.summary.project_length
    }
}

/// Build the network and run every evaluation phase in order.
pub fn analyze(
    node_ids: &[u32],
    topology: &[ActivityDef],
    config: &EvaluationConfig,
) -> Result<NetworkAnalysis, AnalysisError> {
    let verbosity = config.verbosity;
    let mut network = Network::build(node_ids, topology)?;
    log_phases!(
        verbosity,
        "Built network: {} nodes, {} activities",
        network.len(),
        network.activities().len()
    );

    let summary = ScheduleEvaluator::new(verbosity).evaluate(&mut network)?;

    let verification = if config.verify {
        let verification = PathVerifier::new(verbosity).verify(&network)?;
        cross_check(summary.project_length, &verification)?;
        Some(verification)
    } else {
        None
    };

    let event_dates = config
        .start_date
        .map(|start| anchor_events(&network, start))
        .transpose()?;

    Ok(NetworkAnalysis {
        network,
        summary,
        verification,
        event_dates,
    })
}
