//! Critical Path Method over an activity-on-arrow network.
//!
//! [`ScheduleEvaluator`] computes event times and slacks by forward and
//! backward sweeps. [`PathVerifier`] recomputes the critical length by
//! all-pairs longest-path relaxation so the two results can be compared.

mod analysis;
mod evaluation;
mod verification;

pub use analysis::{analyze, AnalysisError, NetworkAnalysis};
pub use evaluation::{ScheduleEvaluator, ScheduleSummary, Sweep, SweepError};
pub use verification::{cross_check, DistanceMatrix, PathVerifier, Verification, VerificationError};
