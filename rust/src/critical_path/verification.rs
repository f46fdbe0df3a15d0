//! Independent critical length check by all-pairs longest-path relaxation.

use thiserror::Error;

use crate::network::Network;
use crate::{log_debug, log_phases, log_rounds};

/// Errors from the relaxation check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Sink is not reachable from the source in the distance matrix")]
    SinkUnreachable,
    #[error("Critical length mismatch: sweeps give {sweep}, relaxation gives {relaxation}")]
    LengthMismatch { sweep: i64, relaxation: i64 },
}

/// Square matrix of longest known path lengths; `None` means no path.
///
/// `None` is distinct from `Some(0)`, which is a zero-length activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<Option<i64>>,
}

impl DistanceMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Direct activity lengths. Parallel activities keep the longest.
    pub fn from_network(network: &Network) -> Self {
        let mut matrix = Self::new(network.len());
        for activity in network.activities() {
            let length = activity.length();
            let cell = &mut matrix.cells[activity.from * matrix.size + activity.to];
            *cell = Some(cell.map_or(length, |current| current.max(length)));
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> Option<i64> {
        self.cells[i * self.size + j]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<i64>]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn to_nested(&self) -> Vec<Vec<Option<i64>>> {
        self.rows().map(<[Option<i64>]>::to_vec).collect()
    }

    /// One relaxation round through intermediate node `k`, read entirely
    /// from `self`.
    fn relax_through(&self, k: usize) -> Self {
        let mut next = self.clone();
        for i in 0..self.size {
            let Some(head) = self.get(i, k) else {
                continue;
            };
            for j in 0..self.size {
                if let Some(tail) = self.get(k, j) {
                    let candidate = head + tail;
                    let cell = &mut next.cells[i * self.size + j];
                    *cell = Some(cell.map_or(candidate, |current| current.max(candidate)));
                }
            }
        }
        next
    }
}

/// Matrices and result of a relaxation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    /// Direct activity lengths before any round.
    pub initial: DistanceMatrix,
    /// Matrix after each round, one per intermediate node.
    pub rounds: Vec<DistanceMatrix>,
    /// Longest source-to-sink path length.
    pub critical_length: i64,
}

impl Verification {
    pub fn final_matrix(&self) -> &DistanceMatrix {
        self.rounds.last().unwrap_or(&self.initial)
    }
}

/// Recomputes the critical length without using the sweep results.
#[derive(Clone, Debug, Default)]
pub struct PathVerifier {
    verbosity: u8,
}

impl PathVerifier {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    pub fn verify(&self, network: &Network) -> Result<Verification, VerificationError> {
        let initial = DistanceMatrix::from_network(network);
        let mut rounds: Vec<DistanceMatrix> = Vec::with_capacity(initial.size());

        let mut current = initial.clone();
        for k in 0..initial.size() {
            current = current.relax_through(k);
            log_rounds!(
                self.verbosity,
                "  Relaxation round {} (via node {})",
                k + 1,
                network.nodes()[k].id
            );
            log_debug!(self.verbosity, "    {:?}", current.to_nested());
            rounds.push(current.clone());
        }

        let (source, sink) = (network.source(), network.sink());
        let critical_length = if source == sink {
            0
        } else {
            current
                .get(source, sink)
                .ok_or(VerificationError::SinkUnreachable)?
        };

        log_phases!(self.verbosity, "Relaxation critical length {}", critical_length);

        Ok(Verification {
            initial,
            rounds,
            critical_length,
        })
    }
}

/// Compare the sweep project length with the relaxation result.
pub fn cross_check(project_length: i64, verification: &Verification) -> Result<i64, VerificationError> {
    if project_length == verification.critical_length {
        Ok(project_length)
    } else {
        Err(VerificationError::LengthMismatch {
            sweep: project_length,
            relaxation: verification.critical_length,
        })
    }
}
