//! Event times and slacks via forward and backward sweeps.

use std::fmt;

use thiserror::Error;

use crate::network::Network;
use crate::{log_debug, log_phases, log_rounds};

/// Which sweep an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Forward,
    Backward,
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sweep::Forward => write!(f, "forward"),
            Sweep::Backward => write!(f, "backward"),
        }
    }
}

/// Structural errors detected while sweeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    #[error("Non-acyclic network: {sweep} sweep did not converge after {rounds} rounds")]
    Cyclic { sweep: Sweep, rounds: usize },
    #[error("Disconnected network: node {node} is unreachable in the {sweep} sweep")]
    Disconnected { sweep: Sweep, node: u32 },
    #[error("Sink has no earliest time after the forward sweep")]
    UnsetSink,
}

/// Outcome of a successful evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleSummary {
    /// Earliest time of the sink event.
    pub project_length: i64,
    pub forward_rounds: usize,
    pub backward_rounds: usize,
    /// Indices of activities with zero total slack.
    pub critical_activities: Vec<usize>,
}

/// Computes earliest/latest event times and activity slacks in place.
#[derive(Clone, Debug, Default)]
pub struct ScheduleEvaluator {
    verbosity: u8,
}

impl ScheduleEvaluator {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    /// Evaluate the network.
    ///
    /// Derived fields are cleared first, so running twice on the same
    /// network gives the same result. Each sweep is capped at one round per
    /// node; a sweep that stops making progress fails instead of spinning.
    pub fn evaluate(&self, network: &mut Network) -> Result<ScheduleSummary, SweepError> {
        network.clear_times();

        let forward_rounds = self.forward_sweep(network)?;
        let backward_rounds = self.backward_sweep(network)?;
        self.compute_slacks(network);

        let project_length = network.nodes[network.sink()]
            .earliest
            .ok_or(SweepError::UnsetSink)?;
        let critical_activities = network.critical_activities();

        log_phases!(
            self.verbosity,
            "Project length {} (forward {} rounds, backward {} rounds, {} critical activities)",
            project_length,
            forward_rounds,
            backward_rounds,
            critical_activities.len()
        );

        Ok(ScheduleSummary {
            project_length,
            forward_rounds,
            backward_rounds,
            critical_activities,
        })
    }

    /// Earliest times. A node is assigned once every incoming activity has
    /// an earliest finish, taking the maximum of them.
    fn forward_sweep(&self, network: &mut Network) -> Result<usize, SweepError> {
        let cap = network.len();
        let source = network.source();
        // The source is fixed at 0, so anything feeding it would be skipped.
        if network.incoming(source).next().is_some() {
            return Err(SweepError::Cyclic {
                sweep: Sweep::Forward,
                rounds: 0,
            });
        }
        network.nodes[source].earliest = Some(0);

        let mut rounds = 0;
        while rounds < cap && network.nodes.iter().any(|n| n.earliest.is_none()) {
            rounds += 1;
            let Network { nodes, activities } = &mut *network;

            for activity in activities.iter_mut() {
                if let Some(start) = nodes[activity.from].earliest {
                    activity.earliest_finish = Some(start + activity.length());
                }
            }

            let mut assigned = 0;
            for (idx, node) in nodes.iter_mut().enumerate() {
                if node.earliest.is_some() {
                    continue;
                }
                let finishes: Option<Vec<i64>> = activities
                    .iter()
                    .filter(|a| a.to == idx)
                    .map(|a| a.earliest_finish)
                    .collect();
                if let Some(earliest) = finishes.and_then(|f| f.into_iter().max()) {
                    log_debug!(self.verbosity, "    node {} earliest = {}", node.id, earliest);
                    node.earliest = Some(earliest);
                    assigned += 1;
                }
            }

            log_rounds!(self.verbosity, "  Forward round {}: {} nodes set", rounds, assigned);
            if assigned == 0 {
                break;
            }
        }

        if network.nodes.iter().any(|n| n.earliest.is_none()) {
            return Err(stall_error(network, Sweep::Forward, rounds));
        }
        Ok(rounds)
    }

    /// Latest times. The sink's latest time is its earliest time; a node is
    /// assigned once every outgoing activity has a latest start, taking the
    /// minimum of them.
    fn backward_sweep(&self, network: &mut Network) -> Result<usize, SweepError> {
        let cap = network.len();
        let sink = network.sink();
        if network.outgoing(sink).next().is_some() {
            return Err(SweepError::Cyclic {
                sweep: Sweep::Backward,
                rounds: 0,
            });
        }
        let finish = network.nodes[sink].earliest.ok_or(SweepError::UnsetSink)?;
        network.nodes[sink].latest = Some(finish);

        let mut rounds = 0;
        while rounds < cap && network.nodes.iter().any(|n| n.latest.is_none()) {
            rounds += 1;
            let Network { nodes, activities } = &mut *network;

            for activity in activities.iter_mut() {
                if let Some(end) = nodes[activity.to].latest {
                    activity.latest_start = Some(end - activity.length());
                }
            }

            let mut assigned = 0;
            for (idx, node) in nodes.iter_mut().enumerate() {
                if node.latest.is_some() {
                    continue;
                }
                let starts: Option<Vec<i64>> = activities
                    .iter()
                    .filter(|a| a.from == idx)
                    .map(|a| a.latest_start)
                    .collect();
                if let Some(latest) = starts.and_then(|s| s.into_iter().min()) {
                    log_debug!(self.verbosity, "    node {} latest = {}", node.id, latest);
                    node.latest = Some(latest);
                    assigned += 1;
                }
            }

            log_rounds!(self.verbosity, "  Backward round {}: {} nodes set", rounds, assigned);
            if assigned == 0 {
                break;
            }
        }

        if network.nodes.iter().any(|n| n.latest.is_none()) {
            return Err(stall_error(network, Sweep::Backward, rounds));
        }
        Ok(rounds)
    }

    fn compute_slacks(&self, network: &mut Network) {
        let Network { nodes, activities } = &mut *network;

        for node in nodes.iter_mut() {
            node.slack = node.latest.zip(node.earliest).map(|(l, e)| l - e);
        }

        for activity in activities.iter_mut() {
            let from = &nodes[activity.from];
            let to = &nodes[activity.to];
            let length = activity.length();

            // Activities leaving a node assigned in a sweep's last round
            // never got a candidate, so derive all of them from final times.
            activity.earliest_finish = from.earliest.map(|e| e + length);
            activity.latest_start = to.latest.map(|l| l - length);
            activity.total_slack = to.latest.zip(from.earliest).map(|(l, e)| l - e - length);
            activity.free_slack = to.earliest.zip(from.latest).map(|(e, l)| e - l - length);
        }
    }
}

/// Classify a sweep that ended with unset nodes.
///
/// An unset node with no activity feeding it (forward) or leaving it
/// (backward) is cut off from the source or sink. Otherwise every unset node
/// waits on another unset node, which only happens around a cycle.
fn stall_error(network: &Network, sweep: Sweep, rounds: usize) -> SweepError {
    let dangling = network
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| match sweep {
            Sweep::Forward => node.earliest.is_none(),
            Sweep::Backward => node.latest.is_none(),
        })
        .find(|&(idx, _)| match sweep {
            Sweep::Forward => network.incoming(idx).next().is_none(),
            Sweep::Backward => network.outgoing(idx).next().is_none(),
        });

    match dangling {
        Some((_, node)) => SweepError::Disconnected {
            sweep,
            node: node.id,
        },
        None => SweepError::Cyclic { sweep, rounds },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critical_path::PathVerifier;
    use crate::network::ActivityDef;

    fn evaluate(node_ids: &[u32], topology: &[ActivityDef]) -> (Network, ScheduleSummary) {
        let mut network = Network::build(node_ids, topology).unwrap();
        let summary = ScheduleEvaluator::default().evaluate(&mut network).unwrap();
        (network, summary)
    }

    fn node_times(network: &Network) -> Vec<(i64, i64, i64)> {
        network
            .nodes()
            .iter()
            .map(|n| (n.earliest.unwrap(), n.latest.unwrap(), n.slack.unwrap()))
            .collect()
    }

    #[test]
    fn test_reference_node_times() {
        let mut network = Network::reference().unwrap();
        let summary = ScheduleEvaluator::default().evaluate(&mut network).unwrap();

        assert_eq!(summary.project_length, 16);
        assert_eq!(summary.forward_rounds, 4);
        assert_eq!(summary.backward_rounds, 4);
        assert_eq!(
            node_times(&network),
            vec![
                (0, 0, 0),
                (3, 3, 0),
                (5, 11, 6),
                (2, 13, 11),
                (7, 7, 0),
                (8, 14, 6),
                (11, 11, 0),
                (10, 13, 3),
                (16, 16, 0),
            ]
        );
    }

    #[test]
    fn test_reference_activity_slacks() {
        let mut network = Network::reference().unwrap();
        ScheduleEvaluator::default().evaluate(&mut network).unwrap();

        let rows: Vec<(String, i64, i64, i64, i64)> = network
            .activity_records()
            .into_iter()
            .map(|r| {
                (
                    r.label(),
                    r.earliest_finish.unwrap(),
                    r.latest_start.unwrap(),
                    r.total_slack.unwrap(),
                    r.free_slack.unwrap(),
                )
            })
            .collect();

        let expected = [
            ("1-2", 3, 0, 0, 0),
            ("1-3", 5, 6, 6, 0),
            ("1-4", 2, 11, 11, 0),
            ("2-5", 7, 3, 0, 0),
            ("3-6", 8, 11, 6, -6),
            ("4-6", 3, 13, 11, -6),
            ("5-7", 11, 7, 0, 0),
            ("5-8", 10, 10, 3, 0),
            ("6-9", 10, 14, 6, 0),
            ("7-9", 16, 11, 0, 0),
            ("8-9", 13, 13, 3, 0),
        ];
        for (row, (label, ef, ls, total, free)) in rows.iter().zip(expected) {
            assert_eq!(row, &(label.to_string(), ef, ls, total, free));
        }
    }

    #[test]
    fn test_reference_critical_path() {
        let mut network = Network::reference().unwrap();
        let summary = ScheduleEvaluator::default().evaluate(&mut network).unwrap();

        let labels: Vec<String> = summary
            .critical_activities
            .iter()
            .filter_map(|&i| network.record(i))
            .map(|r| r.label())
            .collect();
        assert_eq!(labels, vec!["1-2", "2-5", "5-7", "7-9"]);
        assert_eq!(network.critical_path(), vec![1, 2, 5, 7, 9]);
    }

    #[test]
    fn test_single_activity() {
        let (network, summary) = evaluate(&[1, 2], &[(1, 2, 7)]);
        assert_eq!(summary.project_length, 7);
        assert_eq!(node_times(&network), vec![(0, 0, 0), (7, 7, 0)]);
        assert_eq!(network.activities()[0].total_slack, Some(0));
        assert_eq!(network.activities()[0].free_slack, Some(0));
    }

    #[test]
    fn test_zero_duration_activity() {
        let (network, summary) = evaluate(&[1, 2, 3], &[(1, 2, 0), (2, 3, 4), (1, 3, 1)]);
        assert_eq!(summary.project_length, 4);
        assert_eq!(network.critical_path(), vec![1, 2, 3]);
        assert_eq!(network.activities()[2].total_slack, Some(3));
    }

    #[test]
    fn test_slack_invariants() {
        let (network, _) = evaluate(&crate::network::reference_node_ids(), &crate::REFERENCE_TOPOLOGY);

        let source = &network.nodes()[network.source()];
        let sink = &network.nodes()[network.sink()];
        assert_eq!(source.earliest, Some(0));
        assert!(source.is_critical());
        assert!(sink.is_critical());

        for node in network.nodes() {
            assert!(node.slack.unwrap() >= 0, "node {}", node.id);
        }
        for activity in network.activities() {
            assert!(activity.free_slack.unwrap() <= activity.total_slack.unwrap());
        }
    }

    #[test]
    fn test_invariants_across_networks() {
        let networks: Vec<(Vec<u32>, Vec<ActivityDef>)> = vec![
            // Diamond
            (vec![1, 2, 3, 4], vec![(1, 2, 2), (1, 3, 5), (2, 4, 3), (3, 4, 1)]),
            // Parallel activities between the same events
            (vec![1, 2, 3], vec![(1, 2, 2), (1, 2, 6), (2, 3, 1), (1, 3, 4)]),
            // Zero-duration chain with a zero-duration shortcut
            (vec![1, 2, 3, 4], vec![(1, 2, 0), (2, 3, 0), (3, 4, 0), (1, 4, 0)]),
            // Wide fan-out / fan-in
            (
                vec![1, 2, 3, 4, 5, 6],
                vec![
                    (1, 2, 1),
                    (1, 3, 4),
                    (1, 4, 2),
                    (1, 5, 7),
                    (2, 6, 3),
                    (3, 6, 1),
                    (4, 6, 5),
                    (5, 6, 0),
                ],
            ),
            (
                crate::network::reference_node_ids(),
                crate::REFERENCE_TOPOLOGY.to_vec(),
            ),
        ];

        for (ids, topology) in &networks {
            let (network, summary) = evaluate(ids, topology);
            let source = &network.nodes()[network.source()];
            let sink = &network.nodes()[network.sink()];

            assert_eq!(source.earliest, Some(0), "network {:?}", ids);
            assert!(source.is_critical() && sink.is_critical(), "network {:?}", ids);
            for node in network.nodes() {
                assert!(node.slack.unwrap() >= 0, "node {} of {:?}", node.id, ids);
            }
            for activity in network.activities() {
                assert!(activity.free_slack.unwrap() <= activity.total_slack.unwrap());
            }

            let verification = PathVerifier::default().verify(&network).unwrap();
            assert_eq!(Some(verification.critical_length), sink.earliest);
            assert_eq!(summary.project_length, verification.critical_length);
        }
    }

    #[test]
    fn test_re_evaluation_is_identical() {
        let mut network = Network::reference().unwrap();
        let evaluator = ScheduleEvaluator::default();
        let first = evaluator.evaluate(&mut network).unwrap();
        let nodes = node_times(&network);
        let activities = network.activities().to_vec();

        let second = evaluator.evaluate(&mut network).unwrap();
        assert_eq!(first, second);
        assert_eq!(nodes, node_times(&network));
        assert_eq!(activities, network.activities());
    }

    #[test]
    fn test_table_order_does_not_matter() {
        let mut reversed = crate::REFERENCE_TOPOLOGY.to_vec();
        reversed.reverse();
        let (network, summary) = evaluate(&crate::network::reference_node_ids(), &reversed);
        let (reference, _) = evaluate(&crate::network::reference_node_ids(), &crate::REFERENCE_TOPOLOGY);

        assert_eq!(summary.project_length, 16);
        assert_eq!(node_times(&network), node_times(&reference));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut network =
            Network::build(&[1, 2, 3, 4], &[(1, 2, 1), (2, 3, 1), (3, 2, 1), (3, 4, 1)]).unwrap();
        let err = ScheduleEvaluator::default()
            .evaluate(&mut network)
            .unwrap_err();
        assert_eq!(
            err,
            SweepError::Cyclic {
                sweep: Sweep::Forward,
                rounds: 1
            }
        );
        assert!(err.to_string().starts_with("Non-acyclic network"));
    }

    #[test]
    fn test_cycle_through_source_and_sink() {
        let mut network = Network::build(&[1, 2], &[(1, 2, 1), (2, 1, 1)]).unwrap();
        assert_eq!(
            ScheduleEvaluator::default().evaluate(&mut network),
            Err(SweepError::Cyclic {
                sweep: Sweep::Forward,
                rounds: 0
            })
        );

        // 1 -> 2 -> ... -> 40 -> 1
        let ids: Vec<u32> = (1..=40).collect();
        let mut ring: Vec<ActivityDef> = (1..40).map(|i| (i, i + 1, 1)).collect();
        ring.push((40, 1, 1));
        let mut network = Network::build(&ids, &ring).unwrap();
        let err = ScheduleEvaluator::default()
            .evaluate(&mut network)
            .unwrap_err();
        assert!(err.to_string().starts_with("Non-acyclic network"));
    }

    #[test]
    fn test_activity_out_of_sink_is_reported() {
        // Node 2 follows the sink 3
        let mut network =
            Network::build(&[1, 2, 3], &[(1, 2, 1), (1, 3, 5), (3, 2, 1)]).unwrap();
        assert_eq!(
            ScheduleEvaluator::default().evaluate(&mut network),
            Err(SweepError::Cyclic {
                sweep: Sweep::Backward,
                rounds: 0
            })
        );
    }

    #[test]
    fn test_unreachable_node_is_reported() {
        // Node 3 has no incoming activity, so it is not reachable from 1
        let mut network =
            Network::build(&[1, 2, 3, 4], &[(1, 2, 2), (3, 4, 1), (2, 4, 1)]).unwrap();
        let err = ScheduleEvaluator::default()
            .evaluate(&mut network)
            .unwrap_err();
        assert_eq!(
            err,
            SweepError::Disconnected {
                sweep: Sweep::Forward,
                node: 3
            }
        );
    }

    #[test]
    fn test_dead_end_is_reported() {
        // Node 2 never reaches the sink
        let mut network = Network::build(&[1, 2, 3], &[(1, 2, 1), (1, 3, 2)]).unwrap();
        let err = ScheduleEvaluator::default()
            .evaluate(&mut network)
            .unwrap_err();
        assert_eq!(
            err,
            SweepError::Disconnected {
                sweep: Sweep::Backward,
                node: 2
            }
        );
    }
}
