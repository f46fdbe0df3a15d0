//! Network construction from a node-id sequence and a topology table.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::models::{Activity, ActivityRecord, Node};

/// One row of a topology table: (from-id, to-id, duration).
pub type ActivityDef = (u32, u32, u32);

/// The 9-event, 11-activity reference project.
pub const REFERENCE_TOPOLOGY: [ActivityDef; 11] = [
    (1, 2, 3),
    (1, 3, 5),
    (1, 4, 2),
    (2, 5, 4),
    (3, 6, 3),
    (4, 6, 1),
    (5, 7, 4),
    (5, 8, 3),
    (6, 9, 2),
    (7, 9, 5),
    (8, 9, 3),
];

/// Event ids of the reference project.
pub fn reference_node_ids() -> Vec<u32> {
    (1..=9).collect()
}

/// Errors raised while building a network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Network has no nodes")]
    EmptyNetwork,
    #[error("Duplicate node id: {0}")]
    DuplicateNode(u32),
    #[error("Activity #{activity} references unknown node id {id}")]
    UnknownNode { activity: usize, id: u32 },
}

/// An activity-on-arrow network.
///
/// The first node is the project source and the last node is the sink.
#[derive(Clone, Debug)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) activities: Vec<Activity>,
}

impl Network {
    /// Build a network over `node_ids` with the given topology.
    ///
    /// Predecessors are linked by an exhaustive pairwise scan, so the table
    /// does not need to be in topological order. Nothing is returned if any
    /// row references an id outside `node_ids`.
    pub fn build(node_ids: &[u32], topology: &[ActivityDef]) -> Result<Self, NetworkError> {
        if node_ids.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }

        let mut index: FxHashMap<u32, usize> =
            FxHashMap::with_capacity_and_hasher(node_ids.len(), Default::default());
        for (idx, &id) in node_ids.iter().enumerate() {
            if index.insert(id, idx).is_some() {
                return Err(NetworkError::DuplicateNode(id));
            }
        }

        let resolve = |activity: usize, id: u32| {
            index
                .get(&id)
                .copied()
                .ok_or(NetworkError::UnknownNode { activity, id })
        };

        let mut activities = topology
            .iter()
            .enumerate()
            .map(|(i, &(from, to, duration))| {
                Ok(Activity::new(resolve(i, from)?, resolve(i, to)?, duration))
            })
            .collect::<Result<Vec<_>, NetworkError>>()?;

        let predecessors: Vec<Vec<usize>> = activities
            .iter()
            .map(|b| {
                activities
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.to == b.from)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();
        for (activity, preds) in activities.iter_mut().zip(predecessors) {
            activity.predecessors = preds;
        }

        Ok(Self {
            nodes: node_ids.iter().map(|&id| Node::new(id)).collect(),
            activities,
        })
    }

    /// The reference project from [`REFERENCE_TOPOLOGY`].
    pub fn reference() -> Result<Self, NetworkError> {
        Self::build(&reference_node_ids(), &REFERENCE_TOPOLOGY)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> usize {
        0
    }

    pub fn sink(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Indices of activities ending at node `idx`.
    pub fn incoming(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.activities
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.to == idx)
            .map(|(i, _)| i)
    }

    /// Indices of activities starting at node `idx`.
    pub fn outgoing(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.activities
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.from == idx)
            .map(|(i, _)| i)
    }

    /// Indices of activities with zero total slack.
    pub fn critical_activities(&self) -> Vec<usize> {
        self.activities
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_critical())
            .map(|(i, _)| i)
            .collect()
    }

    /// Node ids along one source-to-sink chain of critical activities.
    ///
    /// Ties are broken by activity order. Empty until the network has been
    /// evaluated.
    pub fn critical_path(&self) -> Vec<u32> {
        let sink = self.sink();
        let mut current = self.source();
        if !self.nodes[current].is_critical() {
            return Vec::new();
        }

        let mut path = vec![self.nodes[current].id];
        // A chain in a DAG visits each node at most once.
        for _ in 0..self.nodes.len() {
            if current == sink {
                return path;
            }
            let next = self
                .outgoing(current)
                .map(|i| &self.activities[i])
                .find(|a| a.is_critical() && self.nodes[a.to].is_critical());
            match next {
                Some(activity) => {
                    current = activity.to;
                    path.push(self.nodes[current].id);
                }
                None => return Vec::new(),
            }
        }
        Vec::new()
    }

    /// Activity `idx` with node ids resolved, if it exists.
    pub fn record(&self, idx: usize) -> Option<ActivityRecord> {
        let activity = self.activities.get(idx)?;
        let pair = |a: &Activity| (self.nodes[a.from].id, self.nodes[a.to].id);
        let (from_id, to_id) = pair(activity);
        Some(ActivityRecord {
            from_id,
            to_id,
            duration: activity.duration,
            predecessors: activity
                .predecessors
                .iter()
                .map(|&p| pair(&self.activities[p]))
                .collect(),
            earliest_finish: activity.earliest_finish,
            latest_start: activity.latest_start,
            total_slack: activity.total_slack,
            free_slack: activity.free_slack,
        })
    }

    /// Every activity with node ids resolved, in table order.
    pub fn activity_records(&self) -> Vec<ActivityRecord> {
        (0..self.activities.len())
            .filter_map(|i| self.record(i))
            .collect()
    }

    pub(crate) fn clear_times(&mut self) {
        self.nodes.iter_mut().for_each(Node::clear);
        self.activities.iter_mut().for_each(Activity::clear);
    }
}
