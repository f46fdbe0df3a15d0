//! Plain-text tables for evaluated networks.
//!
//! Each view borrows the evaluated data and renders through `Display`.
//! Unset values are shown as `-`.

use std::fmt;

use crate::critical_path::{DistanceMatrix, NetworkAnalysis};
use crate::models::{ActivityRecord, Node};

struct Cell(Option<i64>);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(&value, f),
            None => f.pad("-"),
        }
    }
}

/// Event table: number, T_r, T_p, R.
pub struct EventsTable<'a>(pub &'a [Node]);

impl fmt::Display for EventsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(28);
        writeln!(f, "{}", rule)?;
        writeln!(f, "| Number | T_r | T_p |   R |")?;
        writeln!(f, "{}", rule)?;
        for node in self.0 {
            writeln!(
                f,
                "| {:>6} | {:>3} | {:>3} | {:>3} |",
                node.id,
                Cell(node.earliest),
                Cell(node.latest),
                Cell(node.slack)
            )?;
        }
        writeln!(f, "{}", rule)
    }
}

/// Work table: id pair, length, previous works, t_ro, t_pn, r_p, r_s.
pub struct ActivitiesTable<'a>(pub &'a [ActivityRecord]);

impl fmt::Display for ActivitiesTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(58);
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "| Number | Length | Previous | t_ro | t_pn |  r_p |  r_s |"
        )?;
        writeln!(f, "{}", rule)?;
        for record in self.0 {
            let previous = if record.predecessors.is_empty() {
                "-".to_string()
            } else {
                record
                    .predecessors
                    .iter()
                    .map(|(from, to)| format!("{}-{}", from, to))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            writeln!(
                f,
                "| {:>6} | {:>6} | {:>8} | {:>4} | {:>4} | {:>4} | {:>4} |",
                record.label(),
                record.duration,
                previous,
                Cell(record.earliest_finish),
                Cell(record.latest_start),
                Cell(record.total_slack),
                Cell(record.free_slack)
            )?;
        }
        writeln!(f, "{}", rule)
    }
}

pub struct MatrixView<'a>(pub &'a DistanceMatrix);

impl fmt::Display for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.rows() {
            write!(f, "| ")?;
            for &value in row {
                write!(f, "{:>4} ", Cell(value))?;
            }
            writeln!(f, " |")?;
        }
        Ok(())
    }
}

/// Full console report of an analysis.
pub struct AnalysisReport<'a>(pub &'a NetworkAnalysis);

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        writeln!(f, "Events:")?;
        write!(f, "{}", EventsTable(analysis.network.nodes()))?;
        writeln!(f, "\nWorks:")?;
        write!(f, "{}", ActivitiesTable(&analysis.network.activity_records()))?;

        if let Some(verification) = &analysis.verification {
            writeln!(f, "\nFloyd algorithm:")?;
            writeln!(f, "\nMatrix on iteration 0:")?;
            write!(f, "{}", MatrixView(&verification.initial))?;
            for (k, matrix) in verification.rounds.iter().enumerate() {
                writeln!(f, "\nMatrix on iteration {}:", k + 1)?;
                write!(f, "{}", MatrixView(matrix))?;
            }
        }

        writeln!(f, "\nCritical path's length: {}", analysis.critical_length())
    }
}
