//! Threshold Walks and Score Aggregation
//!
//! Requirement tables map a measured property onto a 0-100 score through an
//! ordered list of (threshold, score) rows. The walk direction is stored with
//! the table:
//! - Descending: thresholds are bucket lower bounds ("more is better", e.g. OC).
//!   First row with threshold <= value wins.
//! - Ascending: thresholds are bucket upper bounds ("less is better", e.g. EC).
//!   First row with threshold >= value wins.
//!
//! A value no row accepts, or an unknown value, scores the last row.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score of a factor that imposes no constraint
pub const NO_CONSTRAINT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkDirection {
    Descending,
    Ascending,
}

/// One (threshold, score) row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRow {
    pub threshold: f64,
    pub score: f64,
}

/// Ordered threshold table for one (SQI, property) pair
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    direction: WalkDirection,
    rows: Vec<ThresholdRow>,
}

impl ThresholdTable {
    /// Build a table, sorting rows in walk order
    pub fn new(direction: WalkDirection, mut rows: Vec<ThresholdRow>) -> Self {
        rows.sort_by(|a, b| {
            let ord = a.threshold.partial_cmp(&b.threshold).unwrap_or(Ordering::Equal);
            match direction {
                WalkDirection::Ascending => ord,
                WalkDirection::Descending => ord.reverse(),
            }
        });
        Self { direction, rows }
    }

    pub fn direction(&self) -> WalkDirection {
        self.direction
    }

    pub fn rows(&self) -> &[ThresholdRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Walk the table for an observed value.
    ///
    /// An empty table imposes no constraint.
    pub fn score(&self, value: Option<f64>) -> f64 {
        let last = match self.rows.last() {
            Some(row) => row.score,
            None => return NO_CONSTRAINT,
        };

        let value = match value {
            Some(v) if !v.is_nan() => v,
            _ => return last,
        };

        self.rows
            .iter()
            .find(|row| match self.direction {
                WalkDirection::Descending => row.threshold <= value,
                WalkDirection::Ascending => row.threshold >= value,
            })
            .map_or(last, |row| row.score)
    }
}

/// Minimum-law with mitigation: `(min + mean of the others) / 2`.
///
/// A single score passes through; an empty set imposes no constraint.
pub fn aggregate_mitigated(scores: &[f64]) -> f64 {
    match scores.len() {
        0 => NO_CONSTRAINT,
        1 => scores[0],
        n => {
            let min = min_score(scores);
            let mean_of_rest = (scores.iter().sum::<f64>() - min) / (n - 1) as f64;
            (min + mean_of_rest) / 2.0
        }
    }
}

/// Plain minimum law. An empty set imposes no constraint.
pub fn min_score(scores: &[f64]) -> f64 {
    scores
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.min(s))))
        .unwrap_or(NO_CONSTRAINT)
}

/// Clamp a score into [0, 100]
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
