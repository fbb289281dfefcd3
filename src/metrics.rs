//! Recall, precision and F1 derivation from count tuples.

use crate::types::DetectionCounts;
use serde::{Deserialize, Serialize};

/// Round a ratio to two decimal places for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recall: `tp / (tp + fn)`, `0.0` when the denominator is zero.
///
/// Rounded to two decimal places.
pub fn calculate_recall(true_positives: usize, false_negatives: usize) -> f64 {
    let denominator = true_positives + false_negatives;
    if denominator > 0 {
        round2(true_positives as f64 / denominator as f64)
    } else {
        0.0
    }
}

/// Precision: `tp / (tp + fp)`, `0.0` when the denominator is zero.
///
/// Rounded to two decimal places.
pub fn calculate_precision(true_positives: usize, false_positives: usize) -> f64 {
    let denominator = true_positives + false_positives;
    if denominator > 0 {
        round2(true_positives as f64 / denominator as f64)
    } else {
        0.0
    }
}

/// F1: harmonic mean of recall and precision, `0.0` when both are zero.
///
/// Rounded to two decimal places.
pub fn calculate_f1(recall: f64, precision: f64) -> f64 {
    if recall + precision > 0.0 {
        round2(2.0 * recall * precision / (recall + precision))
    } else {
        0.0
    }
}

/// Recall, precision and F1 derived from one count tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
}

/// Derive all three ratios from a count tuple.
///
/// Uses the `tp/(tp+fn)` and `tp/(tp+fp)` denominators throughout. Earlier
/// revisions of this tool also divided by raw GT/prediction box counts in
/// some paths; the two agree only when every GT box is counted exactly
/// once, so that variant is deliberately not reproduced.
pub fn analyze(counts: &DetectionCounts) -> Analysis {
    let recall = calculate_recall(counts.true_positives, counts.false_negatives);
    let precision = calculate_precision(counts.true_positives, counts.false_positives);
    let f1 = calculate_f1(recall, precision);
    Analysis {
        recall,
        precision,
        f1,
    }
}
