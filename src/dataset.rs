//! Dataset-level aggregation across groups.

use crate::group::{GroupMode, GroupRecord, SceneVerdict};
use crate::metrics::{analyze, Analysis};
use crate::types::DetectionCounts;

/// Dataset-wide totals across all groups.
///
/// In per-file mode every field is a plain sum of group totals. In
/// scene-gated mode `gt_count` and `pred_count` remain raw box sums, but
/// the TP/FP/FN fields count *groups*: Hit scenes, false-flagged scenes
/// and Miss scenes respectively. The asymmetry is intentional: the scene
/// summary answers how many scenes were correctly flagged, not how many
/// boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub gt_count: usize,
    pub pred_count: usize,
    pub counts: DetectionCounts,
    pub group_count: usize,
}

impl DatasetSummary {
    /// Recall, precision and F1 over the dataset totals.
    pub fn analysis(&self) -> Analysis {
        analyze(&self.counts)
    }
}

/// Reduce group totals into one dataset summary.
///
/// Summation is order-invariant; callers that emit per-group rows are
/// expected to sort by group name (see [`crate::report`]).
pub fn summarize(groups: &[GroupRecord], mode: GroupMode) -> DatasetSummary {
    let mut summary = DatasetSummary {
        gt_count: 0,
        pred_count: 0,
        counts: DetectionCounts::new(),
        group_count: groups.len(),
    };

    for group in groups {
        summary.gt_count += group.gt_count;
        summary.pred_count += group.pred_count;

        match mode {
            GroupMode::PerFile => {
                summary.counts = summary.counts.add(&group.counts);
            }
            GroupMode::SceneThresholdGated { detection_threshold } => {
                match group.verdict(detection_threshold) {
                    SceneVerdict::Hit => summary.counts.true_positives += 1,
                    SceneVerdict::Miss => summary.counts.false_negatives += 1,
                }
                if group.is_false_scene(detection_threshold) {
                    summary.counts.false_positives += 1;
                }
            }
        }
    }

    summary
}
