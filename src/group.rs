//! Group-level aggregation: per-file tests and threshold-gated scenes.

use crate::collision::FrameRecord;
use crate::metrics::{analyze, Analysis};
use crate::types::DetectionCounts;

/// How a group's frames are reduced into dataset-level contributions.
///
/// Replaces the original mode-string dispatch with a tagged variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupMode {
    /// A "test": one prediction file, counts summed straight through.
    PerFile,
    /// A "scene": a multi-frame sequence where a detection only counts if
    /// it persists across enough frames. Carries the detection-rate
    /// threshold `d_th`, independent of (and typically looser than) the
    /// IoU threshold.
    SceneThresholdGated { detection_threshold: f64 },
}

/// Scene-level recall verdict under the threshold-gated mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneVerdict {
    /// Detection rate reached the detection threshold.
    Hit,
    /// Detection rate fell short of the detection threshold.
    Miss,
}

/// One logical unit of images: a test or a scene.
///
/// Owns its frames (sorted by file name for deterministic output) and the
/// running totals obtained by summing their counts. Built once via
/// [`GroupRecord::from_frames`], immutable thereafter.
#[derive(Debug, Clone)]
pub struct GroupRecord {
    pub name: String,
    pub iou_threshold: f64,
    pub frames: Vec<FrameRecord>,
    pub gt_count: usize,
    pub pred_count: usize,
    pub counts: DetectionCounts,
}

impl GroupRecord {
    /// Assemble a group from evaluated frames.
    ///
    /// Frames are sorted by file name and their counts reduced by explicit
    /// summation. The totals are identical to what incremental
    /// accumulation during evaluation would have produced.
    pub fn from_frames(name: impl Into<String>, iou_threshold: f64, mut frames: Vec<FrameRecord>) -> Self {
        frames.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        let gt_count = frames.iter().map(|f| f.gt_count).sum();
        let pred_count = frames.iter().map(|f| f.pred_count).sum();
        let counts = frames
            .iter()
            .fold(DetectionCounts::new(), |acc, f| acc.add(&f.counts));

        Self {
            name: name.into(),
            iou_threshold,
            frames,
            gt_count,
            pred_count,
            counts,
        }
    }

    /// Number of evaluated frames in the group.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Fraction of GT boxes that were detected: `tp / gt_count`.
    ///
    /// `0.0` when the group has no GT boxes.
    pub fn detection_rate(&self) -> f64 {
        if self.gt_count > 0 {
            self.counts.true_positives as f64 / self.gt_count as f64
        } else {
            0.0
        }
    }

    /// False positives per frame: `fp / frame_count`.
    ///
    /// `0.0` when the group has no frames.
    pub fn false_rate(&self) -> f64 {
        if !self.frames.is_empty() {
            self.counts.false_positives as f64 / self.frames.len() as f64
        } else {
            0.0
        }
    }

    /// Scene verdict: Hit iff the detection rate reaches the detection
    /// threshold. The boundary is inclusive.
    pub fn verdict(&self, detection_threshold: f64) -> SceneVerdict {
        if self.detection_rate() >= detection_threshold {
            SceneVerdict::Hit
        } else {
            SceneVerdict::Miss
        }
    }

    /// Whether the scene contributes a dataset-level false positive.
    ///
    /// Judged independently of the Hit/Miss verdict: a scene can be a Hit
    /// on recall and still be flagged here. The boundary is inclusive.
    pub fn is_false_scene(&self, detection_threshold: f64) -> bool {
        self.false_rate() >= detection_threshold
    }

    /// Recall, precision and F1 over the group's summed counts.
    pub fn analysis(&self) -> Analysis {
        analyze(&self.counts)
    }
}
