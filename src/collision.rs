//! Per-image collision matrix and TP/FP/FN counting.

use crate::geometry::{normalize_all, thresholded_iou};
use crate::types::{BoundingBox, DetectionCounts, FrameAnnotation};

/// GT x PRED table of thresholded IoU scores for one image.
///
/// One row per ground-truth box, one column per predicted box. Cells hold
/// either `0.0` or a passing IoU (see [`thresholded_iou`]), so row and
/// column sums double as match indicators. Built once, read-only afterward.
///
/// The prediction count is carried separately: a matrix with zero GT boxes
/// has no rows, but counting still needs to know whether predictions exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMatrix {
    cells: Vec<Vec<f64>>,
    pred_count: usize,
}

impl CollisionMatrix {
    /// Build the collision matrix for one image from normalized boxes.
    pub fn build(gt: &[BoundingBox], preds: &[BoundingBox], iou_threshold: f64) -> Self {
        let cells = gt
            .iter()
            .map(|gt_bbox| {
                preds
                    .iter()
                    .map(|pred_bbox| thresholded_iou(gt_bbox, pred_bbox, iou_threshold))
                    .collect()
            })
            .collect();
        Self {
            cells,
            pred_count: preds.len(),
        }
    }

    /// Number of ground-truth boxes (rows).
    pub fn gt_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of predicted boxes (columns).
    pub fn pred_count(&self) -> usize {
        self.pred_count
    }

    /// Thresholded IoU for one GT/prediction pair.
    pub fn cell(&self, gt_index: usize, pred_index: usize) -> f64 {
        self.cells[gt_index][pred_index]
    }

    /// Whether a GT row has at least one passing match.
    fn row_matched(&self, gt_index: usize) -> bool {
        self.cells[gt_index].iter().sum::<f64>() != 0.0
    }

    /// Whether a prediction column matched no GT row.
    fn column_unmatched(&self, pred_index: usize) -> bool {
        self.cells
            .iter()
            .map(|row| row[pred_index])
            .sum::<f64>()
            == 0.0
    }
}

/// Reduce a collision matrix into per-image TP/FP/FN counts.
///
/// Row-wise: a GT row with any passing cell contributes one true positive,
/// otherwise one false negative. This is a first-available-match policy,
/// not a one-to-one assignment: one predicted box overlapping two GT rows
/// counts a true positive for both. Kept for behavioral compatibility and
/// isolated here so a stricter assignment strategy could replace it
/// without touching aggregation.
///
/// Column-wise, only when GT is non-empty: each prediction column that
/// matched no row contributes one false positive. When GT is empty but
/// predictions exist, the whole image contributes exactly one false
/// positive, not one per prediction.
///
/// Guarantees `tp + fn == gt_count` for every input.
pub fn count_detections(matrix: &CollisionMatrix) -> DetectionCounts {
    let mut counts = DetectionCounts::new();

    for gt_index in 0..matrix.gt_count() {
        if matrix.row_matched(gt_index) {
            counts.true_positives += 1;
        } else {
            counts.false_negatives += 1;
        }
    }

    if matrix.gt_count() > 0 {
        for pred_index in 0..matrix.pred_count() {
            if matrix.column_unmatched(pred_index) {
                counts.false_positives += 1;
            }
        }
    } else if matrix.pred_count() > 0 {
        counts.false_positives = 1;
    }

    counts
}

/// One evaluated image: identity, collision matrix, and derived counts.
///
/// Counts are computed once at construction and never mutated; the owning
/// group reduces them by explicit summation.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub file_name: String,
    /// Paired visible-light frame name, when the source provides one.
    pub rgb_name: Option<String>,
    pub gt_count: usize,
    pub pred_count: usize,
    pub matrix: CollisionMatrix,
    pub counts: DetectionCounts,
}

impl FrameRecord {
    /// Evaluate one image: normalize both box sets against the frame
    /// dimensions, build the collision matrix, and derive counts.
    pub fn evaluate(annotation: &FrameAnnotation, iou_threshold: f64) -> Self {
        let gt = normalize_all(&annotation.gt_bboxes, annotation.width, annotation.height);
        let preds = normalize_all(&annotation.pred_bboxes, annotation.width, annotation.height);
        let matrix = CollisionMatrix::build(&gt, &preds, iou_threshold);
        let counts = count_detections(&matrix);
        Self {
            file_name: annotation.file_name.clone(),
            rgb_name: annotation.rgb_name.clone(),
            gt_count: gt.len(),
            pred_count: preds.len(),
            matrix,
            counts,
        }
    }
}
