//! Joining GT and prediction frames and driving the evaluation.

use crate::collision::FrameRecord;
use crate::group::GroupRecord;
use crate::types::{FrameAnnotation, GtFrame, PredFrame};
use log::{debug, warn};
use std::collections::BTreeSet;

/// Join ground-truth and prediction frame lists on exact file-name
/// equality.
///
/// Only file names present in both sets are evaluated; the intersection
/// is sorted ascending so every downstream report is deterministic.
/// Duplicate GT entries for one file name concatenate their boxes; for
/// duplicate prediction entries the last record wins. Frame dimensions
/// are taken from the prediction record.
///
/// An empty intersection is a valid, reportable outcome (it yields an
/// all-zero group), not an error.
pub fn join_annotations(gt_frames: &[GtFrame], pred_frames: &[PredFrame]) -> Vec<FrameAnnotation> {
    let gt_names: BTreeSet<&str> = gt_frames.iter().map(|f| f.file_name.as_str()).collect();
    let pred_names: BTreeSet<&str> = pred_frames.iter().map(|f| f.file_name.as_str()).collect();
    let shared: Vec<&str> = gt_names.intersection(&pred_names).copied().collect();

    if shared.is_empty() && (!gt_frames.is_empty() || !pred_frames.is_empty()) {
        warn!(
            "no matchable files: {} GT and {} prediction frames share no names",
            gt_frames.len(),
            pred_frames.len()
        );
    }

    shared
        .into_iter()
        .map(|file_name| {
            let mut annotation = FrameAnnotation {
                file_name: file_name.to_string(),
                rgb_name: None,
                width: 0.0,
                height: 0.0,
                gt_bboxes: Vec::new(),
                pred_bboxes: Vec::new(),
            };
            for pred in pred_frames.iter().filter(|f| f.file_name == file_name) {
                annotation.rgb_name = pred.rgb_name.clone();
                annotation.width = pred.width;
                annotation.height = pred.height;
                annotation.pred_bboxes = pred.bboxes.clone();
            }
            for gt in gt_frames.iter().filter(|f| f.file_name == file_name) {
                annotation.gt_bboxes.extend(gt.bboxes.iter().cloned());
            }
            annotation
        })
        .collect()
}

/// Evaluate one group (a test or a scene): join the two frame lists,
/// evaluate each joined image, and reduce into a [`GroupRecord`].
pub fn evaluate_group(
    name: impl Into<String>,
    gt_frames: &[GtFrame],
    pred_frames: &[PredFrame],
    iou_threshold: f64,
) -> GroupRecord {
    let name = name.into();
    let annotations = join_annotations(gt_frames, pred_frames);
    debug!("{name}: evaluating {} joined frames", annotations.len());
    let frames: Vec<FrameRecord> = annotations
        .iter()
        .map(|annotation| FrameRecord::evaluate(annotation, iou_threshold))
        .collect();
    GroupRecord::from_frames(name, iou_threshold, frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn gt(file_name: &str, bboxes: Vec<BoundingBox>) -> GtFrame {
        GtFrame {
            file_name: file_name.to_string(),
            bboxes,
        }
    }

    fn pred(file_name: &str, bboxes: Vec<BoundingBox>) -> PredFrame {
        PredFrame {
            file_name: file_name.to_string(),
            rgb_name: Some(format!("rgb_{file_name}")),
            width: 100.0,
            height: 100.0,
            bboxes,
        }
    }

    fn bbox(x: f64, y: f64, w: f64, h: f64) -> BoundingBox {
        BoundingBox::new(x, y, w, h)
    }

    #[test]
    fn test_join_intersects_and_sorts() {
        let gt_frames = vec![
            gt("c.jpg", vec![]),
            gt("a.jpg", vec![]),
            gt("only_gt.jpg", vec![]),
        ];
        let pred_frames = vec![
            pred("a.jpg", vec![]),
            pred("c.jpg", vec![]),
            pred("only_pred.jpg", vec![]),
        ];
        let joined = join_annotations(&gt_frames, &pred_frames);
        let names: Vec<&str> = joined.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
    }

    #[test]
    fn test_join_takes_dimensions_from_prediction() {
        let joined = join_annotations(
            &[gt("a.jpg", vec![bbox(0.0, 0.0, 10.0, 10.0)])],
            &[pred("a.jpg", vec![])],
        );
        assert_eq!(joined[0].width, 100.0);
        assert_eq!(joined[0].height, 100.0);
        assert_eq!(joined[0].rgb_name.as_deref(), Some("rgb_a.jpg"));
    }

    #[test]
    fn test_join_concatenates_duplicate_gt() {
        // CSV ground truth emits one frame per row; the join folds them.
        let joined = join_annotations(
            &[
                gt("a.jpg", vec![bbox(0.0, 0.0, 1.0, 1.0)]),
                gt("a.jpg", vec![bbox(5.0, 5.0, 1.0, 1.0)]),
            ],
            &[pred("a.jpg", vec![])],
        );
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].gt_bboxes.len(), 2);
    }

    #[test]
    fn test_join_no_matchable_files() {
        let joined = join_annotations(&[gt("a.jpg", vec![])], &[pred("b.jpg", vec![])]);
        assert!(joined.is_empty());
    }

    #[test]
    fn test_evaluate_group_end_to_end() {
        let group = evaluate_group(
            "test_a",
            &[
                gt("a.jpg", vec![bbox(0.0, 0.0, 100.0, 100.0)]),
                gt("b.jpg", vec![bbox(0.0, 0.0, 100.0, 100.0)]),
            ],
            &[
                pred("a.jpg", vec![bbox(0.0, 0.0, 100.0, 100.0)]),
                pred("b.jpg", vec![bbox(500.0, 500.0, 100.0, 100.0)]),
            ],
            0.5,
        );
        assert_eq!(group.name, "test_a");
        assert_eq!(group.frame_count(), 2);
        assert_eq!(group.gt_count, 2);
        assert_eq!(group.pred_count, 2);
        assert_eq!(group.counts.true_positives, 1);
        assert_eq!(group.counts.false_negatives, 1);
        assert_eq!(group.counts.false_positives, 1);
    }

    #[test]
    fn test_evaluate_group_empty_intersection_is_zero_group() {
        let group = evaluate_group(
            "test_a",
            &[gt("a.jpg", vec![bbox(0.0, 0.0, 10.0, 10.0)])],
            &[pred("b.jpg", vec![bbox(0.0, 0.0, 10.0, 10.0)])],
            0.5,
        );
        assert_eq!(group.frame_count(), 0);
        assert_eq!(group.gt_count, 0);
        assert_eq!(group.counts.true_positives, 0);
    }
}
