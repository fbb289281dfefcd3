//! Box normalization and thresholded Intersection over Union.

use crate::types::BoundingBox;

/// Normalize a pixel-space bounding box to image-relative coordinates.
///
/// Divides `x` and `width` by the image width, `y` and `height` by the
/// image height, making boxes comparable across images of differing
/// resolution. Values are not clamped: coordinates past 1.0 indicate
/// malformed source data and are passed through unchanged so the problem
/// stays visible downstream.
///
/// The caller guarantees `width > 0` and `height > 0`.
pub fn normalize(bbox: &BoundingBox, width: f64, height: f64) -> BoundingBox {
    BoundingBox::new(
        bbox.x / width,
        bbox.y / height,
        bbox.width / width,
        bbox.height / height,
    )
}

/// Normalize a whole list of boxes against one image's dimensions.
pub fn normalize_all(bboxes: &[BoundingBox], width: f64, height: f64) -> Vec<BoundingBox> {
    bboxes.iter().map(|b| normalize(b, width, height)).collect()
}

/// Convert an LTWH box to its two-corner representation `(x1, y1, x2, y2)`.
pub fn to_corners(bbox: &BoundingBox) -> (f64, f64, f64, f64) {
    (bbox.x, bbox.y, bbox.right(), bbox.bottom())
}

/// Calculate the IoU between two boxes, gated by a similarity threshold.
///
/// Returns the raw IoU only when it is `>= threshold`; otherwise returns
/// exactly `0.0`. "No overlap" and "overlap below threshold" collapse to
/// the same sentinel value, so any positive cell in a collision matrix is
/// by construction a passing match (see [`crate::collision`]).
///
/// A zero union area also yields `0.0`.
///
/// # Example
///
/// ```
/// use cocompare::geometry::thresholded_iou;
/// use cocompare::types::BoundingBox;
///
/// let gt = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
/// let pred = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
/// assert_eq!(thresholded_iou(&gt, &pred, 0.5), 1.0);
///
/// let weak = BoundingBox::new(0.9, 0.9, 1.0, 1.0);
/// assert_eq!(thresholded_iou(&gt, &weak, 0.5), 0.0);
/// ```
pub fn thresholded_iou(gt_bbox: &BoundingBox, pred_bbox: &BoundingBox, threshold: f64) -> f64 {
    let (x1_a, y1_a, x2_a, y2_a) = to_corners(gt_bbox);
    let (x1_b, y1_b, x2_b, y2_b) = to_corners(pred_bbox);

    let inter_area = (x2_a.min(x2_b) - x1_a.max(x1_b)).max(0.0)
        * (y2_a.min(y2_b) - y1_a.max(y1_b)).max(0.0);

    // Areas are derived from the same corner values as the intersection,
    // so a box against itself yields exactly 1.0.
    let gt_area = (x2_a - x1_a) * (y2_a - y1_a);
    let pred_area = (x2_b - x1_b) * (y2_b - y1_b);
    let union_area = gt_area + pred_area - inter_area;
    let iou = if union_area != 0.0 {
        inter_area / union_area
    } else {
        0.0
    };

    if iou >= threshold {
        iou
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let normalized = normalize(&bbox, 10.0, 10.0);
        assert_eq!(normalized, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_normalize_rectangular_image() {
        let bbox = BoundingBox::new(32.0, 24.0, 64.0, 48.0);
        let normalized = normalize(&bbox, 640.0, 480.0);
        assert_eq!(normalized, BoundingBox::new(0.05, 0.05, 0.1, 0.1));
    }

    #[test]
    fn test_normalize_does_not_clamp() {
        // Out-of-frame source data must survive normalization unchanged.
        let bbox = BoundingBox::new(90.0, 0.0, 20.0, 10.0);
        let normalized = normalize(&bbox, 100.0, 100.0);
        assert!(normalized.right() > 1.0);
    }

    #[test]
    fn test_to_corners() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(to_corners(&bbox), (10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_identical_boxes() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(thresholded_iou(&bbox, &bbox, 0.5), 1.0);
        assert_eq!(thresholded_iou(&bbox, &bbox, 1.0), 1.0);
    }

    #[test]
    fn test_no_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 0.1, 0.1);
        let b = BoundingBox::new(0.5, 0.5, 0.1, 0.1);
        assert_eq!(thresholded_iou(&a, &b, 0.0), 0.0);
        assert_eq!(thresholded_iou(&a, &b, 0.5), 0.0);
    }

    #[test]
    fn test_partial_overlap_above_threshold() {
        // Intersection 0.125, union 0.375, IoU = 1/3.
        let a = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        let b = BoundingBox::new(0.25, 0.0, 0.5, 0.5);
        let iou = thresholded_iou(&a, &b, 0.3);
        assert!((iou - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_weak_overlap_collapses_to_zero() {
        let a = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        let b = BoundingBox::new(0.25, 0.0, 0.5, 0.5);
        assert_eq!(thresholded_iou(&a, &b, 0.5), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = BoundingBox::new(0.1, 0.1, 0.4, 0.3);
        let b = BoundingBox::new(0.2, 0.2, 0.3, 0.5);
        assert_eq!(thresholded_iou(&a, &b, 0.0), thresholded_iou(&b, &a, 0.0));
    }

    #[test]
    fn test_zero_union() {
        let a = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        let b = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(thresholded_iou(&a, &b, 0.0), 0.0);
    }

    #[test]
    fn test_boundary_iou_passes_inclusively() {
        // IoU exactly 1/3 with threshold 1/3 must pass.
        let a = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        let b = BoundingBox::new(0.25, 0.0, 0.5, 0.5);
        let iou = thresholded_iou(&a, &b, 1.0 / 3.0);
        assert!(iou > 0.0);
    }
}
