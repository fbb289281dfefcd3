//! Core data types shared by the loaders and the evaluation engine.

use serde::{Deserialize, Serialize};

/// Represents a bounding box in LTWH (Left-Top-Width-Height) format.
///
/// Boxes are loaded in pixel units and converted to image-relative
/// coordinates once, at ingestion (see [`crate::geometry::normalize`]).
/// All evaluation downstream of the loaders operates on normalized boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a bounding box from a `[x, y, w, h]` array.
    ///
    /// # Errors
    ///
    /// Returns an error unless the slice has exactly 4 elements.
    pub fn from_xywh(values: &[f64]) -> crate::error::Result<Self> {
        if values.len() != 4 {
            return Err(crate::error::CompareError::InvalidBoundingBox(format!(
                "Expected 4 values, got {}",
                values.len()
            )));
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Build a bounding box from two corners `(x1, y1)`, `(x2, y2)`.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the bounding box is valid (positive dimensions).
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Ground-truth boxes for one image, keyed by file name.
///
/// Produced by every ground-truth loader regardless of source format.
#[derive(Debug, Clone, PartialEq)]
pub struct GtFrame {
    pub file_name: String,
    pub bboxes: Vec<BoundingBox>,
}

/// Predicted boxes for one image, keyed by file name.
///
/// Carries the image dimensions: the evaluator normalizes both GT and
/// prediction boxes against the dimensions reported by the prediction
/// source.
#[derive(Debug, Clone, PartialEq)]
pub struct PredFrame {
    pub file_name: String,
    /// Paired visible-light frame name, when the source provides one.
    pub rgb_name: Option<String>,
    pub width: f64,
    pub height: f64,
    pub bboxes: Vec<BoundingBox>,
}

/// GT and prediction annotations joined on file name, in pixel units.
///
/// One `FrameAnnotation` is the complete input for evaluating one image.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnnotation {
    pub file_name: String,
    pub rgb_name: Option<String>,
    pub width: f64,
    pub height: f64,
    pub gt_bboxes: Vec<BoundingBox>,
    pub pred_bboxes: Vec<BoundingBox>,
}

/// True/false positive and false negative counts.
///
/// Immutable once derived; levels above the image combine these by
/// explicit summation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl DetectionCounts {
    /// Create a zeroed count tuple.
    pub fn new() -> Self {
        Self::default()
    }

    /// Component-wise sum of two count tuples.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
        }
    }
}
