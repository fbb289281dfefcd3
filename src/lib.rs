//! # cocompare
//!
//! A Rust library for evaluating object-detection output against ground
//! truth. Given axis-aligned bounding boxes per image from two sources
//! (ground truth and predictions), it decides which predictions are true
//! positives, which GT boxes were missed, and which predictions are
//! spurious, then aggregates the counts across images, groups and the
//! whole dataset, deriving recall, precision and F1 at every level.
//!
//! ## Pipeline
//!
//! 1. Boxes are normalized to image-relative coordinates at ingestion.
//! 2. Per image, a GT x PRED collision matrix of thresholded IoU scores
//!    is built and reduced to TP/FP/FN counts.
//! 3. Frames are grouped into "tests" (one prediction file) or "scenes"
//!    (one multi-frame location) and counts summed.
//! 4. The dataset summary either sums group counts straight through
//!    (per-file mode) or converts each scene into a Hit/Miss/false
//!    verdict gated by a detection-rate threshold (scene mode).
//!
//! ## Quick Start
//!
//! ```rust
//! use cocompare::evaluator::evaluate_group;
//! use cocompare::dataset::summarize;
//! use cocompare::group::GroupMode;
//! use cocompare::types::{BoundingBox, GtFrame, PredFrame};
//!
//! let gt = vec![GtFrame {
//!     file_name: "frame_0001.jpg".to_string(),
//!     bboxes: vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)],
//! }];
//! let preds = vec![PredFrame {
//!     file_name: "frame_0001.jpg".to_string(),
//!     rgb_name: None,
//!     width: 10.0,
//!     height: 10.0,
//!     bboxes: vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)],
//! }];
//!
//! let group = evaluate_group("test_a", &gt, &preds, 0.5);
//! assert_eq!(group.counts.true_positives, 1);
//!
//! let summary = summarize(&[group], GroupMode::PerFile);
//! assert_eq!(summary.analysis().recall, 1.0);
//! ```

pub mod collision;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod group;
pub mod loader;
pub mod metrics;
pub mod report;
pub mod types;

// Re-export commonly used types and functions
pub use collision::{count_detections, CollisionMatrix, FrameRecord};
pub use dataset::{summarize, DatasetSummary};
pub use error::{CompareError, Result};
pub use evaluator::{evaluate_group, join_annotations};
pub use group::{GroupMode, GroupRecord, SceneVerdict};
pub use metrics::{analyze, Analysis};
pub use types::{BoundingBox, DetectionCounts, FrameAnnotation, GtFrame, PredFrame};
