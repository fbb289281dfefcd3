//! Annotation ingestion: COCO JSON, CSV ground truth, flat prediction
//! lists and scene documents, all reduced to the common frame shapes in
//! [`crate::types`].

use crate::error::{CompareError, Result};
use crate::types::{BoundingBox, GtFrame, PredFrame};
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

/// Represents an image entry in a COCO document.
#[derive(Debug, Clone, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: f64,
    pub height: f64,
}

/// Represents an annotation entry in a COCO document.
///
/// Category ids are ignored: evaluation is class-agnostic. A confidence
/// `score` is accepted on prediction annotations and ignored by the
/// engine.
#[derive(Debug, Clone, Deserialize)]
pub struct CocoAnnotation {
    pub image_id: u64,
    /// Bounding box in `[x, y, width, height]` format.
    pub bbox: Vec<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// A COCO-style annotation document.
#[derive(Debug, Clone, Deserialize)]
pub struct CocoDocument {
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
}

/// Prediction document keyed by scene: `{scenes: {name: <coco>}}`.
#[derive(Debug, Clone, Deserialize)]
struct SceneDocument {
    scenes: BTreeMap<String, CocoDocument>,
}

/// One record of a flat prediction list as emitted by the thermal
/// detector: `{thermal_name, rgb_name, thermal_shape: [h, w], bboxes}`.
#[derive(Debug, Clone, Deserialize)]
struct ThermalPrediction {
    thermal_name: String,
    rgb_name: String,
    /// Image shape as `[height, width]`.
    thermal_shape: Vec<f64>,
    bboxes: Vec<Vec<f64>>,
}

/// One row of a CSV ground-truth export: corner coordinates plus a
/// structured field embedding the frame name.
#[derive(Debug, Clone, Deserialize)]
struct CsvGtRow {
    #[serde(rename = "Thermal Image")]
    thermal_image: String,
    #[serde(rename = "X_min")]
    x_min: f64,
    #[serde(rename = "Y_min")]
    y_min: f64,
    #[serde(rename = "X_max")]
    x_max: f64,
    #[serde(rename = "Y_max")]
    y_max: f64,
}

/// Validate that every annotation carries a 4-element bbox. Fails fast:
/// a malformed box aborts the load rather than being silently dropped.
fn validate_coco(document: &CocoDocument) -> Result<()> {
    for annotation in &document.annotations {
        if annotation.bbox.len() != 4 {
            return Err(CompareError::InvalidBoundingBox(format!(
                "Annotation for image {} has bbox length {}, expected 4",
                annotation.image_id,
                annotation.bbox.len()
            )));
        }
    }
    Ok(())
}

fn parse_coco(json_str: &str) -> Result<CocoDocument> {
    let document: CocoDocument = serde_json::from_str(json_str)?;
    validate_coco(&document)?;
    Ok(document)
}

fn collect_bboxes(document: &CocoDocument, image_id: u64) -> Result<Vec<BoundingBox>> {
    document
        .annotations
        .iter()
        .filter(|a| a.image_id == image_id)
        .map(|a| BoundingBox::from_xywh(&a.bbox))
        .collect()
}

/// Reduce a COCO document to ground-truth frames, one per image entry.
pub fn coco_gt_frames(document: &CocoDocument) -> Result<Vec<GtFrame>> {
    document
        .images
        .iter()
        .map(|image| {
            Ok(GtFrame {
                file_name: image.file_name.clone(),
                bboxes: collect_bboxes(document, image.id)?,
            })
        })
        .collect()
}

/// Reduce a COCO document to prediction frames, one per image entry.
pub fn coco_pred_frames(document: &CocoDocument) -> Result<Vec<PredFrame>> {
    document
        .images
        .iter()
        .map(|image| {
            Ok(PredFrame {
                file_name: image.file_name.clone(),
                rgb_name: None,
                width: image.width,
                height: image.height,
                bboxes: collect_bboxes(document, image.id)?,
            })
        })
        .collect()
}

/// Load COCO-format ground truth from a JSON string.
pub fn load_gt_from_str(json_str: &str) -> Result<Vec<GtFrame>> {
    let document = parse_coco(json_str)?;
    coco_gt_frames(&document)
}

/// Load ground truth from a file, dispatching on the extension:
/// `.csv` rows with corner coordinates, anything else COCO JSON.
pub fn load_gt_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<GtFrame>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let contents = std::fs::read_to_string(path)?;
    let frames = if is_csv {
        load_gt_from_csv_str(&contents)?
    } else {
        load_gt_from_str(&contents)?
    };
    info!("loaded {} GT frames from {}", frames.len(), path.display());
    Ok(frames)
}

/// Recover a frame file name from the structured `Thermal Image` field:
/// the `__`-separated segments between the third and the last, rejoined,
/// plus a `.jpg` extension.
fn extract_csv_file_name(raw: &str) -> String {
    let parts: Vec<&str> = raw.split("__").collect();
    if parts.len() > 4 {
        format!("{}.jpg", parts[3..parts.len() - 1].join("__"))
    } else {
        ".jpg".to_string()
    }
}

/// Load CSV-format ground truth from a string. One bbox per row; corner
/// coordinates are converted to `(x, y, w, h)`.
pub fn load_gt_from_csv_str(data: &str) -> Result<Vec<GtFrame>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut frames = Vec::new();
    for row in reader.deserialize() {
        let row: CsvGtRow = row?;
        frames.push(GtFrame {
            file_name: extract_csv_file_name(&row.thermal_image),
            bboxes: vec![BoundingBox::from_corners(
                row.x_min, row.y_min, row.x_max, row.y_max,
            )],
        });
    }
    Ok(frames)
}

fn thermal_pred_frame(record: ThermalPrediction) -> Result<PredFrame> {
    if record.thermal_shape.len() < 2 {
        return Err(CompareError::MalformedRecord(format!(
            "Prediction {} has thermal_shape of length {}, expected [height, width]",
            record.thermal_name,
            record.thermal_shape.len()
        )));
    }
    let bboxes = record
        .bboxes
        .iter()
        .map(|b| BoundingBox::from_xywh(b))
        .collect::<Result<Vec<_>>>()?;
    Ok(PredFrame {
        file_name: record.thermal_name,
        rgb_name: Some(record.rgb_name),
        width: record.thermal_shape[1],
        height: record.thermal_shape[0],
        bboxes,
    })
}

/// Load a flat prediction list (`[{thermal_name, rgb_name,
/// thermal_shape, bboxes}]`) from a JSON string.
pub fn load_predictions_from_str(json_str: &str) -> Result<Vec<PredFrame>> {
    let records: Vec<ThermalPrediction> = serde_json::from_str(json_str)?;
    records.into_iter().map(thermal_pred_frame).collect()
}

/// Load a flat prediction list from a JSON file.
pub fn load_predictions_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<PredFrame>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<ThermalPrediction> = serde_json::from_reader(reader)?;
    let frames = records
        .into_iter()
        .map(thermal_pred_frame)
        .collect::<Result<Vec<_>>>()?;
    info!(
        "loaded {} prediction frames from {}",
        frames.len(),
        path.display()
    );
    Ok(frames)
}

/// Load COCO-shaped predictions from a JSON string.
pub fn load_coco_predictions_from_str(json_str: &str) -> Result<Vec<PredFrame>> {
    let document = parse_coco(json_str)?;
    coco_pred_frames(&document)
}

fn scene_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // First two and the last underscore-separated segments are a run
    // prefix and a frame counter; the middle is the scene name proper.
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^_]+_[^_]+_(.+)_[^_]+$").expect("scene name pattern is valid")
    })
}

/// Align a prediction scene key with the GT directory naming scheme.
///
/// Returns the captured middle segment, or an empty string when the key
/// does not match the expected shape.
pub fn normalize_scene_name(name: &str) -> String {
    scene_name_pattern()
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Load a scene prediction document (`{scenes: {key: <coco>}}`) from a
/// JSON string. Scene keys are normalized via [`normalize_scene_name`];
/// the returned map iterates in sorted key order.
pub fn load_scenes_from_str(json_str: &str) -> Result<BTreeMap<String, Vec<PredFrame>>> {
    let document: SceneDocument = serde_json::from_str(json_str)?;
    let mut scenes = BTreeMap::new();
    for (key, coco) in &document.scenes {
        validate_coco(coco)?;
        let normalized = normalize_scene_name(key);
        debug!("scene key {key:?} normalized to {normalized:?}");
        scenes.insert(normalized, coco_pred_frames(coco)?);
    }
    info!("loaded {} scenes", scenes.len());
    Ok(scenes)
}

/// Load a scene prediction document from a JSON file.
pub fn load_scenes_from_file<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, Vec<PredFrame>>> {
    let contents = std::fs::read_to_string(path)?;
    load_scenes_from_str(&contents)
}
