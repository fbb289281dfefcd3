//! Tabular CSV export of per-frame, per-group and dataset results.
//!
//! Field sets and row order are stable: rows are sorted by group name and
//! by file name within a group, so repeated runs over the same input
//! produce byte-identical reports.

use crate::dataset::DatasetSummary;
use crate::error::Result;
use crate::group::GroupRecord;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One exported row per evaluated image.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRow {
    pub group_name: String,
    pub file_name: String,
    pub rgb_name: String,
    pub gt_count: usize,
    pub pred_count: usize,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_count: usize,
}

/// One exported row per group, with derived ratios.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub group_name: String,
    pub gt_count: usize,
    pub pred_count: usize,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_count: usize,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
    pub iou_threshold: f64,
}

/// The dataset-wide summary row.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub gt_count: usize,
    pub pred_count: usize,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_count: usize,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
}

fn sorted_by_name(groups: &[GroupRecord]) -> Vec<&GroupRecord> {
    let mut sorted: Vec<&GroupRecord> = groups.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

/// Flatten all groups into per-frame rows, sorted by group then file name.
pub fn frame_rows(groups: &[GroupRecord]) -> Vec<FrameRow> {
    sorted_by_name(groups)
        .into_iter()
        .flat_map(|group| {
            group.frames.iter().map(|frame| FrameRow {
                group_name: group.name.clone(),
                file_name: frame.file_name.clone(),
                rgb_name: frame.rgb_name.clone().unwrap_or_default(),
                gt_count: frame.gt_count,
                pred_count: frame.pred_count,
                tp: frame.counts.true_positives,
                fp: frame.counts.false_positives,
                fn_count: frame.counts.false_negatives,
            })
        })
        .collect()
}

/// Per-group rows with recall/precision/F1, sorted by group name.
pub fn group_rows(groups: &[GroupRecord]) -> Vec<GroupRow> {
    sorted_by_name(groups)
        .into_iter()
        .map(|group| {
            let analysis = group.analysis();
            GroupRow {
                group_name: group.name.clone(),
                gt_count: group.gt_count,
                pred_count: group.pred_count,
                tp: group.counts.true_positives,
                fp: group.counts.false_positives,
                fn_count: group.counts.false_negatives,
                recall: analysis.recall,
                precision: analysis.precision,
                f1: analysis.f1,
                iou_threshold: group.iou_threshold,
            }
        })
        .collect()
}

/// The dataset summary as a single exported row.
pub fn summary_row(summary: &DatasetSummary) -> SummaryRow {
    let analysis = summary.analysis();
    SummaryRow {
        gt_count: summary.gt_count,
        pred_count: summary.pred_count,
        tp: summary.counts.true_positives,
        fp: summary.counts.false_positives,
        fn_count: summary.counts.false_negatives,
        recall: analysis.recall,
        precision: analysis.precision,
        f1: analysis.f1,
    }
}

fn write_rows<W: Write, R: Serialize>(writer: W, rows: &[R]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write per-frame rows as CSV.
pub fn write_frame_report<W: Write>(writer: W, groups: &[GroupRecord]) -> Result<()> {
    write_rows(writer, &frame_rows(groups))
}

/// Write per-group rows as CSV.
pub fn write_group_report<W: Write>(writer: W, groups: &[GroupRecord]) -> Result<()> {
    write_rows(writer, &group_rows(groups))
}

/// Write the dataset summary as a one-row CSV.
pub fn write_summary_report<W: Write>(writer: W, summary: &DatasetSummary) -> Result<()> {
    write_rows(writer, &[summary_row(summary)])
}

/// Write per-frame rows to a CSV file.
pub fn write_frame_report_to_file<P: AsRef<Path>>(path: P, groups: &[GroupRecord]) -> Result<()> {
    write_frame_report(std::fs::File::create(path)?, groups)
}

/// Write per-group rows to a CSV file.
pub fn write_group_report_to_file<P: AsRef<Path>>(path: P, groups: &[GroupRecord]) -> Result<()> {
    write_group_report(std::fs::File::create(path)?, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::summarize;
    use crate::evaluator::evaluate_group;
    use crate::group::GroupMode;
    use crate::types::{BoundingBox, GtFrame, PredFrame};

    fn sample_groups() -> Vec<GroupRecord> {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let make = |name: &str, file: &str| {
            evaluate_group(
                name,
                &[GtFrame {
                    file_name: file.to_string(),
                    bboxes: vec![bbox.clone()],
                }],
                &[PredFrame {
                    file_name: file.to_string(),
                    rgb_name: Some(format!("rgb_{file}")),
                    width: 100.0,
                    height: 100.0,
                    bboxes: vec![bbox.clone()],
                }],
                0.5,
            )
        };
        vec![make("scene_b", "b.jpg"), make("scene_a", "a.jpg")]
    }

    #[test]
    fn test_rows_sorted_by_group_name() {
        let rows = group_rows(&sample_groups());
        assert_eq!(rows[0].group_name, "scene_a");
        assert_eq!(rows[1].group_name, "scene_b");
    }

    #[test]
    fn test_frame_rows_carry_identity() {
        let rows = frame_rows(&sample_groups());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file_name, "a.jpg");
        assert_eq!(rows[0].rgb_name, "rgb_a.jpg");
        assert_eq!(rows[0].tp, 1);
    }

    #[test]
    fn test_csv_header_field_set() {
        let mut buffer = Vec::new();
        write_group_report(&mut buffer, &sample_groups()).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let header = output.lines().next().unwrap();
        assert_eq!(
            header,
            "group_name,gt_count,pred_count,tp,fp,fn,recall,precision,f1,iou_threshold"
        );
    }

    #[test]
    fn test_summary_report() {
        let groups = sample_groups();
        let summary = summarize(&groups, GroupMode::PerFile);
        let mut buffer = Vec::new();
        write_summary_report(&mut buffer, &summary).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "gt_count,pred_count,tp,fp,fn,recall,precision,f1"
        );
        assert_eq!(lines.next().unwrap(), "2,2,2,0,0,1.0,1.0,1.0");
    }
}
