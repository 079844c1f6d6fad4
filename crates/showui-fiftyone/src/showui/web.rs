// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! ShowUI-web conversion.
//!
//! Each web row is one screenshot with several annotated UI elements held in
//! four co-indexed columns (`bbox`, `point`, `type`, `instruction`). Every
//! row becomes one sample with a `detections` and a `keypoints` field holding
//! one label per element.

use super::rows::{resolve_image_path, string_column, string_list_column, vector_list_column};
use crate::{
    Error, Progress,
    fiftyone::{
        BoxPolicy, Detection, Detections, FieldSchema, Keypoint, Keypoints, Sample,
        SampleCollection, SampleFields,
    },
};
use itertools::izip;
use log::{debug, info};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::Sender;

/// Name of the dataset produced from ShowUI-web.
pub const WEB_DATASET_NAME: &str = "ShowUI_Web";

/// Location of the ShowUI-web Parquet file relative to the working
/// directory.
pub const WEB_PARQUET_PATH: &str = "ShowUI-web/data/train-00000-of-00001.parquet";

/// One ShowUI-web row.
#[derive(Debug, Clone, PartialEq)]
pub struct WebRow {
    pub image_url: String,
    /// Corner boxes `[x1, y1, x2, y2]`, one per element.
    pub bbox: Vec<[f64; 4]>,
    /// Click points `[x, y]`, one per element.
    pub point: Vec<[f64; 2]>,
    /// Element types from the `type` column, one per element.
    pub element_type: Vec<String>,
    pub instruction: Vec<String>,
}

impl WebRow {
    /// Number of UI elements, or an error if the co-indexed sequences
    /// disagree.
    pub fn element_count(&self) -> Result<usize, Error> {
        let n = self.bbox.len();
        if self.point.len() != n || self.element_type.len() != n || self.instruction.len() != n {
            return Err(Error::LengthMismatch(format!(
                "{}: bbox={}, point={}, type={}, instruction={}",
                self.image_url,
                n,
                self.point.len(),
                self.element_type.len(),
                self.instruction.len()
            )));
        }
        Ok(n)
    }
}

/// Typed fields of a ShowUI-web sample.
#[derive(Debug, Clone, Serialize)]
pub struct WebFields {
    pub instructions: Vec<String>,
    pub detections: Detections,
    pub keypoints: Keypoints,
}

impl SampleFields for WebFields {
    fn schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::list("instructions", "StringField"),
            FieldSchema::label("detections", "Detections"),
            FieldSchema::label("keypoints", "Keypoints"),
        ]
    }
}

/// Options for ShowUI-web conversion.
#[derive(Debug, Clone)]
pub struct WebOptions {
    /// Name of the output collection.
    pub name: String,
    /// Directory that `image_url` values are relative to. A relative path
    /// is made absolute against the current directory when the dataset is
    /// built.
    pub images_dir: PathBuf,
    /// Handling of malformed corner boxes.
    pub box_policy: BoxPolicy,
    /// Read image size and dimensions for every sample.
    pub compute_metadata: bool,
}

impl WebOptions {
    /// Options with images under `<base_dir>/ShowUI-web/images`.
    pub fn from_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            name: WEB_DATASET_NAME.to_owned(),
            images_dir: base_dir.as_ref().join("ShowUI-web").join("images"),
            box_policy: BoxPolicy::default(),
            compute_metadata: true,
        }
    }
}

impl Default for WebOptions {
    fn default() -> Self {
        Self::from_base_dir(".")
    }
}

/// Extract all web rows from a ShowUI-web table.
pub fn web_rows(df: &DataFrame) -> Result<Vec<WebRow>, Error> {
    let image_urls = string_column(df, "image_url")?;
    let bboxes = vector_list_column::<4>(df, "bbox")?;
    let points = vector_list_column::<2>(df, "point")?;
    let types = string_list_column(df, "type")?;
    let instructions = string_list_column(df, "instruction")?;

    Ok(izip!(image_urls, bboxes, points, types, instructions)
        .map(|(image_url, bbox, point, element_type, instruction)| WebRow {
            image_url,
            bbox,
            point,
            element_type,
            instruction,
        })
        .collect())
}

/// Build the detections and keypoints of one row.
///
/// Element `i` yields a detection labelled `type[i]` with box
/// `bbox[i]` in `[x, y, w, h]` form and text `instruction[i]`, and a keypoint
/// with the same label and text at `point[i]`.
pub fn build_row_labels(row: &WebRow, policy: BoxPolicy) -> Result<(Detections, Keypoints), Error> {
    let n = row.element_count()?;
    let mut detections = Vec::with_capacity(n);
    let mut keypoints = Vec::with_capacity(n);

    for (i, (bbox, point, label, text)) in
        izip!(&row.bbox, &row.point, &row.element_type, &row.instruction).enumerate()
    {
        let bounding_box = policy
            .apply(*bbox)
            .map_err(|e| Error::InvalidBox(format!("{} element {}: {}", row.image_url, i, e)))?;

        detections.push(Detection::new(label, bounding_box).with_text(text));
        keypoints.push(Keypoint::new(label, vec![*point]).with_text(text));
    }

    Ok((Detections::new(detections), Keypoints::new(keypoints)))
}

/// Convert a ShowUI-web table into a sample collection.
///
/// Samples are added in row order in a single bulk call. When
/// `options.compute_metadata` is set every referenced image must exist.
pub async fn build_web_dataset(
    df: &DataFrame,
    options: &WebOptions,
    progress: Option<Sender<Progress>>,
) -> Result<SampleCollection<WebFields>, Error> {
    let rows = web_rows(df)?;
    let total = rows.len();
    let images_dir = std::path::absolute(&options.images_dir)?;
    info!(
        "converting {} ShowUI-web rows, images under {}",
        total,
        images_dir.display()
    );

    let mut samples = Vec::with_capacity(total);
    for (i, row) in rows.into_iter().enumerate() {
        let (detections, keypoints) = build_row_labels(&row, options.box_policy)?;
        let filepath = resolve_image_path(&images_dir, &row.image_url);

        samples.push(Sample::new(
            filepath,
            WebFields {
                instructions: row.instruction,
                detections,
                keypoints,
            },
        ));

        if let Some(ref p) = progress {
            let _ = p
                .send(Progress {
                    current: i + 1,
                    total,
                    status: Some("samples".to_owned()),
                })
                .await;
        }
    }

    let mut collection = SampleCollection::new(options.name.clone());
    let added = collection.add_samples(samples);
    debug!("added {} samples to {}", added, collection.name());

    if options.compute_metadata {
        collection.compute_metadata(progress).await?;
    }

    Ok(collection)
}
