// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! ShowUI-desktop conversion.
//!
//! Desktop rows hold a single action per screenshot. The raw columns are
//! read in bulk and each one is mapped onto a typed sample field:
//!
//! | raw column  | sample field        | label type       |
//! |-------------|---------------------|------------------|
//! | `bbox`      | `action_detections` | `Detection`      |
//! | `point`     | `action_keypoints`  | `Keypoints`      |
//! | `type`      | `query_type`        | `Classification` |
//! | `image_url` | `interfaces`        | `Classification` |
//!
//! The raw columns themselves are not carried into the output.

use super::rows::{resolve_image_path, string_column, vector_column};
use crate::{
    Error, Progress,
    fiftyone::{
        BoxPolicy, Classification, Detection, FieldSchema, Keypoints, Sample, SampleCollection,
        SampleFields, convert_to_classifications, convert_to_detections, convert_to_keypoints,
        folder_category,
    },
};
use itertools::izip;
use log::{debug, info};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::Sender;

/// Name of the dataset produced from ShowUI-desktop.
pub const DESKTOP_DATASET_NAME: &str = "ShowUI_desktop";

/// Hub repository publishing ShowUI-desktop.
pub const DESKTOP_HUB_REPO: &str = "showlab/ShowUI-desktop";

/// Hub subset (config) name of ShowUI-desktop.
pub const DESKTOP_HUB_SUBSET: &str = "default";

/// Hub split converted by default.
pub const DESKTOP_HUB_SPLIT: &str = "train";

/// Raw ShowUI-desktop columns, one entry per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesktopColumns {
    pub image_url: Vec<String>,
    /// Corner boxes `[x1, y1, x2, y2]`.
    pub bbox: Vec<[f64; 4]>,
    /// Click points `[x, y]`.
    pub point: Vec<[f64; 2]>,
    /// Query types from the `type` column.
    pub element_type: Vec<String>,
}

impl DesktopColumns {
    /// Read the four raw columns; any other column (e.g. `row_idx`) is
    /// ignored.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, Error> {
        Ok(Self {
            image_url: string_column(df, "image_url")?,
            bbox: vector_column::<4>(df, "bbox")?,
            point: vector_column::<2>(df, "point")?,
            element_type: string_column(df, "type")?,
        })
    }

    pub fn len(&self) -> usize {
        self.image_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_url.is_empty()
    }

    /// Interface category of every row: the first folder of `image_url`.
    pub fn interfaces(&self) -> Vec<&str> {
        self.image_url.iter().map(|u| folder_category(u)).collect()
    }
}

/// Typed fields of a ShowUI-desktop sample.
#[derive(Debug, Clone, Serialize)]
pub struct DesktopFields {
    #[serde(rename = "action_detections")]
    pub action_detection: Detection,
    pub action_keypoints: Keypoints,
    pub query_type: Classification,
    pub interfaces: Classification,
}

impl SampleFields for DesktopFields {
    fn schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::label("action_detections", "Detection"),
            FieldSchema::label("action_keypoints", "Keypoints"),
            FieldSchema::label("query_type", "Classification"),
            FieldSchema::label("interfaces", "Classification"),
        ]
    }
}

/// Options for ShowUI-desktop conversion.
#[derive(Debug, Clone)]
pub struct DesktopOptions {
    /// Name of the output collection.
    pub name: String,
    /// Directory that `image_url` values are relative to. A relative path
    /// is made absolute against the current directory when the dataset is
    /// built.
    pub images_dir: PathBuf,
    /// Handling of malformed corner boxes.
    pub box_policy: BoxPolicy,
    /// Shuffle the sample order before persisting.
    pub shuffle: bool,
    /// Seed for a reproducible shuffle.
    pub seed: Option<u64>,
    /// Read image size and dimensions for every sample.
    pub compute_metadata: bool,
}

impl DesktopOptions {
    /// Options with images under `<base_dir>/ShowUI-desktop/images`.
    pub fn from_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            name: DESKTOP_DATASET_NAME.to_owned(),
            images_dir: base_dir.as_ref().join("ShowUI-desktop").join("images"),
            box_policy: BoxPolicy::default(),
            shuffle: true,
            seed: None,
            compute_metadata: true,
        }
    }
}

impl Default for DesktopOptions {
    fn default() -> Self {
        Self::from_base_dir(".")
    }
}

/// Derive the typed fields of every row in bulk, column by column.
pub fn desktop_fields(
    columns: &DesktopColumns,
    policy: BoxPolicy,
) -> Result<Vec<DesktopFields>, Error> {
    let detections = convert_to_detections(&columns.bbox, policy)?;
    let keypoints = convert_to_keypoints(&columns.point);
    let query_types = convert_to_classifications(&columns.element_type);
    let interfaces = convert_to_classifications(&columns.interfaces());

    Ok(izip!(detections, keypoints, query_types, interfaces)
        .map(
            |(action_detection, action_keypoints, query_type, interfaces)| DesktopFields {
                action_detection,
                action_keypoints,
                query_type,
                interfaces,
            },
        )
        .collect())
}

/// Convert a ShowUI-desktop table into a sample collection.
///
/// The collection is shuffled (unless disabled) before metadata is computed.
pub async fn build_desktop_dataset(
    df: &DataFrame,
    options: &DesktopOptions,
    progress: Option<Sender<Progress>>,
) -> Result<SampleCollection<DesktopFields>, Error> {
    let columns = DesktopColumns::from_dataframe(df)?;
    let images_dir = std::path::absolute(&options.images_dir)?;
    info!(
        "converting {} ShowUI-desktop rows, images under {}",
        columns.len(),
        images_dir.display()
    );

    let fields = desktop_fields(&columns, options.box_policy)?;
    let samples = columns
        .image_url
        .iter()
        .zip(fields)
        .map(|(url, fields)| Sample::new(resolve_image_path(&images_dir, url), fields));

    let mut collection = SampleCollection::new(options.name.clone());
    let added = collection.add_samples(samples);
    debug!("added {} samples to {}", added, collection.name());

    if let Some(ref p) = progress {
        let _ = p
            .send(Progress {
                current: added,
                total: added,
                status: Some("samples".to_owned()),
            })
            .await;
    }

    if options.shuffle {
        collection.shuffle(options.seed);
    }

    if options.compute_metadata {
        collection.compute_metadata(progress).await?;
    }

    Ok(collection)
}
