// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # FiftyOne Dataset Format Support
//!
//! Label types, coordinate conversion and persistence for the FiftyOne
//! `FiftyOneDataset` interchange layout.
//!
//! ## Supported Labels
//!
//! - `Classification`
//! - `Detection` / `Detections` (normalized `[x, y, w, h]`, optional `text`)
//! - `Keypoint` / `Keypoints` (normalized `[x, y]` points, optional `text`)
//!
//! Segmentation masks, polylines and video frames are not produced.
//!
//! ## Example
//!
//! ```rust,no_run
//! use showui_fiftyone::fiftyone::{
//!     BoxPolicy, FiftyOneWriter, Sample, SampleCollection,
//! };
//! use showui_fiftyone::showui::{WebFields, WebRow, build_row_labels};
//!
//! # fn example() -> Result<(), showui_fiftyone::Error> {
//! let row = WebRow {
//!     image_url: "page.png".to_owned(),
//!     bbox: vec![[0.1, 0.2, 0.5, 0.6]],
//!     point: vec![[0.3, 0.4]],
//!     element_type: vec!["Button".to_owned()],
//!     instruction: vec!["Click here".to_owned()],
//! };
//! let (detections, keypoints) = build_row_labels(&row, BoxPolicy::Reject)?;
//!
//! let mut collection = SampleCollection::new("ShowUI_Web");
//! collection.add_samples([Sample::new(
//!     "images/page.png",
//!     WebFields {
//!         instructions: row.instruction.clone(),
//!         detections,
//!         keypoints,
//!     },
//! )]);
//! FiftyOneWriter::new().write(&collection, "datasets")?;
//! # Ok(())
//! # }
//! ```

mod convert;
mod dataset;
mod types;
mod writer;

pub use types::{
    Classification, Detection, Detections, FieldSchema, ImageMetadata, Keypoint, Keypoints,
    ObjectId, Sample, SampleFields,
};

pub use convert::{
    ACTION_LABEL, BoxPolicy, convert_bbox_to_fiftyone, convert_to_classifications,
    convert_to_detections, convert_to_keypoints, folder_category,
};

pub use dataset::{SampleCollection, image_metadata};

pub use writer::{FiftyOneWriteOptions, FiftyOneWriter, METADATA_FILE, SAMPLES_FILE};

#[cfg(test)]
mod tests;
