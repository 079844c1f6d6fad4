// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # ShowUI Dataset Conversion
//!
//! Pipelines converting the ShowUI UI-automation datasets into FiftyOne
//! sample collections.
//!
//! ## Supported Workflows
//!
//! 1. **ShowUI-web → FiftyOne**: local Parquet, one sample per screenshot
//!    with per-element detections and keypoints
//! 2. **ShowUI-desktop → FiftyOne**: hub snapshot or local Parquet, one
//!    action per screenshot with query type and interface classifications
//!
//! ## Example
//!
//! ```rust,no_run
//! use showui_fiftyone::fiftyone::FiftyOneWriter;
//! use showui_fiftyone::showui::{WEB_PARQUET_PATH, WebOptions, build_web_dataset, read_dataframe};
//!
//! # async fn example() -> Result<(), showui_fiftyone::Error> {
//! let df = read_dataframe(WEB_PARQUET_PATH)?;
//! let options = WebOptions::from_base_dir("/data/show-ui");
//! let collection = build_web_dataset(&df, &options, None).await?;
//! FiftyOneWriter::new().write(&collection, "datasets")?;
//! # Ok(())
//! # }
//! ```

mod desktop;
mod rows;
mod web;

pub use desktop::{
    DESKTOP_DATASET_NAME, DESKTOP_HUB_REPO, DESKTOP_HUB_SPLIT, DESKTOP_HUB_SUBSET, DesktopColumns,
    DesktopFields, DesktopOptions, build_desktop_dataset, desktop_fields,
};

pub use rows::{
    read_dataframe, resolve_image_path, string_column, string_list_column, vector_column,
    vector_list_column,
};

pub(crate) use rows::concat_frames;

pub use web::{
    WEB_DATASET_NAME, WEB_PARQUET_PATH, WebFields, WebOptions, WebRow, build_row_labels,
    build_web_dataset, web_rows,
};
