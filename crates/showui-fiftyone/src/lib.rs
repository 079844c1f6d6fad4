// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # ShowUI FiftyOne Conversion Library
//!
//! Converts the ShowUI UI-automation datasets (desktop and web) from their
//! published Parquet form into FiftyOne sample collections, written in the
//! `FiftyOneDataset` directory layout that FiftyOne imports directly.
//!
//! ## Features
//!
//! - **Coordinate conversion**: corner-pair `[x1, y1, x2, y2]` boxes to
//!   FiftyOne `[x, y, w, h]`
//! - **Typed samples**: desktop and web samples are explicit field records
//!   rather than dynamically injected fields
//! - **Hub loading**: downloads and caches published Parquet shards
//! - **Image metadata**: size, MIME type and dimensions for every sample
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use showui_fiftyone::{
//!     Error, Settings,
//!     fiftyone::FiftyOneWriter,
//!     showui::{
//!         DESKTOP_HUB_REPO, DESKTOP_HUB_SPLIT, DESKTOP_HUB_SUBSET, DesktopOptions,
//!         build_desktop_dataset,
//!     },
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let settings = Settings::load(None)?;
//!     let hub = settings.hub_client()?;
//!     let df = hub
//!         .load_dataframe(DESKTOP_HUB_REPO, DESKTOP_HUB_SUBSET, DESKTOP_HUB_SPLIT, None)
//!         .await?;
//!
//!     let options = DesktopOptions::from_base_dir(&settings.base_dir);
//!     let collection = build_desktop_dataset(&df, &options, None).await?;
//!     FiftyOneWriter::new().write(&collection, "datasets")?;
//!     Ok(())
//! }
//! ```

mod error;
mod hub;
mod settings;

pub mod fiftyone;
pub mod showui;

pub use crate::{
    error::Error,
    hub::{DEFAULT_HUB_ENDPOINT, HubClient},
    settings::{ENV_PREFIX, Settings},
};

/// Progress of a long-running conversion step.
///
/// Sent over a `tokio::sync::mpsc` channel by the pipelines and the hub
/// loader; `status` names the step (`"download"`, `"samples"`,
/// `"metadata"`).
///
/// # Example
///
/// ```rust
/// use showui_fiftyone::Progress;
///
/// let progress = Progress {
///     current: 25,
///     total: 100,
///     status: Some("metadata".to_owned()),
/// };
/// assert_eq!(progress.percentage(), 25.0);
/// ```
#[derive(Debug, Clone)]
pub struct Progress {
    /// Current number of completed items.
    pub current: usize,
    /// Total number of items to process.
    pub total: usize,
    /// Step being reported.
    pub status: Option<String>,
}

impl Progress {
    /// Completion in percent, `0.0` when the total is unknown.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 * 100.0 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    #[test]
    fn test_progress_percentage() {
        let progress = Progress {
            current: 3,
            total: 4,
            status: None,
        };
        assert_eq!(progress.percentage(), 75.0);

        let unknown = Progress {
            current: 0,
            total: 0,
            status: None,
        };
        assert_eq!(unknown.percentage(), 0.0);
    }
}
