// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! FiftyOneDataset directory writer.
//!
//! Persists a [`SampleCollection`] as a `FiftyOneDataset` export directory:
//!
//! ```text
//! <root>/<name>/
//! ├── metadata.json   # name, media type, creation time, field schema
//! └── samples.json    # {"samples": [...]}
//! ```
//!
//! The directory can be imported with
//! `fo.Dataset.from_dir(path, dataset_type=fo.types.FiftyOneDataset)`.

use super::{
    dataset::SampleCollection,
    types::{FieldSchema, Sample, SampleFields},
};
use crate::Error;
use log::{debug, info};
use serde::Serialize;
use std::{
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

pub const METADATA_FILE: &str = "metadata.json";
pub const SAMPLES_FILE: &str = "samples.json";

/// Options for FiftyOneDataset writing.
#[derive(Debug, Clone)]
pub struct FiftyOneWriteOptions {
    /// Replace an existing dataset directory of the same name.
    pub overwrite: bool,
    /// Pretty-print JSON with indentation.
    pub pretty: bool,
}

impl Default for FiftyOneWriteOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            pretty: false,
        }
    }
}

#[derive(Serialize)]
struct DatasetMetadata<'a> {
    name: &'a str,
    media_type: &'static str,
    created_at: String,
    num_samples: usize,
    sample_fields: Vec<FieldSchema>,
}

#[derive(Serialize)]
struct SamplesDocument<'a, F> {
    samples: &'a [Sample<F>],
}

/// Writer for FiftyOneDataset export directories.
///
/// # Example
///
/// ```rust,no_run
/// use showui_fiftyone::fiftyone::{FiftyOneWriter, SampleCollection};
/// use showui_fiftyone::showui::WebFields;
///
/// let collection = SampleCollection::<WebFields>::new("ShowUI_Web");
/// let dir = FiftyOneWriter::new().write(&collection, "datasets")?;
/// println!("wrote {}", dir.display());
/// # Ok::<(), showui_fiftyone::Error>(())
/// ```
pub struct FiftyOneWriter {
    options: FiftyOneWriteOptions,
}

impl FiftyOneWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self {
            options: FiftyOneWriteOptions::default(),
        }
    }

    /// Create a new writer with custom options.
    pub fn with_options(options: FiftyOneWriteOptions) -> Self {
        Self { options }
    }

    /// Write the collection under `root/<collection name>`.
    ///
    /// # Returns
    /// The dataset directory that was written.
    pub fn write<F, P>(&self, collection: &SampleCollection<F>, root: P) -> Result<PathBuf, Error>
    where
        F: SampleFields,
        P: AsRef<Path>,
    {
        if collection.name().is_empty() || collection.name().contains(['/', '\\']) {
            return Err(Error::InvalidParameters(format!(
                "invalid dataset name {:?}",
                collection.name()
            )));
        }

        let dir = root.as_ref().join(collection.name());
        if dir.exists() {
            if !self.options.overwrite {
                return Err(Error::DatasetExists(dir));
            }
            debug!("removing existing dataset {}", dir.display());
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        let metadata = DatasetMetadata {
            name: collection.name(),
            media_type: "image",
            created_at: chrono::Utc::now().to_rfc3339(),
            num_samples: collection.len(),
            sample_fields: Sample::<F>::schema(),
        };
        self.write_json(&dir, METADATA_FILE, &metadata)?;

        let samples = SamplesDocument {
            samples: collection.samples(),
        };
        self.write_json(&dir, SAMPLES_FILE, &samples)?;

        info!(
            "wrote {} samples to dataset {} at {}",
            collection.len(),
            collection.name(),
            dir.display()
        );
        Ok(dir)
    }

    /// Serialize into a temporary file in `dir`, then rename it to `name`.
    fn write_json<T: Serialize>(&self, dir: &Path, name: &str, value: &T) -> Result<(), Error> {
        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::with_capacity(64 * 1024, tmp.as_file());
            if self.options.pretty {
                serde_json::to_writer_pretty(&mut writer, value)?;
            } else {
                serde_json::to_writer(&mut writer, value)?;
            }
            writer.flush()?;
        }
        tmp.persist(dir.join(name))?;
        Ok(())
    }
}

impl Default for FiftyOneWriter {
    fn default() -> Self {
        Self::new()
    }
}
