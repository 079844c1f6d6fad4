// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! In-memory sample collection built up by the conversion pipelines before
//! it is persisted.

use super::types::{ImageMetadata, Sample, SampleFields};
use crate::{Error, Progress};
use log::debug;
use rand::{SeedableRng as _, rngs::StdRng, seq::SliceRandom as _};
use std::path::Path;
use tokio::sync::mpsc::Sender;

/// A named, ordered collection of samples sharing one field schema.
#[derive(Debug, Clone)]
pub struct SampleCollection<F> {
    name: String,
    samples: Vec<Sample<F>>,
}

impl<F: SampleFields> SampleCollection<F> {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[Sample<F>] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append samples in one bulk call, returning the number added.
    pub fn add_samples<I>(&mut self, samples: I) -> usize
    where
        I: IntoIterator<Item = Sample<F>>,
    {
        let before = self.samples.len();
        self.samples.extend(samples);
        self.samples.len() - before
    }

    /// Randomly permute the sample order. A seed makes the order
    /// reproducible.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        match seed {
            Some(seed) => self.samples.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => self.samples.shuffle(&mut rand::rng()),
        }
    }

    /// Populate `metadata` of every sample from its image file.
    ///
    /// Fails on the first sample whose file is missing or not a readable
    /// image.
    pub async fn compute_metadata(
        &mut self,
        progress: Option<Sender<Progress>>,
    ) -> Result<(), Error> {
        let total = self.samples.len();

        for (i, sample) in self.samples.iter_mut().enumerate() {
            sample.metadata = Some(image_metadata(&sample.filepath)?);

            if let Some(ref p) = progress {
                let _ = p
                    .send(Progress {
                        current: i + 1,
                        total,
                        status: Some("metadata".to_owned()),
                    })
                    .await;
            }
        }

        debug!("computed metadata for {} samples", total);
        Ok(())
    }
}

/// Read size, MIME type and dimensions of an image file.
pub fn image_metadata<P: AsRef<Path>>(path: P) -> Result<ImageMetadata, Error> {
    let path = path.as_ref();
    let size_bytes = std::fs::metadata(path)?.len();
    let mime_type = infer::get_from_path(path)?.map(|t| t.mime_type().to_owned());
    let size = imagesize::size(path)?;

    Ok(ImageMetadata {
        size_bytes,
        mime_type,
        width: dimension(path, size.width)?,
        height: dimension(path, size.height)?,
    })
}

fn dimension(path: &Path, value: usize) -> Result<u32, Error> {
    u32::try_from(value).map_err(|_| {
        Error::InvalidShape(format!(
            "{}: image dimension {} exceeds u32",
            path.display(),
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_overflow() {
        let path = Path::new("huge.png");
        assert_eq!(dimension(path, 1920).unwrap(), 1920);
        assert!(matches!(
            dimension(path, u32::MAX as usize + 1),
            Err(Error::InvalidShape(_))
        ));
    }
}
