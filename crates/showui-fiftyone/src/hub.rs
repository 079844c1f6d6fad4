// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Dataset hub loader.
//!
//! Fetches the Parquet export of a published hub dataset. The shard list is
//! read from `{endpoint}/api/datasets/{repo}/parquet/{subset}/{split}` and
//! every shard is downloaded once into a local cache:
//!
//! ```text
//! <cache_dir>/<owner>--<name>/<subset>/<split>/<shard>.parquet
//! ```

use crate::{Error, Progress, showui::concat_frames, showui::read_dataframe};
use directories::ProjectDirs;
use futures::StreamExt as _;
use log::{debug, info};
use polars::prelude::DataFrame;
use std::{
    io::Write as _,
    path::{Path, PathBuf},
};
use tokio::sync::mpsc::Sender;
use url::Url;

/// Public Hugging Face Hub endpoint.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Client for downloading hub dataset snapshots.
///
/// # Example
///
/// ```rust,no_run
/// use showui_fiftyone::HubClient;
///
/// # async fn example() -> Result<(), showui_fiftyone::Error> {
/// let hub = HubClient::new("https://huggingface.co", HubClient::default_cache_dir()?)?;
/// let df = hub
///     .load_dataframe("showlab/ShowUI-desktop", "default", "train", None)
///     .await?;
/// println!("{} rows", df.height());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
    cache_dir: PathBuf,
}

impl HubClient {
    /// Create a client for `endpoint` caching shards under `cache_dir`.
    pub fn new(endpoint: &str, cache_dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let endpoint = if endpoint.ends_with('/') {
            Url::parse(endpoint)?
        } else {
            Url::parse(&format!("{}/", endpoint))?
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("showui-fiftyone/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            token: None,
            cache_dir: cache_dir.into(),
        })
    }

    /// Authenticate requests with a bearer token (needed for gated datasets).
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// The user cache directory for hub downloads.
    pub fn default_cache_dir() -> Result<PathBuf, Error> {
        Ok(ProjectDirs::from("ai", "EdgeFirst", "ShowUI FiftyOne")
            .ok_or_else(|| {
                Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine user cache directory",
                ))
            })?
            .cache_dir()
            .join("hub"))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// URL of the Parquet shard listing for a dataset split.
    pub fn parquet_index_url(&self, repo: &str, subset: &str, split: &str) -> Result<Url, Error> {
        validate_repo(repo)?;
        Ok(self.endpoint.join(&format!(
            "api/datasets/{}/parquet/{}/{}",
            repo, subset, split
        ))?)
    }

    /// Local cache location of a shard.
    pub fn shard_cache_path(
        &self,
        repo: &str,
        subset: &str,
        split: &str,
        shard: &Url,
    ) -> Result<PathBuf, Error> {
        let file_name = shard
            .path_segments()
            .and_then(|mut s| s.next_back())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::InvalidParameters(format!("shard URL has no file name: {}", shard))
            })?;

        Ok(self
            .cache_dir
            .join(repo.replace('/', "--"))
            .join(subset)
            .join(split)
            .join(file_name))
    }

    /// List the Parquet shard URLs of a dataset split.
    pub async fn parquet_urls(
        &self,
        repo: &str,
        subset: &str,
        split: &str,
    ) -> Result<Vec<Url>, Error> {
        let index = self.parquet_index_url(repo, subset, split)?;
        debug!("listing parquet shards: {}", index);

        let urls: Vec<String> = self
            .request(index)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if urls.is_empty() {
            return Err(Error::InvalidParameters(format!(
                "no parquet shards published for {} {}/{}",
                repo, subset, split
            )));
        }

        urls.iter()
            .map(|u| Url::parse(u).map_err(Error::from))
            .collect()
    }

    /// Download `url` to `dest`, streaming through a temporary file in the
    /// destination directory.
    pub async fn download(&self, url: &Url, dest: &Path) -> Result<(), Error> {
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let response = self.request(url.clone()).send().await?.error_for_status()?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            tmp.write_all(&chunk?)?;
        }
        tmp.flush()?;
        tmp.persist(dest)?;

        debug!("downloaded {} to {}", url, dest.display());
        Ok(())
    }

    /// Fetch (or reuse from cache) the given shards and concatenate them.
    pub async fn load_shards(
        &self,
        repo: &str,
        subset: &str,
        split: &str,
        shards: &[Url],
        progress: Option<Sender<Progress>>,
    ) -> Result<DataFrame, Error> {
        let total = shards.len();
        let mut frames = Vec::with_capacity(total);

        for (i, shard) in shards.iter().enumerate() {
            let path = self.shard_cache_path(repo, subset, split, shard)?;
            if path.exists() {
                debug!("using cached shard {}", path.display());
            } else {
                self.download(shard, &path).await?;
            }
            frames.push(read_dataframe(&path)?);

            if let Some(ref p) = progress {
                let _ = p
                    .send(Progress {
                        current: i + 1,
                        total,
                        status: Some("download".to_owned()),
                    })
                    .await;
            }
        }

        concat_frames(frames)
    }

    /// Load a dataset split from the hub as a single `DataFrame`.
    pub async fn load_dataframe(
        &self,
        repo: &str,
        subset: &str,
        split: &str,
        progress: Option<Sender<Progress>>,
    ) -> Result<DataFrame, Error> {
        let shards = self.parquet_urls(repo, subset, split).await?;
        info!("loading {} ({}/{}): {} shards", repo, subset, split, shards.len());
        self.load_shards(repo, subset, split, &shards, progress).await
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Hub repositories are addressed as `owner/name`.
fn validate_repo(repo: &str) -> Result<(), Error> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => Err(Error::InvalidParameters(format!(
            "hub repository must be 'owner/name', got '{}'",
            repo
        ))),
    }
}
