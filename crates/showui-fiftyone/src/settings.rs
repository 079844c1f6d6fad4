// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Layered conversion settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. A TOML file: the explicit path, or `config.toml` in the user config
//!    directory when present
//! 3. `SHOWUI_*` environment variables (e.g. `SHOWUI_BASE_DIR`)

use crate::{Error, HubClient, fiftyone::BoxPolicy, hub::DEFAULT_HUB_ENDPOINT};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables overriding settings.
pub const ENV_PREFIX: &str = "SHOWUI";

/// Settings shared by both conversion pipelines.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root holding the `ShowUI-web` and `ShowUI-desktop` checkouts.
    pub base_dir: PathBuf,
    /// Hub shard cache; the user cache directory when unset.
    pub cache_dir: Option<PathBuf>,
    pub hub_endpoint: String,
    pub hub_token: Option<String>,
    pub box_policy: BoxPolicy,
    /// Seed for the desktop shuffle.
    pub seed: Option<u64>,
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let mut builder = Config::builder()
            .set_default("base_dir", ".")?
            .set_default("hub_endpoint", DEFAULT_HUB_ENDPOINT)?
            .set_default("box_policy", "reject")?;

        match path {
            Some(path) => {
                debug!("loading settings from {}", path.display());
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    builder = builder.add_source(File::from(path.as_path()).required(false));
                }
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// `config.toml` in the user config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("ai", "EdgeFirst", "ShowUI FiftyOne")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Hub client configured from these settings.
    pub fn hub_client(&self) -> Result<HubClient, Error> {
        let cache_dir = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => HubClient::default_cache_dir()?,
        };
        Ok(HubClient::new(&self.hub_endpoint, cache_dir)?.with_token(self.hub_token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("showui.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_from_file() {
        let (_dir, path) = write_config(
            r#"
base_dir = "/data/show-ui"
cache_dir = "/tmp/hub-cache"
box_policy = "clamp"
seed = 7
"#,
        );

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/data/show-ui"));
        assert_eq!(settings.cache_dir, Some(PathBuf::from("/tmp/hub-cache")));
        assert_eq!(settings.box_policy, BoxPolicy::Clamp);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.hub_endpoint, DEFAULT_HUB_ENDPOINT);
        assert!(settings.hub_token.is_none());

        let hub = settings.hub_client().unwrap();
        assert_eq!(hub.cache_dir(), Path::new("/tmp/hub-cache"));
    }

    #[test]
    fn test_load_defaults_from_empty_file() {
        let (_dir, path) = write_config("");
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.box_policy, BoxPolicy::Reject);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_invalid_box_policy() {
        let (_dir, path) = write_config("box_policy = \"strict\"\n");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(Error::ConfigError(_))
        ));
    }
}
