// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use std::path::PathBuf;

/// Error type for ShowUI to FiftyOne conversion.
///
/// Wraps the errors of the underlying libraries (I/O, Polars, HTTP, config)
/// and adds the row-level validation failures raised while mapping ShowUI
/// rows onto FiftyOne samples. Any of these aborts a conversion run.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred during file operations.
    IoError(std::io::Error),
    /// Configuration parsing or loading error.
    ConfigError(config::ConfigError),
    /// JSON serialization or deserialization error.
    JsonError(serde_json::Error),
    /// HTTP request error from the reqwest client.
    HttpError(reqwest::Error),
    /// URL parsing error.
    UrlParseError(url::ParseError),
    /// Polars dataframe operation error.
    PolarsError(polars::error::PolarsError),
    /// Image header could not be probed for its dimensions.
    ImageSizeError(imagesize::ImageError),
    /// Temporary file could not be persisted to its final location.
    PersistError(tempfile::PersistError),
    /// A coordinate list does not have the expected number of values.
    InvalidShape(String),
    /// Co-indexed sequences of a row have different lengths.
    LengthMismatch(String),
    /// A bounding box was rejected by the active box policy.
    InvalidBox(String),
    /// A required column value is null.
    MissingValue(String),
    /// Unknown box policy name.
    InvalidBoxPolicy(String),
    /// Unsupported input file format.
    UnsupportedFormat(String),
    /// The output dataset already exists and overwrite is disabled.
    DatasetExists(PathBuf),
    /// Invalid parameters provided to an operation.
    InvalidParameters(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::HttpError(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::UrlParseError(err)
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(err: polars::error::PolarsError) -> Self {
        Error::PolarsError(err)
    }
}

impl From<imagesize::ImageError> for Error {
    fn from(err: imagesize::ImageError) -> Self {
        Error::ImageSizeError(err)
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::PersistError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::HttpError(e) => write!(f, "HTTP error: {}", e),
            Error::UrlParseError(e) => write!(f, "URL parse error: {}", e),
            Error::PolarsError(e) => write!(f, "Polars error: {}", e),
            Error::ImageSizeError(e) => write!(f, "Image size error: {}", e),
            Error::PersistError(e) => write!(f, "Persist error: {}", e),
            Error::InvalidShape(s) => write!(f, "Invalid shape: {}", s),
            Error::LengthMismatch(s) => write!(f, "Length mismatch: {}", s),
            Error::InvalidBox(s) => write!(f, "Invalid bounding box: {}", s),
            Error::MissingValue(s) => write!(f, "Missing value: {}", s),
            Error::InvalidBoxPolicy(s) => write!(f, "Invalid box policy: {}", s),
            Error::UnsupportedFormat(s) => write!(f, "Unsupported format: {}", s),
            Error::DatasetExists(p) => {
                write!(f, "Dataset already exists: {}", p.display())
            }
            Error::InvalidParameters(s) => write!(f, "Invalid parameters: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::ConfigError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            Error::HttpError(e) => Some(e),
            Error::UrlParseError(e) => Some(e),
            Error::PolarsError(e) => Some(e),
            Error::ImageSizeError(e) => Some(e),
            Error::PersistError(e) => Some(e),
            _ => None,
        }
    }
}
