// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Columnar readers for ShowUI Parquet/Arrow tables.
//!
//! Columns are extracted all at once (one pass per column) and cast to
//! `Float64`/`String` first, so both `list` and fixed-size `array` encodings
//! of the coordinate columns are accepted.

use crate::Error;
use log::debug;
use polars::prelude::*;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// Read a Parquet file, an Arrow IPC file, or a directory of Parquet shards
/// into one `DataFrame`.
pub fn read_dataframe<P: AsRef<Path>>(path: P) -> Result<DataFrame, Error> {
    let path = path.as_ref();

    if path.is_dir() {
        let mut shards: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|e| e == "parquet"))
            .collect();
        shards.sort();

        if shards.is_empty() {
            return Err(Error::InvalidParameters(format!(
                "no parquet files found in {}",
                path.display()
            )));
        }

        let frames = shards
            .iter()
            .map(read_file)
            .collect::<Result<Vec<_>, _>>()?;
        return concat_frames(frames);
    }

    read_file(path)
}

fn read_file<P: AsRef<Path>>(path: P) -> Result<DataFrame, Error> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let df = match ext.as_deref() {
        Some("parquet") => ParquetReader::new(File::open(path)?).finish()?,
        Some("arrow") | Some("ipc") | Some("feather") => {
            IpcReader::new(File::open(path)?).finish()?
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!(
                "{} (expected .parquet or .arrow)",
                path.display()
            )));
        }
    };

    debug!("read {} rows from {}", df.height(), path.display());
    Ok(df)
}

/// Vertically concatenate frames sharing one schema.
pub(crate) fn concat_frames(frames: Vec<DataFrame>) -> Result<DataFrame, Error> {
    let mut frames = frames.into_iter();
    let mut df = frames
        .next()
        .ok_or_else(|| Error::InvalidParameters("no data frames to concatenate".to_owned()))?;
    for other in frames {
        df.vstack_mut(&other)?;
    }
    Ok(df)
}

/// Join an `image_url` onto the images directory. A leading `/` on the URL
/// is ignored so the result always stays under `images_dir`.
pub fn resolve_image_path(images_dir: &Path, image_url: &str) -> PathBuf {
    images_dir.join(image_url.trim_start_matches('/'))
}

fn cell(column: &str, row: usize) -> String {
    format!("column '{}' row {}", column, row)
}

fn element(column: &str, row: usize, index: usize) -> String {
    format!("{} element {}", cell(column, row), index)
}

fn floats(series: &Series, location: &str) -> Result<Vec<f64>, Error> {
    series
        .f64()?
        .into_iter()
        .map(|v| v.ok_or_else(|| Error::MissingValue(format!("null coordinate in {}", location))))
        .collect()
}

fn fixed<const N: usize>(values: Vec<f64>, location: &str) -> Result<[f64; N], Error> {
    values.try_into().map_err(|v: Vec<f64>| {
        Error::InvalidShape(format!(
            "{}: expected {} values, got {}",
            location,
            N,
            v.len()
        ))
    })
}

/// Extract a non-null string column.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, Error> {
    let col = df.column(name)?.cast(&DataType::String)?;
    col.str()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.map(String::from)
                .ok_or_else(|| Error::MissingValue(cell(name, i)))
        })
        .collect()
}

/// Extract a column of fixed-length coordinate vectors, e.g. `bbox` as
/// `[x1, y1, x2, y2]` per row.
pub fn vector_column<const N: usize>(df: &DataFrame, name: &str) -> Result<Vec<[f64; N]>, Error> {
    let col = df
        .column(name)?
        .cast(&DataType::List(Box::new(DataType::Float64)))?;
    let list = col.list()?;

    (0..list.len())
        .map(|i| {
            let series = list
                .get_as_series(i)
                .ok_or_else(|| Error::MissingValue(cell(name, i)))?;
            let location = cell(name, i);
            fixed(floats(&series, &location)?, &location)
        })
        .collect()
}

/// Extract a column holding a list of coordinate vectors per row, e.g. web
/// `bbox` with one `[x1, y1, x2, y2]` per UI element.
pub fn vector_list_column<const N: usize>(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Vec<[f64; N]>>, Error> {
    let col = df.column(name)?.cast(&DataType::List(Box::new(DataType::List(
        Box::new(DataType::Float64),
    ))))?;
    let outer = col.list()?;

    (0..outer.len())
        .map(|i| {
            let elements = outer
                .get_as_series(i)
                .ok_or_else(|| Error::MissingValue(cell(name, i)))?;
            let inner = elements.list()?;
            (0..inner.len())
                .map(|j| {
                    let location = element(name, i, j);
                    let series = inner
                        .get_as_series(j)
                        .ok_or_else(|| Error::MissingValue(location.clone()))?;
                    fixed(floats(&series, &location)?, &location)
                })
                .collect()
        })
        .collect()
}

/// Extract a column holding a list of strings per row.
pub fn string_list_column(df: &DataFrame, name: &str) -> Result<Vec<Vec<String>>, Error> {
    let col = df
        .column(name)?
        .cast(&DataType::List(Box::new(DataType::String)))?;
    let list = col.list()?;

    (0..list.len())
        .map(|i| {
            let series = list
                .get_as_series(i)
                .ok_or_else(|| Error::MissingValue(cell(name, i)))?;
            series
                .str()?
                .into_iter()
                .map(|v| {
                    v.map(String::from).ok_or_else(|| {
                        Error::MissingValue(format!("null string in {}", cell(name, i)))
                    })
                })
                .collect()
        })
        .collect()
}
