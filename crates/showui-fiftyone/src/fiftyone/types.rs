// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! FiftyOne label and sample structures for serde serialization.
//!
//! The structures mirror the JSON documents FiftyOne writes into the
//! `samples.json` file of a `FiftyOneDataset` export: every label carries a
//! `_cls` discriminator and labels with identity carry an `_id` object id.

use serde::{Serialize, Serializer, ser::SerializeMap};
use std::path::PathBuf;

/// A 12-byte BSON-style object id, rendered as `{"$oid": "<24 hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a new random object id.
    pub fn new() -> Self {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let hex = bytes[..12].iter().map(|b| format!("{:02x}", b)).collect();
        ObjectId(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$oid", &self.0)?;
        map.end()
    }
}

/// A single categorical label attached to a sample.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "_cls")]
pub struct Classification {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tags: Vec<String>,
    pub label: String,
}

impl Classification {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            tags: Vec::new(),
            label: label.into(),
        }
    }
}

/// A labeled bounding box.
///
/// `bounding_box` is `[x, y, width, height]` with `(x, y)` the top-left
/// corner, all normalized to `[0, 1]`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "_cls")]
pub struct Detection {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tags: Vec<String>,
    pub label: String,
    pub bounding_box: [f64; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Detection {
    pub fn new(label: impl Into<String>, bounding_box: [f64; 4]) -> Self {
        Self {
            id: ObjectId::new(),
            tags: Vec::new(),
            label: label.into(),
            bounding_box,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A list of detections for one sample.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "_cls")]
pub struct Detections {
    pub detections: Vec<Detection>,
}

impl Detections {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// A labeled set of points. ShowUI keypoints always hold a single `[x, y]`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "_cls")]
pub struct Keypoint {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tags: Vec<String>,
    pub label: String,
    pub points: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Keypoint {
    pub fn new(label: impl Into<String>, points: Vec<[f64; 2]>) -> Self {
        Self {
            id: ObjectId::new(),
            tags: Vec::new(),
            label: label.into(),
            points,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A list of keypoints for one sample.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "_cls")]
pub struct Keypoints {
    pub keypoints: Vec<Keypoint>,
}

impl Keypoints {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Media metadata computed from the image file on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "_cls")]
pub struct ImageMetadata {
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// Schema entry describing one sample field in `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    pub ftype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_doc_type: Option<String>,
    /// Element type of a `ListField`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfield: Option<String>,
}

impl FieldSchema {
    /// A field of a primitive type, e.g. `fiftyone.core.fields.StringField`.
    pub fn primitive(name: &str, ftype: &str) -> Self {
        Self {
            name: name.to_owned(),
            ftype: format!("fiftyone.core.fields.{}", ftype),
            embedded_doc_type: None,
            subfield: None,
        }
    }

    /// A `ListField` whose elements are of the primitive type `subfield`.
    pub fn list(name: &str, subfield: &str) -> Self {
        Self {
            name: name.to_owned(),
            ftype: "fiftyone.core.fields.ListField".to_owned(),
            embedded_doc_type: None,
            subfield: Some(format!("fiftyone.core.fields.{}", subfield)),
        }
    }

    /// An embedded label document, e.g. `fiftyone.core.labels.Detections`.
    pub fn label(name: &str, label_cls: &str) -> Self {
        Self {
            name: name.to_owned(),
            ftype: "fiftyone.core.fields.EmbeddedDocumentField".to_owned(),
            embedded_doc_type: Some(format!("fiftyone.core.labels.{}", label_cls)),
            subfield: None,
        }
    }
}

/// Typed per-sample annotation fields.
///
/// Implementors are flattened into the sample document, so every field name
/// returned by [`SampleFields::schema`] must match a serialized key.
pub trait SampleFields: Serialize {
    fn schema() -> Vec<FieldSchema>;
}

/// One unit of a sample collection: an image plus typed annotation fields.
#[derive(Debug, Clone, Serialize)]
pub struct Sample<F> {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub filepath: PathBuf,
    pub tags: Vec<String>,
    #[serde(rename = "_media_type")]
    media_type: &'static str,
    pub metadata: Option<ImageMetadata>,
    #[serde(flatten)]
    pub fields: F,
}

impl<F: SampleFields> Sample<F> {
    pub fn new(filepath: impl Into<PathBuf>, fields: F) -> Self {
        Self {
            id: ObjectId::new(),
            filepath: filepath.into(),
            tags: Vec::new(),
            media_type: "image",
            metadata: None,
            fields,
        }
    }

    /// Schema of the built-in fields followed by those of `F`.
    pub fn schema() -> Vec<FieldSchema> {
        let mut schema = vec![
            FieldSchema::primitive("id", "ObjectIdField"),
            FieldSchema::primitive("filepath", "StringField"),
            FieldSchema::list("tags", "StringField"),
            FieldSchema {
                name: "metadata".to_owned(),
                ftype: "fiftyone.core.fields.EmbeddedDocumentField".to_owned(),
                embedded_doc_type: Some("fiftyone.core.metadata.ImageMetadata".to_owned()),
                subfield: None,
            },
        ];
        schema.extend(F::schema());
        schema
    }
}
