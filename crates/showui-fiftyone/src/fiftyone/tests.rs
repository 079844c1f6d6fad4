// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Tests for FiftyOne label serialization, collections and the writer.

use super::*;
use crate::{Error, showui::WebFields};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn web_sample(path: &Path, label: &str) -> Sample<WebFields> {
    Sample::new(
        path,
        WebFields {
            instructions: vec![format!("press {}", label)],
            detections: Detections::new(vec![
                Detection::new(label, [0.1, 0.2, 0.4, 0.4]).with_text(format!("press {}", label)),
            ]),
            keypoints: Keypoints::new(vec![
                Keypoint::new(label, vec![[0.3, 0.4]]).with_text(format!("press {}", label)),
            ]),
        },
    )
}

fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::new(width, height).save(path).unwrap();
}

#[test]
fn test_object_id() {
    let a = ObjectId::new();
    let b = ObjectId::new();
    assert_eq!(a.as_str().len(), 24);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);

    let value = serde_json::to_value(&a).unwrap();
    assert_eq!(value["$oid"], a.as_str());
}

#[test]
fn test_detection_serialization() {
    let det = Detection::new("Button", [0.1, 0.2, 0.4, 0.4]).with_text("Click here");
    let value = serde_json::to_value(&det).unwrap();

    assert_eq!(value["_cls"], "Detection");
    assert_eq!(value["label"], "Button");
    assert_eq!(value["text"], "Click here");
    assert_eq!(value["bounding_box"].as_array().unwrap().len(), 4);
    assert!(value["_id"]["$oid"].is_string());
    assert_eq!(value["tags"], Value::Array(vec![]));

    let plain = serde_json::to_value(Detection::new("action", [0.0; 4])).unwrap();
    assert!(plain.get("text").is_none());
}

#[test]
fn test_container_serialization() {
    let detections = Detections::new(vec![Detection::new("a", [0.0, 0.0, 1.0, 1.0])]);
    let value = serde_json::to_value(&detections).unwrap();
    assert_eq!(value["_cls"], "Detections");
    assert_eq!(value["detections"][0]["_cls"], "Detection");

    let keypoints = Keypoints::new(vec![Keypoint::new("a", vec![[0.3, 0.4]])]);
    let value = serde_json::to_value(&keypoints).unwrap();
    assert_eq!(value["_cls"], "Keypoints");
    assert_eq!(value["keypoints"][0]["points"][0][0], 0.3);
    assert_eq!(value["keypoints"][0]["points"][0][1], 0.4);

    let value = serde_json::to_value(Classification::new("click")).unwrap();
    assert_eq!(value["_cls"], "Classification");
    assert_eq!(value["label"], "click");
}

#[test]
fn test_sample_serialization_flattens_fields() {
    let sample = web_sample(Path::new("/images/a.png"), "Button");
    let value = serde_json::to_value(&sample).unwrap();

    assert_eq!(value["filepath"], "/images/a.png");
    assert_eq!(value["_media_type"], "image");
    assert!(value["metadata"].is_null());
    assert_eq!(value["instructions"][0], "press Button");
    assert_eq!(value["detections"]["_cls"], "Detections");
    assert_eq!(value["keypoints"]["keypoints"][0]["text"], "press Button");
}

#[test]
fn test_sample_schema() {
    let schema = Sample::<WebFields>::schema();
    let names: Vec<&str> = schema.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "filepath",
            "tags",
            "metadata",
            "instructions",
            "detections",
            "keypoints"
        ]
    );

    let detections = schema.iter().find(|f| f.name == "detections").unwrap();
    assert_eq!(
        detections.embedded_doc_type.as_deref(),
        Some("fiftyone.core.labels.Detections")
    );
    assert!(detections.subfield.is_none());

    for list in ["tags", "instructions"] {
        let field = schema.iter().find(|f| f.name == list).unwrap();
        assert_eq!(field.ftype, "fiftyone.core.fields.ListField");
        assert_eq!(
            field.subfield.as_deref(),
            Some("fiftyone.core.fields.StringField")
        );
    }

    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value[2]["subfield"], "fiftyone.core.fields.StringField");
    assert!(value[1].get("subfield").is_none());
}

#[test]
fn test_add_samples() {
    let mut collection = SampleCollection::new("test");
    assert!(collection.is_empty());

    let added = collection.add_samples((0..5).map(|i| {
        web_sample(Path::new(&format!("{}.png", i)), "Button")
    }));
    assert_eq!(added, 5);
    assert_eq!(collection.len(), 5);
    assert_eq!(collection.samples()[4].filepath, Path::new("4.png"));
}

#[test]
fn test_shuffle_seeded() {
    let build = || {
        let mut collection = SampleCollection::new("test");
        collection.add_samples((0..32).map(|i| {
            web_sample(Path::new(&format!("{}.png", i)), "Button")
        }));
        collection
    };
    let order = |c: &SampleCollection<WebFields>| -> Vec<_> {
        c.samples().iter().map(|s| s.filepath.clone()).collect()
    };

    let original = order(&build());
    let mut a = build();
    let mut b = build();
    a.shuffle(Some(42));
    b.shuffle(Some(42));

    assert_eq!(order(&a), order(&b));
    assert_ne!(order(&a), original);

    let mut sorted = order(&a);
    sorted.sort();
    let mut expected = original.clone();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[tokio::test]
async fn test_compute_metadata() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shot.png");
    write_png(&path, 64, 48);

    let mut collection = SampleCollection::new("test");
    collection.add_samples([web_sample(&path, "Button")]);
    collection.compute_metadata(None).await.unwrap();

    let metadata = collection.samples()[0].metadata.as_ref().unwrap();
    assert_eq!(metadata.width, 64);
    assert_eq!(metadata.height, 48);
    assert_eq!(metadata.mime_type.as_deref(), Some("image/png"));
    assert!(metadata.size_bytes > 0);

    let value = serde_json::to_value(metadata).unwrap();
    assert_eq!(value["_cls"], "ImageMetadata");
}

#[tokio::test]
async fn test_compute_metadata_missing_image() {
    let dir = TempDir::new().unwrap();
    let mut collection = SampleCollection::new("test");
    collection.add_samples([web_sample(&dir.path().join("absent.png"), "Button")]);

    let err = collection.compute_metadata(None).await.unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}

#[tokio::test]
async fn test_compute_metadata_reports_progress() {
    let dir = TempDir::new().unwrap();
    let mut collection = SampleCollection::new("test");
    for i in 0..3 {
        let path = dir.path().join(format!("{}.png", i));
        write_png(&path, 8, 8);
        collection.add_samples([web_sample(&path, "Icon")]);
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    collection.compute_metadata(Some(tx)).await.unwrap();

    let mut last = None;
    while let Some(progress) = rx.recv().await {
        last = Some(progress);
    }
    let last = last.unwrap();
    assert_eq!(last.current, 3);
    assert_eq!(last.total, 3);
}

#[test]
fn test_writer_layout() {
    let dir = TempDir::new().unwrap();
    let mut collection = SampleCollection::new("ShowUI_Web");
    collection.add_samples([
        web_sample(Path::new("/images/a.png"), "Button"),
        web_sample(Path::new("/images/b.png"), "Link"),
    ]);

    let out = FiftyOneWriter::new().write(&collection, dir.path()).unwrap();
    assert_eq!(out, dir.path().join("ShowUI_Web"));

    let metadata: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(METADATA_FILE)).unwrap()).unwrap();
    assert_eq!(metadata["name"], "ShowUI_Web");
    assert_eq!(metadata["media_type"], "image");
    assert_eq!(metadata["num_samples"], 2);
    assert!(metadata["sample_fields"].as_array().unwrap().len() >= 7);

    let samples: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(SAMPLES_FILE)).unwrap()).unwrap();
    let samples = samples["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1]["detections"]["detections"][0]["label"], "Link");

    // Only the two documents are left behind.
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn test_writer_overwrite() {
    let dir = TempDir::new().unwrap();
    let mut collection = SampleCollection::new("ShowUI_Web");
    collection.add_samples([web_sample(Path::new("a.png"), "Button")]);

    let keep = FiftyOneWriter::with_options(FiftyOneWriteOptions {
        overwrite: false,
        pretty: true,
    });
    keep.write(&collection, dir.path()).unwrap();
    assert!(matches!(
        keep.write(&collection, dir.path()),
        Err(Error::DatasetExists(_))
    ));

    let stale = dir.path().join("ShowUI_Web").join("stale.json");
    std::fs::write(&stale, "{}").unwrap();
    FiftyOneWriter::new().write(&collection, dir.path()).unwrap();
    assert!(!stale.exists());
}

#[test]
fn test_writer_rejects_bad_name() {
    let dir = TempDir::new().unwrap();
    let collection = SampleCollection::<WebFields>::new("../escape");
    assert!(matches!(
        FiftyOneWriter::new().write(&collection, dir.path()),
        Err(Error::InvalidParameters(_))
    ));
}
