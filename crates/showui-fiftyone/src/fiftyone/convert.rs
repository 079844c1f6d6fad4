// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Coordinate and label conversion from ShowUI columns to FiftyOne labels.
//!
//! ## Coordinate Systems
//!
//! - **ShowUI**: Normalized 0-1 corner pair `[x1, y1, x2, y2]`
//! - **FiftyOne**: Normalized 0-1 origin + extent `[x, y, width, height]`
//!
//! Points are normalized `[x, y]` in both and pass through unchanged.

use super::types::{Classification, Detection, Keypoint, Keypoints};
use crate::Error;

/// Label given to every desktop action detection and keypoint.
pub const ACTION_LABEL: &str = "action";

// =============================================================================
// Bounding Box Conversion
// =============================================================================

/// Convert a corner-pair box `[x1, y1, x2, y2]` to FiftyOne
/// `[x, y, width, height]`.
///
/// No clamping or validation is performed; use [`BoxPolicy`] for that.
///
/// # Example
/// ```
/// use showui_fiftyone::fiftyone::convert_bbox_to_fiftyone;
///
/// let bbox = convert_bbox_to_fiftyone([0.1, 0.2, 0.5, 0.6]);
/// assert!((bbox[2] - 0.4).abs() < 1e-12);
/// assert!((bbox[3] - 0.4).abs() < 1e-12);
/// ```
pub fn convert_bbox_to_fiftyone(bbox: [f64; 4]) -> [f64; 4] {
    let [x1, y1, x2, y2] = bbox;
    [x1, y1, x2 - x1, y2 - y1]
}

/// How malformed corner boxes (inverted corners, non-finite values) are
/// handled during conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxPolicy {
    /// Fail the conversion on a malformed box.
    #[default]
    Reject,
    /// Clamp negative extents to zero. Non-finite values still fail.
    Clamp,
    /// Emit the converted box as-is, negative extents and non-finite
    /// values included.
    Allow,
}

impl BoxPolicy {
    /// Convert a corner box under this policy.
    pub fn apply(&self, bbox: [f64; 4]) -> Result<[f64; 4], Error> {
        let [x, y, w, h] = convert_bbox_to_fiftyone(bbox);
        if *self != BoxPolicy::Allow && bbox.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidBox(format!(
                "non-finite coordinates {:?}",
                bbox
            )));
        }
        match self {
            BoxPolicy::Allow => Ok([x, y, w, h]),
            BoxPolicy::Clamp => Ok([x, y, w.max(0.0), h.max(0.0)]),
            BoxPolicy::Reject => {
                if w < 0.0 || h < 0.0 {
                    return Err(Error::InvalidBox(format!(
                        "corners {:?} give negative extent w={}, h={}",
                        bbox, w, h
                    )));
                }
                Ok([x, y, w, h])
            }
        }
    }
}

impl TryFrom<&str> for BoxPolicy {
    type Error = crate::Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "reject" => Ok(BoxPolicy::Reject),
            "clamp" => Ok(BoxPolicy::Clamp),
            "allow" => Ok(BoxPolicy::Allow),
            _ => Err(crate::Error::InvalidBoxPolicy(s.to_string())),
        }
    }
}

impl std::str::FromStr for BoxPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.try_into()
    }
}

impl std::fmt::Display for BoxPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BoxPolicy::Reject => "reject",
            BoxPolicy::Clamp => "clamp",
            BoxPolicy::Allow => "allow",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Bulk Label Builders
// =============================================================================

/// Build one [`Classification`] per label, preserving order and text.
pub fn convert_to_classifications<S: AsRef<str>>(labels: &[S]) -> Vec<Classification> {
    labels
        .iter()
        .map(|label| Classification::new(label.as_ref()))
        .collect()
}

/// Build one `"action"` [`Detection`] per corner box.
pub fn convert_to_detections(
    boxes: &[[f64; 4]],
    policy: BoxPolicy,
) -> Result<Vec<Detection>, Error> {
    boxes
        .iter()
        .enumerate()
        .map(|(i, bbox)| {
            let bounding_box = policy
                .apply(*bbox)
                .map_err(|e| Error::InvalidBox(format!("sample {}: {}", i, e)))?;
            Ok(Detection::new(ACTION_LABEL, bounding_box))
        })
        .collect()
}

/// Build one [`Keypoints`] wrapper per point, each holding a single
/// `"action"` keypoint.
pub fn convert_to_keypoints(points: &[[f64; 2]]) -> Vec<Keypoints> {
    points
        .iter()
        .map(|point| Keypoints::new(vec![Keypoint::new(ACTION_LABEL, vec![*point])]))
        .collect()
}

/// Extract the interface category from an image path: its first non-empty
/// `/`-separated segment.
///
/// ```
/// use showui_fiftyone::fiftyone::folder_category;
///
/// assert_eq!(folder_category("interfaceA/img001.png"), "interfaceA");
/// assert_eq!(folder_category("/interfaceA/img001.png"), "interfaceA");
/// ```
pub fn folder_category(image_url: &str) -> &str {
    image_url
        .split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_convert_bbox_to_fiftyone() {
        let bbox = convert_bbox_to_fiftyone([0.1, 0.2, 0.5, 0.6]);
        assert_close(&bbox, &[0.1, 0.2, 0.4, 0.4]);
    }

    #[test]
    fn test_convert_bbox_recovers_corners() {
        let corners = [
            [0.0, 0.0, 1.0, 1.0],
            [0.25, 0.5, 0.25, 0.75],
            [0.125, 0.375, 0.625, 0.875],
        ];
        for c in corners {
            let [x, y, w, h] = convert_bbox_to_fiftyone(c);
            assert_eq!([x, y, x + w, y + h], c);
        }
    }

    #[test]
    fn test_box_policy_reject() {
        let err = BoxPolicy::Reject.apply([0.5, 0.5, 0.4, 0.6]).unwrap_err();
        assert!(matches!(err, Error::InvalidBox(_)));

        let err = BoxPolicy::Reject.apply([f64::NAN, 0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, Error::InvalidBox(_)));

        // Degenerate boxes are zero-sized, not negative.
        let bbox = BoxPolicy::Reject.apply([0.3, 0.3, 0.3, 0.3]).unwrap();
        assert_close(&bbox, &[0.3, 0.3, 0.0, 0.0]);
    }

    #[test]
    fn test_box_policy_clamp_and_allow() {
        let clamped = BoxPolicy::Clamp.apply([0.5, 0.5, 0.4, 0.6]).unwrap();
        assert_close(&clamped, &[0.5, 0.5, 0.0, 0.1]);

        let allowed = BoxPolicy::Allow.apply([0.5, 0.5, 0.4, 0.6]).unwrap();
        assert_close(&allowed, &[0.5, 0.5, -0.1, 0.1]);
    }

    #[test]
    fn test_box_policy_clamp_rejects_non_finite() {
        for bbox in [
            [f64::NAN, 0.1, 0.5, 0.6],
            [0.1, 0.1, f64::NAN, 0.6],
            [0.1, 0.1, f64::INFINITY, 0.6],
        ] {
            assert!(matches!(
                BoxPolicy::Clamp.apply(bbox),
                Err(Error::InvalidBox(_))
            ));
        }

        let allowed = BoxPolicy::Allow.apply([f64::NAN, 0.1, 0.5, 0.6]).unwrap();
        assert!(allowed[0].is_nan());
    }

    #[test]
    fn test_box_policy_from_str() {
        assert_eq!("clamp".parse::<BoxPolicy>().unwrap(), BoxPolicy::Clamp);
        assert_eq!(BoxPolicy::default(), BoxPolicy::Reject);
        assert_eq!(BoxPolicy::Allow.to_string(), "allow");
        assert!(matches!(
            "strict".parse::<BoxPolicy>(),
            Err(Error::InvalidBoxPolicy(_))
        ));
    }

    #[test]
    fn test_convert_to_classifications() {
        let labels = ["click", "input", "click", "hover"];
        let classifications = convert_to_classifications(&labels);

        assert_eq!(classifications.len(), labels.len());
        for (c, label) in classifications.iter().zip(labels) {
            assert_eq!(c.label, label);
        }
        assert!(convert_to_classifications::<String>(&[]).is_empty());
    }

    #[test]
    fn test_convert_to_detections() {
        let boxes = [[0.1, 0.2, 0.5, 0.6], [0.0, 0.0, 0.25, 0.5]];
        let detections = convert_to_detections(&boxes, BoxPolicy::Reject).unwrap();

        assert_eq!(detections.len(), 2);
        assert!(detections.iter().all(|d| d.label == ACTION_LABEL));
        assert!(detections.iter().all(|d| d.text.is_none()));
        assert_close(&detections[0].bounding_box, &[0.1, 0.2, 0.4, 0.4]);
        assert_close(&detections[1].bounding_box, &[0.0, 0.0, 0.25, 0.5]);
    }

    #[test]
    fn test_convert_to_detections_rejects_inverted_box() {
        let boxes = [[0.1, 0.2, 0.5, 0.6], [0.9, 0.2, 0.5, 0.6]];
        let err = convert_to_detections(&boxes, BoxPolicy::Reject).unwrap_err();
        assert!(err.to_string().contains("sample 1"));
    }

    #[test]
    fn test_convert_to_keypoints() {
        let points = [[0.3, 0.4], [0.9, 0.1]];
        let keypoints = convert_to_keypoints(&points);

        assert_eq!(keypoints.len(), 2);
        for (kps, point) in keypoints.iter().zip(points) {
            assert_eq!(kps.len(), 1);
            assert_eq!(kps.keypoints[0].label, ACTION_LABEL);
            assert_eq!(kps.keypoints[0].points, vec![point]);
        }
    }

    #[test]
    fn test_folder_category() {
        assert_eq!(folder_category("interfaceA/img001.png"), "interfaceA");
        assert_eq!(folder_category("/windows/settings/img.png"), "windows");
        assert_eq!(folder_category("img.png"), "img.png");
        assert_eq!(folder_category(""), "");
    }
}
