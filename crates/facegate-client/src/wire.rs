//! Wire shapes of the face analysis API and their conversion into domain
//! types.
//!
//! The service reports eye and mouth status as 0-100 percentages per class;
//! the domain works with 0-1 probabilities.

use facegate_core::{DetectedFace, EyeOpenness, FaceAttributes, FaceRect, HeadPose};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DetectResponse {
    #[serde(default)]
    pub faces: Vec<WireFace>,
    pub face_num: Option<usize>,
    pub request_id: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareResponse {
    /// Absent when either image had no face.
    pub confidence: Option<f32>,
    pub request_id: Option<String>,
    pub error_message: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireFace {
    pub face_rectangle: WireRect,
    pub attributes: Option<WireAttributes>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAttributes {
    pub blur: Option<WireBlur>,
    pub headpose: Option<WireHeadPose>,
    pub facequality: Option<WireValue>,
    pub eyestatus: Option<WireEyeStatus>,
    pub mouthstatus: Option<WireMouthStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireBlur {
    pub blurness: Option<WireValue>,
    pub motionblur: Option<WireValue>,
    pub gaussianblur: Option<WireValue>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireValue {
    pub value: f32,
    pub threshold: Option<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireHeadPose {
    pub yaw_angle: f32,
    pub pitch_angle: f32,
    pub roll_angle: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireEyeStatus {
    pub left_eye_status: WireEye,
    pub right_eye_status: WireEye,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct WireEye {
    pub no_glass_eye_open: f32,
    pub normal_glass_eye_open: f32,
    pub no_glass_eye_close: f32,
    pub normal_glass_eye_close: f32,
    pub dark_glasses: f32,
    pub occlusion: f32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct WireMouthStatus {
    pub open: f32,
    pub close: f32,
    pub surgical_mask_or_respirator: f32,
    pub other_occlusion: f32,
}

impl WireEye {
    fn openness(&self) -> f32 {
        percent_to_probability(self.no_glass_eye_open + self.normal_glass_eye_open)
    }
}

impl WireBlur {
    /// Prefer the combined blurness score; fall back to the worst component.
    fn score(&self) -> Option<f32> {
        self.blurness.map(|v| v.value).or_else(|| {
            match (self.motionblur, self.gaussianblur) {
                (Some(m), Some(g)) => Some(m.value.max(g.value)),
                (Some(v), None) | (None, Some(v)) => Some(v.value),
                (None, None) => None,
            }
        })
    }
}

impl From<WireRect> for FaceRect {
    fn from(r: WireRect) -> Self {
        FaceRect {
            left: r.left,
            top: r.top,
            width: r.width,
            height: r.height,
        }
    }
}

impl From<WireAttributes> for FaceAttributes {
    fn from(a: WireAttributes) -> Self {
        FaceAttributes {
            blur: a.blur.as_ref().and_then(WireBlur::score),
            head_pose: a.headpose.map(|p| HeadPose {
                yaw: p.yaw_angle,
                pitch: p.pitch_angle,
                roll: p.roll_angle,
            }),
            eyes: a.eyestatus.map(|e| EyeOpenness {
                left: e.left_eye_status.openness(),
                right: e.right_eye_status.openness(),
            }),
            mouth_open: a.mouthstatus.map(|m| percent_to_probability(m.open)),
            face_quality: a.facequality.map(|q| q.value),
        }
    }
}

impl From<WireFace> for DetectedFace {
    fn from(f: WireFace) -> Self {
        DetectedFace {
            rect: f.face_rectangle.into(),
            attributes: f.attributes.map(Into::into).unwrap_or_default(),
        }
    }
}

impl DetectResponse {
    pub fn into_faces(self) -> Vec<DetectedFace> {
        self.faces.into_iter().map(Into::into).collect()
    }
}

fn percent_to_probability(percent: f32) -> f32 {
    (percent / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_detect() -> serde_json::Value {
        json!({
            "request_id": "1470472868,dacf2ff1-ea45-4842-9c07-6e8418cea78b",
            "time_used": 752,
            "face_num": 1,
            "faces": [{
                "face_token": "ed319e807e039ae669a4d1af0922a0c8",
                "face_rectangle": { "top": 80, "left": 70, "width": 200, "height": 150 },
                "attributes": {
                    "blur": {
                        "blurness": { "value": 10.2, "threshold": 50.0 },
                        "motionblur": { "value": 3.1, "threshold": 50.0 },
                        "gaussianblur": { "value": 4.0, "threshold": 50.0 }
                    },
                    "headpose": { "yaw_angle": -2.5, "pitch_angle": 1.0, "roll_angle": 0.4 },
                    "facequality": { "value": 73.1, "threshold": 70.1 },
                    "eyestatus": {
                        "left_eye_status": {
                            "no_glass_eye_open": 95.0, "normal_glass_eye_open": 1.0,
                            "no_glass_eye_close": 2.0, "normal_glass_eye_close": 0.5,
                            "dark_glasses": 0.5, "occlusion": 1.0
                        },
                        "right_eye_status": {
                            "no_glass_eye_open": 30.0, "normal_glass_eye_open": 0.0,
                            "no_glass_eye_close": 70.0, "normal_glass_eye_close": 0.0,
                            "dark_glasses": 0.0, "occlusion": 0.0
                        }
                    },
                    "mouthstatus": {
                        "surgical_mask_or_respirator": 0.0, "other_occlusion": 1.0,
                        "close": 94.0, "open": 5.0
                    }
                }
            }]
        })
    }

    #[test]
    fn test_detect_response_to_domain() {
        let response: DetectResponse = serde_json::from_value(sample_detect()).unwrap();
        assert_eq!(response.face_num, Some(1));
        let faces = response.into_faces();
        assert_eq!(faces.len(), 1);

        let face = &faces[0];
        assert_eq!(face.rect.area(), 30000.0);
        let attrs = &face.attributes;
        assert!((attrs.blur.unwrap() - 10.2).abs() < 1e-4);
        let pose = attrs.head_pose.unwrap();
        assert_eq!(pose.yaw, -2.5);
        let eyes = attrs.eyes.unwrap();
        assert!((eyes.left - 0.96).abs() < 1e-4);
        assert!((eyes.right - 0.30).abs() < 1e-4);
        assert!((attrs.mouth_open.unwrap() - 0.05).abs() < 1e-4);
        assert!((attrs.face_quality.unwrap() - 73.1).abs() < 1e-4);
    }

    #[test]
    fn test_face_without_attributes_is_all_absent() {
        let response: DetectResponse = serde_json::from_value(json!({
            "faces": [{ "face_rectangle": { "top": 0, "left": 0, "width": 90, "height": 90 } }]
        }))
        .unwrap();
        let faces = response.into_faces();
        assert_eq!(faces[0].attributes, FaceAttributes::default());
    }

    #[test]
    fn test_blur_falls_back_to_worst_component() {
        let blur: WireBlur = serde_json::from_value(json!({
            "motionblur": { "value": 12.0 },
            "gaussianblur": { "value": 80.0 }
        }))
        .unwrap();
        assert_eq!(blur.score(), Some(80.0));
    }

    #[test]
    fn test_empty_faces_and_error_message() {
        let response: DetectResponse =
            serde_json::from_value(json!({ "error_message": "IMAGE_FILE_TOO_LARGE" })).unwrap();
        assert!(response.faces.is_empty());
        assert_eq!(response.error_message.as_deref(), Some("IMAGE_FILE_TOO_LARGE"));
    }

    #[test]
    fn test_compare_response_without_confidence() {
        let response: CompareResponse =
            serde_json::from_value(json!({ "request_id": "x", "faces1": [], "faces2": [] })).unwrap();
        assert!(response.confidence.is_none());
    }
}
