use serde::{Deserialize, Serialize};

/// Face bounding rectangle in pixels, as reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceRect {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Head rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadPose {
    /// Left-right turn.
    pub yaw: f32,
    /// Up-down tilt.
    pub pitch: f32,
    /// Sideways tilt.
    pub roll: f32,
}

/// Eye openness probabilities in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeOpenness {
    pub left: f32,
    pub right: f32,
}

/// Attribute sub-scores for one detected face.
///
/// Every attribute is optional: the service only returns what was requested
/// and may omit sub-objects. `None` is scored as "attribute absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceAttributes {
    /// Blurriness on a 0-100 scale, higher = blurrier.
    pub blur: Option<f32>,
    pub head_pose: Option<HeadPose>,
    pub eyes: Option<EyeOpenness>,
    /// Mouth openness probability in [0, 1].
    pub mouth_open: Option<f32>,
    /// Service-side face quality value (0-100). Informational only.
    pub face_quality: Option<f32>,
}

/// One face record from an analysis response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub rect: FaceRect,
    pub attributes: FaceAttributes,
}

/// How a verdict should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}
