//! Rejection taxonomy for a capture or comparison attempt.
//!
//! Every kind is recoverable: callers convert it into a verdict and let the
//! user retake the photo.

use serde::Serialize;
use thiserror::Error;

/// A single blocking or advisory problem with an otherwise usable face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    EyesClosed,
    OneEyeClosed,
    MouthOpen,
    HeadTurned,
    HeadTiltedVertically,
    HeadTiltedSideways,
    Blurry,
}

impl QualityIssue {
    /// Headline shown when this is the primary reported issue.
    pub fn message(&self) -> &'static str {
        match self {
            QualityIssue::EyesClosed => "Please open your eyes",
            QualityIssue::OneEyeClosed => "Please keep both eyes open",
            QualityIssue::MouthOpen => "Please close your mouth",
            QualityIssue::HeadTurned => "Please look straight at the camera",
            QualityIssue::HeadTiltedVertically => "Please don't tilt your head up or down",
            QualityIssue::HeadTiltedSideways => "Please don't tilt your head sideways",
            QualityIssue::Blurry => "Photo is too blurry",
        }
    }

    /// Actionable advice listed under the headline.
    pub fn suggestion(&self) -> &'static str {
        match self {
            QualityIssue::EyesClosed => "Open your eyes and look at the camera",
            QualityIssue::OneEyeClosed => "Keep both eyes open",
            QualityIssue::MouthOpen => "Keep a neutral expression with your mouth closed",
            QualityIssue::HeadTurned => "Face the camera directly",
            QualityIssue::HeadTiltedVertically => "Keep your chin level",
            QualityIssue::HeadTiltedSideways => "Keep your head straight",
            QualityIssue::Blurry => "Hold the phone steady and make sure the lens is clean",
        }
    }

    /// Reporting priority: eyes, then mouth, then pose, then blur.
    pub(crate) fn report_rank(&self) -> u8 {
        match self {
            QualityIssue::EyesClosed | QualityIssue::OneEyeClosed => 0,
            QualityIssue::MouthOpen => 1,
            QualityIssue::HeadTurned
            | QualityIssue::HeadTiltedVertically
            | QualityIssue::HeadTiltedSideways => 2,
            QualityIssue::Blurry => 3,
        }
    }

    /// Whether the issue blocks a pass. Mouth position is advisory only.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, QualityIssue::MouthOpen)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureError {
    #[error("No face detected")]
    NoFaceDetected,
    #[error("Multiple faces detected")]
    MultipleFacesDetected { count: usize },
    #[error("Face too small")]
    FaceTooSmall { area: f32 },
    #[error("{}", .issues.first().map(|i| i.message()).unwrap_or("Photo quality too low"))]
    QualityIssues { issues: Vec<QualityIssue> },
    #[error("Connection timeout")]
    TransportTimeout,
    #[error("{message}")]
    TransportError { message: String },
    #[error("Invalid image format: {reason}")]
    InvalidImageFormat { reason: String },
}

impl CaptureError {
    /// Transport-level failures are errors; content problems are warnings.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CaptureError::TransportTimeout
                | CaptureError::TransportError { .. }
                | CaptureError::InvalidImageFormat { .. }
        )
    }
}
