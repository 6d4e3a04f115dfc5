//! Profile photo quality scoring.
//!
//! Maps the faces returned by one analysis call onto a [`QualityVerdict`].
//! Blocking conditions are checked in a fixed order (no face, several faces,
//! face too small); a single usable face is then scored additively and
//! gated on its blocking issues.

use crate::error::{CaptureError, QualityIssue};
use crate::types::{DetectedFace, FaceAttributes, FaceRect, Severity};
use serde::Serialize;

// --- Gate thresholds ---
const MIN_FACE_AREA: f32 = 5000.0;
const MAX_BLUR: f32 = 70.0;
const MAX_YAW_DEG: f32 = 20.0;
const MAX_PITCH_DEG: f32 = 15.0;
const MAX_ROLL_DEG: f32 = 10.0;
const EYE_OPEN_THRESHOLD: f32 = 0.7;
const MOUTH_OPEN_ISSUE_THRESHOLD: f32 = 0.1;
const PASS_SCORE: f32 = 70.0;
const PERFECT_SCORE: f32 = 90.0;

// --- Scoring weights ---
const BASE_SCORE: f32 = 50.0;
const MOUTH_CLOSED_SCORE_THRESHOLD: f32 = 0.3;
const ABSENT_BLUR_BONUS: f32 = 15.0;
const ABSENT_POSE_BONUS: f32 = 15.0;
const ABSENT_EYES_BONUS: f32 = 10.0;
const ABSENT_MOUTH_BONUS: f32 = 15.0;

/// Outcome of scoring one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityVerdict {
    pub success: bool,
    pub message: String,
    pub severity: Severity,
    /// Composite score in [0, 100]. `None` when no single face could be scored.
    pub score: Option<u8>,
    pub details: Option<String>,
    pub suggestions: Vec<String>,
    /// Consecutive rejections in the capture session, including this one.
    pub failure_count: u32,
    /// Why the capture was rejected. `None` on success.
    pub rejection: Option<CaptureError>,
}

impl QualityVerdict {
    /// Build a rejected verdict from any capture error.
    ///
    /// `previous_failures` is the session count before this attempt; the
    /// verdict echoes it incremented.
    pub fn rejected(error: CaptureError, previous_failures: u32, score: Option<u8>) -> Self {
        let (severity, details, suggestions) = match &error {
            CaptureError::NoFaceDetected => (
                Severity::Error,
                Some("Make sure your face is clearly visible and well lit".to_string()),
                vec![
                    "Face the camera directly".to_string(),
                    "Move to a brighter spot".to_string(),
                ],
            ),
            CaptureError::MultipleFacesDetected { count } => (
                Severity::Warning,
                Some(format!("{count} faces found. Only you should be in the photo")),
                vec!["Make sure no one else is in the frame".to_string()],
            ),
            CaptureError::FaceTooSmall { .. } => (
                Severity::Warning,
                Some("Your face takes up too little of the photo".to_string()),
                vec!["Move closer to the camera".to_string()],
            ),
            CaptureError::QualityIssues { issues } => {
                let suggestions = if issues.is_empty() {
                    vec!["Try better lighting and move a little closer".to_string()]
                } else {
                    issues.iter().map(|i| i.suggestion().to_string()).collect()
                };
                (
                    Severity::Warning,
                    score.map(|s| format!("Quality score: {s}/100")),
                    suggestions,
                )
            }
            CaptureError::TransportTimeout => (
                Severity::Error,
                Some("The face check service took too long to respond".to_string()),
                vec!["Check your internet connection and try again".to_string()],
            ),
            CaptureError::TransportError { .. } => (
                Severity::Error,
                None,
                vec!["Please try again in a moment".to_string()],
            ),
            CaptureError::InvalidImageFormat { .. } => (
                Severity::Error,
                None,
                vec!["Retake the photo with the camera".to_string()],
            ),
        };

        Self {
            success: false,
            message: error.to_string(),
            severity,
            score,
            details,
            suggestions,
            failure_count: previous_failures.saturating_add(1),
            rejection: Some(error),
        }
    }

    fn accepted(score: f32) -> Self {
        let message = if score > PERFECT_SCORE {
            "Perfect profile photo!"
        } else {
            "Great photo!"
        };
        Self {
            success: true,
            message: message.to_string(),
            severity: Severity::Success,
            score: Some(round_score(score)),
            details: None,
            suggestions: Vec::new(),
            failure_count: 0,
            rejection: None,
        }
    }
}

/// Score the faces from one analysis call.
///
/// Pure: identical input always yields an identical verdict.
pub fn evaluate_quality(faces: &[DetectedFace], failure_count: u32) -> QualityVerdict {
    let face = match faces {
        [] => return QualityVerdict::rejected(CaptureError::NoFaceDetected, failure_count, None),
        [face] => face,
        _ => {
            return QualityVerdict::rejected(
                CaptureError::MultipleFacesDetected { count: faces.len() },
                failure_count,
                None,
            )
        }
    };

    let area = face.rect.area();
    if area < MIN_FACE_AREA {
        return QualityVerdict::rejected(CaptureError::FaceTooSmall { area }, failure_count, None);
    }

    let issues = detect_issues(&face.attributes);
    let score = quality_score(&face.rect, &face.attributes);
    let blocked = issues.iter().any(QualityIssue::is_blocking);

    tracing::debug!(score, ?issues, blocked, "quality evaluated");

    if !blocked && score >= PASS_SCORE {
        return QualityVerdict::accepted(score);
    }

    QualityVerdict::rejected(
        CaptureError::QualityIssues { issues },
        failure_count,
        Some(round_score(score)),
    )
}

/// Detect issues on a single face, returned in reporting priority order.
pub fn detect_issues(attrs: &FaceAttributes) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    if let Some(blur) = attrs.blur {
        if blur > MAX_BLUR {
            issues.push(QualityIssue::Blurry);
        }
    }

    // Only the first exceeded pose threshold is surfaced.
    if let Some(pose) = attrs.head_pose {
        if pose.yaw.abs() > MAX_YAW_DEG {
            issues.push(QualityIssue::HeadTurned);
        } else if pose.pitch.abs() > MAX_PITCH_DEG {
            issues.push(QualityIssue::HeadTiltedVertically);
        } else if pose.roll.abs() > MAX_ROLL_DEG {
            issues.push(QualityIssue::HeadTiltedSideways);
        }
    }

    if let Some(eyes) = attrs.eyes {
        let left_closed = eyes.left <= EYE_OPEN_THRESHOLD;
        let right_closed = eyes.right <= EYE_OPEN_THRESHOLD;
        if left_closed && right_closed {
            issues.push(QualityIssue::EyesClosed);
        } else if left_closed || right_closed {
            issues.push(QualityIssue::OneEyeClosed);
        }
    }

    if let Some(mouth) = attrs.mouth_open {
        if mouth > MOUTH_OPEN_ISSUE_THRESHOLD {
            issues.push(QualityIssue::MouthOpen);
        }
    }

    // Reported eyes first, then mouth, pose, blur.
    issues.sort_by_key(QualityIssue::report_rank);
    issues
}

/// Additive composite score, clamped to [0, 100].
pub fn quality_score(rect: &FaceRect, attrs: &FaceAttributes) -> f32 {
    let mut score = BASE_SCORE;

    let area = rect.area();
    score += if area > 15000.0 {
        20.0
    } else if area > 10000.0 {
        15.0
    } else if area > 7500.0 {
        10.0
    } else {
        5.0
    };

    score += match attrs.blur {
        Some(blur) => (20.0 - blur / 2.5).max(0.0),
        None => ABSENT_BLUR_BONUS,
    };

    score += match attrs.head_pose {
        Some(pose) => (25.0
            - (pose.yaw.abs() * 0.75).min(15.0)
            - (pose.pitch.abs() * 0.5).min(10.0)
            - (pose.roll.abs() * 0.5).min(5.0))
        .max(0.0),
        None => ABSENT_POSE_BONUS,
    };

    score += match attrs.eyes {
        Some(eyes) => {
            let open = [eyes.left, eyes.right]
                .iter()
                .filter(|&&p| p > EYE_OPEN_THRESHOLD)
                .count();
            match open {
                2 => 15.0,
                1 => 5.0,
                _ => 0.0,
            }
        }
        None => ABSENT_EYES_BONUS,
    };

    score += match attrs.mouth_open {
        Some(open) if open <= MOUTH_CLOSED_SCORE_THRESHOLD => 20.0,
        Some(_) => 5.0,
        None => ABSENT_MOUTH_BONUS,
    };

    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

fn round_score(score: f32) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
