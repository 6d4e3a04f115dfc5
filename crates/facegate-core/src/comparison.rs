//! Face comparison gate.
//!
//! Classifies the similarity confidence returned by the comparison service.

use crate::error::CaptureError;
use crate::types::Severity;
use serde::Serialize;

/// Minimum confidence (0-100) for two faces to count as the same person.
pub const MATCH_THRESHOLD: f32 = 65.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonVerdict {
    pub success: bool,
    /// Similarity confidence in [0, 100]. Forced to 0 when the call failed.
    pub confidence: f32,
    pub message: String,
    pub severity: Severity,
    pub details: Option<String>,
}

impl ComparisonVerdict {
    /// Verdict for a comparison that never produced a confidence.
    pub fn failed(error: &CaptureError) -> Self {
        Self {
            success: false,
            confidence: 0.0,
            message: error.to_string(),
            severity: Severity::Error,
            details: None,
        }
    }
}

/// Classify a confidence value against [`MATCH_THRESHOLD`].
pub fn evaluate_comparison(confidence: f32) -> ComparisonVerdict {
    let confidence = if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 100.0)
    };

    if confidence >= MATCH_THRESHOLD {
        ComparisonVerdict {
            success: true,
            confidence,
            message: "Faces Match!".to_string(),
            severity: Severity::Success,
            details: Some(format!("Confidence: {confidence:.1}%")),
        }
    } else {
        ComparisonVerdict {
            success: false,
            confidence,
            message: "Faces Don't Match".to_string(),
            severity: Severity::Warning,
            details: Some(format!(
                "Confidence: {confidence:.1}% (needs {MATCH_THRESHOLD:.0}%)"
            )),
        }
    }
}
