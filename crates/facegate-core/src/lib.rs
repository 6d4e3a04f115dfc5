//! facegate-core — Profile photo quality gate.
//!
//! Scores analysed face attributes into a pass/fail verdict with
//! user-facing reasons, and classifies face comparison confidence.
//! Pure computation: transport lives in `facegate-client`.

pub mod comparison;
pub mod error;
pub mod presentation;
pub mod quality;
pub mod session;
pub mod types;

pub use comparison::{evaluate_comparison, ComparisonVerdict, MATCH_THRESHOLD};
pub use error::{CaptureError, QualityIssue};
pub use presentation::{Presentation, Tone};
pub use quality::{evaluate_quality, QualityVerdict};
pub use session::CaptureSession;
pub use types::{DetectedFace, EyeOpenness, FaceAttributes, FaceRect, HeadPose, Severity};
