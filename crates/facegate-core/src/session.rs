use crate::quality::QualityVerdict;
use uuid::Uuid;

/// Caller-side state for one profile photo capture flow.
///
/// The failure count is advisory (display only) and resets on a pass.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    pub id: Uuid,
    pub failure_count: u32,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::with_failures(0)
    }

    /// Resume a session that already saw `failure_count` rejections.
    pub fn with_failures(failure_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            failure_count,
        }
    }

    /// Adopt the failure count echoed back by a verdict.
    pub fn record(&mut self, verdict: &QualityVerdict) {
        self.failure_count = verdict.failure_count;
        tracing::debug!(
            session = %self.id,
            failure_count = self.failure_count,
            success = verdict.success,
            "capture recorded"
        );
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}
