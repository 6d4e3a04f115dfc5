//! Gate entry points used by the capture flow.
//!
//! These never fail: every transport or content problem comes back as a
//! verdict the UI can show.

use crate::error::ClientError;
use crate::image_prep::prepare_image;
use facegate_core::{
    evaluate_comparison, evaluate_quality, CaptureError, CaptureSession, ComparisonVerdict,
    DetectedFace, QualityVerdict,
};
use std::future::Future;

/// Remote face analysis: base64 JPEG in, detected faces out.
pub trait FaceAnalyzer {
    fn analyze(
        &self,
        image_base64: &str,
    ) -> impl Future<Output = Result<Vec<DetectedFace>, ClientError>> + Send;
}

/// Remote face comparison: two base64 JPEGs in, confidence (0-100) out.
pub trait FaceComparer {
    fn compare(
        &self,
        first_base64: &str,
        second_base64: &str,
    ) -> impl Future<Output = Result<f32, ClientError>> + Send;
}

/// Analyse one captured photo and score it for use as a profile photo.
///
/// The session's failure count is passed to the scoring engine and updated
/// from the verdict.
pub async fn check_capture<A: FaceAnalyzer>(
    analyzer: &A,
    image: &[u8],
    session: &mut CaptureSession,
) -> QualityVerdict {
    let verdict = match analyze_image(analyzer, image).await {
        Ok(faces) => {
            tracing::info!(session = %session.id, faces = faces.len(), "faces analysed");
            evaluate_quality(&faces, session.failure_count)
        }
        Err(err) => {
            tracing::warn!(session = %session.id, error = %err, "face analysis failed");
            QualityVerdict::rejected(CaptureError::from(err), session.failure_count, None)
        }
    };

    session.record(&verdict);
    verdict
}

async fn analyze_image<A: FaceAnalyzer>(
    analyzer: &A,
    image: &[u8],
) -> Result<Vec<DetectedFace>, ClientError> {
    let payload = prepare_image(image)?;
    analyzer.analyze(&payload).await
}

/// Compare two photos and decide whether they show the same person.
pub async fn compare_faces<C: FaceComparer>(
    comparer: &C,
    first: &[u8],
    second: &[u8],
) -> ComparisonVerdict {
    match compare_images(comparer, first, second).await {
        Ok(confidence) => {
            let verdict = evaluate_comparison(confidence);
            tracing::info!(confidence, matched = verdict.success, "faces compared");
            verdict
        }
        Err(err) => {
            tracing::warn!(error = %err, "face comparison failed");
            ComparisonVerdict::failed(&CaptureError::from(err))
        }
    }
}

async fn compare_images<C: FaceComparer>(
    comparer: &C,
    first: &[u8],
    second: &[u8],
) -> Result<f32, ClientError> {
    let first = prepare_image(first)?;
    let second = prepare_image(second)?;
    comparer.compare(&first, &second).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_prep::tests::encoded;
    use facegate_core::{FaceAttributes, FaceRect, Severity};
    use image::ImageFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    enum Reply {
        Faces(usize),
        Confidence(f32),
        Timeout,
        Service(&'static str),
        NoFace,
    }

    struct FakeService {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeService {
        fn new(reply: Reply) -> Self {
            Self { reply, calls: AtomicUsize::new(0) }
        }

        fn error(&self) -> ClientError {
            match self.reply {
                Reply::Timeout => ClientError::Timeout,
                Reply::Service(message) => ClientError::Service {
                    status: 400,
                    message: message.to_string(),
                },
                Reply::NoFace => ClientError::NoFace("image_base64_2".to_string()),
                _ => ClientError::Parse("wrong reply kind".to_string()),
            }
        }
    }

    impl FaceAnalyzer for FakeService {
        async fn analyze(&self, image_base64: &str) -> Result<Vec<DetectedFace>, ClientError> {
            assert!(!image_base64.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Faces(n) => Ok((0..n)
                    .map(|_| DetectedFace {
                        rect: FaceRect { left: 0.0, top: 0.0, width: 200.0, height: 150.0 },
                        attributes: FaceAttributes::default(),
                    })
                    .collect()),
                _ => Err(self.error()),
            }
        }
    }

    impl FaceComparer for FakeService {
        async fn compare(&self, first: &str, second: &str) -> Result<f32, ClientError> {
            assert!(!first.is_empty() && !second.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Confidence(c) => Ok(c),
                _ => Err(self.error()),
            }
        }
    }

    fn photo() -> Vec<u8> {
        encoded(160, 200, ImageFormat::Jpeg)
    }

    #[tokio::test]
    async fn test_check_capture_success_resets_session() {
        let service = FakeService::new(Reply::Faces(1));
        let mut session = CaptureSession::with_failures(2);
        let verdict = check_capture(&service, &photo(), &mut session).await;
        assert!(verdict.success, "{verdict:?}");
        assert_eq!(session.failure_count, 0);
    }

    #[tokio::test]
    async fn test_check_capture_multiple_faces() {
        let service = FakeService::new(Reply::Faces(2));
        let mut session = CaptureSession::new();
        let verdict = check_capture(&service, &photo(), &mut session).await;
        assert_eq!(verdict.message, "Multiple faces detected");
        assert!(verdict.details.unwrap().contains('2'));
        assert_eq!(session.failure_count, 1);
    }

    #[tokio::test]
    async fn test_check_capture_timeout_is_verdict() {
        let service = FakeService::new(Reply::Timeout);
        let mut session = CaptureSession::new();
        let verdict = check_capture(&service, &photo(), &mut session).await;
        assert!(!verdict.success);
        assert_eq!(verdict.severity, Severity::Error);
        assert_eq!(verdict.message, "Connection timeout");
        assert_eq!(verdict.rejection, Some(CaptureError::TransportTimeout));
    }

    #[tokio::test]
    async fn test_invalid_image_skips_remote_call() {
        let service = FakeService::new(Reply::Faces(1));
        let mut session = CaptureSession::new();
        let verdict = check_capture(&service, b"not a photo", &mut session).await;
        assert!(matches!(
            verdict.rejection,
            Some(CaptureError::InvalidImageFormat { .. })
        ));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.failure_count, 1);
    }

    #[tokio::test]
    async fn test_compare_match_and_mismatch() {
        let verdict = compare_faces(&FakeService::new(Reply::Confidence(70.0)), &photo(), &photo()).await;
        assert!(verdict.success);
        assert_eq!(verdict.message, "Faces Match!");

        let verdict = compare_faces(&FakeService::new(Reply::Confidence(64.0)), &photo(), &photo()).await;
        assert!(!verdict.success);
        assert_eq!(verdict.message, "Faces Don't Match");
    }

    #[tokio::test]
    async fn test_compare_service_error_forces_zero_confidence() {
        let service = FakeService::new(Reply::Service("INVALID_IMAGE_SIZE: image_base64_1"));
        let verdict = compare_faces(&service, &photo(), &photo()).await;
        assert!(!verdict.success);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.severity, Severity::Error);
        assert_eq!(verdict.message, "INVALID_IMAGE_SIZE: image_base64_1");
    }

    #[tokio::test]
    async fn test_compare_without_face() {
        let verdict = compare_faces(&FakeService::new(Reply::NoFace), &photo(), &photo()).await;
        assert_eq!(verdict.message, "No face detected");
        assert_eq!(verdict.confidence, 0.0);
    }
}
