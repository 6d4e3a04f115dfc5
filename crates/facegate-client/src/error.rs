use facegate_core::CaptureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request timed out")]
    Timeout,
    #[error("http: {0}")]
    Http(reqwest::Error),
    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("no face found in {0}")]
    NoFace(String),
    #[error("configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }
}

impl From<image::ImageError> for ClientError {
    fn from(err: image::ImageError) -> Self {
        ClientError::InvalidImage(err.to_string())
    }
}

/// Collapse a transport failure into the user-facing rejection taxonomy.
///
/// Service error payloads keep their message; other network failures get
/// a generic one.
impl From<ClientError> for CaptureError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Timeout => CaptureError::TransportTimeout,
            ClientError::InvalidImage(reason) => CaptureError::InvalidImageFormat { reason },
            ClientError::NoFace(_) => CaptureError::NoFaceDetected,
            ClientError::Service { message, .. } => CaptureError::TransportError { message },
            ClientError::Http(_) => CaptureError::TransportError {
                message: "Unable to reach the face check service".to_string(),
            },
            ClientError::Parse(_) => CaptureError::TransportError {
                message: "Unexpected response from the face check service".to_string(),
            },
            ClientError::Config(_) => CaptureError::TransportError {
                message: "Face check service is not configured".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_transport_timeout() {
        assert_eq!(CaptureError::from(ClientError::Timeout), CaptureError::TransportTimeout);
    }

    #[test]
    fn test_service_message_is_kept() {
        let err = ClientError::Service {
            status: 401,
            message: "AUTHENTICATION_ERROR".into(),
        };
        assert_eq!(
            CaptureError::from(err),
            CaptureError::TransportError {
                message: "AUTHENTICATION_ERROR".into()
            }
        );
    }

    #[test]
    fn test_invalid_image_maps_to_invalid_format() {
        let err = ClientError::InvalidImage("unsupported format".into());
        assert!(matches!(
            CaptureError::from(err),
            CaptureError::InvalidImageFormat { .. }
        ));
    }

    #[test]
    fn test_parse_error_is_generic() {
        let capture = CaptureError::from(ClientError::Parse("missing field `faces`".into()));
        assert_eq!(capture.to_string(), "Unexpected response from the face check service");
    }
}
