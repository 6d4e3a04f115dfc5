//! HTTP client for the face analysis and comparison API.
//!
//! Both endpoints take form-encoded bodies carrying the API credentials and
//! base64 image payloads, and answer with JSON. Error responses carry an
//! `error_message` field.

use crate::config::FaceApiConfig;
use crate::error::ClientError;
use crate::gate::{FaceAnalyzer, FaceComparer};
use crate::wire::{CompareResponse, DetectResponse, ErrorResponse};
use facegate_core::DetectedFace;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct FaceApiClient {
    config: FaceApiConfig,
    http: reqwest::Client,
}

impl FaceApiClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: FaceApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("http client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &FaceApiConfig {
        &self.config
    }

    fn credentials(&self) -> Result<(&str, &str), ClientError> {
        if !self.config.has_credentials() {
            return Err(ClientError::Config(
                "api_key and api_secret must be set".to_string(),
            ));
        }
        Ok((self.config.api_key.as_str(), self.config.api_secret.as_str()))
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let response = self.http.post(url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error_message)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(ClientError::Service {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl FaceAnalyzer for FaceApiClient {
    async fn analyze(&self, image_base64: &str) -> Result<Vec<DetectedFace>, ClientError> {
        let (api_key, api_secret) = self.credentials()?;
        let form = [
            ("api_key", api_key),
            ("api_secret", api_secret),
            ("image_base64", image_base64),
            ("return_attributes", self.config.return_attributes.as_str()),
        ];

        tracing::debug!(url = %self.config.detect_url, payload_len = image_base64.len(), "detect request");
        let mut response: DetectResponse = self.post_form(&self.config.detect_url, &form).await?;

        if let Some(message) = response.error_message.take() {
            return Err(ClientError::Service { status: 200, message });
        }

        tracing::debug!(
            request_id = response.request_id.as_deref().unwrap_or("-"),
            face_num = response.face_num,
            returned = response.faces.len(),
            "detect response"
        );
        Ok(response.into_faces())
    }
}

impl FaceComparer for FaceApiClient {
    async fn compare(&self, first_base64: &str, second_base64: &str) -> Result<f32, ClientError> {
        let (api_key, api_secret) = self.credentials()?;
        let form = [
            ("api_key", api_key),
            ("api_secret", api_secret),
            ("image_base64_1", first_base64),
            ("image_base64_2", second_base64),
        ];

        tracing::debug!(url = %self.config.compare_url, "compare request");
        let mut response: CompareResponse = self.post_form(&self.config.compare_url, &form).await?;

        if let Some(message) = response.error_message.take() {
            return Err(ClientError::Service { status: 200, message });
        }

        tracing::debug!(
            request_id = response.request_id.as_deref().unwrap_or("-"),
            confidence = response.confidence,
            "compare response"
        );
        response
            .confidence
            .ok_or_else(|| ClientError::NoFace("one of the compared images".to_string()))
    }
}
