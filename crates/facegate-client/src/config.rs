use serde::Deserialize;

/// Attributes requested from the analysis endpoint.
pub const DEFAULT_RETURN_ATTRIBUTES: &str = "blur,headpose,facequality,eyestatus,mouthstatus";

/// Face analysis / comparison service settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FaceApiConfig {
    pub api_key: String,
    pub api_secret: String,
    pub detect_url: String,
    pub compare_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub return_attributes: String,
}

impl Default for FaceApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            detect_url: "https://api-us.faceplusplus.com/facepp/v3/detect".to_string(),
            compare_url: "https://api-us.faceplusplus.com/facepp/v3/compare".to_string(),
            timeout_secs: 15,
            return_attributes: DEFAULT_RETURN_ATTRIBUTES.to_string(),
        }
    }
}

impl FaceApiConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// Exchange-rate feed settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// JSON endpoint returning `{ "base": .., "rates": { "<QUOTE>": .. } }`.
    pub url: String,
    pub base: String,
    pub quote: String,
    /// Rate served until the first successful refresh.
    pub fallback_rate: f64,
    pub refresh_secs: u64,
    pub timeout_secs: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            url: "https://open.er-api.com/v6/latest/PHP".to_string(),
            base: "PHP".to_string(),
            quote: "USD".to_string(),
            fallback_rate: 0.018,
            refresh_secs: 3600,
            timeout_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_api_defaults() {
        let config = FaceApiConfig::default();
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.return_attributes, DEFAULT_RETURN_ATTRIBUTES);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: FaceApiConfig =
            serde_json::from_value(serde_json::json!({ "api_key": "k", "api_secret": "s" })).unwrap();
        assert!(config.has_credentials());
        assert_eq!(config.compare_url, FaceApiConfig::default().compare_url);
    }

    #[test]
    fn test_rate_defaults() {
        let config = RateConfig::default();
        assert_eq!(config.quote, "USD");
        assert_eq!(config.refresh_secs, 3600);
    }
}
