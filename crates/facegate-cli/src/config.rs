use anyhow::{Context, Result};
use facegate_client::{FaceApiConfig, RateConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI configuration: built-in defaults, then an optional TOML file, then
/// `FACEGATE_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub face_api: FaceApiConfig,
    pub rates: RateConfig,
}

impl Config {
    /// Load from `path`, or from `FACEGATE_CONFIG` when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("FACEGATE_CONFIG").ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                let config = Self::from_toml(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?;
                tracing::debug!(path = %path.display(), "config file loaded");
                config
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Override fields from `FACEGATE_*` variables. Unparseable numbers are
    /// ignored.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let api = &mut self.face_api;
        if let Some(v) = lookup("FACEGATE_API_KEY") {
            api.api_key = v;
        }
        if let Some(v) = lookup("FACEGATE_API_SECRET") {
            api.api_secret = v;
        }
        if let Some(v) = lookup("FACEGATE_DETECT_URL") {
            api.detect_url = v;
        }
        if let Some(v) = lookup("FACEGATE_COMPARE_URL") {
            api.compare_url = v;
        }
        api.timeout_secs = parsed(&lookup, "FACEGATE_TIMEOUT_SECS", api.timeout_secs);

        let rates = &mut self.rates;
        if let Some(v) = lookup("FACEGATE_RATE_URL") {
            rates.url = v;
        }
        rates.refresh_secs = parsed(&lookup, "FACEGATE_RATE_REFRESH_SECS", rates.refresh_secs);
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
