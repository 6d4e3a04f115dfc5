//! Cached currency exchange rate with periodic refresh.
//!
//! Prices are listed in the marketplace currency and converted for payment.
//! The provider serves the last good rate (or the configured fallback) and
//! is refreshed either on demand or by a background task.

use crate::config::RateConfig;
use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Shortest allowed period between background refreshes.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    /// Units of `quote` per unit of `base`.
    pub rate: f64,
    /// `None` for the configured fallback.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ExchangeRate {
    pub fn fallback(config: &RateConfig) -> Self {
        Self {
            base: config.base.clone(),
            quote: config.quote.clone(),
            rate: config.fallback_rate,
            fetched_at: None,
        }
    }

    /// Convert an amount in `base`, rounded to cents.
    pub fn convert(&self, amount: f64) -> f64 {
        (amount * self.rate * 100.0).round() / 100.0
    }
}

/// Where fresh rates come from.
pub trait RateSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<ExchangeRate, ClientError>> + Send;
}

/// Latest-rates JSON body. Some feeds name the base `base_code`.
#[derive(Debug, Deserialize)]
struct RatesBody {
    #[serde(alias = "base_code")]
    base: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Pull the configured quote out of a latest-rates body.
fn parse_rates(body: &str, config: &RateConfig) -> Result<ExchangeRate, ClientError> {
    let body: RatesBody =
        serde_json::from_str(body).map_err(|e| ClientError::Parse(format!("rates: {e}")))?;

    if let Some(base) = &body.base {
        if !base.eq_ignore_ascii_case(&config.base) {
            return Err(ClientError::Parse(format!(
                "rates are based on {base}, expected {}",
                config.base
            )));
        }
    }

    let rate = *body
        .rates
        .get(&config.quote)
        .ok_or_else(|| ClientError::Parse(format!("no rate for {}", config.quote)))?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ClientError::Parse(format!("invalid rate {rate}")));
    }

    Ok(ExchangeRate {
        base: config.base.clone(),
        quote: config.quote.clone(),
        rate,
        fetched_at: Some(Utc::now()),
    })
}

/// Rates fetched from an HTTP JSON feed.
pub struct HttpRateSource {
    config: RateConfig,
    http: reqwest::Client,
}

impl HttpRateSource {
    pub fn new(config: RateConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("http client: {e}")))?;
        Ok(Self { config, http })
    }
}

impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<ExchangeRate, ClientError> {
        let response = self.http.get(&self.config.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Service {
                status: status.as_u16(),
                message: format!("rate feed returned HTTP {}", status.as_u16()),
            });
        }
        let body = response.text().await?;
        parse_rates(&body, &self.config)
    }
}

/// Shared, clone-safe handle to the cached rate.
pub struct RateProvider<S> {
    source: Arc<S>,
    current: Arc<RwLock<ExchangeRate>>,
}

impl<S> Clone for RateProvider<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            current: Arc::clone(&self.current),
        }
    }
}

impl<S: RateSource> RateProvider<S> {
    pub fn new(source: S, initial: ExchangeRate) -> Self {
        Self {
            source: Arc::new(source),
            current: Arc::new(RwLock::new(initial)),
        }
    }

    /// Fetch a fresh rate and cache it. On failure the cached rate is kept.
    pub async fn refresh(&self) -> Result<ExchangeRate, ClientError> {
        match self.source.fetch().await {
            Ok(rate) => {
                tracing::info!(base = %rate.base, quote = %rate.quote, rate = rate.rate, "exchange rate refreshed");
                *self.current.write().await = rate.clone();
                Ok(rate)
            }
            Err(err) => {
                tracing::warn!(error = %err, "exchange rate refresh failed; keeping cached rate");
                Err(err)
            }
        }
    }

    pub async fn get(&self) -> ExchangeRate {
        self.current.read().await.clone()
    }

    pub async fn convert(&self, amount: f64) -> f64 {
        self.current.read().await.convert(amount)
    }

    /// Refresh immediately and then every `every` until the handle is aborted.
    ///
    /// Periods shorter than one second are raised to one second.
    pub fn spawn_refresh(&self, every: Duration) -> JoinHandle<()> {
        let every = every.max(MIN_REFRESH_INTERVAL);
        tracing::debug!(every_secs = every.as_secs(), "exchange rate refresh scheduled");
        let provider = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let _ = provider.refresh().await;
            }
        })
    }

    /// Start the background refresh with the interval from `config`.
    pub fn spawn_refresh_from(&self, config: &RateConfig) -> JoinHandle<()> {
        self.spawn_refresh(Duration::from_secs(config.refresh_secs))
    }
}
