//! transport.rest HTTP client.
//!
//! Provides async methods for the departures board and journeys endpoints.
//! Every call takes its own timeout: the board and the journey fan-out run
//! with different budgets, and a slow request must only cost its own slot.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::RawDeparture;

use super::convert::convert_departures;
use super::error::TransitError;
use super::query::JourneyQuery;
use super::types::{DeparturesResponse, JourneysResponse};

/// Default base URL for the BVG transport.rest API.
const DEFAULT_BASE_URL: &str = "https://v6.bvg.transport.rest";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Configuration for the HAFAS client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HafasConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl HafasConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = ms;
        self
    }
}

impl Default for HafasConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            connect_timeout_ms: 2000,
        }
    }
}

/// transport.rest API client.
///
/// Cloning is cheap and shares the connection pool and the concurrency
/// limit.
#[derive(Debug, Clone)]
pub struct HafasClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HafasClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &HafasConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("departure-board/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Get the departure board for a stop.
    ///
    /// Cancelled and malformed departures are dropped.
    pub async fn get_departures(
        &self,
        stop_id: &str,
        timeout: Duration,
    ) -> Result<Vec<RawDeparture>, TransitError> {
        let url = format!("{}/stops/{}/departures", self.base_url, stop_id);
        let response: DeparturesResponse = self
            .get_json(&url, &[("language", "de".to_string())], timeout)
            .await?;

        let dtos = response.into_departures();
        let departures = convert_departures(&dtos);
        debug!(
            stop = stop_id,
            received = dtos.len(),
            kept = departures.len(),
            "Fetched departures"
        );

        Ok(departures)
    }

    /// Run a journeys query.
    ///
    /// The response is returned unconverted: which journey and leg matter
    /// is decided later, relative to the time of processing.
    pub async fn get_journeys(
        &self,
        query: &JourneyQuery,
        timeout: Duration,
    ) -> Result<JourneysResponse, TransitError> {
        let url = format!("{}/journeys", self.base_url);
        let response: JourneysResponse = self.get_json(&url, &query.params(), timeout).await?;

        debug!(
            from = %query.from,
            journeys = response.journeys.len(),
            "Fetched journeys"
        );

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, TransitError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransitError::LimiterClosed)?;

        let response = self
            .http
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransitError::from_request(e, timeout))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransitError::from_request(e, timeout))?;

        serde_json::from_str(&body).map_err(|e| TransitError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
