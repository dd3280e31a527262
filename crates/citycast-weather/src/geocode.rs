//! Forward geocoding: look up cities matching a free-text name.
//! Uses the OpenWeather direct geocoding API (`<base>/direct`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::types::{GeocodeError, RawCity};

pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "CityCast/0.1.0";

/// Anything that can turn a city name into candidate city records.
#[async_trait]
pub trait GeocodingSource: Send + Sync {
    /// Return at most `limit` cities matching `query`, in upstream relevance order.
    async fn direct(&self, query: &str, limit: usize) -> Result<Vec<RawCity>, GeocodeError>;
}

/// HTTP client for the OpenWeather direct geocoding endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl OpenWeatherGeocoder {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        Self::with_timeout(
            base_url,
            api_key,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let endpoint = Url::parse(&format!("{}/direct", base_url.trim_end_matches('/')))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl GeocodingSource for OpenWeatherGeocoder {
    async fn direct(&self, query: &str, limit: usize) -> Result<Vec<RawCity>, GeocodeError> {
        tracing::debug!("Geocoding '{}' (limit {})", query, limit);

        let limit = limit.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let rows: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Parse(e.to_string()))?;
        let cities = parse_rows(rows);

        tracing::debug!("Geocoding '{}' returned {} cities", query, cities.len());
        Ok(cities)
    }
}

/// Keep the rows that look like a city; a malformed row is skipped, not fatal.
fn parse_rows(rows: Vec<Value>) -> Vec<RawCity> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<RawCity>(row) {
            Ok(city) => Some(city),
            Err(e) => {
                tracing::debug!("Skipping geocoding row: {}", e);
                None
            }
        })
        .collect()
}
