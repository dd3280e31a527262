//! Current conditions and forecast pass-through for the search page.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::types::{WeatherError, WeatherReport};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: Url,
    api_key: String,
    forecast_entries: usize,
}

impl WeatherProvider {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        forecast_entries: usize,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Trailing slash so `join` appends instead of replacing the last segment
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            forecast_entries,
        })
    }

    /// Fetch current weather and forecast for `city` (metric units).
    ///
    /// An upstream `cod` other than 200 on the current-weather response is
    /// reported as [`WeatherError::Upstream`].
    pub async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        tracing::debug!("Fetching weather for '{}'", city);

        let current = self.get_json("weather", city).await?;
        let forecast = self.get_json("forecast", city).await?;

        let code = upstream_code(&current);
        if code != 200 {
            let message = current
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            tracing::warn!("Weather API returned {} for '{}': {}", code, city, message);
            return Err(WeatherError::Upstream { code, message });
        }

        let forecast = forecast
            .get("list")
            .and_then(Value::as_array)
            .map(|list| list.iter().take(self.forecast_entries).cloned().collect())
            .unwrap_or_default();

        Ok(WeatherReport {
            city: city.to_string(),
            current,
            forecast,
        })
    }

    async fn get_json(&self, endpoint: &str, city: &str) -> Result<Value, WeatherError> {
        let url = self.base_url.join(endpoint)?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(mut map)) => {
                // Fill in `cod` from the HTTP status when upstream omits it
                map.entry("cod")
                    .or_insert_with(|| Value::from(status.as_u16()));
                Ok(Value::Object(map))
            }
            Ok(_) => Err(WeatherError::Parse(format!(
                "{} response is not a JSON object",
                endpoint
            ))),
            Err(e) => Err(WeatherError::Parse(e.to_string())),
        }
    }
}

/// OpenWeather reports `cod` as a number on some endpoints and a string on others.
fn upstream_code(body: &Value) -> u16 {
    match body.get("cod") {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_code_number_and_string() {
        assert_eq!(upstream_code(&json!({"cod": 200})), 200);
        assert_eq!(upstream_code(&json!({"cod": "404"})), 404);
        assert_eq!(upstream_code(&json!({"cod": "bogus"})), 0);
        assert_eq!(upstream_code(&json!({})), 0);
    }

    #[test]
    fn test_base_url_keeps_path() {
        let provider = WeatherProvider::new("http://localhost:1/data/2.5", "k", 8).unwrap();
        assert_eq!(
            provider.base_url.join("weather").unwrap().as_str(),
            "http://localhost:1/data/2.5/weather"
        );
    }
}
