//! Weather search endpoint: validate the city, then pass upstream data through.

use axum::extract::{Query, State};
use axum::Json;
use citycast_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError as PageError};
use citycast_weather::query::{char_len, MIN_QUERY_LEN};
use citycast_weather::WeatherError;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub city: Option<String>,
}

/// Either the weather data or a message to show in place of it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Found {
        city: String,
        current: serde_json::Value,
        forecast: Vec<serde_json::Value>,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        error: String,
    },
}

impl SearchResponse {
    fn failed(city: Option<String>, error: &AppError) -> Self {
        SearchResponse::Failed {
            city,
            error: error.user_message().to_string(),
        }
    }
}

/// `GET /search?city=<text>`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let city = params.city.unwrap_or_default().trim().to_string();

    if city.is_empty() {
        return Json(SearchResponse::failed(None, &PageError::EmptyCity.into()));
    }

    if char_len(&city) < MIN_QUERY_LEN {
        return Json(SearchResponse::failed(
            None,
            &PageError::CityTooShort(MIN_QUERY_LEN).into(),
        ));
    }

    match state.weather.fetch(&city).await {
        Ok(report) => Json(SearchResponse::Found {
            city: report.city,
            current: report.current,
            forecast: report.forecast,
        }),
        Err(e) => {
            let error: AppError = match e {
                WeatherError::Upstream { code, message } => {
                    PageError::from_upstream_code(code, message).into()
                }
                WeatherError::Network(e) => match e.into_network_error() {
                    NetworkError::Timeout => NetworkError::Timeout.into(),
                    other => NetworkError::ConnectionFailed(other.to_string()).into(),
                },
                WeatherError::Url(e) => NetworkError::ConnectionFailed(e.to_string()).into(),
                WeatherError::Parse(msg) => PageError::ApiError(msg).into(),
            };
            tracing::error!("Weather API Error for '{}': {}", city, error);
            Json(SearchResponse::failed(Some(city), &error))
        }
    }
}
