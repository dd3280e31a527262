//! Centralized error types for CityCast.
//!
//! Each error carries a `user_message()` suitable for showing on the page;
//! the `Display` impl keeps the full detail for logs.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display on the page.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) | NetworkError::Timeout => {
                "Network error. Please check your connection and try again."
            }
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// A setting that passed TOML parsing but cannot be used.
#[derive(Debug, Error)]
#[error("Invalid {field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Weather lookup errors as seen by the search page.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("City name must be at least {0} characters")]
    CityTooShort(usize),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Weather API error: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::EmptyCity => "Please enter a city name",
            WeatherError::CityTooShort(_) => "City name must be at least 2 characters",
            WeatherError::CityNotFound(_) => {
                "City not found. Please check the spelling and try again."
            }
            WeatherError::InvalidApiKey => "API key error. Please contact support.",
            WeatherError::ApiError(_) => "Unable to fetch weather data. Please try again later.",
        }
    }

    /// Map an upstream `cod` value to the page error for a non-200 response.
    pub fn from_upstream_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            404 => WeatherError::CityNotFound(message.into()),
            401 => WeatherError::InvalidApiKey,
            _ => WeatherError::ApiError(message.into()),
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
