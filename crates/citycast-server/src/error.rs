//! Server error types

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised while building or running the server.
///
/// Request handlers never fail outward: lookups degrade to empty results or a
/// page-level error message instead.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] citycast_core::ConfigError),

    #[error("Geocoding client error: {0}")]
    Geocoding(#[from] citycast_weather::GeocodeError),

    #[error("Weather client error: {0}")]
    Weather(#[from] citycast_weather::WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
