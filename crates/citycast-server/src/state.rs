//! Server state management

use std::sync::Arc;

use citycast_weather::{CitySuggestionResolver, WeatherProvider};

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub resolver: CitySuggestionResolver,
    pub weather: Arc<WeatherProvider>,
    /// Suggestions returned per autocomplete query
    pub suggestion_limit: usize,
}

impl AppState {
    pub fn new(
        resolver: CitySuggestionResolver,
        weather: WeatherProvider,
        suggestion_limit: usize,
    ) -> Self {
        Self {
            resolver,
            weather: Arc::new(weather),
            suggestion_limit,
        }
    }
}
