//! City lookup for CityCast
//!
//! Resolves free-text city names into suggestions via a geocoding API, with a
//! first-word fallback for multi-word names, and passes current weather and
//! forecast data through for the search page.

pub mod geocode;
pub mod provider;
pub mod query;
pub mod resolver;
pub mod types;

pub use geocode::{GeocodingSource, OpenWeatherGeocoder};
pub use provider::WeatherProvider;
pub use resolver::CitySuggestionResolver;
pub use types::*;
