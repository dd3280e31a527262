use serde::{Deserialize, Serialize};

/// City record as returned by the upstream direct-geocoding API.
///
/// Upstream data is untrusted: every field except `name` may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCity {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl RawCity {
    pub fn new(name: impl Into<String>, country: impl Into<String>, state: Option<&str>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            state: state.map(str::to_string),
        }
    }
}

/// A candidate city offered to the user while typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub display_name: String,
}

impl CitySuggestion {
    /// Build a suggestion, deriving `display_name` as "name[, state][, country]".
    pub fn new(name: impl Into<String>, state: Option<String>, country: impl Into<String>) -> Self {
        let name = name.into();
        let country = country.into();
        let state = state.filter(|s| !s.trim().is_empty());

        let display_name = std::iter::once(name.as_str())
            .chain(state.as_deref())
            .chain(Some(country.as_str()).filter(|c| !c.is_empty()))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            name,
            country,
            state,
            display_name,
        }
    }
}

impl From<RawCity> for CitySuggestion {
    fn from(raw: RawCity) -> Self {
        CitySuggestion::new(raw.name, raw.state, raw.country)
    }
}

/// Current conditions plus the leading forecast entries for one city,
/// passed through from upstream without reformatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub current: serde_json::Value,
    pub forecast: Vec<serde_json::Value>,
}

/// Geocoding lookup errors
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Geocoding API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Weather pass-through errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream error {code}: {message}")]
    Upstream { code: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
