//! HTTP client for the server's autocomplete endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::models::autocomplete_model::{FetchOutcome, Suggestion};

/// Source of suggestions for the interaction loop.
///
/// Implementations never error: every failure becomes [`FetchOutcome::Failed`].
#[async_trait]
pub trait SuggestionFetcher: Send + Sync {
    async fn fetch(&self, query: &str) -> FetchOutcome;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct AutocompleteClient {
    client: Client,
    endpoint: Url,
}

impl AutocompleteClient {
    /// `endpoint` is the full autocomplete URL, e.g. `http://localhost:3000/autocomplete`.
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl SuggestionFetcher for AutocompleteClient {
    async fn fetch(&self, query: &str) -> FetchOutcome {
        let response = match self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Failed(e.to_string()),
        };

        if !response.status().is_success() {
            return FetchOutcome::Failed(format!("status {}", response.status()));
        }

        let body: Value = match response.json().await {
            Ok(b) => b,
            Err(e) => return FetchOutcome::Failed(e.to_string()),
        };

        parse_suggestions(body)
    }
}

/// Accept only array bodies; rows that are not objects are skipped.
pub fn parse_suggestions(body: Value) -> FetchOutcome {
    let Value::Array(items) = body else {
        return FetchOutcome::Failed("response is not an array".to_string());
    };

    let suggestions = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Suggestion>(item).ok())
        .collect();
    FetchOutcome::Loaded(suggestions)
}
