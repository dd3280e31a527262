//! City-name autocomplete endpoint

use axum::extract::{Query, State};
use axum::Json;
use citycast_weather::query::{char_len, MIN_QUERY_LEN};
use citycast_weather::CitySuggestion;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// `GET /autocomplete?q=<text>`
///
/// Always answers 200 with a JSON array; rejected or failed lookups yield `[]`.
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Json<Vec<CitySuggestion>> {
    let query = params.q.unwrap_or_default();

    if char_len(query.trim()) < MIN_QUERY_LEN {
        return Json(Vec::new());
    }

    let suggestions = state
        .resolver
        .resolve(&query, state.suggestion_limit)
        .await;

    tracing::debug!("Autocomplete '{}' -> {} suggestions", query, suggestions.len());
    Json(suggestions)
}
