//! City-name resolution for autocomplete.
//!
//! A query is normalized and sent to the geocoding source as-is. When that
//! yields nothing and the query has several words, the first word alone is
//! looked up with a wider limit and the candidates are filtered back down to
//! ones that plausibly match the whole query (so "new york" still finds
//! New York when upstream only indexes the leading token).

use std::sync::Arc;

use crate::geocode::GeocodingSource;
use crate::query::{self, MIN_QUERY_LEN};
use crate::types::{CitySuggestion, RawCity};

/// Characters of the last query word a fallback candidate must contain.
const FALLBACK_TAIL_CHARS: usize = 3;

#[derive(Clone)]
pub struct CitySuggestionResolver {
    source: Arc<dyn GeocodingSource>,
}

impl CitySuggestionResolver {
    pub fn new(source: Arc<dyn GeocodingSource>) -> Self {
        Self { source }
    }

    /// Resolve free text into at most `limit` suggestions.
    ///
    /// Never fails: lookup errors are logged and count as "no results".
    pub async fn resolve(&self, query: &str, limit: usize) -> Vec<CitySuggestion> {
        if limit == 0 || query::char_len(query.trim()) < MIN_QUERY_LEN {
            return Vec::new();
        }

        let normalized = query::normalize(query);
        if query::char_len(&normalized) < MIN_QUERY_LEN {
            return Vec::new();
        }

        let primary = self.lookup(&normalized, limit, "primary").await;
        if !primary.is_empty() {
            return primary
                .into_iter()
                .take(limit)
                .map(CitySuggestion::from)
                .collect();
        }

        if !normalized.contains(' ') {
            return Vec::new();
        }

        let first_word = query::first_word(&normalized);
        if query::char_len(first_word) < MIN_QUERY_LEN {
            return Vec::new();
        }

        tracing::debug!(
            "No match for '{}', falling back to first word '{}'",
            normalized,
            first_word
        );

        let candidates = self
            .lookup(first_word, limit.saturating_mul(2), "fallback")
            .await;

        filter_fallback(&normalized, candidates)
            .into_iter()
            .take(limit)
            .map(CitySuggestion::from)
            .collect()
    }

    async fn lookup(&self, text: &str, limit: usize, step: &str) -> Vec<RawCity> {
        match self.source.direct(text, limit).await {
            Ok(cities) => cities,
            Err(e) => {
                tracing::warn!("City lookup ({}) for '{}' failed: {}", step, text, e);
                Vec::new()
            }
        }
    }
}

/// Keep fallback candidates whose name starts with the first query word and,
/// for multi-word queries, contains the leading characters of the last word.
/// Input order is preserved.
pub fn filter_fallback(normalized: &str, candidates: Vec<RawCity>) -> Vec<RawCity> {
    let first = query::first_word(normalized).to_lowercase();
    let single_word = !normalized.contains(' ');
    let tail = query::char_prefix(query::last_word(normalized), FALLBACK_TAIL_CHARS).to_lowercase();

    candidates
        .into_iter()
        .filter(|city| {
            let name = city.name.to_lowercase();
            name.starts_with(&first) && (single_word || name.contains(&tail))
        })
        .collect()
}
