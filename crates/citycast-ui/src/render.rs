//! Markup for the suggestion dropdown and the history list.
//!
//! City names come from an untrusted upstream, so every piece of text placed
//! into markup goes through [`escape_html`].

use crate::models::autocomplete_model::Suggestion;

/// Escape text for use in element content or a quoted attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One selectable button per suggestion, in the given order.
pub fn suggestion_rows(suggestions: &[Suggestion]) -> String {
    suggestions
        .iter()
        .enumerate()
        .map(|(index, suggestion)| {
            format!(
                r#"<button type="button" class="autocomplete-item" data-action="click->autocomplete#selectSuggestion" data-index="{}"><span class="truncate">{}</span></button>"#,
                index,
                escape_html(&suggestion.display_text())
            )
        })
        .collect()
}

/// One row per remembered search, each with its own delete control.
pub fn history_rows(cities: &[String]) -> String {
    cities
        .iter()
        .map(|city| {
            let escaped = escape_html(city);
            format!(
                r#"<div class="history-entry"><button type="button" class="history-item" data-action="click->search-history#selectCity" data-city="{escaped}">{escaped}</button><button type="button" class="history-delete" data-action="click->search-history#deleteItem" data-city="{escaped}" aria-label="Remove">&times;</button></div>"#
            )
        })
        .collect()
}
