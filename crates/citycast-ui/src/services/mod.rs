pub mod autocomplete_client;
pub mod autocomplete_service;

pub use autocomplete_client::{parse_suggestions, AutocompleteClient, ClientError, SuggestionFetcher};
pub use autocomplete_service::{AutocompleteMessage, AutocompleteSession, AutocompleteView};
