//! Client-side pieces of CityCast: the search box autocomplete controller,
//! the recent-search history and the stores that persist it.

pub mod models;
pub mod render;
pub mod services;
pub mod storage;

pub use models::{
    AutocompleteModel, ClickTarget, Effect, FetchOutcome, HistoryView, Key, Phase,
    SearchHistory, Suggestion, Transition,
};
pub use services::{
    AutocompleteClient, AutocompleteMessage, AutocompleteSession, AutocompleteView,
    ClientError, SuggestionFetcher,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
