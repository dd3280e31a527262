pub mod autocomplete_model;
pub mod history_model;

pub use autocomplete_model::{
    AutocompleteModel, ClickTarget, Effect, FetchOutcome, Key, Phase, Suggestion, Transition,
};
pub use history_model::{HistoryView, SearchHistory};
