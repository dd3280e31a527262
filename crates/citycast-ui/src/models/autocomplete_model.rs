//! Autocomplete interaction state machine.
//!
//! The model owns everything about one search box: the typed text, the
//! rendered suggestions, the keyboard selection and whether the dropdown is
//! open. It never touches a timer, the network or the page itself; each
//! event returns a [`Transition`] listing the [`Effect`]s the caller must
//! carry out. Timer and request completions come back in as events tagged
//! with the generation/sequence number they were issued with, and anything
//! that is no longer the latest is ignored.

use std::time::Duration;

use citycast_core::AutocompleteConfig;
use citycast_weather::query::{char_len, normalize};
use serde::Deserialize;

use crate::render;

/// A suggestion row as received from `GET /autocomplete`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
}

impl Suggestion {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            state: None,
            display_name: None,
        }
    }

    /// Text shown in the dropdown row.
    pub fn display_text(&self) -> String {
        match self.display_name.as_deref() {
            Some(display) if !display.is_empty() => display.to_string(),
            _ => format!("{}, {}", self.name, self.country),
        }
    }

    /// Text written into the input on selection.
    pub fn query_text(&self) -> String {
        let text = if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        };
        text.trim().to_string()
    }
}

/// Where the request lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Debouncing,
    AwaitingResponse,
    ShowingResults,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

/// What a pointer click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Input,
    Dropdown,
    Outside,
}

/// Result of asking the autocomplete endpoint for suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Success status with an array body (possibly empty)
    Loaded(Vec<Suggestion>),
    /// Transport failure, error status or a body that is not an array
    Failed(String),
}

/// Side effects requested by the model, in the order they must be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the debounce timer; fire `generation` back after `delay`.
    ScheduleTimer { generation: u64, delay: Duration },
    /// Drop the pending debounce timer, if any.
    CancelTimer,
    /// Request suggestions for `query`; answer with the same `seq`.
    Fetch { seq: u64, query: String },
    /// Replace the dropdown contents with `html` and show it.
    ShowDropdown { html: String },
    /// Move the row highlight (`None` clears it).
    Highlight { index: Option<usize> },
    HideDropdown,
    SetInputValue(String),
    SubmitForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub effects: Vec<Effect>,
    /// Whether the triggering key press must not reach the form.
    pub prevent_default: bool,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn with(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            prevent_default: false,
        }
    }

    fn prevented(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct AutocompleteModel {
    query: String,
    suggestions: Vec<Suggestion>,
    selected_index: Option<usize>,
    dropdown_visible: bool,
    phase: Phase,
    min_length: usize,
    debounce: Duration,
    timer_generation: u64,
    pending_timer: Option<u64>,
    request_seq: u64,
    pending_request: Option<u64>,
}

impl Default for AutocompleteModel {
    fn default() -> Self {
        Self::new(&AutocompleteConfig::default())
    }
}

impl AutocompleteModel {
    pub fn new(config: &AutocompleteConfig) -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            selected_index: None,
            dropdown_visible: false,
            phase: Phase::Idle,
            min_length: config.min_length,
            debounce: Duration::from_millis(config.debounce_ms),
            timer_generation: 0,
            pending_timer: None,
            request_seq: 0,
            pending_request: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending_timer.is_some()
    }

    pub fn pending_request(&self) -> Option<u64> {
        self.pending_request
    }

    fn long_enough(&self, text: &str) -> bool {
        char_len(text) >= self.min_length
    }

    /// The input's text changed.
    pub fn on_input(&mut self, text: &str) -> Transition {
        self.query = text.to_string();

        if !self.long_enough(&normalize(text)) {
            let mut effects = self.cancel_timer();
            // A response for the old text must not reopen the dropdown
            self.pending_request = None;
            effects.extend(self.hide());
            return Transition::with(effects);
        }

        let mut effects = self.cancel_timer();
        self.timer_generation += 1;
        self.pending_timer = Some(self.timer_generation);
        self.phase = Phase::Debouncing;
        effects.push(Effect::ScheduleTimer {
            generation: self.timer_generation,
            delay: self.debounce,
        });
        Transition::with(effects)
    }

    /// A debounce timer fired.
    pub fn on_timer(&mut self, generation: u64) -> Transition {
        if self.pending_timer != Some(generation) {
            tracing::trace!("Ignoring stale debounce timer {}", generation);
            return Transition::none();
        }
        self.pending_timer = None;

        let normalized = normalize(&self.query);
        if !self.long_enough(&normalized) {
            return Transition::with(self.hide());
        }

        self.request_seq += 1;
        self.pending_request = Some(self.request_seq);
        self.phase = Phase::AwaitingResponse;
        Transition::with(vec![Effect::Fetch {
            seq: self.request_seq,
            query: normalized,
        }])
    }

    /// A suggestion request completed.
    pub fn on_response(&mut self, seq: u64, outcome: FetchOutcome) -> Transition {
        if self.pending_request != Some(seq) {
            tracing::debug!(
                "Dropping stale suggestions response {} (latest {:?})",
                seq,
                self.pending_request
            );
            return Transition::none();
        }
        self.pending_request = None;

        match outcome {
            FetchOutcome::Loaded(suggestions) if !suggestions.is_empty() => {
                let html = render::suggestion_rows(&suggestions);
                self.suggestions = suggestions;
                self.selected_index = None;
                self.dropdown_visible = true;
                self.phase = Phase::ShowingResults;
                Transition::with(vec![Effect::ShowDropdown { html }])
            }
            FetchOutcome::Loaded(_) => Transition::with(self.hide()),
            FetchOutcome::Failed(reason) => {
                tracing::warn!("Error fetching suggestions: {}", reason);
                Transition::with(self.hide())
            }
        }
    }

    /// A key was pressed inside the input.
    pub fn on_key(&mut self, key: Key) -> Transition {
        if !self.dropdown_visible || self.suggestions.is_empty() {
            return Transition::none();
        }

        let last = self.suggestions.len() - 1;
        match key {
            Key::ArrowDown => {
                let next = match self.selected_index {
                    None => 0,
                    Some(i) => (i + 1).min(last),
                };
                self.selected_index = Some(next);
                Transition::with(vec![Effect::Highlight { index: Some(next) }]).prevented()
            }
            Key::ArrowUp => {
                self.selected_index = match self.selected_index {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                Transition::with(vec![Effect::Highlight {
                    index: self.selected_index,
                }])
                .prevented()
            }
            Key::Enter => match self.selected_index {
                Some(index) => self.select(index).prevented(),
                // Let the form submit the raw text
                None => Transition::with(self.hide()),
            },
            Key::Escape => Transition::with(self.hide()).prevented(),
            Key::Other => Transition::none(),
        }
    }

    /// A click anywhere on the page.
    pub fn on_click(&mut self, target: ClickTarget) -> Transition {
        if !self.dropdown_visible || target != ClickTarget::Outside {
            return Transition::none();
        }
        Transition::with(self.hide())
    }

    /// Commit the suggestion at `index`: fill the input, close, submit.
    pub fn select(&mut self, index: usize) -> Transition {
        let Some(suggestion) = self.suggestions.get(index) else {
            return Transition::none();
        };

        let text = suggestion.query_text();
        self.query = text.clone();

        let mut effects = vec![Effect::SetInputValue(text)];
        effects.extend(self.hide());
        effects.push(Effect::SubmitForm);
        Transition::with(effects)
    }

    /// Explicit hide request (also used on blur and form submission).
    pub fn dismiss(&mut self) -> Transition {
        Transition::with(self.hide())
    }

    /// The input is going away: nothing pending may fire afterwards.
    pub fn detach(&mut self) -> Transition {
        self.pending_request = None;
        let mut effects = self.cancel_timer();
        self.dropdown_visible = false;
        self.suggestions.clear();
        self.selected_index = None;
        self.phase = Phase::Idle;
        effects.push(Effect::HideDropdown);
        Transition::with(effects)
    }

    fn cancel_timer(&mut self) -> Vec<Effect> {
        match self.pending_timer.take() {
            Some(_) => vec![Effect::CancelTimer],
            None => Vec::new(),
        }
    }

    fn hide(&mut self) -> Vec<Effect> {
        self.dropdown_visible = false;
        self.suggestions.clear();
        self.selected_index = None;
        self.phase = Phase::Hidden;
        vec![Effect::HideDropdown]
    }
}
