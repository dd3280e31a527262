//! Autocomplete backend: runs the interaction model against a real clock
//! and a real suggestion source.
//!
//! Page events and async completions arrive on one channel and are applied
//! to the model strictly in arrival order; timers and fetches run as spawned
//! tasks that report back through the same channel.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::autocomplete_model::{
    AutocompleteModel, ClickTarget, Effect, FetchOutcome, Key, Transition,
};
use crate::services::autocomplete_client::SuggestionFetcher;

/// The page surface the session drives.
pub trait AutocompleteView {
    fn set_input_value(&mut self, value: &str);
    fn show_dropdown(&mut self, html: &str);
    fn highlight(&mut self, index: Option<usize>);
    fn hide_dropdown(&mut self);
    fn submit_form(&mut self);
}

/// Messages processed by the session loop
#[derive(Debug)]
pub enum AutocompleteMessage {
    Input(String),
    Key(Key),
    Click(ClickTarget),
    RowClicked(usize),
    Blur,
    FormSubmitted,
    Hide,
    /// Debounce timer `generation` elapsed
    TimerElapsed { generation: u64 },
    /// Suggestion request `seq` completed
    FetchDone { seq: u64, outcome: FetchOutcome },
    Detach,
}

pub struct AutocompleteSession<V: AutocompleteView> {
    model: AutocompleteModel,
    fetcher: Arc<dyn SuggestionFetcher>,
    view: V,
    runtime: Handle,
    tx: mpsc::UnboundedSender<AutocompleteMessage>,
    rx: mpsc::UnboundedReceiver<AutocompleteMessage>,
    timer: Option<CancellationToken>,
    detached: bool,
}

impl<V: AutocompleteView> AutocompleteSession<V> {
    pub fn new(
        model: AutocompleteModel,
        fetcher: Arc<dyn SuggestionFetcher>,
        view: V,
        runtime: Handle,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            model,
            fetcher,
            view,
            runtime,
            tx,
            rx,
            timer: None,
            detached: false,
        }
    }

    /// Handle for feeding page events into the session.
    pub fn sender(&self) -> mpsc::UnboundedSender<AutocompleteMessage> {
        self.tx.clone()
    }

    pub fn model(&self) -> &AutocompleteModel {
        &self.model
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Apply one message. Returns whether a key press must be kept from the form.
    pub fn dispatch(&mut self, message: AutocompleteMessage) -> bool {
        if self.detached {
            return false;
        }

        let transition = match message {
            AutocompleteMessage::Input(text) => self.model.on_input(&text),
            AutocompleteMessage::Key(key) => self.model.on_key(key),
            AutocompleteMessage::Click(target) => self.model.on_click(target),
            AutocompleteMessage::RowClicked(index) => self.model.select(index),
            AutocompleteMessage::Blur
            | AutocompleteMessage::FormSubmitted
            | AutocompleteMessage::Hide => self.model.dismiss(),
            AutocompleteMessage::TimerElapsed { generation } => self.model.on_timer(generation),
            AutocompleteMessage::FetchDone { seq, outcome } => {
                self.model.on_response(seq, outcome)
            }
            AutocompleteMessage::Detach => {
                self.detached = true;
                self.model.detach()
            }
        };

        self.apply(transition)
    }

    /// Stop reacting to the page. Any pending debounce timer is cancelled and
    /// responses still in flight are ignored.
    pub fn detach(&mut self) {
        self.dispatch(AutocompleteMessage::Detach);
    }

    /// Wait for the next message and apply it. `None` once detached.
    pub async fn next(&mut self) -> Option<bool> {
        if self.detached {
            return None;
        }
        let message = self.rx.recv().await?;
        Some(self.dispatch(message))
    }

    /// Process messages until the session is detached, then hand the view back.
    pub async fn run(mut self) -> V
    where
        V: Default,
    {
        while self.next().await.is_some() {}
        tracing::debug!("Autocomplete session detached");
        std::mem::take(&mut self.view)
    }

    fn apply(&mut self, transition: Transition) -> bool {
        for effect in transition.effects {
            match effect {
                Effect::ScheduleTimer { generation, delay } => {
                    let token = CancellationToken::new();
                    let cancelled = token.clone();
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        tokio::select! {
                            _ = cancelled.cancelled() => {}
                            _ = tokio::time::sleep(delay) => {
                                let _ = tx.send(AutocompleteMessage::TimerElapsed { generation });
                            }
                        }
                    });
                    if let Some(previous) = self.timer.replace(token) {
                        previous.cancel();
                    }
                }
                Effect::CancelTimer => {
                    if let Some(timer) = self.timer.take() {
                        timer.cancel();
                    }
                }
                Effect::Fetch { seq, query } => {
                    tracing::debug!("Fetching suggestions #{} for '{}'", seq, query);
                    let fetcher = self.fetcher.clone();
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        let outcome = fetcher.fetch(&query).await;
                        let _ = tx.send(AutocompleteMessage::FetchDone { seq, outcome });
                    });
                }
                Effect::ShowDropdown { html } => self.view.show_dropdown(&html),
                Effect::Highlight { index } => self.view.highlight(index),
                Effect::HideDropdown => self.view.hide_dropdown(),
                Effect::SetInputValue(value) => self.view.set_input_value(&value),
                Effect::SubmitForm => self.view.submit_form(),
            }
        }
        transition.prevent_default
    }
}

impl<V: AutocompleteView> Drop for AutocompleteSession<V> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}
