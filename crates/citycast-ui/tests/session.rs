//! Session loop tests on a paused clock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use citycast_ui::{
    AutocompleteMessage, AutocompleteModel, AutocompleteSession, AutocompleteView, ClickTarget,
    FetchOutcome, Key, Suggestion, SuggestionFetcher,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;

#[derive(Debug, Clone, PartialEq)]
enum ViewEvent {
    Input(String),
    Show(String),
    Highlight(Option<usize>),
    Hide,
    Submit,
}

#[derive(Default)]
struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    fn last_shown(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Show(html) => Some(html.as_str()),
            _ => None,
        })
    }
}

impl AutocompleteView for RecordingView {
    fn set_input_value(&mut self, value: &str) {
        self.events.push(ViewEvent::Input(value.to_string()));
    }
    fn show_dropdown(&mut self, html: &str) {
        self.events.push(ViewEvent::Show(html.to_string()));
    }
    fn highlight(&mut self, index: Option<usize>) {
        self.events.push(ViewEvent::Highlight(index));
    }
    fn hide_dropdown(&mut self) {
        self.events.push(ViewEvent::Hide);
    }
    fn submit_form(&mut self) {
        self.events.push(ViewEvent::Submit);
    }
}

/// Answers every query with one city named after it, after a per-query delay.
#[derive(Default)]
struct ScriptedFetcher {
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SuggestionFetcher for ScriptedFetcher {
    async fn fetch(&self, query: &str) -> FetchOutcome {
        self.calls.lock().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        let mut suggestion = Suggestion::new(format!("City-{query}"), "FR");
        suggestion.display_name = Some(format!("City-{query}, FR"));
        FetchOutcome::Loaded(vec![suggestion])
    }
}

fn session(fetcher: Arc<ScriptedFetcher>) -> AutocompleteSession<RecordingView> {
    AutocompleteSession::new(
        AutocompleteModel::default(),
        fetcher,
        RecordingView::default(),
        Handle::current(),
    )
}

const PAST_DEBOUNCE: Duration = Duration::from_millis(301);

#[tokio::test(start_paused = true)]
async fn test_burst_of_keystrokes_fetches_once() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let mut session = session(fetcher.clone());

    for text in ["p", "pa", "par", "pari", "paris"] {
        session.dispatch(AutocompleteMessage::Input(text.to_string()));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::time::sleep(PAST_DEBOUNCE).await;

    // timer, then response
    assert_eq!(session.next().await, Some(false));
    assert_eq!(session.next().await, Some(false));

    assert_eq!(fetcher.calls(), vec!["paris"]);
    assert!(session.model().is_dropdown_visible());
    assert!(session
        .view()
        .last_shown()
        .is_some_and(|html| html.contains("City-paris, FR")));

    // Nothing else is in flight
    let idle = tokio::time::timeout(Duration::from_secs(5), session.next()).await;
    assert!(idle.is_err());
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_dropped() {
    let fetcher = Arc::new(
        ScriptedFetcher::default()
            .with_delay("pa", Duration::from_millis(500))
            .with_delay("par", Duration::from_millis(10)),
    );
    let mut session = session(fetcher.clone());

    session.dispatch(AutocompleteMessage::Input("pa".to_string()));
    tokio::time::sleep(PAST_DEBOUNCE).await;
    session.next().await; // fetch "pa" starts

    session.dispatch(AutocompleteMessage::Input("par".to_string()));
    tokio::time::sleep(PAST_DEBOUNCE).await;
    session.next().await; // fetch "par" starts

    session.next().await; // "par" answers first
    assert!(session
        .view()
        .last_shown()
        .is_some_and(|html| html.contains("City-par, FR")));

    session.next().await; // late "pa" answer
    assert_eq!(fetcher.calls(), vec!["pa", "par"]);
    let shows = session
        .view()
        .events
        .iter()
        .filter(|e| matches!(e, ViewEvent::Show(_)))
        .count();
    assert_eq!(shows, 1);
    assert_eq!(session.model().suggestions()[0].name, "City-par");
}

#[tokio::test(start_paused = true)]
async fn test_response_after_input_cleared_is_dropped() {
    let fetcher = Arc::new(ScriptedFetcher::default().with_delay("oslo", Duration::from_millis(200)));
    let mut session = session(fetcher.clone());

    session.dispatch(AutocompleteMessage::Input("oslo".to_string()));
    tokio::time::sleep(PAST_DEBOUNCE).await;
    session.next().await;

    session.dispatch(AutocompleteMessage::Input("o".to_string()));
    session.next().await;

    assert!(!session.model().is_dropdown_visible());
    assert!(session.view().last_shown().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_selection_submits() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let mut session = session(fetcher);

    session.dispatch(AutocompleteMessage::Input("paris".to_string()));
    tokio::time::sleep(PAST_DEBOUNCE).await;
    session.next().await;
    session.next().await;

    assert!(session.dispatch(AutocompleteMessage::Key(Key::ArrowDown)));
    assert!(session.dispatch(AutocompleteMessage::Key(Key::Enter)));

    let events = &session.view().events;
    let tail = &events[events.len() - 4..];
    assert_eq!(
        tail,
        &[
            ViewEvent::Highlight(Some(0)),
            ViewEvent::Input("City-paris, FR".to_string()),
            ViewEvent::Hide,
            ViewEvent::Submit,
        ]
    );
    assert!(!session.model().is_dropdown_visible());
}

#[tokio::test(start_paused = true)]
async fn test_outside_click_and_escape_hide() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let mut session = session(fetcher);

    session.dispatch(AutocompleteMessage::Input("rome".to_string()));
    tokio::time::sleep(PAST_DEBOUNCE).await;
    session.next().await;
    session.next().await;
    assert!(session.model().is_dropdown_visible());

    assert!(!session.dispatch(AutocompleteMessage::Click(ClickTarget::Dropdown)));
    assert!(session.model().is_dropdown_visible());

    session.dispatch(AutocompleteMessage::Click(ClickTarget::Outside));
    assert!(!session.model().is_dropdown_visible());
    assert_eq!(session.view().events.last(), Some(&ViewEvent::Hide));

    // Escape on a hidden dropdown leaves the key alone
    assert!(!session.dispatch(AutocompleteMessage::Key(Key::Escape)));
}

#[tokio::test(start_paused = true)]
async fn test_detach_cancels_pending_timer() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let mut session = session(fetcher.clone());

    session.dispatch(AutocompleteMessage::Input("lima".to_string()));
    assert!(session.model().has_pending_timer());
    session.detach();

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(session.is_detached());
    assert_eq!(session.next().await, None);
    assert!(fetcher.calls().is_empty());

    // Events after detach are ignored
    assert!(!session.dispatch(AutocompleteMessage::Input("lima".to_string())));
    assert!(!session.model().has_pending_timer());
}

#[tokio::test(start_paused = true)]
async fn test_run_until_detached() {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let session = session(fetcher.clone());
    let tx = session.sender();

    let handle = tokio::spawn(session.run());
    tx.send(AutocompleteMessage::Input("kyiv".to_string())).unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    tx.send(AutocompleteMessage::FormSubmitted).unwrap();
    tx.send(AutocompleteMessage::Detach).unwrap();

    let view = handle.await.unwrap();
    assert_eq!(fetcher.calls(), vec!["kyiv"]);
    assert!(view
        .events
        .iter()
        .any(|e| matches!(e, ViewEvent::Show(html) if html.contains("City-kyiv"))));
    assert_eq!(view.events.last(), Some(&ViewEvent::Hide));
}
