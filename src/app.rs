use crate::backend::Backend;
use crate::config::Config;
use crate::feed::{Entry, FeedReader, FetchError, HttpFeedReader};
use crate::history::{History, HistoryState, SessionHistory, Traversal};
use crate::nav::{fetch_with_timeout, Focus, Nav, NavError, SwitchOrigin, SwitchOutcome, SwitchTicket};
use crate::util::validate_link;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use url::Url;

/// How long a status bar message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);
/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

/// Events from background tasks
pub enum AppEvent {
    /// A category fetch finished.
    ///
    /// Fields:
    /// - `ticket`: the switch this fetch belongs to (carries the generation)
    /// - `result`: the entries, or why they could not be loaded
    FeedLoaded {
        ticket: SwitchTicket,
        result: Result<Vec<Entry>, FetchError>,
    },
}

/// Application state: the navigation core plus its collaborators.
pub struct App<R: FeedReader = HttpFeedReader, H: History = SessionHistory> {
    pub nav: Nav,
    pub backend: Arc<dyn Backend>,
    pub history: H,
    reader: Arc<R>,
    event_tx: mpsc::Sender<AppEvent>,
    fetch_handle: Option<JoinHandle<()>>,
    fetch_timeout: Duration,
    /// Back/forward step whose switch is still in flight, by generation.
    traversal: Option<(u64, Traversal)>,
    /// Pixels per terminal column for mouse drags.
    pub drag_scale: i32,
    /// Column where the current mouse drag started.
    pub drag_origin: Option<u16>,
    pub status_message: Option<(String, Instant)>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,
}

impl<R: FeedReader, H: History> App<R, H> {
    pub fn new(
        backend: Arc<dyn Backend>,
        reader: Arc<R>,
        history: H,
        config: &Config,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let nav = Nav::new(backend.categories().clone(), config.resize_debounce());
        Self {
            nav,
            backend,
            history,
            reader,
            event_tx,
            fetch_handle: None,
            fetch_timeout: config.fetch_timeout(),
            traversal: None,
            drag_scale: config.drag_scale(),
            drag_origin: None,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    /// Category to open at startup: the history entry's category if valid,
    /// then the configured one, then the backend default.
    pub fn initial_category(&self, configured: Option<&str>) -> String {
        let categories = self.backend.categories();
        let from_history = self.history.state().category;
        let initial = from_history
            .as_deref()
            .filter(|id| categories.contains(id))
            .or_else(|| configured.filter(|id| categories.contains(id)))
            .unwrap_or_else(|| self.backend.default_category())
            .to_string();
        initial
    }

    /// Load the initial category.
    pub fn start(&mut self, configured: Option<&str>) -> Result<(), NavError> {
        if let Some(id) = configured.filter(|id| !self.backend.categories().contains(id)) {
            tracing::warn!(category = id, "Configured category not offered by backend, ignoring");
        }
        let initial = self.initial_category(configured);

        // The startup entry must name the category shown so back can return to it
        if self.history.state().category.as_deref() != Some(initial.as_str()) {
            let url = HistoryState::for_category(&initial).to_url();
            if let Err(e) = self.history.replace(&url) {
                tracing::warn!(error = %e, "Failed to seed history entry");
            }
        }

        self.request_switch(&initial, SwitchOrigin::Startup)
    }

    /// Begin a switch and spawn its fetch.
    pub fn request_switch(&mut self, id: &str, origin: SwitchOrigin) -> Result<(), NavError> {
        let ticket = self.nav.begin_switch(id, origin)?;
        self.spawn_fetch(ticket);
        Ok(())
    }

    /// Reload the current category.
    pub fn reload(&mut self) -> Result<(), NavError> {
        match self.nav.current_id().map(str::to_string) {
            Some(id) => self.request_switch(&id, SwitchOrigin::Reload),
            None => Ok(()),
        }
    }

    /// Replay a restored history entry without recording a new one.
    pub fn popstate(&mut self, state: &HistoryState) -> Result<(), NavError> {
        if let Some(ticket) = self.nav.popstate(state)? {
            self.spawn_fetch(ticket);
        }
        Ok(())
    }

    /// Step through history and replay the restored entry. Returns false
    /// when there is no entry in that direction.
    pub fn traverse(&mut self, direction: Traversal) -> Result<bool, NavError> {
        let Some(state) = self.history.step(direction) else {
            return Ok(false);
        };
        match self.nav.popstate(&state) {
            Ok(Some(ticket)) => {
                self.traversal = Some((ticket.generation, direction));
                self.spawn_fetch(ticket);
            }
            Ok(None) => {}
            Err(e) => {
                self.history.step(direction.reverse());
                return Err(e);
            }
        }
        Ok(true)
    }

    fn spawn_fetch(&mut self, ticket: SwitchTicket) {
        // The superseded fetch could only produce a stale result
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous category fetch");
        }

        let reader = Arc::clone(&self.reader);
        let tx = self.event_tx.clone();
        let timeout = self.fetch_timeout;

        self.fetch_handle = Some(tokio::spawn(async move {
            let category = ticket.category.id.clone();
            let fetch = fetch_with_timeout(reader.as_ref(), &category, timeout);
            let result = match catch_task_panic(fetch).await {
                Ok(result) => result,
                Err(panic) => Err(FetchError::TaskPanicked(panic)),
            };

            if let Err(e) = tx.send(AppEvent::FeedLoaded { ticket, result }).await {
                tracing::warn!(error = %e, "Failed to send feed result (receiver dropped)");
            }
        }));
    }

    /// Apply a background event.
    pub fn handle_event(&mut self, event: AppEvent) -> SwitchOutcome {
        self.needs_redraw = true;
        match event {
            AppEvent::FeedLoaded { ticket, result } => {
                let origin = ticket.origin;
                let traversal = self
                    .traversal
                    .filter(|(generation, _)| *generation == ticket.generation)
                    .map(|(_, direction)| direction);
                let outcome = self.nav.complete_switch(ticket, result);
                if traversal.is_some() && !matches!(outcome, SwitchOutcome::Stale) {
                    self.traversal = None;
                }
                match &outcome {
                    SwitchOutcome::Loaded { category, count } => {
                        if origin.records_history() {
                            let url = HistoryState::for_category(&category.id).to_url();
                            if let Err(e) = self.history.navigate(&url) {
                                tracing::warn!(error = %e, "Failed to record history entry");
                            }
                        }
                        if *count == 0 {
                            self.set_status(format!("No stories in {}", category.title));
                        }
                    }
                    SwitchOutcome::Failed(err) => {
                        if let NavError::FeedLoad {
                            source: FetchError::TaskPanicked(msg),
                            ..
                        } = err
                        {
                            tracing::error!(task = "feed_load", error = %msg, "Background task panicked");
                        }
                        // Keep the cursor on the entry that is still on screen
                        if let Some(direction) = traversal {
                            self.history.step(direction.reverse());
                            tracing::debug!(?direction, "History step undone after failed load");
                        }
                        self.set_status(err.to_string());
                    }
                    SwitchOutcome::Stale => {}
                }
                outcome
            }
        }
    }

    /// Act on the focused element: switch to a menu category, or record the
    /// focused card's article and return its validated link for opening.
    pub fn activate_focused(&mut self) -> Result<Option<Url>, NavError> {
        match self.nav.focus() {
            Focus::Menu(i) => {
                let id = self.nav.menu()[i].category.id.clone();
                self.request_switch(&id, SwitchOrigin::User)?;
                Ok(None)
            }
            Focus::Card(_) => Ok(self.record_article()),
            Focus::Content => Ok(None),
        }
    }

    fn record_article(&mut self) -> Option<Url> {
        let link = self.nav.focused_card()?.link()?.to_string();
        let url = match validate_link(&link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(link = %link, error = %e, "Refusing to open article link");
                self.set_status(format!("Cannot open link: {}", e));
                return None;
            }
        };

        let category = self.nav.current_id()?.to_string();
        let state = HistoryState::for_article(category, url.as_str());
        if let Err(e) = self.history.navigate(&state.to_url()) {
            tracing::warn!(error = %e, "Failed to record article in history");
        }
        Some(url)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop the status message once it has been shown long enough.
    /// Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, shown_at)) if shown_at.elapsed() >= STATUS_TTL => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }

    /// Periodic animation step: spinner and menu slide.
    pub fn tick(&mut self) {
        if self.nav.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            self.needs_redraw = true;
        }
        if self.nav.animate_step() {
            self.needs_redraw = true;
        }
    }
}

/// Run a future, converting a panic into its message.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            }
        })
}
