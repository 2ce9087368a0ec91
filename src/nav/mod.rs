//! Category navigation core.
//!
//! [`Nav`] owns everything the reader shows: the current category, the
//! rendered cards, the slide-out menu and where keyboard focus sits. The
//! renderer only projects this state; nothing is read back from the screen.
//!
//! A category switch is split at its single suspension point:
//!
//! 1. [`Nav::begin_switch`] updates the menu marker and title, records the
//!    category optimistically, marks cards loading, hides the menu and
//!    returns a [`SwitchTicket`] stamped with a fresh generation.
//! 2. The caller fetches the entries (usually on a spawned task).
//! 3. [`Nav::complete_switch`] applies the result only if the ticket is
//!    still the latest; older tickets are dropped as [`SwitchOutcome::Stale`].
//!
//! - `card` - entry layout for the current viewport
//! - `drag` - drag-to-reveal gesture math
//! - `debounce` - resize burst collapsing

mod card;
mod debounce;
mod drag;

pub use card::{Card, Viewport};
pub use debounce::Debouncer;
pub use drag::{DragOutcome, DragSession, DRAG_COMMIT_PX, MENU_WIDTH_PX};

use crate::backend::{Categories, Category};
use crate::feed::{Entry, FeedReader, FetchError};
use crate::history::HistoryState;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Menu slide speed while transitions are enabled, in px per animation step.
const SLIDE_STEP_PX: i32 = 50;

#[derive(Debug, Error)]
pub enum NavError {
    /// The id is not in the backend's category table.
    #[error("Unknown category: {0}")]
    CategoryNotFound(String),
    /// The feed for a category could not be loaded.
    #[error("Failed to load {category}: {source}")]
    FeedLoad {
        category: String,
        #[source]
        source: FetchError,
    },
}

/// What started a switch. Only user switches are recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOrigin {
    /// Startup load of the initial category.
    Startup,
    /// Menu selection.
    User,
    /// Back/forward replay of a history entry.
    History,
    /// Manual reload of the current category.
    Reload,
}

impl SwitchOrigin {
    pub fn records_history(self) -> bool {
        self == SwitchOrigin::User
    }
}

/// Handle for an in-flight switch, carried by the fetch task.
#[derive(Debug, Clone)]
pub struct SwitchTicket {
    pub generation: u64,
    pub category: Category,
    pub origin: SwitchOrigin,
    previous: Option<Category>,
}

#[derive(Debug)]
pub enum SwitchOutcome {
    /// Cards replaced with `count` entries of `category`.
    Loaded { category: Category, count: usize },
    /// Fetch failed; the previous category is current again.
    Failed(NavError),
    /// A newer switch superseded this one; nothing changed.
    Stale,
}

/// Where keyboard focus sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu(usize),
    Card(usize),
    /// The content pane itself, when no card is rendered.
    Content,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub category: Category,
    pub active: bool,
    /// Reachable by keyboard traversal. False whenever the menu is hidden.
    pub focusable: bool,
}

pub struct Nav {
    categories: Categories,
    menu: Vec<MenuItem>,
    current: Option<Category>,
    /// Category whose entries the cards hold.
    loaded: Option<Category>,
    category_title: String,
    cards: Vec<Card>,
    menu_visible: bool,
    focus: Focus,
    scroll: usize,
    generation: u64,
    pending: Option<u64>,
    drag: Option<DragSession>,
    live_offset: Option<i32>,
    transitions: bool,
    reveal_px: i32,
    viewport: Viewport,
    resize: Debouncer,
}

impl Nav {
    pub fn new(categories: Categories, resize_window: Duration) -> Self {
        let menu = categories
            .iter()
            .map(|category| MenuItem {
                category: category.clone(),
                active: false,
                focusable: false,
            })
            .collect();

        Self {
            categories,
            menu,
            current: None,
            loaded: None,
            category_title: String::new(),
            cards: Vec::new(),
            menu_visible: false,
            focus: Focus::Content,
            scroll: 0,
            generation: 0,
            pending: None,
            drag: None,
            live_offset: None,
            transitions: true,
            reveal_px: 0,
            viewport: Viewport::default(),
            resize: Debouncer::new(resize_window),
        }
    }

    // ------------------------------------------------------------------------
    // Category switching
    // ------------------------------------------------------------------------

    /// First half of a switch: everything up to the fetch.
    pub fn begin_switch(
        &mut self,
        id: &str,
        origin: SwitchOrigin,
    ) -> Result<SwitchTicket, NavError> {
        let category = self
            .categories
            .get(id)
            .cloned()
            .ok_or_else(|| NavError::CategoryNotFound(id.to_string()))?;

        self.mark_active(&category);

        self.current = Some(category.clone());
        // Failure restores the category the cards belong to
        let previous = self.loaded.clone();

        for card in &mut self.cards {
            card.set_loading(true);
        }

        self.hide();

        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(self.generation);

        tracing::debug!(
            category = %category.id,
            generation = self.generation,
            ?origin,
            "Category switch started"
        );

        Ok(SwitchTicket {
            generation: self.generation,
            category,
            origin,
            previous,
        })
    }

    /// Second half of a switch: apply the fetch result if still current.
    pub fn complete_switch(
        &mut self,
        ticket: SwitchTicket,
        result: Result<Vec<Entry>, FetchError>,
    ) -> SwitchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = ticket.generation,
                category = %ticket.category.id,
                "Ignoring stale category load (generation mismatch)"
            );
            return SwitchOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(entries) => {
                let viewport = self.viewport;
                self.cards = entries
                    .into_iter()
                    .map(|entry| Card::new(entry, viewport))
                    .collect();
                self.scroll = 0;
                self.focus = self.first_content_focus();

                self.loaded = Some(ticket.category.clone());

                let count = self.cards.len();
                tracing::info!(category = %ticket.category.id, count, "Category loaded");
                SwitchOutcome::Loaded {
                    category: ticket.category,
                    count,
                }
            }
            Err(source) => {
                tracing::warn!(
                    category = %ticket.category.id,
                    error = %source,
                    "Category load failed, restoring previous category"
                );

                match &ticket.previous {
                    Some(previous) => self.mark_active(previous),
                    None => self.clear_active(),
                }
                self.current = ticket.previous;
                for card in &mut self.cards {
                    card.set_loading(false);
                }

                SwitchOutcome::Failed(NavError::FeedLoad {
                    category: ticket.category.id,
                    source,
                })
            }
        }
    }

    /// Run a whole switch inline: begin, fetch with `timeout`, complete.
    pub async fn switch_category<R: FeedReader>(
        &mut self,
        reader: &R,
        id: &str,
        origin: SwitchOrigin,
        timeout: Duration,
    ) -> Result<SwitchOutcome, NavError> {
        let ticket = self.begin_switch(id, origin)?;
        let result = fetch_with_timeout(reader, &ticket.category.id, timeout).await;
        Ok(self.complete_switch(ticket, result))
    }

    /// Start a switch for a restored history entry, if it names a category
    /// other than the current one.
    pub fn popstate(&mut self, state: &HistoryState) -> Result<Option<SwitchTicket>, NavError> {
        match state.category.as_deref() {
            Some(id) if self.current_id() != Some(id) => {
                self.begin_switch(id, SwitchOrigin::History).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn mark_active(&mut self, category: &Category) {
        for item in &mut self.menu {
            item.active = item.category.id == category.id;
        }
        self.category_title = category.title.clone();
    }

    fn clear_active(&mut self) {
        for item in &mut self.menu {
            item.active = false;
        }
        self.category_title.clear();
    }

    // ------------------------------------------------------------------------
    // Menu visibility
    // ------------------------------------------------------------------------

    pub fn show(&mut self) {
        for item in &mut self.menu {
            item.focusable = true;
        }
        self.focus = if self.menu.is_empty() {
            Focus::Content
        } else {
            Focus::Menu(0)
        };
        self.menu_visible = true;
    }

    pub fn hide(&mut self) {
        for item in &mut self.menu {
            item.focusable = false;
        }
        self.focus = self.first_content_focus();
        self.menu_visible = false;
    }

    pub fn toggle(&mut self) {
        if self.menu_visible {
            self.hide();
        } else {
            self.show();
        }
    }

    fn first_content_focus(&self) -> Focus {
        if self.cards.is_empty() {
            Focus::Content
        } else {
            Focus::Card(0)
        }
    }

    /// Move focus down within whichever pane owns it.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Menu(i) if !self.menu.is_empty() => Focus::Menu((i + 1) % self.menu.len()),
            Focus::Card(i) if i + 1 < self.cards.len() => Focus::Card(i + 1),
            Focus::Content if !self.cards.is_empty() => Focus::Card(0),
            other => other,
        };
        self.scroll_to_focus();
    }

    /// Move focus up within whichever pane owns it.
    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Menu(i) if !self.menu.is_empty() => {
                Focus::Menu((i + self.menu.len() - 1) % self.menu.len())
            }
            Focus::Card(i) if i > 0 => Focus::Card(i - 1),
            other => other,
        };
        self.scroll_to_focus();
    }

    /// Adjust `scroll` (first visible card) so the focused card fits in the
    /// viewport.
    fn scroll_to_focus(&mut self) {
        let Focus::Card(focused) = self.focus else {
            return;
        };
        if focused < self.scroll {
            self.scroll = focused;
            return;
        }
        let height = u32::from(self.viewport.height);
        let span = |from: usize| -> u32 {
            self.cards[from..=focused]
                .iter()
                .map(|c| u32::from(c.height()))
                .sum()
        };
        let mut start = self.scroll;
        while start < focused && span(start) > height {
            start += 1;
        }
        self.scroll = start;
    }

    // ------------------------------------------------------------------------
    // Drag-to-reveal
    // ------------------------------------------------------------------------

    pub fn drag_start(&mut self) {
        self.drag = Some(DragSession::start(self.menu_visible));
        self.transitions = false;
    }

    /// Track the pointer at `position` px from the drag origin.
    pub fn drag_move(&mut self, position: i32) {
        if let Some(drag) = &mut self.drag {
            let offset = drag.update(position);
            self.live_offset = Some(offset);
            self.reveal_px = (MENU_WIDTH_PX + offset).clamp(0, MENU_WIDTH_PX);
        }
    }

    pub fn drag_stop(&mut self) -> DragOutcome {
        self.transitions = true;
        self.live_offset = None;

        let Some(drag) = self.drag.take() else {
            return DragOutcome::Ignored;
        };

        if drag.commits() {
            if drag.was_open() {
                self.hide();
            } else {
                self.show();
            }
            tracing::debug!(delta = drag.delta(), menu_visible = self.menu_visible, "Drag committed");
            DragOutcome::Committed {
                menu_visible: self.menu_visible,
            }
        } else {
            DragOutcome::SnappedBack
        }
    }

    /// Advance the menu slide one step toward its resting position.
    /// Returns true if the rendered width changed.
    pub fn animate_step(&mut self) -> bool {
        if !self.transitions {
            return false;
        }
        let target = if self.menu_visible { MENU_WIDTH_PX } else { 0 };
        if self.reveal_px == target {
            return false;
        }
        self.reveal_px = if self.reveal_px < target {
            (self.reveal_px + SLIDE_STEP_PX).min(target)
        } else {
            (self.reveal_px - SLIDE_STEP_PX).max(target)
        };
        true
    }

    // ------------------------------------------------------------------------
    // Resize
    // ------------------------------------------------------------------------

    /// Record a viewport change and restart the refresh quiet period.
    pub fn on_resize(&mut self, viewport: Viewport, now: Instant) {
        self.viewport = viewport;
        self.resize.trigger(now);
    }

    /// Set the viewport without scheduling a refresh (initial layout).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Refresh every card if the quiet period has elapsed. Returns whether a
    /// refresh pass ran.
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        if !self.resize.fire_if_due(now) {
            return false;
        }
        let viewport = self.viewport;
        for card in &mut self.cards {
            card.refresh(viewport);
        }
        tracing::debug!(cards = self.cards.len(), width = viewport.width, "Cards refreshed after resize");
        true
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.id.as_str())
    }

    pub fn category_title(&self) -> &str {
        &self.category_title
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn focused_card(&self) -> Option<&Card> {
        match self.focus {
            Focus::Card(i) => self.cards.get(i),
            _ => None,
        }
    }

    pub fn focused_menu_item(&self) -> Option<&MenuItem> {
        match self.focus {
            Focus::Menu(i) => self.menu.get(i),
            _ => None,
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn live_offset(&self) -> Option<i32> {
        self.live_offset
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions
    }

    /// Current rendered menu width in px, `0..=MENU_WIDTH_PX`.
    pub fn reveal_px(&self) -> i32 {
        self.reveal_px
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Fetch a category with an overall time limit.
pub async fn fetch_with_timeout<R: FeedReader>(
    reader: &R,
    category: &str,
    timeout: Duration,
) -> Result<Vec<Entry>, FetchError> {
    match tokio::time::timeout(timeout, reader.fetch(category)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(category, timeout_ms = timeout.as_millis() as u64, "Category load timed out");
            Err(FetchError::Timeout)
        }
    }
}
