//! Card layout.
//!
//! A card is one rendered entry. Its text is wrapped for the current
//! viewport width; [`Card::refresh`] recomputes the wrap after a resize.

use crate::feed::Entry;
use crate::util::{strip_control_chars, wrap_to_width};

/// Horizontal padding inside a card (borders plus one space each side).
const CARD_PADDING: u16 = 4;
/// Narrowest text column a card will lay out for.
const MIN_TEXT_WIDTH: usize = 8;

/// Size of the content area cards are laid out in, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone)]
pub struct Card {
    entry: Entry,
    loading: bool,
    title_lines: Vec<String>,
    body_lines: Vec<String>,
    layout_passes: u32,
}

impl Card {
    pub fn new(entry: Entry, viewport: Viewport) -> Self {
        let mut card = Self {
            entry,
            loading: false,
            title_lines: Vec::new(),
            body_lines: Vec::new(),
            layout_passes: 0,
        };
        card.layout(viewport);
        card
    }

    /// Re-wrap the card's text for a new viewport.
    pub fn refresh(&mut self, viewport: Viewport) {
        self.layout(viewport);
        self.layout_passes += 1;
        tracing::trace!(width = viewport.width, passes = self.layout_passes, "Card refreshed");
    }

    fn layout(&mut self, viewport: Viewport) {
        let width = (viewport.width.saturating_sub(CARD_PADDING) as usize).max(MIN_TEXT_WIDTH);
        self.title_lines = wrap_to_width(&strip_control_chars(&self.entry.title), width);
        self.body_lines = wrap_to_width(&strip_control_chars(&self.entry.description), width);
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// The card's focusable element: the entry link.
    pub fn link(&self) -> Option<&str> {
        self.entry.link.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn title_lines(&self) -> &[String] {
        &self.title_lines
    }

    pub fn body_lines(&self) -> &[String] {
        &self.body_lines
    }

    /// Rows the card occupies including its border.
    pub fn height(&self) -> u16 {
        let image_row = usize::from(self.entry.image.is_some());
        (self.title_lines.len() + self.body_lines.len() + image_row + 2).min(u16::MAX as usize)
            as u16
    }

    /// Number of `refresh` calls since construction.
    pub fn layout_passes(&self) -> u32 {
        self.layout_passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, description: &str) -> Entry {
        Entry {
            title: title.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_card_is_laid_out_without_refresh() {
        let card = Card::new(entry("Hello", "World"), Viewport::new(40, 20));
        assert_eq!(card.title_lines(), &["Hello".to_string()]);
        assert_eq!(card.body_lines(), &["World".to_string()]);
        assert_eq!(card.layout_passes(), 0);
        assert!(!card.is_loading());
    }

    #[test]
    fn test_refresh_rewraps_for_narrower_viewport() {
        let mut card = Card::new(
            entry("A fairly long headline about things", ""),
            Viewport::new(80, 20),
        );
        assert_eq!(card.title_lines().len(), 1);

        card.refresh(Viewport::new(16, 20));
        assert!(card.title_lines().len() > 1);
        assert!(card.title_lines().iter().all(|l| l.chars().count() <= 12));
        assert_eq!(card.layout_passes(), 1);
    }

    #[test]
    fn test_height_counts_image_row_and_border() {
        let mut e = entry("Title", "Body");
        assert_eq!(Card::new(e.clone(), Viewport::new(40, 10)).height(), 4);
        e.image = Some("https://example.com/a.jpg".to_string());
        assert_eq!(Card::new(e, Viewport::new(40, 10)).height(), 5);
    }

    #[test]
    fn test_control_chars_stripped_from_layout() {
        let card = Card::new(entry("\x1b[31mRed\x1b[0m", ""), Viewport::new(40, 10));
        assert_eq!(card.title_lines(), &["Red".to_string()]);
    }
}
