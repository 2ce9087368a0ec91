//! Navigation history.
//!
//! States are addressed by URLs of the form `/<category>` or
//! `/<category>?article=<link>`. [`SessionHistory`] keeps an in-memory stack
//! with a cursor; `back`/`forward` return the restored state, which the app
//! replays without pushing a new entry.

use thiserror::Error;
use url::Url;

/// Base used to resolve relative history URLs.
const BASE: &str = "https://shadow-reader.invalid/";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid history URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
    pub category: Option<String>,
    pub article_url: Option<String>,
}

impl HistoryState {
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            article_url: None,
        }
    }

    pub fn for_article(category: impl Into<String>, article_url: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            article_url: Some(article_url.into()),
        }
    }

    pub fn to_url(&self) -> String {
        // BASE is a constant valid URL
        let mut url = match Url::parse(BASE) {
            Ok(url) => url,
            Err(_) => return "/".to_string(),
        };
        url.set_path(&format!("/{}", self.category.as_deref().unwrap_or("")));
        if let Some(article) = &self.article_url {
            url.query_pairs_mut().append_pair("article", article);
        }

        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    pub fn from_url(raw: &str) -> Result<Self, HistoryError> {
        let invalid = |source| HistoryError::InvalidUrl {
            url: raw.to_string(),
            source,
        };
        let url = Url::parse(BASE)
            .and_then(|base| base.join(raw))
            .map_err(invalid)?;

        let path = url.path().trim_matches('/');
        let category = (!path.is_empty()).then(|| path.to_string());
        let article_url = url
            .query_pairs()
            .find(|(key, _)| key == "article")
            .map(|(_, value)| value.into_owned());

        Ok(Self {
            category,
            article_url,
        })
    }
}

/// Direction of a back/forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Back,
    Forward,
}

impl Traversal {
    pub fn reverse(self) -> Self {
        match self {
            Traversal::Back => Traversal::Forward,
            Traversal::Forward => Traversal::Back,
        }
    }
}

/// Source of the current navigation state and sink for new entries.
pub trait History {
    fn state(&self) -> HistoryState;

    /// Push a new entry, discarding any forward entries.
    fn navigate(&mut self, url: &str) -> Result<(), HistoryError>;

    /// Overwrite the current entry in place.
    fn replace(&mut self, url: &str) -> Result<(), HistoryError>;

    /// Step back; returns the restored state.
    fn back(&mut self) -> Option<HistoryState>;

    /// Step forward; returns the restored state.
    fn forward(&mut self) -> Option<HistoryState>;

    fn step(&mut self, direction: Traversal) -> Option<HistoryState> {
        match direction {
            Traversal::Back => self.back(),
            Traversal::Forward => self.forward(),
        }
    }
}

/// In-memory history stack.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryState>,
    index: usize,
}

impl SessionHistory {
    pub fn new(initial: HistoryState) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(HistoryState::default())
    }
}

impl History for SessionHistory {
    fn state(&self) -> HistoryState {
        self.entries[self.index].clone()
    }

    fn navigate(&mut self, url: &str) -> Result<(), HistoryError> {
        let state = HistoryState::from_url(url)?;
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        self.index = self.entries.len() - 1;
        tracing::debug!(url, depth = self.entries.len(), "History entry pushed");
        Ok(())
    }

    fn replace(&mut self, url: &str) -> Result<(), HistoryError> {
        self.entries[self.index] = HistoryState::from_url(url)?;
        tracing::debug!(url, index = self.index, "History entry replaced");
        Ok(())
    }

    fn back(&mut self) -> Option<HistoryState> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    fn forward(&mut self) -> Option<HistoryState> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_url() {
        let state = HistoryState::for_category("world");
        assert_eq!(state.to_url(), "/world");
        assert_eq!(HistoryState::from_url("/world").unwrap(), state);
    }

    #[test]
    fn test_nested_category_url() {
        let state = HistoryState::for_category("r/askreddit");
        assert_eq!(state.to_url(), "/r/askreddit");
        assert_eq!(HistoryState::from_url("/r/askreddit").unwrap(), state);
    }

    #[test]
    fn test_article_url_is_encoded() {
        let state = HistoryState::for_article("us", "https://example.com/a?b=1&c=2");
        let url = state.to_url();
        assert!(url.starts_with("/us?article="));
        assert!(!url.contains("&c=2"));
        assert_eq!(HistoryState::from_url(&url).unwrap(), state);
    }

    #[test]
    fn test_root_url_has_no_category() {
        assert_eq!(HistoryState::from_url("/").unwrap(), HistoryState::default());
        assert_eq!(HistoryState::default().to_url(), "/");
    }

    #[test]
    fn test_navigate_back_forward() {
        let mut history = SessionHistory::new(HistoryState::for_category("us"));
        history.navigate("/world").unwrap();
        history.navigate("/tech").unwrap();
        assert_eq!(history.state(), HistoryState::for_category("tech"));

        assert_eq!(history.back(), Some(HistoryState::for_category("world")));
        assert_eq!(history.back(), Some(HistoryState::for_category("us")));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(HistoryState::for_category("world")));
    }

    #[test]
    fn test_navigate_discards_forward_entries() {
        let mut history = SessionHistory::new(HistoryState::for_category("us"));
        history.navigate("/world").unwrap();
        history.back();
        history.navigate("/tech").unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.forward(), None);
        assert_eq!(history.back(), Some(HistoryState::for_category("us")));
    }

    #[test]
    fn test_replace_keeps_position_and_forward_entries() {
        let mut history = SessionHistory::default();
        history.replace("/us").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.state(), HistoryState::for_category("us"));

        history.navigate("/world").unwrap();
        history.back();
        history.replace("/tech").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.forward(), Some(HistoryState::for_category("world")));
        assert_eq!(history.back(), Some(HistoryState::for_category("tech")));
    }
}
