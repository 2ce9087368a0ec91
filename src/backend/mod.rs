//! Feed backends.
//!
//! A backend owns a fixed, ordered table of categories and knows how to turn
//! a category id into a feed URL and a response body into [`Entry`] records.
//! Backends are selected at startup through [`BackendKind`].
//!
//! - [`reddit`] - Reddit JSON listings
//! - [`guardian`] - Guardian section RSS feeds

mod guardian;
mod reddit;

pub use guardian::Guardian;
pub use reddit::Reddit;

use crate::feed::{Entry, FetchError};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Categories
// ============================================================================

/// A named feed section with a stable id and a display title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    pub id: String,
    pub title: String,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Ordered category table. Menu order follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    items: Vec<Category>,
}

impl Categories {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut items: Vec<Category> = Vec::new();
        for (id, title) in pairs {
            let category = Category::new(id, title);
            // Later duplicates replace the title but keep the original slot
            match items.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => existing.title = category.title,
                None => items.push(category),
            }
        }
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn title(&self, id: &str) -> Option<&str> {
        self.get(id).map(|c| c.title.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Backend Trait
// ============================================================================

/// A pluggable source of categories and feed content.
pub trait Backend: Send + Sync {
    /// Human-readable backend name shown in the header.
    fn name(&self) -> &'static str;

    fn categories(&self) -> &Categories;

    /// Category loaded when neither history nor config names one.
    fn default_category(&self) -> &str;

    fn category_title(&self, id: &str) -> Option<&str> {
        self.categories().title(id)
    }

    /// URL of the feed document for `category`.
    fn feed_url(&self, category: &str) -> String;

    /// Map a fetched feed document to entries, preserving feed order.
    fn parse_entries(&self, bytes: &[u8]) -> Result<Vec<Entry>, FetchError>;
}

// ============================================================================
// Backend Factory
// ============================================================================

#[derive(Debug, Error)]
#[error("Unknown backend '{0}' (expected one of: reddit, guardian)")]
pub struct UnknownBackend(pub String);

/// Identifier of a built-in backend, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    Reddit,
    #[default]
    Guardian,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Reddit, BackendKind::Guardian];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::Guardian => "guardian",
        }
    }

    /// Construct the backend. `base_url` overrides the public host.
    pub fn build(self, base_url: Option<&str>) -> Arc<dyn Backend> {
        match self {
            Self::Reddit => Arc::new(match base_url {
                Some(base) => Reddit::with_base_url(base),
                None => Reddit::new(),
            }),
            Self::Guardian => Arc::new(match base_url {
                Some(base) => Guardian::with_base_url(base),
                None => Guardian::new(),
            }),
        }
    }
}

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownBackend(s.to_string()))
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join a base URL and a path without doubling the slash.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_preserve_order() {
        let cats = Categories::new([("b", "Bee"), ("a", "Ay"), ("c", "Cee")]);
        let ids: Vec<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(cats.position("a"), Some(1));
    }

    #[test]
    fn test_categories_duplicate_keeps_slot() {
        let cats = Categories::new([("a", "first"), ("b", "bee"), ("a", "second")]);
        assert_eq!(cats.len(), 2);
        assert_eq!(cats.title("a"), Some("second"));
        assert_eq!(cats.position("a"), Some(0));
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("reddit".parse::<BackendKind>().unwrap(), BackendKind::Reddit);
        assert_eq!(
            " Guardian ".parse::<BackendKind>().unwrap(),
            BackendKind::Guardian
        );
        assert!("myspace".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_factory_builds_matching_backend() {
        let reddit = BackendKind::Reddit.build(None);
        assert_eq!(reddit.name(), "Reddit");
        assert_eq!(reddit.default_category(), "front");

        let guardian = BackendKind::Guardian.build(Some("http://127.0.0.1:9000/"));
        assert_eq!(guardian.name(), "The Guardian");
        assert_eq!(guardian.feed_url("world"), "http://127.0.0.1:9000/world/rss");
    }

    #[test]
    fn test_default_category_is_listed() {
        for kind in BackendKind::ALL {
            let backend = kind.build(None);
            assert!(
                backend.categories().contains(backend.default_category()),
                "{} default category missing from table",
                kind
            );
        }
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.com/", "/x"), "https://a.com/x");
        assert_eq!(join_url("https://a.com", "x"), "https://a.com/x");
    }
}
