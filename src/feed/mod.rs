//! Feed retrieval.
//!
//! - [`Entry`] - one feed item as handed to the card layer
//! - [`FeedReader`] - the fetch seam the navigation core depends on
//! - [`HttpFeedReader`] - reqwest transport with retry, size limit and
//!   per-request timeout; parsing is delegated to the active backend
//!
//! # Example
//!
//! ```ignore
//! use shadow_reader::backend::BackendKind;
//! use shadow_reader::feed::{FeedReader, HttpFeedReader};
//!
//! let backend = BackendKind::Guardian.build(None);
//! let reader = HttpFeedReader::new(client, backend);
//! let entries = reader.fetch("world").await?;
//! ```

mod fetcher;

pub use fetcher::{build_client, FetchError, HttpFeedReader};

use std::future::Future;

/// One feed item: what a card renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub link: Option<String>,
    /// Unix timestamp, when the feed provides one.
    pub published: Option<i64>,
}

/// Fetches the ordered entries of a category.
pub trait FeedReader: Send + Sync + 'static {
    fn fetch(&self, category: &str) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send;
}
