use super::{join_url, Backend, Categories};
use crate::feed::{Entry, FetchError};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Reddit listings via the public `.json` endpoints.
pub struct Reddit {
    base_url: String,
    categories: Categories,
}

impl Reddit {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            categories: Categories::new([("front", "front page"), ("r/askreddit", "Ask Reddit")]),
        }
    }
}

impl Default for Reddit {
    fn default() -> Self {
        Self::new()
    }
}

// Listing shape: { data: { children: [ { data: Post } ] } }
#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
    data: Post,
}

#[derive(Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    num_comments: u64,
    thumbnail: Option<String>,
    preview: Option<Preview>,
    permalink: Option<String>,
    url: Option<String>,
    created_utc: Option<f64>,
}

#[derive(Deserialize)]
struct Preview {
    #[serde(default)]
    images: Vec<PreviewImage>,
}

#[derive(Deserialize)]
struct PreviewImage {
    source: ImageSource,
}

#[derive(Deserialize)]
struct ImageSource {
    url: String,
}

impl Post {
    /// Preview source image, falling back to the thumbnail. Reddit uses
    /// placeholder words ("self", "default", "nsfw") for missing thumbnails.
    fn image(&self) -> Option<String> {
        let preview = self
            .preview
            .as_ref()
            .and_then(|p| p.images.first())
            .map(|img| img.source.url.clone());
        preview.or_else(|| {
            self.thumbnail
                .as_ref()
                .filter(|t| t.starts_with("http"))
                .cloned()
        })
    }

    fn link(&self, base_url: &str) -> Option<String> {
        match &self.permalink {
            Some(path) if !path.is_empty() => Some(join_url(base_url, path)),
            _ => self.url.clone(),
        }
    }
}

impl Backend for Reddit {
    fn name(&self) -> &'static str {
        "Reddit"
    }

    fn categories(&self) -> &Categories {
        &self.categories
    }

    fn default_category(&self) -> &str {
        "front"
    }

    fn feed_url(&self, category: &str) -> String {
        let path = if category == "front" { "" } else { category };
        format!("{}/{}.json?raw_json=1", self.base_url, path)
    }

    fn parse_entries(&self, bytes: &[u8]) -> Result<Vec<Entry>, FetchError> {
        let listing: Listing =
            serde_json::from_slice(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

        let entries = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let post = child.data;
                Entry {
                    description: format!("{} comments", post.num_comments),
                    image: post.image(),
                    link: post.link(&self.base_url),
                    published: post.created_utc.map(|ts| ts as i64),
                    title: post.title,
                }
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LISTING: &str = r#"{
        "kind": "Listing",
        "data": {
            "children": [
                {"kind": "t3", "data": {
                    "title": "First post",
                    "num_comments": 12,
                    "thumbnail": "https://b.thumbs.redditmedia.com/a.jpg",
                    "preview": {"images": [{"source": {"url": "https://i.redd.it/full.jpg"}}]},
                    "permalink": "/r/askreddit/comments/abc/first_post/",
                    "url": "https://example.com/first",
                    "created_utc": 1700000000.0
                }},
                {"kind": "t3", "data": {
                    "title": "Second post",
                    "num_comments": 0,
                    "thumbnail": "self"
                }}
            ]
        }
    }"#;

    #[test]
    fn test_feed_url_front_page() {
        let reddit = Reddit::new();
        assert_eq!(
            reddit.feed_url("front"),
            "https://www.reddit.com/.json?raw_json=1"
        );
        assert_eq!(
            reddit.feed_url("r/askreddit"),
            "https://www.reddit.com/r/askreddit.json?raw_json=1"
        );
    }

    #[test]
    fn test_parse_listing_in_order() {
        let reddit = Reddit::new();
        let entries = reddit.parse_entries(LISTING.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First post");
        assert_eq!(entries[0].description, "12 comments");
        assert_eq!(entries[0].image.as_deref(), Some("https://i.redd.it/full.jpg"));
        assert_eq!(
            entries[0].link.as_deref(),
            Some("https://www.reddit.com/r/askreddit/comments/abc/first_post/")
        );
        assert_eq!(entries[0].published, Some(1_700_000_000));

        assert_eq!(entries[1].title, "Second post");
        assert_eq!(entries[1].description, "0 comments");
        assert_eq!(entries[1].image, None);
        assert_eq!(entries[1].link, None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let reddit = Reddit::new();
        match reddit.parse_entries(b"<html>") {
            Err(FetchError::Parse(_)) => {}
            other => panic!("Expected Parse error, got {:?}", other.map(|e| e.len())),
        }
    }
}
