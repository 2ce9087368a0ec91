use super::{join_url, Backend, Categories};
use crate::feed::{Entry, FetchError};
use crate::util::strip_html_tags;
use feed_rs::parser;

const DEFAULT_BASE_URL: &str = "https://www.theguardian.com";

/// Guardian section feeds (`/<section>/rss`).
pub struct Guardian {
    base_url: String,
    categories: Categories,
}

impl Guardian {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            categories: Categories::new([
                ("us", "top news"),
                ("us-news--us-politics", "politics"),
                ("world", "world"),
                ("commentisfree", "opinion"),
                ("us--technology", "tech"),
                ("us--culture", "arts"),
                ("us--lifeandstyle", "lifestyle"),
                ("fashion", "fashion"),
                ("us--business", "business"),
                ("us--travel", "travel"),
            ]),
        }
    }
}

impl Default for Guardian {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Guardian {
    fn name(&self) -> &'static str {
        "The Guardian"
    }

    fn categories(&self) -> &Categories {
        &self.categories
    }

    fn default_category(&self) -> &str {
        "us"
    }

    fn feed_url(&self, category: &str) -> String {
        // Section ids use "--" where the site path has "/"
        join_url(&self.base_url, &format!("{}/rss", category.replace("--", "/")))
    }

    fn parse_entries(&self, bytes: &[u8]) -> Result<Vec<Entry>, FetchError> {
        let feed = parser::parse(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| {
                // Largest media:content is listed last in Guardian feeds
                let image = entry
                    .media
                    .iter()
                    .flat_map(|m| m.content.iter())
                    .filter_map(|c| c.url.as_ref().map(|u| u.to_string()))
                    .last()
                    .or_else(|| {
                        entry
                            .media
                            .iter()
                            .flat_map(|m| m.thumbnails.iter())
                            .map(|t| t.image.uri.clone())
                            .next()
                    });
                let description = entry
                    .summary
                    .map(|s| strip_html_tags(&s.content))
                    .unwrap_or_default();

                Entry {
                    title: entry
                        .title
                        .map(|t| t.content)
                        .unwrap_or_else(|| "Untitled".to_string()),
                    description,
                    image,
                    link: entry.links.first().map(|l| l.href.clone()),
                    published: entry.published.or(entry.updated).map(|dt| dt.timestamp()),
                }
            })
            .collect();

        Ok(entries)
    }
}
