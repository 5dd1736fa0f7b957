//! Feed spreadsheet rows and the catalog of playlists built from them.

use crate::playback::{MediaDescriptor, Playlist};
use crate::utils::slugify;
use dioxus::logger::tracing::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub const DEFAULT_FEED: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed endpoint answered with status {0}")]
    Status(u16),
    #[error("feed payload is not an array of rows")]
    NotAnArray,
}

/// One spreadsheet row. Column names follow the published sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedRow {
    #[serde(rename = "Feed", default)]
    pub feed: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    /// The sheet's `Text` column is an include flag (`TRUE` / `FALSE`).
    #[serde(rename = "Text", default)]
    pub include: bool,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "URL", default)]
    pub url: String,
}

impl FeedRow {
    /// Read a row from loosely typed JSON. Sheet exports render booleans as
    /// strings, so `"TRUE"` and `true` are both accepted.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| -> String {
            match object.get(key) {
                Some(serde_json::Value::String(s)) => s.trim().to_string(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => String::new(),
            }
        };
        let include = match object.get("Text") {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        };
        let url = text("URL");
        if url.is_empty() {
            return None;
        }
        Some(Self {
            feed: text("Feed"),
            title: text("Title"),
            include,
            description: text("Description"),
            url,
        })
    }

    pub fn descriptor(&self) -> MediaDescriptor {
        MediaDescriptor::new(self.url.clone(), self.title.clone(), self.description.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub key: String,
    pub name: String,
    pub playlist: Playlist,
}

/// Playlists grouped by feed name, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedCatalog {
    feeds: Vec<FeedEntry>,
}

impl FeedCatalog {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = FeedRow>,
    {
        let mut grouped: Vec<(String, Vec<MediaDescriptor>)> = Vec::new();
        for row in rows.into_iter().filter(|row| row.include) {
            let name = match row.feed.trim() {
                "" => DEFAULT_FEED.to_string(),
                other => other.to_string(),
            };
            match grouped.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, items)) => items.push(row.descriptor()),
                None => grouped.push((name, vec![row.descriptor()])),
            }
        }

        let feeds = grouped
            .into_iter()
            .map(|(name, items)| FeedEntry {
                key: slugify(&name),
                name,
                playlist: items.into_iter().collect(),
            })
            .collect();
        Self { feeds }
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn feeds(&self) -> &[FeedEntry] {
        &self.feeds
    }

    pub fn feed_names(&self) -> Vec<&str> {
        self.feeds.iter().map(|f| f.name.as_str()).collect()
    }

    /// Look up by display name or slug key.
    pub fn find(&self, name_or_key: &str) -> Option<&FeedEntry> {
        let wanted = slugify(name_or_key);
        self.feeds
            .iter()
            .find(|f| f.name == name_or_key || f.key == wanted)
    }

    pub fn playlist(&self, name_or_key: &str) -> Option<Playlist> {
        self.find(name_or_key).map(|f| f.playlist.clone())
    }

    /// Feed to show on startup: the requested one if present, else the first.
    pub fn initial(&self, requested: Option<&str>) -> Option<&FeedEntry> {
        requested
            .and_then(|name| self.find(name))
            .or_else(|| self.feeds.first())
    }
}

pub async fn fetch_feed_rows(url: &str) -> Result<Vec<FeedRow>, FeedError> {
    let response = HTTP_CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }
    let payload: serde_json::Value = response.json().await?;
    let rows = payload.as_array().ok_or(FeedError::NotAnArray)?;
    let parsed: Vec<FeedRow> = rows.iter().filter_map(FeedRow::from_json).collect();
    info!("fetched {} feed rows ({} usable)", rows.len(), parsed.len());
    Ok(parsed)
}

/// Fetch the configured feed, falling back to the bundled demo feed.
pub async fn load_catalog(feed_url: Option<&str>) -> FeedCatalog {
    let Some(url) = feed_url else {
        return demo_catalog();
    };
    match fetch_feed_rows(url).await {
        Ok(rows) => {
            let catalog = FeedCatalog::from_rows(rows);
            if catalog.is_empty() {
                warn!("feed {url} has no included rows, using demo feed");
                demo_catalog()
            } else {
                catalog
            }
        }
        Err(err) => {
            warn!("could not load feed {url}: {err}");
            demo_catalog()
        }
    }
}

pub fn demo_catalog() -> FeedCatalog {
    let row = |feed: &str, title: &str, description: &str, url: &str| FeedRow {
        feed: feed.to_string(),
        title: title.to_string(),
        include: true,
        description: description.to_string(),
        url: url.to_string(),
    };
    FeedCatalog::from_rows([
        row(
            "Nature",
            "Mountain Lake",
            "Early light over an alpine lake.",
            "https://images.unsplash.com/photo-1501785888041-af3ef285b470.jpg",
        ),
        row(
            "Nature",
            "Flower",
            "A short clip of a flower opening.",
            "https://interactive-examples.mdn.mozilla.net/media/cc0-videos/flower.webm",
        ),
        row(
            "Nature",
            "Forest Path",
            "Sunlight through a forest canopy.",
            "https://images.unsplash.com/photo-1441974231531-c6227db76b6e.jpg",
        ),
        row(
            "Animation",
            "Big Buck Bunny",
            "Open movie by the Blender Foundation.",
            "https://download.blender.org/peach/bigbuckbunny_movies/BigBuckBunny_320x180.mp4",
        ),
        row(
            "Animation",
            "Sintel Poster",
            "Poster art for the open movie Sintel.",
            "https://download.blender.org/durian/poster/sintel_poster.jpg",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::MediaKind;
    use serde_json::json;

    fn row(feed: &str, include: bool, url: &str) -> FeedRow {
        FeedRow {
            feed: feed.to_string(),
            title: format!("title {url}"),
            include,
            description: format!("about {url}"),
            url: url.to_string(),
        }
    }

    #[test]
    fn groups_included_rows_by_feed_in_order() {
        let catalog = FeedCatalog::from_rows([
            row("Beach", true, "a.jpg"),
            row("City", true, "b.mp4"),
            row("Beach", false, "hidden.jpg"),
            row("Beach", true, "c.png"),
            row("", true, "d.webm"),
        ]);

        assert_eq!(catalog.feed_names(), vec!["Beach", "City", DEFAULT_FEED]);
        let beach = catalog.playlist("Beach").unwrap();
        let urls: Vec<&str> = beach.iter().map(|i| i.descriptor().url.as_str()).collect();
        assert_eq!(urls, vec!["a.jpg", "c.png"]);
    }

    #[test]
    fn row_maps_description_into_descriptor_text() {
        let descriptor = row("Beach", true, "a.jpg").descriptor();
        assert_eq!(descriptor.title, "title a.jpg");
        assert_eq!(descriptor.text, "about a.jpg");
    }

    #[test]
    fn reads_loose_json_rows() {
        let parsed = FeedRow::from_json(&json!({
            "Feed": "Beach",
            "Title": "Shore",
            "Text": "TRUE",
            "Description": "Waves",
            "URL": " https://x.test/shore.jpg ",
        }))
        .unwrap();
        assert!(parsed.include);
        assert_eq!(parsed.url, "https://x.test/shore.jpg");

        let flagged = FeedRow::from_json(&json!({"Text": true, "URL": "a.mp4"})).unwrap();
        assert!(flagged.include);
        assert!(FeedRow::from_json(&json!({"Text": "TRUE"})).is_none());
        assert!(FeedRow::from_json(&json!("nope")).is_none());
    }

    #[test]
    fn finds_feeds_by_name_or_slug() {
        let catalog = FeedCatalog::from_rows([row("Open Movies", true, "a.mp4")]);
        assert!(catalog.find("Open Movies").is_some());
        assert!(catalog.find("open-movies").is_some());
        assert!(catalog.find("closed").is_none());
        assert_eq!(catalog.initial(Some("missing")).map(|f| f.name.as_str()), Some("Open Movies"));
    }

    #[test]
    fn demo_catalog_mixes_images_and_videos() {
        let catalog = demo_catalog();
        let nature = catalog.playlist("nature").unwrap();
        let kinds: Vec<MediaKind> = nature.iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video, MediaKind::Image]);
    }
}
