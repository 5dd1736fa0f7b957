use serde::{Deserialize, Serialize};
use std::rc::Rc;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];
const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".ogg"];

/// One playlist entry as supplied by a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MediaDescriptor {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl MediaDescriptor {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    pub fn display_text(&self) -> &str {
        if self.text.trim().is_empty() {
            "No description available"
        } else {
            &self.text
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Unsupported,
}

impl MediaKind {
    /// Sniff the kind from the url suffix, ignoring query string and fragment.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim().to_ascii_lowercase();
        if path.is_empty() {
            return Self::Unsupported;
        }
        if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            Self::Image
        } else if VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            Self::Video
        } else {
            Self::Unsupported
        }
    }
}

/// A descriptor tagged with its kind at ingestion time.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaItem {
    Image(MediaDescriptor),
    Video(MediaDescriptor),
    Unsupported(MediaDescriptor),
}

impl MediaItem {
    pub fn descriptor(&self) -> &MediaDescriptor {
        match self {
            Self::Image(d) | Self::Video(d) | Self::Unsupported(d) => d,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Image(_) => MediaKind::Image,
            Self::Video(_) => MediaKind::Video,
            Self::Unsupported(_) => MediaKind::Unsupported,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }
}

impl From<MediaDescriptor> for MediaItem {
    fn from(descriptor: MediaDescriptor) -> Self {
        match MediaKind::from_url(&descriptor.url) {
            MediaKind::Image => Self::Image(descriptor),
            MediaKind::Video => Self::Video(descriptor),
            MediaKind::Unsupported => Self::Unsupported(descriptor),
        }
    }
}

/// Ordered, read-only list of classified media.
///
/// Clones share the same backing slice, so equality is identity: two playlists
/// are equal only when one was cloned from the other. A provider that builds a
/// fresh playlist (even with identical contents) therefore always counts as a
/// replacement.
#[derive(Debug, Clone)]
pub struct Playlist {
    items: Rc<[MediaItem]>,
}

impl Playlist {
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn from_items(items: Vec<MediaItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.iter()
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }
}

impl FromIterator<MediaDescriptor> for Playlist {
    fn from_iter<I: IntoIterator<Item = MediaDescriptor>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().map(MediaItem::from).collect())
    }
}
