//! Wire data model shared by the backend client and the view models

use serde::{Deserialize, Serialize};

/// Backend query window for event fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Range {
    /// Near-term window the backend considers upcoming
    Recent,
    /// Full historical and future set, needed for calendar marking
    All,
}

impl Range {
    /// Query-parameter form of the range
    pub fn as_str(&self) -> &'static str {
        match self {
            Range::Recent => "recent",
            Range::All => "all",
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single live-event announcement as served by the backend
///
/// Immutable once received. The backend guarantees no server-side
/// identity; `link` is the de-facto unique key for list rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEvent {
    /// Artist name
    pub artist: String,
    /// Announcement title
    pub title: String,
    /// Calendar day in YYYY-MM-DD form (no time component)
    pub date: String,
    /// Venue name
    pub place: String,
    /// Detail page URL, used as the unique key where present
    pub link: String,
    /// Promo image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Page the announcement was collected from
    #[serde(rename = "sourceUrl", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl LiveEvent {
    /// Identity for list rendering: the link, or a synthetic
    /// index-based key when the link is empty.
    pub fn render_key(&self, index: usize) -> String {
        if self.link.is_empty() {
            format!("event-{index}")
        } else {
            self.link.clone()
        }
    }
}

/// Outcome of the backend's most recent check of an artist's feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistStatus {
    Ok,
    Error,
}

/// A watched artist
///
/// Owned by the backend; the client holds a transient local copy.
/// `id` is backend-assigned except for optimistic temporary entries,
/// which are replaced once the authoritative list is refetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub muted: bool,
    /// Result of the backend's last scrape of this artist's feed
    #[serde(rename = "lastStatus", skip_serializing_if = "Option::is_none")]
    pub last_status: Option<ArtistStatus>,
    #[serde(rename = "lastError", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
