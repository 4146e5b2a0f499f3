//! Watchlist editor state machine
//!
//! Optimistic mutation of the watched-artist list, kept independent of
//! rendering and of the HTTP layer so rollback logic is centralized and
//! testable. Every entry carries an explicit phase tag instead of ad hoc
//! flags; the store drives the transitions:
//!
//! - add: `PendingAdd` -> confirmed refresh, or rolled back (entry
//!   removed, draft inputs restored)
//! - delete: the entry leaves the visible list immediately; a backend
//!   rejection is surfaced by the caller, not rolled back
//! - mute: `Confirmed` -> `PendingMute` -> confirmed, or reverted

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use pulse_common::model::Artist;
use pulse_common::{Error, Result};

/// Where an entry stands in its optimistic-mutation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Inserted locally, not yet confirmed by the backend
    PendingAdd,
    /// Matches the authoritative backend list
    Confirmed,
    /// Mute flag flipped locally, patch call still outstanding
    PendingMute,
}

/// One watchlist entry with its lifecycle tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub artist: Artist,
    pub phase: Phase,
}

/// Handle for an optimistic add, carrying what rollback must restore
#[derive(Debug, Clone)]
pub struct AddTicket {
    /// Client-generated temporary id (millisecond timestamp)
    pub temp_id: String,
    /// Draft name at submission time
    pub name: String,
    /// Draft url at submission time
    pub url: String,
}

/// Optimistic editor over the local copy of the watchlist
#[derive(Debug, Default)]
pub struct WatchlistEditor {
    entries: Vec<WatchEntry>,
    draft_name: String,
    draft_url: String,
    initialized: bool,
}

impl WatchlistEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once an authoritative list has been applied at least once
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current draft input fields
    pub fn drafts(&self) -> (&str, &str) {
        (&self.draft_name, &self.draft_url)
    }

    /// Set the draft input fields for the next add
    pub fn set_drafts(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.draft_name = name.into();
        self.draft_url = url.into();
    }

    /// Entries in display order, with phase tags
    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    /// The visible artist list
    pub fn visible(&self) -> Vec<Artist> {
        self.entries.iter().map(|e| e.artist.clone()).collect()
    }

    /// Replace the local list with the authoritative backend list
    ///
    /// Deduplicates by id, keeping the first occurrence, so the visible
    /// list never shows two entries with the same identity.
    pub fn replace_all(&mut self, artists: Vec<Artist>) {
        let mut seen = HashSet::new();
        self.entries = artists
            .into_iter()
            .filter(|artist| seen.insert(artist.id.clone()))
            .map(|artist| WatchEntry {
                artist,
                phase: Phase::Confirmed,
            })
            .collect();
        self.initialized = true;
    }

    /// Insert a temporary entry at the head of the list and clear drafts
    ///
    /// `now_millis` becomes the temporary id, replaced by the
    /// backend-assigned one on the post-confirmation refresh.
    pub fn begin_add(&mut self, now_millis: i64) -> Result<AddTicket> {
        let name = self.draft_name.trim().to_string();
        let url = self.draft_url.trim().to_string();
        if name.is_empty() || url.is_empty() {
            return Err(Error::InvalidInput(
                "artist name and url are both required".to_string(),
            ));
        }

        let temp_id = now_millis.to_string();
        self.entries.insert(
            0,
            WatchEntry {
                artist: Artist {
                    id: temp_id.clone(),
                    name: name.clone(),
                    url: url.clone(),
                    muted: false,
                    last_status: None,
                    last_error: None,
                },
                phase: Phase::PendingAdd,
            },
        );

        self.draft_name.clear();
        self.draft_url.clear();

        Ok(AddTicket { temp_id, name, url })
    }

    /// Apply the authoritative list after a successful add
    ///
    /// The refresh replaces the temporary entry with the server-assigned
    /// one; dedup in [`replace_all`] upholds the no-duplicates invariant.
    pub fn confirm_add(&mut self, authoritative: Vec<Artist>) {
        self.replace_all(authoritative);
    }

    /// Undo a rejected add: drop the temporary entry, restore the drafts
    /// so the user can retry without retyping
    pub fn rollback_add(&mut self, ticket: &AddTicket) {
        self.entries.retain(|e| e.artist.id != ticket.temp_id);
        self.draft_name = ticket.name.clone();
        self.draft_url = ticket.url.clone();
    }

    /// Remove an entry from the visible list immediately
    ///
    /// Returns false if the id is unknown.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e.artist.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Set the mute flag locally; returns the previous value, or `None`
    /// if the id is unknown
    pub fn begin_set_muted(&mut self, id: &str, muted: bool) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.artist.id == id)?;
        let previous = entry.artist.muted;
        entry.artist.muted = muted;
        entry.phase = Phase::PendingMute;
        Some(previous)
    }

    /// Backend accepted the mute change
    pub fn confirm_mute(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.artist.id == id) {
            entry.phase = Phase::Confirmed;
        }
    }

    /// Backend rejected the mute change: restore the previous flag
    pub fn rollback_mute(&mut self, id: &str, previous: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.artist.id == id) {
            entry.artist.muted = previous;
            entry.phase = Phase::Confirmed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: &str, name: &str) -> Artist {
        Artist {
            id: id.into(),
            name: name.into(),
            url: format!("https://example.com/{id}"),
            muted: false,
            last_status: None,
            last_error: None,
        }
    }

    #[test]
    fn test_begin_add_requires_both_drafts() {
        let mut editor = WatchlistEditor::new();
        editor.set_drafts("X", "");
        assert!(editor.begin_add(1000).is_err());

        editor.set_drafts("   ", "http://x");
        assert!(editor.begin_add(1000).is_err());

        editor.set_drafts("X", "http://x");
        assert!(editor.begin_add(1000).is_ok());
    }

    #[test]
    fn test_begin_add_inserts_at_head_and_clears_drafts() {
        let mut editor = WatchlistEditor::new();
        editor.replace_all(vec![artist("a1", "First")]);
        editor.set_drafts("X", "http://x");

        let ticket = editor.begin_add(1700000000000).expect("add starts");
        assert_eq!(ticket.temp_id, "1700000000000");
        assert_eq!(editor.entries()[0].artist.name, "X");
        assert_eq!(editor.entries()[0].phase, Phase::PendingAdd);
        assert_eq!(editor.entries().len(), 2);
        assert_eq!(editor.drafts(), ("", ""));
    }

    #[test]
    fn test_confirm_add_replaces_temporary_entry() {
        let mut editor = WatchlistEditor::new();
        editor.set_drafts("X", "http://x");
        editor.begin_add(1700000000000).expect("add starts");

        // Backend assigned id "a9" to the same logical artist
        let mut confirmed = vec![artist("a9", "X")];
        confirmed[0].url = "http://x".into();
        editor.confirm_add(confirmed);

        let visible = editor.visible();
        let matching: Vec<_> = visible
            .iter()
            .filter(|a| a.name == "X" && a.url == "http://x")
            .collect();
        assert_eq!(matching.len(), 1, "exactly one entry after confirmation");
        assert_eq!(matching[0].id, "a9");
        assert!(editor.entries().iter().all(|e| e.phase == Phase::Confirmed));
    }

    #[test]
    fn test_rollback_add_restores_prior_list_and_drafts() {
        let mut editor = WatchlistEditor::new();
        editor.replace_all(vec![artist("a1", "First")]);
        let before = editor.visible();

        editor.set_drafts("X", "http://x");
        let ticket = editor.begin_add(1700000000000).expect("add starts");
        editor.rollback_add(&ticket);

        assert_eq!(editor.visible(), before);
        assert_eq!(editor.drafts(), ("X", "http://x"));
    }

    #[test]
    fn test_replace_all_dedupes_by_id() {
        let mut editor = WatchlistEditor::new();
        editor.replace_all(vec![artist("a1", "First"), artist("a1", "Dup"), artist("a2", "Second")]);

        let visible = editor.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].name, "First");
        assert_eq!(visible[1].id, "a2");
        assert!(editor.is_initialized());
    }

    #[test]
    fn test_begin_delete_removes_immediately() {
        let mut editor = WatchlistEditor::new();
        editor.replace_all(vec![artist("a1", "First"), artist("a2", "Second")]);

        assert!(editor.begin_delete("a1"));
        let visible = editor.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a2");
        assert!(!editor.begin_delete("missing"));
    }

    #[test]
    fn test_mute_rollback_restores_previous_flag() {
        let mut editor = WatchlistEditor::new();
        editor.replace_all(vec![artist("a1", "First")]);

        let previous = editor.begin_set_muted("a1", true).expect("entry exists");
        assert!(!previous);
        assert!(editor.visible()[0].muted);
        assert_eq!(editor.entries()[0].phase, Phase::PendingMute);

        editor.rollback_mute("a1", previous);
        assert!(!editor.visible()[0].muted);
        assert_eq!(editor.entries()[0].phase, Phase::Confirmed);
    }

    #[test]
    fn test_mute_confirm() {
        let mut editor = WatchlistEditor::new();
        editor.replace_all(vec![artist("a1", "First")]);

        editor.begin_set_muted("a1", true).expect("entry exists");
        editor.confirm_mute("a1");
        assert!(editor.visible()[0].muted);
        assert_eq!(editor.entries()[0].phase, Phase::Confirmed);
    }
}
