//! Event types for the LivePulse client
//!
//! Provides the shared event vocabulary and the EventBus that carries
//! store invalidation notifications to subscribers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::Range;

/// How a watchlist entry changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchlistChange {
    /// Artist confirmed by the backend and present in the refreshed list
    Added,
    /// Artist removed from the local list
    Removed,
    /// Mute flag now has the given value
    MuteChanged { muted: bool },
}

/// Which optimistic mutation was reverted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchlistOperation {
    Add,
    Mute,
}

/// LivePulse client events
///
/// Broadcast via [`EventBus`] whenever the shared store changes, so every
/// consumer invalidates from one source instead of re-fetching per screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PulseEvent {
    /// Event cache for a range was replaced with fresh backend data
    EventsRefreshed {
        range: Range,
        count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Event fetch failed; the previous cache (if any) is untouched
    EventsRefreshFailed {
        range: Range,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Watchlist cache was replaced with the authoritative backend list
    ArtistsRefreshed {
        count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Watchlist fetch failed; the previous cache (if any) is untouched
    ArtistsRefreshFailed {
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A watchlist mutation was confirmed
    WatchlistChanged {
        artist_id: String,
        change: WatchlistChange,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An optimistic mutation was rejected and reverted locally
    MutationRolledBack {
        artist_id: String,
        operation: WatchlistOperation,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Backend rejected a delete after the entry was already removed
    /// locally; callers may re-sync via an artists refresh
    ArtistDeleteFailed {
        artist_id: String,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Push token accepted by the backend
    TokenRegistered {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Push token registration failed (best-effort, never fatal)
    TokenRegistrationFailed {
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A push payload was received and displayed
    NotificationReceived {
        title: String,
        body: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PulseEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            PulseEvent::EventsRefreshed { .. } => "EventsRefreshed",
            PulseEvent::EventsRefreshFailed { .. } => "EventsRefreshFailed",
            PulseEvent::ArtistsRefreshed { .. } => "ArtistsRefreshed",
            PulseEvent::ArtistsRefreshFailed { .. } => "ArtistsRefreshFailed",
            PulseEvent::WatchlistChanged { .. } => "WatchlistChanged",
            PulseEvent::MutationRolledBack { .. } => "MutationRolledBack",
            PulseEvent::ArtistDeleteFailed { .. } => "ArtistDeleteFailed",
            PulseEvent::TokenRegistered { .. } => "TokenRegistered",
            PulseEvent::TokenRegistrationFailed { .. } => "TokenRegistrationFailed",
            PulseEvent::NotificationReceived { .. } => "NotificationReceived",
        }
    }
}

/// Central event distribution bus for client-wide events
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PulseEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PulseEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PulseEvent,
    ) -> Result<usize, broadcast::error::SendError<PulseEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Store invalidation notices are lossy: a one-shot command with no
    /// subscriber is a normal condition.
    pub fn emit_lossy(&self, event: PulseEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
