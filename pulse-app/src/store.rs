//! Shared client-side store
//!
//! Single cache of backend data shared by every command, so no screen
//! keeps a private copy. Consumers subscribe to the EventBus for
//! invalidation instead of re-fetching independently. Mutations on the
//! same artist id are serialized through a per-id lock, so overlapping
//! writes (a delete racing a mute toggle) cannot leave last-write-wins
//! ambiguity in local state.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use pulse_common::events::{EventBus, PulseEvent, WatchlistChange, WatchlistOperation};
use pulse_common::model::{Artist, LiveEvent, Range};

use crate::backend::{BackendClient, BackendError};
use crate::watchlist::WatchlistEditor;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Input(#[from] pulse_common::Error),
}

/// Shared store over the backend client
pub struct Store {
    client: BackendClient,
    event_bus: EventBus,
    recent_events: RwLock<Option<Vec<LiveEvent>>>,
    all_events: RwLock<Option<Vec<LiveEvent>>>,
    watchlist: RwLock<WatchlistEditor>,
    artist_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Store {
    pub fn new(client: BackendClient, event_bus: EventBus) -> Self {
        Self {
            client,
            event_bus,
            recent_events: RwLock::new(None),
            all_events: RwLock::new(None),
            watchlist: RwLock::new(WatchlistEditor::new()),
            artist_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The bus carrying this store's invalidation events
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ========================================
    // Events cache
    // ========================================

    /// Fetch events for a range and replace that range's cache
    ///
    /// On failure the previous cache is left untouched and the error is
    /// returned; retry is a manual re-invocation.
    pub async fn refresh_events(&self, range: Range) -> Result<Vec<LiveEvent>, BackendError> {
        match self.client.list_events(range, None).await {
            Ok(events) => {
                *self.cache_for(range).write().await = Some(events.clone());
                self.event_bus.emit_lossy(PulseEvent::EventsRefreshed {
                    range,
                    count: events.len(),
                    timestamp: chrono::Utc::now(),
                });
                Ok(events)
            }
            Err(err) => {
                tracing::warn!(range = %range, error = %err, "event refresh failed");
                self.event_bus.emit_lossy(PulseEvent::EventsRefreshFailed {
                    range,
                    error: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(err)
            }
        }
    }

    /// Snapshot of the cached events for a range; `None` until the
    /// first successful refresh
    pub async fn events(&self, range: Range) -> Option<Vec<LiveEvent>> {
        self.cache_for(range).read().await.clone()
    }

    fn cache_for(&self, range: Range) -> &RwLock<Option<Vec<LiveEvent>>> {
        match range {
            Range::Recent => &self.recent_events,
            Range::All => &self.all_events,
        }
    }

    // ========================================
    // Watchlist
    // ========================================

    /// Fetch the authoritative artist list and replace the local copy
    pub async fn refresh_artists(&self) -> Result<Vec<Artist>, BackendError> {
        match self.client.list_artists().await {
            Ok(artists) => {
                self.watchlist.write().await.replace_all(artists.clone());
                self.event_bus.emit_lossy(PulseEvent::ArtistsRefreshed {
                    count: artists.len(),
                    timestamp: chrono::Utc::now(),
                });
                Ok(artists)
            }
            Err(err) => {
                tracing::warn!(error = %err, "artist refresh failed");
                self.event_bus.emit_lossy(PulseEvent::ArtistsRefreshFailed {
                    error: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(err)
            }
        }
    }

    /// Visible artist list; `None` until the first successful refresh
    pub async fn artists(&self) -> Option<Vec<Artist>> {
        let watchlist = self.watchlist.read().await;
        if watchlist.is_initialized() {
            Some(watchlist.visible())
        } else {
            None
        }
    }

    /// Stage the draft input fields for the next add
    pub async fn set_drafts(&self, name: &str, url: &str) {
        self.watchlist.write().await.set_drafts(name, url);
    }

    /// Current draft input fields
    pub async fn drafts(&self) -> (String, String) {
        let watchlist = self.watchlist.read().await;
        let (name, url) = watchlist.drafts();
        (name.to_string(), url.to_string())
    }

    /// Submit the drafted artist: optimistic insert, confirm with the
    /// backend, refresh the authoritative list
    ///
    /// Any failure in the confirm-and-refresh sequence removes the
    /// temporary entry and restores the drafts so the user can retry
    /// without retyping.
    pub async fn submit_add(&self) -> Result<Artist, StoreError> {
        let ticket = {
            let mut watchlist = self.watchlist.write().await;
            watchlist.begin_add(chrono::Utc::now().timestamp_millis())?
        };

        let confirmed = match self.client.add_artist(&ticket.name, &ticket.url).await {
            Ok(created) => match self.client.list_artists().await {
                Ok(artists) => {
                    self.watchlist.write().await.confirm_add(artists);
                    Ok(created)
                }
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };

        match confirmed {
            Ok(created) => {
                self.event_bus.emit_lossy(PulseEvent::WatchlistChanged {
                    artist_id: created.id.clone(),
                    change: WatchlistChange::Added,
                    timestamp: chrono::Utc::now(),
                });
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(name = %ticket.name, error = %err, "add rejected, rolling back");
                self.watchlist.write().await.rollback_add(&ticket);
                self.event_bus.emit_lossy(PulseEvent::MutationRolledBack {
                    artist_id: ticket.temp_id.clone(),
                    operation: WatchlistOperation::Add,
                    error: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(err.into())
            }
        }
    }

    /// Remove an artist: local removal first, then the backend call
    ///
    /// A backend failure is surfaced via WARN and an event but the
    /// local removal stands; callers re-sync with [`refresh_artists`]
    /// if they want the authoritative view back.
    ///
    /// [`refresh_artists`]: Store::refresh_artists
    pub async fn delete_artist(&self, id: &str) -> Result<(), StoreError> {
        let lock = self.entity_lock(id).await;
        let _guard = lock.lock().await;

        let removed = self.watchlist.write().await.begin_delete(id);
        if !removed {
            return Err(pulse_common::Error::InvalidInput(format!("unknown artist id: {id}")).into());
        }

        self.event_bus.emit_lossy(PulseEvent::WatchlistChanged {
            artist_id: id.to_string(),
            change: WatchlistChange::Removed,
            timestamp: chrono::Utc::now(),
        });

        if let Err(err) = self.client.delete_artist(id).await {
            tracing::warn!(artist_id = %id, error = %err, "backend delete failed after local removal");
            self.event_bus.emit_lossy(PulseEvent::ArtistDeleteFailed {
                artist_id: id.to_string(),
                error: err.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }

        Ok(())
    }

    /// Set an artist's mute flag: optimistic flip with rollback on
    /// backend rejection
    pub async fn set_artist_muted(&self, id: &str, muted: bool) -> Result<(), StoreError> {
        let lock = self.entity_lock(id).await;
        let _guard = lock.lock().await;

        let previous = self
            .watchlist
            .write()
            .await
            .begin_set_muted(id, muted)
            .ok_or_else(|| pulse_common::Error::InvalidInput(format!("unknown artist id: {id}")))?;

        match self.client.set_artist_muted(id, muted).await {
            Ok(()) => {
                self.watchlist.write().await.confirm_mute(id);
                self.event_bus.emit_lossy(PulseEvent::WatchlistChanged {
                    artist_id: id.to_string(),
                    change: WatchlistChange::MuteChanged { muted },
                    timestamp: chrono::Utc::now(),
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(artist_id = %id, error = %err, "mute change rejected, reverting");
                self.watchlist.write().await.rollback_mute(id, previous);
                self.event_bus.emit_lossy(PulseEvent::MutationRolledBack {
                    artist_id: id.to_string(),
                    operation: WatchlistOperation::Mute,
                    error: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(err.into())
            }
        }
    }

    // ========================================
    // Push token
    // ========================================

    /// Register the push token with the backend
    ///
    /// The failure is returned so the caller decides policy; commands
    /// that register opportunistically log it and continue.
    pub async fn register_push_token(&self, push_token: &str) -> Result<(), BackendError> {
        match self.client.register_token(push_token).await {
            Ok(()) => {
                self.event_bus.emit_lossy(PulseEvent::TokenRegistered {
                    timestamp: chrono::Utc::now(),
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "push token registration failed");
                self.event_bus.emit_lossy(PulseEvent::TokenRegistrationFailed {
                    error: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(err)
            }
        }
    }

    /// Per-artist lock serializing mutations on the same id
    async fn entity_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.artist_locks.lock().await;
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
