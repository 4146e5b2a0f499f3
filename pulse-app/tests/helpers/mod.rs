//! In-process mock backend for integration tests
//!
//! Serves the real wire contract on an ephemeral port so the client is
//! exercised end-to-end, headers and all. Failure flags let tests force
//! application rejections per endpoint.

// Not every test binary touches every flag
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::Value;

use pulse_common::model::{Artist, LiveEvent};

#[derive(Default)]
pub struct MockBackend {
    pub recent: Vec<LiveEvent>,
    pub all: Vec<LiveEvent>,
    pub artists: Vec<Artist>,
    pub fail_events: bool,
    pub garbage_events: bool,
    pub fail_add: bool,
    pub fail_mute: bool,
    pub fail_delete: bool,
    pub fail_register: bool,
    pub deleted_ids: Vec<String>,
    pub registered_tokens: Vec<String>,
    pub seen_user_tokens: Vec<String>,
    pub last_live_query: Option<HashMap<String, String>>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct MockState(pub Arc<Mutex<MockBackend>>);

impl MockState {
    pub fn lock(&self) -> std::sync::MutexGuard<'_, MockBackend> {
        self.0.lock().expect("mock backend lock")
    }
}

pub fn live_event(artist: &str, title: &str, date: &str, place: &str) -> LiveEvent {
    LiveEvent {
        artist: artist.into(),
        title: title.into(),
        date: date.into(),
        place: place.into(),
        link: format!("https://example.com/{artist}/{date}"),
        image: None,
        source_url: None,
    }
}

pub fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.into(),
        name: name.into(),
        url: format!("https://example.com/{id}"),
        muted: false,
        last_status: None,
        last_error: None,
    }
}

fn record_token(state: &MockState, headers: &HeaderMap) {
    let token = headers
        .get("x-user-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    state.lock().seen_user_tokens.push(token);
}

async fn get_live(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record_token(&state, &headers);

    let mut backend = state.lock();
    backend.last_live_query = Some(params.clone());

    if backend.fail_events {
        return (StatusCode::INTERNAL_SERVER_ERROR, "live fetch rejected").into_response();
    }
    if backend.garbage_events {
        return (StatusCode::OK, "definitely not json").into_response();
    }

    let source = match params.get("range").map(String::as_str) {
        Some("all") => backend.all.clone(),
        _ => backend.recent.clone(),
    };
    let events: Vec<LiveEvent> = match params.get("q") {
        Some(q) => {
            let needle = q.to_lowercase();
            source
                .into_iter()
                .filter(|e| {
                    e.title.to_lowercase().contains(&needle)
                        || e.artist.to_lowercase().contains(&needle)
                        || e.place.to_lowercase().contains(&needle)
                })
                .collect()
        }
        None => source,
    };

    Json(events).into_response()
}

async fn get_artists(State(state): State<MockState>, headers: HeaderMap) -> Response {
    record_token(&state, &headers);
    let backend = state.lock();
    Json(backend.artists.clone()).into_response()
}

async fn post_artists(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_token(&state, &headers);

    let mut backend = state.lock();
    if backend.fail_add {
        return (StatusCode::INTERNAL_SERVER_ERROR, "add rejected").into_response();
    }

    backend.next_id += 1;
    let created = Artist {
        id: format!("srv-{}", backend.next_id),
        name: body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        url: body
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        muted: false,
        last_status: None,
        last_error: None,
    };
    backend.artists.insert(0, created.clone());
    Json(created).into_response()
}

async fn delete_artist(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record_token(&state, &headers);

    let mut backend = state.lock();
    if backend.fail_delete {
        return (StatusCode::INTERNAL_SERVER_ERROR, "delete rejected").into_response();
    }
    backend.artists.retain(|a| a.id != id);
    backend.deleted_ids.push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn patch_mute(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    record_token(&state, &headers);

    let mut backend = state.lock();
    if backend.fail_mute {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mute rejected").into_response();
    }
    let muted = body.get("muted").and_then(Value::as_bool).unwrap_or(false);
    match backend.artists.iter_mut().find(|a| a.id == id) {
        Some(artist) => {
            artist.muted = muted;
            StatusCode::NO_CONTENT.into_response()
        }
        None => (StatusCode::NOT_FOUND, "unknown artist").into_response(),
    }
}

async fn post_register_token(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_token(&state, &headers);

    let mut backend = state.lock();
    if backend.fail_register {
        return (StatusCode::INTERNAL_SERVER_ERROR, "registration rejected").into_response();
    }
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    backend.registered_tokens.push(token);
    StatusCode::NO_CONTENT.into_response()
}

/// Serve the mock backend on an ephemeral port, returning its base URL
pub async fn spawn_backend(state: MockState) -> String {
    let app = Router::new()
        .route("/live", get(get_live))
        .route("/artists", get(get_artists).post(post_artists))
        .route("/artists/:id", delete(delete_artist))
        .route("/artists/:id/mute", patch(patch_mute))
        .route("/register-token", post(post_register_token))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });

    format!("http://{addr}")
}
