//! Per-installation tokens
//!
//! All backend requests are scoped to one installation by an opaque
//! identity token carried in a request header; a second persisted token
//! identifies this installation to the push-notification service. Each
//! token is synthesized once, persisted under the platform data
//! directory, and never regenerated while its file exists. When storage
//! is unavailable the providers degrade to a volatile per-process token:
//! cross-session identity is lost but the client keeps working.

use std::path::PathBuf;
use std::sync::Mutex;

use rand::Rng;

use crate::config;
use crate::{Error, Result};

/// File name of the persisted identity token inside the data directory
const IDENTITY_FILE: &str = "identity";

/// File name of the persisted push token inside the data directory
const PUSH_TOKEN_FILE: &str = "push-token";

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One persisted opaque token with an in-memory cache
///
/// Idempotent: after the first successful load-or-create, every call
/// returns the identical value.
struct StoredToken {
    path: PathBuf,
    prefix: &'static str,
    cached: Mutex<Option<String>>,
}

impl StoredToken {
    fn new(path: PathBuf, prefix: &'static str) -> Self {
        Self {
            path,
            prefix,
            cached: Mutex::new(None),
        }
    }

    fn token(&self) -> String {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = cached.as_ref() {
            return token.clone();
        }

        let token = match self.load_or_create() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "token storage unavailable, falling back to volatile token"
                );
                volatile_token()
            }
        };

        *cached = Some(token.clone());
        token
    }

    fn load_or_create(&self) -> Result<String> {
        if let Ok(existing) = std::fs::read_to_string(&self.path) {
            let existing = existing.trim();
            if !existing.is_empty() {
                return Ok(existing.to_string());
            }
        }

        let token = generate_token(self.prefix);
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Identity(format!("no parent directory for {:?}", self.path)))?;
        std::fs::create_dir_all(parent)?;
        std::fs::write(&self.path, &token)?;
        tracing::info!(path = %self.path.display(), "created new installation token");
        Ok(token)
    }
}

/// Supplies the stable per-installation identity token attached to
/// every backend request
pub struct IdentityProvider {
    store: StoredToken,
}

impl IdentityProvider {
    /// Provider storing the token inside the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            store: StoredToken::new(data_dir.join(IDENTITY_FILE), "user"),
        }
    }

    /// Provider using the platform default data directory
    pub fn open_default() -> Self {
        Self::new(config::default_data_dir())
    }

    /// Returns the identity token, creating and persisting it on first use
    ///
    /// Storage failure is a degraded mode, not an error: a volatile
    /// token is returned and reused for the rest of the process.
    pub fn token(&self) -> String {
        self.store.token()
    }
}

/// Supplies the push-notification token registered with the backend
///
/// There is no platform notification SDK here, so the token is a
/// generated web-style token, persisted alongside the identity.
pub struct PushTokenProvider {
    store: StoredToken,
}

impl PushTokenProvider {
    /// Provider storing the token inside the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            store: StoredToken::new(data_dir.join(PUSH_TOKEN_FILE), "web-user"),
        }
    }

    /// Provider using the platform default data directory
    pub fn open_default() -> Self {
        Self::new(config::default_data_dir())
    }

    /// Returns the push token, creating and persisting it on first use
    pub fn token(&self) -> String {
        self.store.token()
    }
}

/// Synthesize a fresh token: `<prefix>-<base36 millis>-<7 char suffix>`
fn generate_token(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| BASE36_CHARS[rng.gen_range(0..BASE36_CHARS.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, to_base36(millis), suffix)
}

/// Volatile fallback token for the degraded no-storage mode
fn volatile_token() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0);
    format!("temp-{millis}")
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_CHARS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}
