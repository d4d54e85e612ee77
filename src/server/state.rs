//! Server state and configuration.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex as SessionLock, RwLock};
use uuid::Uuid;

use crate::designer::Designer;

/// Sessions idle for longer than this are dropped.
pub const SESSION_EXPIRATION_SECS: u64 = 60 * 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// A session behind its own lock, so one slow render only holds up its
/// own browser tab.
pub type SharedSession = Arc<SessionLock<Session>>;

/// One open designer form.
pub struct Session {
    pub designer: Designer,
    pub last_accessed: Instant,
}

impl Session {
    pub fn new(designer: Designer) -> Self {
        Self {
            designer,
            last_accessed: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// A content string handed to the save callback.
#[derive(Debug, Clone, Serialize)]
pub struct SavedCode {
    pub content: String,
    /// Unix timestamp (seconds).
    pub saved_at: u64,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    pub sessions: RwLock<HashMap<Uuid, SharedSession>>,
    /// Everything saved so far, newest last.
    pub saved: Arc<Mutex<Vec<SavedCode>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            boot_time: unix_now(),
            sessions: RwLock::new(HashMap::new()),
            saved: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Look up a session. The map lock is released before returning.
    pub async fn session(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn insert_session(&self, id: Uuid, designer: Designer) {
        let session = Arc::new(SessionLock::new(Session::new(designer)));
        self.sessions.write().await.insert(id, session);
    }

    /// A mounted designer whose save callback appends to `saved`.
    pub fn new_designer(&self) -> Designer {
        let saved = self.saved.clone();
        let mut designer = Designer::new(move |content: &str| {
            let mut list = saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            list.push(SavedCode {
                content: content.to_string(),
                saved_at: unix_now(),
            });
        });
        designer.mount();
        designer
    }

    pub fn saved_codes(&self) -> Vec<SavedCode> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
