// ABOUTME: Per-session in-memory state for fetched records, predictions, and goals
// ABOUTME: LRU-bounded store keyed by session id with per-session async locking
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-scoped dashboard state.
//!
//! Each session holds its own goals, the last fetched daily records, the
//! predictions derived from them, and the mined wellness insights. Sessions
//! never persist across a restart. The store is LRU-bounded so arbitrary
//! client-supplied session ids cannot grow it without limit; read-only
//! endpoints look sessions up without creating them. A per-session async
//! mutex serializes fetches and goal updates within one session while
//! leaving other sessions untouched.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;
use wellness_core::{DailyRecord, Goals, Prediction};

/// Header clients use to scope requests to a session
pub const SESSION_HEADER: &str = "x-session-id";

/// Sessions kept in memory before least-recently-used eviction
const MAX_SESSIONS: usize = 1_000;

/// Mutable state belonging to one session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Current daily targets, defaulted until the session sets its own
    pub goals: Goals,
    /// Daily records from the most recent fetch, oldest first
    pub records: Vec<DailyRecord>,
    /// Predictions matching `records`, oldest first
    pub predictions: Vec<Prediction>,
    /// Mined wellness pattern messages from the most recent fetch
    pub insights: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            goals: Goals::default(),
            records: Vec::new(),
            predictions: Vec::new(),
            insights: Vec::new(),
        }
    }
}

impl SessionState {
    /// Whether a fetch has populated this session with records
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Concurrent, LRU-bounded store of live sessions.
pub struct SessionStore {
    sessions: RwLock<LruCache<Uuid, Arc<Mutex<SessionState>>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_SESSIONS)
    }

    /// Create a store holding at most `capacity` sessions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Get the state handle for `session_id`, creating it on first use.
    ///
    /// Creating a session beyond the store's capacity evicts the least
    /// recently used one.
    pub async fn get_or_create(&self, session_id: Uuid) -> Arc<Mutex<SessionState>> {
        let mut sessions = self.sessions.write().await;
        sessions
            .get_or_insert(session_id, || Arc::new(Mutex::new(SessionState::default())))
            .clone()
    }

    /// Look up an existing session without creating one.
    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<SessionState>>> {
        // LruCache::get updates the access order, so this takes the write lock.
        self.sessions.write().await.get(&session_id).cloned()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions exist yet
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Resolve the session id from an `x-session-id` header value.
///
/// Missing or unparseable headers fall back to the shared nil session, which
/// matches single-user deployments where clients send no header at all.
#[must_use]
pub fn session_id_from_header(value: Option<&str>) -> Uuid {
    value
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or_else(Uuid::nil)
}
