use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use lru::LruCache;
use nanoid::nanoid;
use tracing::{debug, info};

use super::Session;
use crate::config::SessionConfig;
use crate::models::Language;

/// In-memory map from session id to [`Session`].
///
/// Sessions are cloned out on [`open`](Self::open) and written back on
/// [`commit`](Self::commit); the lock is never held while a request is being
/// processed. Least recently used sessions are dropped once `capacity` is
/// reached.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<LruCache<String, Session>>>,
    idle_timeout: Duration,
    default_language: Language,
}

impl SessionStore {
    pub fn new(config: &SessionConfig, default_language: Language) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Arc::new(Mutex::new(LruCache::new(capacity))),
            idle_timeout: idle_timeout(config.idle_timeout_secs),
            default_language,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the session for `id`, or start a fresh one when the id is
    /// missing, unknown or expired.
    pub fn open(&self, id: Option<&str>) -> Session {
        let now = Utc::now();

        if let Some(id) = id {
            let mut sessions = self.lock();
            if let Some(existing) = sessions.get(id) {
                if now - existing.last_active <= self.idle_timeout {
                    let mut session = existing.clone();
                    session.last_active = now;
                    return session;
                }
                debug!(session = id, "Session expired");
                sessions.pop(id);
            }
        }

        let session = Session::new(nanoid!(), self.default_language);
        debug!(session = %session.id, "Session started");
        session
    }

    /// Store `session`, replacing any previous state under its id.
    ///
    /// A new session that still holds nothing but defaults is not stored, so
    /// cookieless page views cannot push live sessions out of the cache.
    pub fn commit(&self, session: Session) {
        let mut sessions = self.lock();
        if !sessions.contains(&session.id) && session.is_blank(self.default_language) {
            debug!(session = %session.id, "Skipping commit of untouched session");
            return;
        }
        sessions.put(session.id.clone(), session);
    }

    /// Read-only access to a live session without refreshing it.
    pub fn peek<R>(&self, id: &str, f: impl FnOnce(&Session) -> R) -> Option<R> {
        let sessions = self.lock();
        sessions.peek(id).map(f)
    }

    /// Drop every session idle for longer than the timeout.
    pub fn evict_idle(&self) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(self.idle_timeout) else {
            return 0;
        };
        let mut sessions = self.lock();

        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, session)| session.last_active < cutoff)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            sessions.pop(id);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Timeouts beyond what `chrono` can represent are treated as "never".
fn idle_timeout(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// Periodically removes idle sessions from a [`SessionStore`].
#[derive(Clone)]
pub struct SessionSweeper {
    store: SessionStore,
    interval_secs: u64,
}

impl SessionSweeper {
    pub fn new(store: SessionStore, interval_secs: u64) -> Self {
        Self {
            store,
            interval_secs,
        }
    }

    /// Run a single sweep, returning the number of evicted sessions.
    pub fn run_once(&self) -> usize {
        let evicted = self.store.evict_idle();
        if evicted > 0 {
            info!(
                "Session sweep complete: {} expired, {} active",
                evicted,
                self.store.len()
            );
        }
        evicted
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs.max(1)
    }
}
