//! Browse sessions kept between requests.
//!
//! A visitor's working set outlives a single page view so that filtering and
//! resetting reuse it. Sessions idle for longer than the TTL are dropped, and
//! the least recently used one makes room when the store is full.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::listings::{BrowseSession, ListingKind};

/// Cookie carrying the browse session id.
pub const BROWSE_SESSION_COOKIE: &str = "browse_session";

pub type SharedSession = Arc<Mutex<BrowseSession>>;

struct Entry {
    session: SharedSession,
    touched: Instant,
}

/// Outcome of [`SessionStore::checkout`].
pub struct Checkout {
    pub id: Uuid,
    pub session: SharedSession,
    /// A new id was issued and has to be handed to the visitor.
    pub created: bool,
}

pub struct SessionStore {
    entries: Mutex<HashMap<Uuid, Entry>>,
    capacity: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            idle_ttl,
        }
    }

    /// Session for `id`, or a fresh one for `kind` when `id` is absent or
    /// no longer known.
    pub async fn checkout(&self, id: Option<Uuid>, kind: ListingKind, now: Instant) -> Checkout {
        let mut entries = self.entries.lock().await;

        let idle_ttl = self.idle_ttl;
        let expired: Vec<Uuid> = entries
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.touched) > idle_ttl)
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            if let Some(entry) = entries.remove(&id) {
                debug!("Browse session {} expired", id);
                retire(entry);
            }
        }

        if let Some(id) = id {
            if let Some(entry) = entries.get_mut(&id) {
                entry.touched = now;
                return Checkout {
                    id,
                    session: Arc::clone(&entry.session),
                    created: false,
                };
            }
        }

        if entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| *id);
            if let Some(entry) = oldest.and_then(|id| entries.remove(&id)) {
                retire(entry);
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(BrowseSession::new(kind)));
        entries.insert(
            id,
            Entry {
                session: Arc::clone(&session),
                touched: now,
            },
        );
        debug!("Browse session {} started for {}", id, kind.as_str());

        Checkout {
            id,
            session,
            created: true,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Tear down a dropped session unless a request is still using it.
fn retire(entry: Entry) {
    if let Ok(mut session) = entry.session.try_lock() {
        session.teardown();
    }
}
