//! Process-lifetime session store.
//!
//! Maps a session key to its persona names, transcript, and interaction
//! counter. Backed by a [`DashMap`] so handlers for different sessions never
//! contend, and no shard lock is ever held across an `.await`: callers work
//! on [`SessionSnapshot`] copies and write back through [`SessionStore::record_turn`].
//!
//! Sessions have no idle timeout. One is removed only by an explicit reset
//! or once its interaction counter reaches the configured limit.

use std::future::Future;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parentline_types::session::{PersonaNames, SessionSnapshot, SessionSummary, Turn};

#[derive(Debug, Clone)]
struct SessionState {
    names: PersonaNames,
    interactions: u32,
    history: Vec<Turn>,
    created_at: DateTime<Utc>,
}

impl SessionState {
    fn snapshot(&self, key: &str) -> SessionSnapshot {
        SessionSnapshot {
            key: key.to_string(),
            names: self.names.clone(),
            interactions: self.interactions,
            history: self.history.clone(),
            created_at: self.created_at,
        }
    }
}

/// Concurrent map from session key to conversation state.
pub struct SessionStore {
    sessions: DashMap<String, SessionState>,
    max_interactions: u32,
}

impl SessionStore {
    /// Create an empty store that evicts sessions at `max_interactions`.
    pub fn new(max_interactions: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            max_interactions,
        }
    }

    pub fn max_interactions(&self) -> u32 {
        self.max_interactions
    }

    /// Copy of the session stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<SessionSnapshot> {
        self.sessions.get(key).map(|state| state.snapshot(key))
    }

    /// Debug summary for `GET /session/{id}`.
    pub fn summary(&self, key: &str) -> Option<SessionSummary> {
        self.get(key).map(|snapshot| SessionSummary::from(&snapshot))
    }

    /// Return the session under `key`, creating it with names from
    /// `make_names` when absent. The boolean is true when this call created it.
    ///
    /// `make_names` runs outside any lock. If two first turns race, both may
    /// generate names but only the first insert is kept, so there is never
    /// more than one session per key.
    pub async fn get_or_create<F, Fut>(&self, key: &str, make_names: F) -> (SessionSnapshot, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = PersonaNames>,
    {
        if let Some(existing) = self.get(key) {
            return (existing, false);
        }

        let names = make_names().await;
        let mut created = false;
        let state = self
            .sessions
            .entry(key.to_string())
            .or_insert_with(|| {
                created = true;
                SessionState {
                    names,
                    interactions: 0,
                    history: Vec::new(),
                    created_at: Utc::now(),
                }
            })
            .snapshot(key);

        if created {
            tracing::info!(
                session_key = %key,
                parent = %state.names.parent,
                child = %state.names.child,
                "Session created"
            );
        }
        (state, created)
    }

    /// Append one exchange and bump the interaction counter.
    ///
    /// Returns the new counter, or `None` when the session disappeared while
    /// the reply was being generated (e.g. a concurrent reset); the turn is
    /// then dropped rather than resurrecting the session.
    pub fn record_turn(&self, key: &str, utterance: &str, reply: &str) -> Option<u32> {
        let mut state = self.sessions.get_mut(key)?;
        state.history.push(Turn {
            utterance: utterance.to_string(),
            reply: reply.to_string(),
        });
        state.interactions += 1;
        Some(state.interactions)
    }

    /// Remove the session once it has reached the interaction limit.
    ///
    /// Returns true if the session was evicted by this call.
    pub fn evict_if_expired(&self, key: &str) -> bool {
        let limit = self.max_interactions;
        let evicted = self
            .sessions
            .remove_if(key, |_, state| state.interactions >= limit)
            .is_some();
        if evicted {
            tracing::info!(session_key = %key, limit, "Session reached interaction limit, evicted");
        }
        evicted
    }

    /// Delete a session. Returns true if one existed.
    pub fn remove(&self, key: &str) -> bool {
        self.sessions.remove(key).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
