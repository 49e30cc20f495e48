//! Session domain types.
//!
//! A session is the per-conversation state keyed by an opaque string
//! (`sessionId` for the generic shape, `personaId` for the vendor shape).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key used when a request carries no session identifier.
pub const DEFAULT_SESSION_KEY: &str = "default";

/// The fictional parent/child pair the model role-plays for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaNames {
    pub parent: String,
    pub child: String,
}

impl PersonaNames {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// One recorded exchange: what the user said and what was delivered back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub utterance: String,
    pub reply: String,
}

/// Point-in-time copy of a session, safe to hold across an await.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub key: String,
    pub names: PersonaNames,
    pub interactions: u32,
    pub history: Vec<Turn>,
    pub created_at: DateTime<Utc>,
}

/// Debug view returned by `GET /session/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub parent_name: String,
    pub child_name: String,
    pub interactions: u32,
    pub conversation_length: usize,
}

impl From<&SessionSnapshot> for SessionSummary {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            parent_name: snapshot.names.parent.clone(),
            child_name: snapshot.names.child.clone(),
            interactions: snapshot.interactions,
            conversation_length: snapshot.history.len(),
        }
    }
}
