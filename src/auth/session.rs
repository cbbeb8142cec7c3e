use serde::{Deserialize, Serialize};

use crate::models::AdminIdentity;

/// Live authentication state for the console.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity: Option<AdminIdentity>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// The durable subset of `Session`.
///
/// The credential token never appears here; it is persisted through a
/// separate channel (see `SessionStorage`). `is_loading` is transient and
/// excluded at the type level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub identity: Option<AdminIdentity>,
    #[serde(rename = "isAuthenticated", default)]
    pub is_authenticated: bool,
}

impl Session {
    /// State before rehydration has run: nothing known yet, check pending.
    #[allow(dead_code)]
    pub fn initial() -> Self {
        Self {
            identity: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    /// Map a persisted snapshot (or its absence) back to a settled session.
    ///
    /// `is_authenticated` is re-derived from identity presence rather than
    /// trusted from disk, so a stale or hand-edited snapshot cannot claim
    /// authentication without an identity behind it.
    pub fn from_snapshot(snapshot: Option<SessionSnapshot>) -> Self {
        let identity = snapshot.and_then(|s| s.identity);
        Self {
            is_authenticated: identity.is_some(),
            identity,
            is_loading: false,
        }
    }

    /// Project the durable subset for persistence.
    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.identity.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}
