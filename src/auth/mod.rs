//! Authentication module: session state, durable storage, and gating.
//!
//! This module provides:
//! - `Session` / `SessionSnapshot`: live state and its durable subset
//! - `SessionStorage`: the persistence boundary (disk + keyring, or memory)
//! - `SessionStore`: the single owner of session state and its transitions
//! - `AuthGate`: the three-way routing decision over the store
//!
//! The credential token and the session snapshot are persisted through
//! separate channels; the token never appears inside the snapshot.

pub mod gate;
pub mod session;
pub mod storage;
pub mod store;

pub use gate::{AuthGate, GateState};
pub use session::{Session, SessionSnapshot};
pub use storage::{DiskStorage, MemoryStorage, SessionStorage};
pub use store::SessionStore;

#[cfg(test)]
pub(crate) mod stubs {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::api::{ApiError, AuthApi};
    use crate::models::AdminIdentity;

    pub fn admin(id: &str, role: &str) -> AdminIdentity {
        AdminIdentity {
            id: id.to_string(),
            name: "Dana Ortiz".to_string(),
            email: format!("{}@greenride.app", id),
            role: role.to_string(),
            permissions: vec!["rides:view".to_string()],
            last_login: None,
            created_at: None,
        }
    }

    /// Scriptable `AuthApi` with call counters and an optional hold that
    /// parks `get_identity` until released.
    #[derive(Default)]
    pub struct StubAuthApi {
        identity: Option<AdminIdentity>,
        server_down: bool,
        fail_revoke: bool,
        hold: Option<Arc<Notify>>,
        identity_calls: AtomicUsize,
        revoke_calls: AtomicUsize,
    }

    impl StubAuthApi {
        pub fn granting(identity: AdminIdentity) -> Self {
            Self {
                identity: Some(identity),
                ..Self::default()
            }
        }

        /// Answers every identity check with a 401.
        pub fn rejecting() -> Self {
            Self::default()
        }

        /// Answers every identity check with a server error.
        pub fn unreachable_backend() -> Self {
            Self {
                server_down: true,
                ..Self::default()
            }
        }

        pub fn with_failing_revoke(mut self) -> Self {
            self.fail_revoke = true;
            self
        }

        pub fn with_hold(mut self, hold: Arc<Notify>) -> Self {
            self.hold = Some(hold);
            self
        }

        pub fn identity_calls(&self) -> usize {
            self.identity_calls.load(Ordering::SeqCst)
        }

        pub fn revoke_calls(&self) -> usize {
            self.revoke_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthApi for StubAuthApi {
        async fn get_identity(&self, _token: &str) -> Result<AdminIdentity, ApiError> {
            self.identity_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            if self.server_down {
                return Err(ApiError::ServerError("backend unreachable".to_string()));
            }
            match &self.identity {
                Some(identity) => Ok(identity.clone()),
                None => Err(ApiError::Unauthorized),
            }
        }

        async fn revoke_session(&self, _token: &str) -> Result<(), ApiError> {
            self.revoke_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_revoke {
                Err(ApiError::ServerError("revoke endpoint down".to_string()))
            } else {
                Ok(())
            }
        }
    }
}
