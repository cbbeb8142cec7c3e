//! The session store: single owner of live authentication state.
//!
//! All session transitions flow through here:
//! - rehydration from durable storage at construction
//! - `set_identity` for check outcomes and explicit sign-in/sign-out
//! - `clear` for operator sign-out (best-effort server revoke)
//! - `revalidate` for the startup/resume credential check
//!
//! Writes are last-write-wins; a check already in flight when a sign-out
//! happens will land its result afterwards. The token is gone either way,
//! so the next revalidation settles signed-out.

use std::sync::Arc;

use tokio::sync::futures::Notified;
use tokio::sync::{Notify, RwLock};
use tracing::{debug, warn};

use crate::api::AuthApi;
use crate::models::AdminIdentity;

use super::session::Session;
use super::storage::SessionStorage;

pub struct SessionStore {
    session: RwLock<Session>,
    storage: Arc<dyn SessionStorage>,
    api: Arc<dyn AuthApi>,
    changed: Notify,
}

impl SessionStore {
    /// Build the store and rehydrate from durable storage.
    ///
    /// The snapshot is only restored when a credential token is present.
    /// An identity without a token behind it cannot be revalidated, so it
    /// is treated as leftover state and cleared.
    pub fn new(storage: Arc<dyn SessionStorage>, api: Arc<dyn AuthApi>) -> Self {
        let snapshot = storage.load_snapshot();
        let session = if storage.load_token().is_some() {
            Session::from_snapshot(snapshot)
        } else {
            if snapshot.is_some() {
                debug!("Discarding persisted identity with no token behind it");
                storage.clear_snapshot();
            }
            Session::from_snapshot(None)
        };

        Self {
            session: RwLock::new(session),
            storage,
            api,
            changed: Notify::new(),
        }
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn identity(&self) -> Option<AdminIdentity> {
        self.session.read().await.identity.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated
    }

    #[allow(dead_code)]
    pub async fn is_loading(&self) -> bool {
        self.session.read().await.is_loading
    }

    /// Future that resolves on the next state transition. Create it before
    /// reading the session so a transition in between cannot be missed.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }

    /// Record the outcome of a credential check, or an explicit sign-in or
    /// sign-out, and persist the durable subset. The token channel is not
    /// touched here. Idempotent.
    pub async fn set_identity(&self, identity: Option<AdminIdentity>) {
        let snapshot = {
            let mut session = self.session.write().await;
            session.is_authenticated = identity.is_some();
            session.identity = identity;
            session.is_loading = false;
            session.to_snapshot()
        };
        self.storage.store_snapshot(&snapshot);
        self.changed.notify_waiters();
    }

    /// Persist a freshly issued token. In-memory state is untouched; the
    /// login flow follows up with `set_identity` for the identity half.
    pub fn store_token(&self, token: &str) {
        self.storage.store_token(token);
    }

    /// Sign out. The platform is asked to revoke the session, but only as a
    /// courtesy: local state is cleared no matter what the network does, and
    /// the server-side session may outlive us if the revoke fails.
    pub async fn clear(&self) {
        if let Some(token) = self.storage.load_token() {
            if let Err(e) = self.api.revoke_session(&token).await {
                warn!(error = %e, "Session revoke failed; clearing local state anyway");
            }
        }
        self.storage.clear_token();
        self.set_identity(None).await;
    }

    /// Check whether the persisted token still maps to a live session.
    ///
    /// Without a token this settles signed-out without touching the network.
    /// With one, any failure (rejected token, network trouble, malformed
    /// response) clears the token and settles signed-out; errors are logged,
    /// never returned.
    pub async fn revalidate(&self) {
        let Some(token) = self.storage.load_token() else {
            debug!("No credential token; skipping identity check");
            self.set_identity(None).await;
            return;
        };

        {
            let mut session = self.session.write().await;
            session.is_loading = true;
        }
        self.changed.notify_waiters();

        match self.api.get_identity(&token).await {
            Ok(identity) => {
                debug!(admin = %identity.id, "Credential check succeeded");
                self.set_identity(Some(identity)).await;
            }
            Err(e) => {
                warn!(error = %e, "Credential check failed; signing out locally");
                self.storage.clear_token();
                self.set_identity(None).await;
            }
        }
    }
}
