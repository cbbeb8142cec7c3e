//! Routing decisions over the session store.
//!
//! `GateState` is the three-way answer a protected surface needs: still
//! checking (render a placeholder), signed out (redirect to the login route,
//! render nothing protected), or signed in (render away).

use std::sync::Arc;

use super::session::Session;
use super::store::SessionStore;

/// Route unauthenticated operators are sent to.
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Unauthenticated,
    Authenticated,
}

impl GateState {
    /// Derive the gate decision from a session. The only place the
    /// three-way mapping is defined.
    pub fn of(session: &Session) -> GateState {
        if session.is_loading {
            GateState::Loading
        } else if session.is_authenticated {
            GateState::Authenticated
        } else {
            GateState::Unauthenticated
        }
    }

    /// Where to send the operator, if anywhere.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            GateState::Unauthenticated => Some(LOGIN_ROUTE),
            _ => None,
        }
    }

    /// Whether protected content may be shown. Both `Loading` and
    /// `Unauthenticated` render only a placeholder, so nothing protected
    /// can flash while a redirect is on its way.
    pub fn renders_protected(&self) -> bool {
        matches!(self, GateState::Authenticated)
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateState::Loading => write!(f, "Checking session"),
            GateState::Unauthenticated => write!(f, "Signed out"),
            GateState::Authenticated => write!(f, "Signed in"),
        }
    }
}

/// Gate bound to a live store.
pub struct AuthGate {
    store: Arc<SessionStore>,
}

impl AuthGate {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// The decision for the session as it is right now.
    pub async fn state(&self) -> GateState {
        GateState::of(&self.store.session().await)
    }

    /// Wait out any in-flight credential check and return the first settled
    /// decision. Never returns `Loading`.
    pub async fn settled(&self) -> GateState {
        loop {
            // Register for the next change before reading, so a transition
            // between the read and the wait cannot be missed.
            let changed = self.store.changed();
            let session = self.store.session().await;
            if !session.is_loading {
                return GateState::of(&session);
            }
            changed.await;
        }
    }
}
