//! REST API layer for GreenRide platform services.
//!
//! `ApiClient` talks to the platform to authenticate admins and fetch
//! rides, drivers, feedback, and revenue data. Authentication is a bearer
//! token issued by `/auth/login`; the `AuthApi` trait is the narrow slice
//! of the API the session layer needs.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::AdminIdentity;

pub use client::{ApiClient, LoginResponse};
pub use error::ApiError;

/// The slice of the platform API that the session layer depends on.
///
/// Kept object-safe so session logic can run against the production
/// client or an in-process stub.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a bearer token for the admin identity it belongs to.
    /// A 401 means the token is expired or has been revoked.
    async fn get_identity(&self, token: &str) -> Result<AdminIdentity, ApiError>;

    /// Ask the platform to revoke the session behind the token.
    /// Callers treat this as best-effort; the server-side session may
    /// outlive the client if the call fails.
    async fn revoke_session(&self, token: &str) -> Result<(), ApiError>;
}
