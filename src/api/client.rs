//! HTTP client for the GreenRide platform API.
//!
//! `ApiClient` signs admins in, answers the session layer's credential
//! checks, and fetches fleet data with bearer-token auth.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::models::{AdminIdentity, Driver, FeedbackEntry, RevenuePoint, Ride};

use super::{ApiError, AuthApi};

// ============================================================================
// Constants
// ============================================================================

/// Per-request timeout in seconds. Reporting queries can be slow, so this
/// errs generous; anything past 30s is a platform problem.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How many times a 429 response is retried before giving up.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// First backoff delay in milliseconds; doubles on each retry.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Response from POST /auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminIdentity,
}

// List endpoints respond either with a bare array or wrapped as {"items": [...]}
#[derive(Debug, Deserialize)]
struct ItemsWrapper<T> {
    items: Vec<T>,
}

fn parse_list<T: DeserializeOwned>(text: &str, what: &str) -> Result<Vec<T>> {
    if let Ok(list) = serde_json::from_str::<Vec<T>>(text) {
        return Ok(list);
    }
    let wrapped: ItemsWrapper<T> = serde_json::from_str(text)
        .with_context(|| format!("Failed to parse {} response", what))?;
    Ok(wrapped.items)
}

/// Outcome of status inspection on a response.
enum Checked {
    Ready(reqwest::Response),
    Backoff,
}

/// Client for the GreenRide platform API. Cloning shares the underlying
/// `reqwest::Client` and its connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// A copy of this client that sends the given bearer token.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    /// Sign an admin in and return the issued token plus their identity
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        self.post(&url, &body)
            .await
            .context("Authentication request failed")
    }

    /// Start a request, attaching the bearer token when one is set.
    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Split a response into success, retryable rate limit, or typed error.
    async fn check(response: reqwest::Response) -> Result<Checked, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(Checked::Ready(response));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Checked::Backoff);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    /// Send a request, backing off and retrying while the API rate-limits us.
    async fn send_with_backoff(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let mut backoff_ms = INITIAL_BACKOFF_MS;
        for attempt in 0..=MAX_RATE_LIMIT_RETRIES {
            let attempt_request = request
                .try_clone()
                .context("Request body cannot be replayed")?;
            let response = attempt_request
                .send()
                .await
                .with_context(|| format!("Request to {} could not be sent", url))?;

            match Self::check(response).await? {
                Checked::Ready(response) => return Ok(response),
                Checked::Backoff if attempt < MAX_RATE_LIMIT_RETRIES => {
                    warn!(
                        url = url,
                        attempt = attempt + 1,
                        backoff_ms = backoff_ms,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
                Checked::Backoff => return Err(ApiError::RateLimited.into()),
            }
        }
        Err(ApiError::RateLimited.into())
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .send_with_backoff(url, self.request(Method::GET, url))
            .await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let request = self.request(Method::POST, url).json(body);
        let response = self.send_with_backoff(url, request).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to decode JSON from {}", url))
    }

    // ===== Fleet Data =====

    /// Fetch rides requested within the trailing window
    pub async fn fetch_rides(&self, days: u32) -> Result<Vec<Ride>> {
        let url = format!("{}/ops/rides?days={}", self.base_url, days);
        let text = self.get_text(&url).await?;
        parse_list(&text, "rides")
    }

    /// Fetch the full driver roster
    pub async fn fetch_drivers(&self) -> Result<Vec<Driver>> {
        let url = format!("{}/ops/drivers", self.base_url);
        let text = self.get_text(&url).await?;
        parse_list(&text, "drivers")
    }

    /// Fetch rider feedback submitted within the trailing window
    pub async fn fetch_feedback(&self, days: u32) -> Result<Vec<FeedbackEntry>> {
        let url = format!("{}/ops/feedback?days={}", self.base_url, days);
        let text = self.get_text(&url).await?;
        parse_list(&text, "feedback")
    }

    /// Fetch daily revenue rollups for the trailing window
    pub async fn fetch_revenue(&self, days: u32) -> Result<Vec<RevenuePoint>> {
        let url = format!("{}/ops/revenue?days={}", self.base_url, days);
        let text = self.get_text(&url).await?;
        parse_list(&text, "revenue")
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn get_identity(&self, token: &str) -> Result<AdminIdentity, ApiError> {
        let url = format!("{}/auth/me", self.base_url);
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        match Self::check(response).await? {
            Checked::Ready(response) => Ok(response.json::<AdminIdentity>().await?),
            // Auth checks do not spin on 429; the caller treats it as any failure
            Checked::Backoff => Err(ApiError::RateLimited),
        }
    }

    async fn revoke_session(&self, token: &str) -> Result<(), ApiError> {
        let url = format!("{}/auth/logout", self.base_url);
        let response = self.client.post(&url).bearer_auth(token).send().await?;
        match Self::check(response).await? {
            Checked::Ready(_) => Ok(()),
            Checked::Backoff => Err(ApiError::RateLimited),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdminRole, DriverStatus, Permission, RideStatus};

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"token": "tok-83c1", "admin": {"id": "u1", "name": "Dana Ortiz", "email": "dana@greenride.app", "role": "support", "permissions": ["rides:view", "feedback:view"], "lastLogin": "2026-08-19T08:12:00Z", "createdAt": "2024-03-04T00:00:00Z"}}"#;

        let resp: LoginResponse =
            serde_json::from_str(json).expect("Failed to parse login test JSON");
        assert_eq!(resp.token, "tok-83c1");
        assert_eq!(resp.admin.id, "u1");
        assert_eq!(resp.admin.role(), AdminRole::Support);
        assert!(resp.admin.has_permission(Permission::RidesView));
        assert!(!resp.admin.has_permission(Permission::RidesManage));
        assert_eq!(resp.admin.member_since(), "Mar 04, 2024");
    }

    #[test]
    fn test_parse_rides_bare_array() {
        let json = r#"[{"id": "r-1001", "riderName": "Priya", "driverId": "d-17", "pickupZone": "Airport", "dropoffZone": "Downtown", "status": "completed", "fare": 23.50, "distanceKm": 18.2, "requestedAt": "2026-08-20T14:02:00Z", "completedAt": "2026-08-20T14:31:00Z"}]"#;

        let rides: Vec<Ride> = parse_list(json, "rides").expect("Failed to parse bare array");
        assert_eq!(rides.len(), 1);
        assert_eq!(rides[0].status(), RideStatus::Completed);
        assert_eq!(rides[0].route(), "Airport -> Downtown");
    }

    #[test]
    fn test_parse_rides_wrapped() {
        let json = r#"{"items": [{"id": "r-1002", "status": "in_progress", "fare": 9.0}, {"id": "r-1003", "status": "surge_hold"}]}"#;

        let rides: Vec<Ride> = parse_list(json, "rides").expect("Failed to parse wrapper");
        assert_eq!(rides.len(), 2);
        assert_eq!(rides[0].status(), RideStatus::InProgress);
        // Statuses this build does not know about degrade instead of failing
        assert_eq!(rides[1].status(), RideStatus::Unknown);
        assert!(!rides[1].status().is_terminal());
    }

    #[test]
    fn test_parse_list_rejects_malformed() {
        assert!(parse_list::<Ride>("\"not a list\"", "rides").is_err());
        assert!(parse_list::<Ride>(r#"{"rows": []}"#, "rides").is_err());
    }

    #[test]
    fn test_parse_drivers() {
        let json = r#"[{"id": "d-17", "name": "Marcus Webb", "status": "on_trip", "rating": 4.83, "totalRides": 2411, "city": "Austin"}, {"id": "d-40", "name": "New Driver", "status": "online"}]"#;

        let drivers: Vec<Driver> = parse_list(json, "drivers").expect("Failed to parse drivers");
        assert_eq!(drivers[0].status(), DriverStatus::OnTrip);
        assert_eq!(drivers[0].display_rating(), "4.8");
        assert_eq!(drivers[1].display_rating(), "-");
        assert_eq!(drivers[1].total_rides, 0);
    }

    #[test]
    fn test_parse_revenue_points() {
        let json = r#"{"items": [{"date": "2026-08-19", "gross": 18450.22, "net": 14210.80, "completedRides": 714}]}"#;

        let points: Vec<RevenuePoint> =
            parse_list(json, "revenue").expect("Failed to parse revenue");
        assert_eq!(points[0].completed_rides, 714);
        assert!(points[0].margin() > 4239.0);
    }
}
