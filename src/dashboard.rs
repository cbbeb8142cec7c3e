//! Dashboard data container and refresh pipeline.
//!
//! Fetches rides, drivers, feedback, and revenue concurrently and reshapes
//! them into printable chart summaries. Individual fetch failures are
//! recorded without aborting the rest; a 401 anywhere flags the session as
//! expired so the shell can send the operator back through login.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::charts;
use crate::models::{Driver, FeedbackEntry, RevenuePoint, Ride};

/// Trailing window for rides, feedback, and revenue queries.
/// 14 days keeps the per-day charts readable in a terminal.
const FLEET_WINDOW_DAYS: u32 = 14;

/// Width of the proportional bars in summary output
const BAR_WIDTH: usize = 24;

pub struct Dashboard {
    api: ApiClient,
    pub rides: Vec<Ride>,
    pub drivers: Vec<Driver>,
    pub feedback: Vec<FeedbackEntry>,
    pub revenue: Vec<RevenuePoint>,
    pub status_message: Option<String>,
    pub auth_expired: bool,
}

impl Dashboard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rides: Vec::new(),
            drivers: Vec::new(),
            feedback: Vec::new(),
            revenue: Vec::new(),
            status_message: None,
            auth_expired: false,
        }
    }

    /// Fetch everything concurrently. Each failure is recorded on its own;
    /// whatever succeeded still lands.
    pub async fn refresh_all(&mut self) {
        let (rides_res, drivers_res, feedback_res, revenue_res) = tokio::join!(
            self.api.fetch_rides(FLEET_WINDOW_DAYS),
            self.api.fetch_drivers(),
            self.api.fetch_feedback(FLEET_WINDOW_DAYS),
            self.api.fetch_revenue(FLEET_WINDOW_DAYS),
        );

        match rides_res {
            Ok(rides) => {
                info!(count = rides.len(), "Rides fetched");
                self.rides = rides;
            }
            Err(e) => self.record_failure("Rides", &e),
        }
        match drivers_res {
            Ok(drivers) => {
                info!(count = drivers.len(), "Drivers fetched");
                self.drivers = drivers;
            }
            Err(e) => self.record_failure("Drivers", &e),
        }
        match feedback_res {
            Ok(feedback) => {
                info!(count = feedback.len(), "Feedback fetched");
                self.feedback = feedback;
            }
            Err(e) => self.record_failure("Feedback", &e),
        }
        match revenue_res {
            Ok(revenue) => {
                info!(count = revenue.len(), "Revenue fetched");
                self.revenue = revenue;
            }
            Err(e) => self.record_failure("Revenue", &e),
        }
    }

    fn record_failure(&mut self, what: &str, error: &anyhow::Error) {
        error!(error = %error, what = what, "Fetch failed");
        if is_unauthorized(error) {
            self.auth_expired = true;
            self.status_message = Some("Session expired. Please log in again.".to_string());
        } else if self.status_message.is_none() {
            self.status_message = Some(friendly_message(what, error));
        }
    }

    /// Render the chart summaries for shell output, as of `today`.
    pub fn summary(&self, today: NaiveDate) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(format!("Fleet: {} drivers", self.drivers.len()));
        let statuses = charts::driver_status_counts(&self.drivers);
        for (label, value) in statuses.labels.iter().zip(&statuses.values) {
            lines.push(format!("  {:<10} {:>4}", label, value));
        }

        let active = self
            .rides
            .iter()
            .filter(|r| !r.status().is_terminal())
            .count();
        lines.push(format!("Rides in flight: {}", active));

        let rides = charts::rides_per_day(&self.rides, today, FLEET_WINDOW_DAYS);
        lines.push(format!(
            "Completed rides, last {} days: {}",
            FLEET_WINDOW_DAYS,
            rides.total()
        ));
        let rides_max = rides.max();
        for (label, value) in rides.labels.iter().zip(&rides.values) {
            lines.push(format!(
                "  {}  {:<width$} {}",
                label,
                bar(*value, rides_max),
                value,
                width = BAR_WIDTH
            ));
        }

        let revenue = charts::revenue_trend(&self.revenue, today, FLEET_WINDOW_DAYS);
        lines.push(format!(
            "Gross revenue, last {} days: ${:.2}",
            FLEET_WINDOW_DAYS,
            revenue.total()
        ));

        match charts::average_rating(&self.feedback) {
            Some(avg) => lines.push(format!(
                "Rider rating: {:.2} across {} reviews",
                avg,
                self.feedback.len()
            )),
            None => lines.push("Rider rating: no feedback in window".to_string()),
        }
        let histogram = charts::rating_histogram(&self.feedback);
        for (label, value) in histogram.labels.iter().zip(&histogram.values) {
            lines.push(format!("  {:<3} {:>4}", label, value));
        }

        lines
    }
}

/// Proportional bar for shell output.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

/// Walk the chain so context wrapping cannot hide an auth failure.
fn is_unauthorized(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(ApiError::is_auth_failure)
}

fn friendly_message(what: &str, error: &anyhow::Error) -> String {
    let msg = error.to_string().to_lowercase();
    if msg.contains("rate limit") {
        "Server is busy. Please wait a moment and try again.".to_string()
    } else if msg.contains("network") || msg.contains("connect") || msg.contains("send") {
        "Network error. Check your connection.".to_string()
    } else {
        format!("{}: {}", what, error)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use chrono::NaiveDate;

    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(ApiClient::new("http://localhost:9").expect("client"))
    }

    #[test]
    fn test_unauthorized_fetch_flags_session_expired() {
        let mut dash = dashboard();
        let error = anyhow::Error::new(ApiError::Unauthorized).context("Rides fetch failed");

        dash.record_failure("Rides", &error);

        assert!(dash.auth_expired);
        assert!(dash
            .status_message
            .as_deref()
            .unwrap_or("")
            .contains("Session expired"));
    }

    #[test]
    fn test_rate_limit_failure_is_not_session_expiry() {
        let mut dash = dashboard();
        let error = anyhow::Error::new(ApiError::RateLimited);

        dash.record_failure("Rides", &error);

        assert!(!dash.auth_expired);
        assert!(dash.status_message.as_deref().unwrap_or("").contains("busy"));
    }

    #[test]
    fn test_first_failure_message_is_kept() {
        let mut dash = dashboard();
        dash.record_failure("Rides", &anyhow::Error::new(ApiError::RateLimited));
        dash.record_failure(
            "Drivers",
            &anyhow::Error::new(ApiError::NotFound("gone".to_string())),
        );

        assert!(dash.status_message.as_deref().unwrap_or("").contains("busy"));
    }

    #[test]
    fn test_summary_renders_without_data() {
        let dash = dashboard();
        let today = NaiveDate::from_ymd_opt(2026, 8, 20).expect("valid date");

        let lines = dash.summary(today);
        assert!(lines.iter().any(|l| l.contains("Fleet: 0 drivers")));
        assert!(lines.iter().any(|l| l.contains("Rides in flight: 0")));
        assert!(lines.iter().any(|l| l.contains("no feedback")));
    }

    #[test]
    fn test_bar_is_proportional() {
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        // No data means no bars rather than a divide-by-zero
        assert_eq!(bar(3.0, 0.0), "");
    }
}
