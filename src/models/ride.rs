use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
    Unknown,
}

impl RideStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RideStatus::Requested => write!(f, "Requested"),
            RideStatus::Accepted => write!(f, "Accepted"),
            RideStatus::InProgress => write!(f, "In Progress"),
            RideStatus::Completed => write!(f, "Completed"),
            RideStatus::Cancelled => write!(f, "Cancelled"),
            RideStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: String,
    #[serde(rename = "riderName")]
    pub rider_name: Option<String>,
    #[serde(rename = "driverId")]
    pub driver_id: Option<String>,
    #[serde(rename = "pickupZone")]
    pub pickup_zone: Option<String>,
    #[serde(rename = "dropoffZone")]
    pub dropoff_zone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub fare: f64,
    #[serde(rename = "distanceKm", default)]
    pub distance_km: f64,
    #[serde(rename = "requestedAt")]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[allow(dead_code)] // Helper methods - some used, others for future use
impl Ride {
    pub fn status(&self) -> RideStatus {
        match self.status.to_ascii_lowercase().as_str() {
            "requested" => RideStatus::Requested,
            "accepted" => RideStatus::Accepted,
            "in_progress" | "in-progress" => RideStatus::InProgress,
            "completed" => RideStatus::Completed,
            "cancelled" | "canceled" => RideStatus::Cancelled,
            _ => RideStatus::Unknown,
        }
    }

    pub fn route(&self) -> String {
        format!(
            "{} -> {}",
            self.pickup_zone.as_deref().unwrap_or("?"),
            self.dropoff_zone.as_deref().unwrap_or("?"),
        )
    }

    /// Compact request time for list view: "Aug 20 14:02"
    pub fn formatted_requested(&self) -> String {
        match &self.requested_at {
            Some(dt) => dt.format("%b %d %H:%M").to_string(),
            None => "-".to_string(),
        }
    }
}
