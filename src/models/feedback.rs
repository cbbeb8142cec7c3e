use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: String,
    #[serde(rename = "rideId")]
    pub ride_id: String,
    #[serde(rename = "riderName")]
    pub rider_name: Option<String>,
    // 1-5 stars; out-of-range values are clamped at display time
    #[serde(default)]
    pub rating: u8,
    pub comment: Option<String>,
    #[serde(rename = "submittedAt")]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[allow(dead_code)] // Helper methods - some used, others for future use
impl FeedbackEntry {
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }

    pub fn display_name(&self) -> &str {
        self.rider_name.as_deref().unwrap_or("anonymous")
    }
}
