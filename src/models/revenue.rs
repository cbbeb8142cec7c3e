use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of rolled-up revenue from the reporting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub gross: f64,
    #[serde(default)]
    pub net: f64,
    #[serde(rename = "completedRides", default)]
    pub completed_rides: u32,
}

#[allow(dead_code)] // Helper methods - some used, others for future use
impl RevenuePoint {
    /// Platform take for the day (gross minus driver payouts).
    pub fn margin(&self) -> f64 {
        self.gross - self.net
    }

    pub fn per_ride(&self) -> f64 {
        if self.completed_rides == 0 {
            0.0
        } else {
            self.gross / self.completed_rides as f64
        }
    }
}
