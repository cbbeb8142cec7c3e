use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Online,
    OnTrip,
    Offline,
    Suspended,
    Unknown,
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverStatus::Online => write!(f, "Online"),
            DriverStatus::OnTrip => write!(f, "On Trip"),
            DriverStatus::Offline => write!(f, "Offline"),
            DriverStatus::Suspended => write!(f, "Suspended"),
            DriverStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    pub rating: Option<f32>,
    #[serde(rename = "totalRides", default)]
    pub total_rides: u32,
    pub city: Option<String>,
}

#[allow(dead_code)] // Helper methods - some used, others for future use
impl Driver {
    pub fn status(&self) -> DriverStatus {
        match self.status.to_ascii_lowercase().as_str() {
            "online" => DriverStatus::Online,
            "on_trip" | "on-trip" | "busy" => DriverStatus::OnTrip,
            "offline" => DriverStatus::Offline,
            "suspended" => DriverStatus::Suspended,
            _ => DriverStatus::Unknown,
        }
    }

    pub fn display_rating(&self) -> String {
        match self.rating {
            Some(r) => format!("{:.1}", r),
            None => "-".to_string(),
        }
    }
}
