use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    Admin,
    Support,
    Dispatcher,
    Analyst,
    Unknown,
}

impl AdminRole {
    pub fn parse(raw: &str) -> AdminRole {
        match raw.to_ascii_lowercase().as_str() {
            "admin" => AdminRole::Admin,
            "support" => AdminRole::Support,
            "dispatcher" => AdminRole::Dispatcher,
            "analyst" => AdminRole::Analyst,
            _ => AdminRole::Unknown,
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminRole::Admin => write!(f, "Admin"),
            AdminRole::Support => write!(f, "Support"),
            AdminRole::Dispatcher => write!(f, "Dispatcher"),
            AdminRole::Analyst => write!(f, "Analyst"),
            AdminRole::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Namespaced permission keys as issued by the auth service.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    RidesView,
    RidesManage,
    DriversView,
    DriversManage,
    FeedbackView,
    RevenueView,
    AdminsManage,
}

impl Permission {
    pub fn key(self) -> &'static str {
        match self {
            Permission::RidesView => "rides:view",
            Permission::RidesManage => "rides:manage",
            Permission::DriversView => "drivers:view",
            Permission::DriversManage => "drivers:manage",
            Permission::FeedbackView => "feedback:view",
            Permission::RevenueView => "revenue:view",
            Permission::AdminsManage => "admins:manage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    // Raw role string from the API; unknown roles are preserved as-is
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(rename = "lastLogin", default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[allow(dead_code)] // Helper methods - some used, others for future use
impl AdminIdentity {
    pub fn role(&self) -> AdminRole {
        AdminRole::parse(&self.role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.iter().any(|p| p == permission.key())
    }

    /// Account creation date for display: "Mar 04, 2024" or "unknown"
    pub fn member_since(&self) -> String {
        match &self.created_at {
            Some(dt) => dt.format("%b %d, %Y").to_string(),
            None => "unknown".to_string(),
        }
    }

    /// Last sign-in for display: "Aug 20, 2026 14:02" or "never"
    pub fn last_seen(&self) -> String {
        match &self.last_login {
            Some(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
            None => "never".to_string(),
        }
    }
}
