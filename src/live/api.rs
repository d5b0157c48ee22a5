//! REST payload shapes consumed by the admin panel. Shapes only; the
//! HTTP transport lives with the caller.

use serde::{Deserialize, Serialize};

use super::events::ActiveUser;

/// Site-wide announcement banner (GET and PUT share the shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub enabled: bool,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Polling fallback for the active-user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUsersSnapshot {
    pub users: Vec<ActiveUser>,
    pub count: u64,
    pub timestamp: f64,
}

/// The authenticated admin identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: String,
    pub name: String,
    pub role: String,
    pub language: String,
}

/// Deployment mode flag (e.g. `demo` vs `production`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoutAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
