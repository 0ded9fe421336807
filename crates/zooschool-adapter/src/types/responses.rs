/*
[INPUT]:  Backend error bodies and auth results
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When backend error format or auth payload changes
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the backend REST layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    /// "JSON object requested, multiple (or no) rows returned"
    pub const NO_ROWS: &'static str = "PGRST116";

    pub fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(Self::NO_ROWS)
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "sub")]
    pub user_id: String,
    pub email: String,
    pub name: String,
}

/// Result of a successful signup or login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}
