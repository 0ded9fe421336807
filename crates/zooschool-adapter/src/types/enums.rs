/*
[INPUT]:  Backend enum columns and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When a status column gains a value
*/

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Scheduled,
    #[serde(alias = "in-progress", alias = "active")]
    InProgress,
    Completed,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which leg of the school day a trip covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripKind {
    #[default]
    MorningDropoff,
    AfternoonPickup,
}

impl TripKind {
    pub fn label(&self) -> &'static str {
        match self {
            TripKind::MorningDropoff => "Morning Drop-off",
            TripKind::AfternoonPickup => "Afternoon Pickup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TripStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: TripStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(parsed, TripStatus::Cancelled);
        assert_eq!(TripStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_trip_kind_label() {
        let kind: TripKind = serde_json::from_str("\"afternoon_pickup\"").unwrap();
        assert_eq!(kind.label(), "Afternoon Pickup");
    }
}
