/*
[INPUT]:  Completed trip id, elapsed time, driver rating and notes
[OUTPUT]: Persisted TripCompletion records and upstream trip status
[POS]:    Collaborator - trip completion after the destination step
[UPDATE]: When completion fields or upstream status handling change
*/

use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use zooschool_adapter::{CarpoolClient, TripStatus};

use crate::state::storage::CompletionStore;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCompletion {
    pub id: Uuid,
    pub trip_id: String,
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl TripCompletion {
    pub fn new(
        trip_id: impl Into<String>,
        elapsed_seconds: u64,
        rating: Option<u8>,
        notes: Option<String>,
    ) -> Result<Self> {
        let completion = Self {
            id: Uuid::new_v4(),
            trip_id: trip_id.into(),
            elapsed_seconds,
            rating,
            notes: notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            completed_at: Utc::now(),
        };
        completion.validate()?;
        Ok(completion)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trip_id.trim().is_empty() {
            return Err(anyhow!("Trip ID cannot be empty"));
        }
        if let Some(rating) = self.rating {
            if !(1..=MAX_RATING).contains(&rating) {
                return Err(anyhow!("Rating must be between 1 and {MAX_RATING}, got {rating}"));
            }
        }
        Ok(())
    }
}

/// Saves completions locally and, with a backend, marks the trip completed
#[derive(Debug, Clone)]
pub struct CompletionRecorder {
    store: Arc<CompletionStore>,
    backend: Option<CarpoolClient>,
}

impl CompletionRecorder {
    pub fn new(store: Arc<CompletionStore>, backend: Option<CarpoolClient>) -> Self {
        Self { store, backend }
    }

    pub fn store(&self) -> &CompletionStore {
        &self.store
    }

    /// Local save errors propagate. Upstream failures come back as a warning line.
    pub async fn record(&self, completion: TripCompletion) -> Result<Option<String>> {
        let trip_id = completion.trip_id.clone();
        self.store.append(completion).await?;
        info!(%trip_id, "trip completion saved");

        let Some(client) = &self.backend else {
            return Ok(None);
        };
        match client.update_trip_status(&trip_id, TripStatus::Completed).await {
            Ok(()) => Ok(None),
            Err(err) => {
                warn!(%trip_id, error = %err, "failed to mark trip completed");
                Ok(Some(format!("saved locally; backend update failed: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, true)]
    #[case(Some(1), true)]
    #[case(Some(5), true)]
    #[case(Some(0), false)]
    #[case(Some(6), false)]
    fn test_rating_range(#[case] rating: Option<u8>, #[case] ok: bool) {
        assert_eq!(TripCompletion::new("trip-1", 1800, rating, None).is_ok(), ok);
    }

    #[test]
    fn test_blank_notes_dropped() {
        let completion =
            TripCompletion::new("trip-1", 60, None, Some("   ".to_string())).unwrap();
        assert!(completion.notes.is_none());

        let completion =
            TripCompletion::new("trip-1", 60, None, Some(" smooth run ".to_string())).unwrap();
        assert_eq!(completion.notes.as_deref(), Some("smooth run"));
    }

    #[test]
    fn test_empty_trip_id_rejected() {
        assert!(TripCompletion::new(" ", 60, None, None).is_err());
    }
}
