/*
[INPUT]:  Trip ids, new trip forms, status changes
[OUTPUT]: Trip and trip rider rows
[POS]:    HTTP layer - trip endpoints (service key)
[UPDATE]: When trip/trip_riders schema or status flow changes
*/

use reqwest::Method;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::http::client::{RETURN_REPRESENTATION, SINGLE_OBJECT, eq};
use crate::http::users::rename_not_found;
use crate::http::{CarpoolClient, CarpoolError, Result};
use crate::types::{NewTrip, Trip, TripRider, TripStatus, TripStatusUpdate};

const TRIPS: &str = "trips";
const TRIP_RIDERS: &str = "trip_riders";
const DEFAULT_MAX_PASSENGERS: u32 = 4;

#[derive(Debug, Serialize)]
struct TripRow<'a> {
    #[serde(flatten)]
    trip: &'a NewTrip,
    status: TripStatus,
}

impl CarpoolClient {
    /// Schedule a trip
    ///
    /// POST /rest/v1/trips
    pub async fn create_trip(&self, trip: &NewTrip) -> Result<Trip> {
        let required = [
            ("group_id", &trip.group_id),
            ("title", &trip.title),
            ("pickup_location", &trip.pickup_location),
            ("destination", &trip.destination),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(CarpoolError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let mut trip = trip.clone();
        trip.max_passengers = Some(trip.max_passengers.unwrap_or(DEFAULT_MAX_PASSENGERS));
        let row = TripRow {
            trip: &trip,
            status: TripStatus::Scheduled,
        };

        let builder = self
            .table_request(Method::POST, TRIPS, &[])?
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&row);
        let created: Trip = self.send_json(builder).await?;
        info!(trip_id = %created.id, group_id = %created.group_id, "trip scheduled");
        Ok(created)
    }

    /// GET /rest/v1/trips?id=eq.{id}
    pub async fn get_trip(&self, id: &str) -> Result<Trip> {
        let query = [("id", eq(id)), ("select", "*".to_string())];
        let builder = self
            .table_request(Method::GET, TRIPS, &query)?
            .header(ACCEPT, SINGLE_OBJECT);
        self.send_json(builder)
            .await
            .map_err(|err| rename_not_found(err, format!("trip {id}")))
    }

    /// Riders of a trip in pickup order
    ///
    /// GET /rest/v1/trip_riders?trip_id=eq.{trip_id}&order=position.asc
    ///
    /// Rows that cannot be read are skipped with a warning, so a bad row
    /// costs one pickup rather than the whole trip.
    pub async fn list_trip_riders(&self, trip_id: &str) -> Result<Vec<TripRider>> {
        let query = [
            ("trip_id", eq(trip_id)),
            ("select", "*".to_string()),
            ("order", "position.asc".to_string()),
        ];
        let builder = self.table_request(Method::GET, TRIP_RIDERS, &query)?;
        let rows: Vec<Value> = self.send_json(builder).await?;
        let total = rows.len();
        let riders: Vec<TripRider> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(rider) => Some(rider),
                Err(err) => {
                    warn!(trip_id, index, error = %err, "dropping unreadable rider row");
                    None
                }
            })
            .collect();
        if riders.len() < total {
            warn!(trip_id, kept = riders.len(), total, "some rider rows were skipped");
        }
        Ok(riders)
    }

    /// PATCH /rest/v1/trips?id=eq.{id}
    pub async fn update_trip_status(&self, id: &str, status: TripStatus) -> Result<()> {
        let query = [("id", eq(id))];
        let builder = self
            .table_request(Method::PATCH, TRIPS, &query)?
            .json(&TripStatusUpdate { status });
        self.send_empty(builder).await?;
        info!(trip_id = %id, %status, "trip status updated");
        Ok(())
    }
}
