/*
[INPUT]:  Trip fixture JSON files or the carpool backend
[OUTPUT]: Typed TripPlan (destination, vehicle, ordered riders)
[POS]:    Data layer - trip provider feeding the sequencer
[UPDATE]: When trip fixture format or backend trip shape changes
*/

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use zooschool_adapter::maps::apply_waypoint_order;
use zooschool_adapter::{CarpoolClient, CarpoolError, RiderInfo, TripKind, VehicleInfo};

#[derive(Error, Debug)]
pub enum TripDataError {
    #[error("trip {0} not found")]
    NotFound(String),

    #[error("failed to read trip file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trip data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] CarpoolError),
}

/// One pickup as the sequencer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRider {
    #[serde(flatten)]
    pub rider: RiderInfo,
    #[serde(default)]
    pub eta_minutes: u32,
    #[serde(default)]
    pub distance_miles: Decimal,
}

/// Everything a drive session needs, loaded once per session
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub trip_id: String,
    pub title: String,
    pub kind: TripKind,
    pub group_name: Option<String>,
    pub destination: String,
    pub destination_address: String,
    /// Display time, e.g. "7:25 AM"
    pub arrival_eta: Option<String>,
    pub vehicle: VehicleInfo,
    pub riders: Vec<PlannedRider>,
    pub notes: String,
}

/// Trip data provider
#[async_trait]
pub trait TripSource: Send + Sync {
    async fn load(&self, trip_id: &str) -> Result<TripPlan, TripDataError>;
}

/// Loose on-disk shape; riders are parsed one by one so a bad row only drops that rider
#[derive(Debug, Deserialize)]
struct TripDocument {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    kind: TripKind,
    #[serde(default)]
    group: Option<String>,
    destination: String,
    #[serde(default)]
    destination_address: Option<String>,
    #[serde(default)]
    arrival_time: Option<String>,
    #[serde(default)]
    vehicle: VehicleInfo,
    #[serde(default)]
    riders: Option<Vec<Value>>,
    #[serde(default)]
    waypoint_order: Option<Vec<usize>>,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Deserialize)]
struct TripFile {
    trips: Vec<TripDocument>,
}

/// Reads trips from a JSON file holding `{"trips": [...]}`
#[derive(Debug, Clone)]
pub struct FileTripSource {
    path: PathBuf,
}

impl FileTripSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TripSource for FileTripSource {
    async fn load(&self, trip_id: &str) -> Result<TripPlan, TripDataError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| TripDataError::Io {
                    path: self.path.clone(),
                    source,
                })?;
        let file: TripFile = serde_json::from_str(&content)?;
        let document = file
            .trips
            .into_iter()
            .find(|trip| trip.id == trip_id)
            .ok_or_else(|| TripDataError::NotFound(trip_id.to_string()))?;
        Ok(plan_from_document(document))
    }
}

fn plan_from_document(document: TripDocument) -> TripPlan {
    let raw_riders = document.riders.unwrap_or_else(|| {
        warn!(trip_id = %document.id, "trip has no rider list");
        Vec::new()
    });
    // order indices refer to the rider list as stored, before anything is dropped
    let raw_riders = match document.waypoint_order {
        Some(order) => reorder(&document.id, raw_riders, &order),
        None => raw_riders,
    };

    let riders: Vec<PlannedRider> = raw_riders
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<PlannedRider>(value) {
            Ok(rider) => Some(rider),
            Err(err) => {
                warn!(trip_id = %document.id, index, error = %err, "dropping unreadable rider");
                None
            }
        })
        .collect();
    let riders = keep_named(&document.id, riders);

    TripPlan {
        destination_address: document
            .destination_address
            .unwrap_or_else(|| document.destination.clone()),
        trip_id: document.id,
        title: document.title,
        kind: document.kind,
        group_name: document.group,
        destination: document.destination,
        arrival_eta: document.arrival_time,
        vehicle: document.vehicle,
        riders,
        notes: document.notes,
    }
}

/// Loads a trip, its riders and the trip vehicle from the backend
#[derive(Debug, Clone)]
pub struct BackendTripSource {
    client: CarpoolClient,
}

impl BackendTripSource {
    pub fn new(client: CarpoolClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CarpoolClient {
        &self.client
    }
}

#[async_trait]
impl TripSource for BackendTripSource {
    async fn load(&self, trip_id: &str) -> Result<TripPlan, TripDataError> {
        let trip = self.client.get_trip(trip_id).await.map_err(|err| {
            if err.is_not_found() {
                TripDataError::NotFound(trip_id.to_string())
            } else {
                TripDataError::Backend(err)
            }
        })?;

        let rows = self.client.list_trip_riders(trip_id).await?;
        debug!(trip_id, riders = rows.len(), "trip riders loaded");
        let riders = rows
            .into_iter()
            .map(|row| PlannedRider {
                rider: row.rider,
                eta_minutes: row.eta_minutes,
                distance_miles: row.distance_miles,
            })
            .collect();
        let riders = keep_named(trip_id, riders);

        let vehicle = match trip.vehicle_id.as_deref() {
            Some(vehicle_id) => match self.client.get_vehicle(vehicle_id).await {
                Ok(vehicle) => vehicle.info(),
                Err(err) => {
                    warn!(trip_id, vehicle_id, error = %err, "trip vehicle unavailable");
                    VehicleInfo::default()
                }
            },
            None => VehicleInfo::default(),
        };

        Ok(TripPlan {
            trip_id: trip.id,
            title: trip.title,
            kind: trip.kind,
            group_name: None,
            destination_address: trip
                .destination_address
                .unwrap_or_else(|| trip.destination.clone()),
            destination: trip.destination,
            arrival_eta: trip
                .arrival_time
                .map(|at| at.format("%-I:%M %p").to_string()),
            vehicle,
            riders,
            notes: trip.description,
        })
    }
}

fn keep_named(trip_id: &str, riders: Vec<PlannedRider>) -> Vec<PlannedRider> {
    riders
        .into_iter()
        .filter(|planned| {
            let named = !planned.rider.name.trim().is_empty();
            if !named {
                warn!(trip_id, rider_id = ?planned.rider.id, "dropping rider without a name");
            }
            named
        })
        .collect()
}

fn reorder<T: Clone>(trip_id: &str, riders: Vec<T>, order: &[usize]) -> Vec<T> {
    match apply_waypoint_order(riders.clone(), order) {
        Ok(ordered) => ordered,
        Err(err) => {
            warn!(trip_id, ?order, error = %err, "ignoring invalid waypoint order");
            riders
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(riders: Value) -> TripDocument {
        serde_json::from_value(json!({
            "id": "trip-1",
            "title": "Morning Drop-off",
            "destination": "Zoo School Northeast Campus",
            "riders": riders,
        }))
        .unwrap()
    }

    #[test]
    fn test_unreadable_and_nameless_riders_are_dropped() {
        let plan = plan_from_document(document(json!([
            {"name": "Emma Johnson", "eta_minutes": 5, "distance_miles": "1.2"},
            {"name": "", "eta_minutes": 7},
            {"name": "Noah Williams", "eta_minutes": "soon"},
            {"name": "Olivia Davis", "eta_minutes": 6, "distance_miles": 1.5},
        ])));

        let names: Vec<_> = plan.riders.iter().map(|r| r.rider.name.as_str()).collect();
        assert_eq!(names, vec!["Emma Johnson", "Olivia Davis"]);
        assert_eq!(plan.destination_address, "Zoo School Northeast Campus");
    }

    #[test]
    fn test_null_rider_list_gives_zero_pickups() {
        let plan = plan_from_document(document(Value::Null));
        assert!(plan.riders.is_empty());
    }

    #[test]
    fn test_waypoint_order_applied() {
        let mut doc = document(json!([
            {"name": "Emma Johnson"},
            {"name": "Noah Williams"},
            {"name": "Olivia Davis"},
        ]));
        doc.waypoint_order = Some(vec![2, 0, 1]);
        let plan = plan_from_document(doc);
        let names: Vec<_> = plan.riders.iter().map(|r| r.rider.name.as_str()).collect();
        assert_eq!(names, vec!["Olivia Davis", "Emma Johnson", "Noah Williams"]);
    }

    #[test]
    fn test_waypoint_order_survives_dropped_riders() {
        let mut doc = document(json!([
            {"name": "Emma Johnson"},
            {"name": ""},
            {"name": "Olivia Davis"},
            {"name": "Noah Williams", "eta_minutes": "soon"},
        ]));
        doc.waypoint_order = Some(vec![2, 3, 1, 0]);
        let plan = plan_from_document(doc);
        let names: Vec<_> = plan.riders.iter().map(|r| r.rider.name.as_str()).collect();
        assert_eq!(names, vec!["Olivia Davis", "Emma Johnson"]);
    }

    #[test]
    fn test_invalid_waypoint_order_ignored() {
        let mut doc = document(json!([{"name": "Emma Johnson"}, {"name": "Noah Williams"}]));
        doc.waypoint_order = Some(vec![1, 1]);
        let plan = plan_from_document(doc);
        let names: Vec<_> = plan.riders.iter().map(|r| r.rider.name.as_str()).collect();
        assert_eq!(names, vec!["Emma Johnson", "Noah Williams"]);
    }
}
