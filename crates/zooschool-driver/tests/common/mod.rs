/*
[INPUT]:  Test fixtures and mock server requirements
[OUTPUT]: Shared helpers for driver integration tests
[POS]:    Test infrastructure - shared across driver test modules
[UPDATE]: When adding new fixtures or backend row shapes
*/

use std::path::PathBuf;

use serde_json::{Value, json};
use wiremock::MockServer;
use zooschool_adapter::CarpoolClient;

#[allow(dead_code)]
pub const SERVICE_KEY: &str = "service-role-key";

/// Demo fixture shipped at the repository root
#[allow(dead_code)]
pub fn demo_trips_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/trips.json")
}

#[allow(dead_code)]
pub fn demo_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/zooschool.yaml")
}

pub fn unique_temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("zooschool-{label}-{}", uuid::Uuid::new_v4()))
}

pub fn cleanup_temp_dir(path: &std::path::Path) {
    let _ = std::fs::remove_dir_all(path);
}

#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> CarpoolClient {
    CarpoolClient::new(&server.uri(), SERVICE_KEY).expect("client init")
}

#[allow(dead_code)]
pub fn no_rows_body() -> Value {
    json!({
        "code": "PGRST116",
        "message": "JSON object requested, multiple (or no) rows returned",
        "details": "The result contains 0 rows",
        "hint": null,
    })
}

#[allow(dead_code)]
pub fn trip_row(id: &str) -> Value {
    json!({
        "id": id,
        "group_id": "group-ne",
        "driver_id": "driver-1",
        "vehicle_id": "vehicle-1",
        "title": "Zoo School NE Morning Run",
        "kind": "morning_dropoff",
        "pickup_location": "Maple Street",
        "destination": "Zoo School Northeast Campus",
        "destination_address": "1234 Wildlife Way, Anytown, USA",
        "departure_time": "2025-08-06T06:55:00Z",
        "arrival_time": "2025-08-06T07:25:00Z",
        "max_passengers": 4,
        "description": "Bring the permission slips",
        "status": "scheduled",
    })
}

#[allow(dead_code)]
pub fn rider_rows(trip_id: &str) -> Value {
    json!([
        {
            "trip_id": trip_id,
            "position": 0,
            "id": "rider-1",
            "name": "Emma Johnson",
            "address": "456 Maple Street, Anytown, USA",
            "contact_name": "Sarah Johnson",
            "contact_phone": "(555) 234-5678",
            "eta_minutes": 5,
            "distance_miles": "1.2",
        },
        {
            "trip_id": trip_id,
            "position": 1,
            "id": "rider-2",
            "name": "Noah Williams",
            "address": "789 Oak Avenue, Anytown, USA",
            "contact_name": "Michael Williams",
            "contact_phone": "(555) 345-6789",
            "eta_minutes": 7,
            "distance_miles": "1.8",
        },
    ])
}

#[allow(dead_code)]
pub fn vehicle_row(id: &str) -> Value {
    json!({
        "id": id,
        "user_id": "driver-1",
        "make": "Honda",
        "model": "Odyssey",
        "year": 2021,
        "color": "Silver",
        "license_plate": "ABC-1234",
        "seats": 7,
        "is_primary": true,
    })
}
