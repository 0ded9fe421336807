/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for zooschool-adapter tests

use serde_json::{Value, json};
use wiremock::MockServer;
use zooschool_adapter::CarpoolClient;

pub const SERVICE_KEY: &str = "service-role-key";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> CarpoolClient {
    CarpoolClient::new(&server.uri(), SERVICE_KEY).expect("client init")
}

/// Error body the backend sends when a single-row read matches nothing
pub fn no_rows_body() -> Value {
    json!({
        "code": "PGRST116",
        "message": "JSON object requested, multiple (or no) rows returned",
        "details": "The result contains 0 rows",
        "hint": null,
    })
}

#[allow(dead_code)]
pub fn user_row(id: &str, email: &str, password_hash: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "password_hash": password_hash,
        "first_name": "Sarah",
        "last_name": "Johnson",
        "phone": "(555) 123-4567",
        "profile_completed": false,
        "created_at": "2025-09-01T12:00:00Z",
    })
}

#[allow(dead_code)]
pub fn trip_row(id: &str) -> Value {
    json!({
        "id": id,
        "group_id": "group-1",
        "driver_id": "driver-1",
        "vehicle_id": "vehicle-1",
        "title": "Morning School Run",
        "kind": "morning_dropoff",
        "pickup_location": "Oak Street",
        "destination": "Lincoln Elementary School",
        "destination_address": "456 School Ave",
        "departure_time": "2025-09-02T07:45:00Z",
        "max_passengers": 4,
        "status": "scheduled",
    })
}
