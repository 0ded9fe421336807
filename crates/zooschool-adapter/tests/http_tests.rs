/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - backend table endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::{SERVICE_KEY, client_for, no_rows_body, setup_mock_server, trip_row};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use zooschool_adapter::{
    CarpoolClient, CarpoolError, ClientConfig, NewTrip, TripKind, TripStatus, UserProfile,
};

#[test]
fn test_client_creation() {
    let client = assert_ok!(CarpoolClient::new("http://localhost:54321", SERVICE_KEY));
    assert_eq!(client.base_url().as_str(), "http://localhost:54321/");
}

#[test]
fn test_client_rejects_empty_key() {
    let result = CarpoolClient::with_config(ClientConfig::default(), "http://localhost", " ");
    assert!(matches!(result, Err(CarpoolError::Config(_))));
}

#[test]
fn test_error_retryable() {
    let timeout_err = CarpoolError::Timeout { duration: 30 };
    assert!(timeout_err.is_retryable());

    let auth_err = CarpoolError::TokenExpired;
    assert!(!auth_err.is_retryable());
    assert!(auth_err.is_auth_error());
}

#[tokio::test]
async fn test_requests_carry_service_key() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/trips"))
        .and(header("apikey", SERVICE_KEY))
        .and(header("authorization", format!("Bearer {SERVICE_KEY}").as_str()))
        .and(query_param("id", "eq.trip-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trip_row("trip-1")))
        .expect(1)
        .mount(&server)
        .await;

    let trip = assert_ok!(client_for(&server).get_trip("trip-1").await);
    assert_eq!(trip.title, "Morning School Run");
    assert_eq!(trip.kind, TripKind::MorningDropoff);
    assert_eq!(trip.status, TripStatus::Scheduled);
}

#[tokio::test]
async fn test_missing_trip_is_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/trips"))
        .respond_with(ResponseTemplate::new(406).set_body_json(no_rows_body()))
        .mount(&server)
        .await;

    let err = client_for(&server).get_trip("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_trip_applies_defaults() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/trips"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({
            "title": "Morning School Run",
            "max_passengers": 4,
            "status": "scheduled",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(trip_row("trip-9")))
        .expect(1)
        .mount(&server)
        .await;

    let trip = NewTrip {
        group_id: "group-1".to_string(),
        driver_id: "driver-1".to_string(),
        vehicle_id: None,
        title: "Morning School Run".to_string(),
        kind: TripKind::MorningDropoff,
        pickup_location: "Oak Street".to_string(),
        destination: "Lincoln Elementary School".to_string(),
        departure_time: Utc.with_ymd_and_hms(2025, 9, 2, 7, 45, 0).unwrap(),
        return_time: None,
        max_passengers: None,
        description: String::new(),
    };

    let created = assert_ok!(client_for(&server).create_trip(&trip).await);
    assert_eq!(created.id, "trip-9");
}

#[tokio::test]
async fn test_list_trip_riders_in_position_order() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/trip_riders"))
        .and(query_param("trip_id", "eq.trip-1"))
        .and(query_param("order", "position.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"trip_id": "trip-1", "position": 0, "name": "Emma Johnson", "address": "123 Oak Street",
             "contact_name": "Sarah Johnson", "contact_phone": "(555) 123-4567",
             "eta_minutes": 5, "distance_miles": "1.2"},
            {"trip_id": "trip-1", "position": 1, "name": "Noah Williams", "address": "456 Maple Ave",
             "eta_minutes": 8, "distance_miles": "2.0"},
        ])))
        .mount(&server)
        .await;

    let riders = assert_ok!(client_for(&server).list_trip_riders("trip-1").await);
    assert_eq!(riders.len(), 2);
    assert_eq!(riders[0].rider.name, "Emma Johnson");
    assert_eq!(riders[1].eta_minutes, 8);
}

#[tokio::test]
async fn test_update_trip_status_patches_row() {
    let server = setup_mock_server().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/trips"))
        .and(query_param("id", "eq.trip-1"))
        .and(body_partial_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(
        client_for(&server)
            .update_trip_status("trip-1", TripStatus::Completed)
            .await
    );
}

#[tokio::test]
async fn test_upsert_profile_merges_on_user_id() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/user_profiles"))
        .and(query_param("on_conflict", "user_id"))
        .and(header(
            "prefer",
            "return=representation,resolution=merge-duplicates",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user_id": "u1",
            "phone": "(555) 123-4567",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = UserProfile {
        user_id: "u1".to_string(),
        ..UserProfile::default()
    };
    let saved = assert_ok!(client_for(&server).upsert_profile(&profile).await);
    assert_eq!(saved.user_id, "u1");
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/vehicles"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "database unavailable"})),
        )
        .mount(&server)
        .await;

    match client_for(&server).list_vehicles("u1").await {
        Err(CarpoolError::Api { code, message }) => {
            assert_eq!(code, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_reports_configured_duration() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    };
    let client = assert_ok!(CarpoolClient::with_config(config, &server.uri(), SERVICE_KEY));
    assert_eq!(client.timeout(), Duration::from_secs(1));

    match client.find_user_by_email("sarah@example.com").await {
        Err(CarpoolError::Timeout { duration }) => assert_eq!(duration, 1),
        other => panic!("unexpected result: {other:?}"),
    }
}
