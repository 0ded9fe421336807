/*
[INPUT]:  Backend table rows and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When table schemas change or new types added
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::enums::{TripKind, TripStatus};

/// Row of the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub profile_completed: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", falling back to the email when both names are missing
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Profile subset of a user, upserted by `user_id`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub profile_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default = "default_seats")]
    pub seats: u8,
    #[serde(default)]
    pub is_primary: bool,
}

impl Vehicle {
    pub fn info(&self) -> VehicleInfo {
        VehicleInfo {
            color: self.color.clone().unwrap_or_default(),
            model: format!("{} {}", self.make, self.model).trim().to_string(),
            license_plate: self.license_plate.clone(),
            capacity: self.seats,
        }
    }
}

/// What riders' parents need to recognise the car
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleInfo {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default = "default_seats")]
    pub capacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub group_id: String,
    pub driver_id: String,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub kind: TripKind,
    pub pickup_location: String,
    pub destination: String,
    #[serde(default)]
    pub destination_address: Option<String>,
    pub departure_time: DateTime<Utc>,
    #[serde(default)]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub return_time: Option<DateTime<Utc>>,
    #[serde(default = "default_max_passengers")]
    pub max_passengers: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TripStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A passenger as the driver sees them during a trip
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiderInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    /// Seating constraint, e.g. "booster seat"
    #[serde(default)]
    pub seating: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl RiderInfo {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

/// Row of the `trip_riders` table: a rider plus leg estimates, ordered by `position`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRider {
    #[serde(default, deserialize_with = "null_as_default")]
    pub trip_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: u32,
    #[serde(flatten)]
    pub rider: RiderInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eta_minutes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance_miles: Decimal,
}

/// Nullable columns arrive as `null`; read them as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_seats() -> u8 {
    4
}

fn default_max_passengers() -> u32 {
    4
}
