/*
[INPUT]:  Owner ids and vehicle form data
[OUTPUT]: Vehicle rows from the `vehicles` table
[POS]:    HTTP layer - vehicle endpoints (service key)
[UPDATE]: When vehicle fields change
*/

use reqwest::Method;
use reqwest::header::ACCEPT;

use crate::http::client::{RETURN_REPRESENTATION, SINGLE_OBJECT, eq};
use crate::http::users::rename_not_found;
use crate::http::{CarpoolClient, CarpoolError, Result};
use crate::types::{NewVehicle, Vehicle};

const VEHICLES: &str = "vehicles";

impl CarpoolClient {
    /// Vehicles owned by a user, primary first
    ///
    /// GET /rest/v1/vehicles?user_id=eq.{user_id}&order=is_primary.desc,created_at.asc
    pub async fn list_vehicles(&self, user_id: &str) -> Result<Vec<Vehicle>> {
        let query = [
            ("user_id", eq(user_id)),
            ("select", "*".to_string()),
            ("order", "is_primary.desc,created_at.asc".to_string()),
        ];
        let builder = self.table_request(Method::GET, VEHICLES, &query)?;
        self.send_json(builder).await
    }

    /// GET /rest/v1/vehicles?id=eq.{id}
    pub async fn get_vehicle(&self, id: &str) -> Result<Vehicle> {
        let query = [("id", eq(id)), ("select", "*".to_string())];
        let builder = self
            .table_request(Method::GET, VEHICLES, &query)?
            .header(ACCEPT, SINGLE_OBJECT);
        self.send_json(builder)
            .await
            .map_err(|err| rename_not_found(err, format!("vehicle {id}")))
    }

    /// POST /rest/v1/vehicles
    pub async fn insert_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle> {
        if vehicle.make.trim().is_empty() || vehicle.model.trim().is_empty() {
            return Err(CarpoolError::Validation(
                "vehicle make and model are required".to_string(),
            ));
        }
        if vehicle.seats == 0 {
            return Err(CarpoolError::Validation(
                "vehicle must have at least one seat".to_string(),
            ));
        }

        let builder = self
            .table_request(Method::POST, VEHICLES, &[])?
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(vehicle);
        self.send_json(builder).await
    }

    /// DELETE /rest/v1/vehicles?id=eq.{id}&user_id=eq.{user_id}
    pub async fn delete_vehicle(&self, user_id: &str, id: &str) -> Result<()> {
        let query = [("id", eq(id)), ("user_id", eq(user_id))];
        let builder = self.table_request(Method::DELETE, VEHICLES, &query)?;
        self.send_empty(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{CarpoolClient, CarpoolError};
    use crate::types::NewVehicle;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_vehicles_primary_first() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/vehicles"))
            .and(query_param("user_id", "eq.u1"))
            .and(query_param("order", "is_primary.desc,created_at.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "v1", "user_id": "u1", "make": "Honda", "model": "Odyssey", "year": 2021, "is_primary": true},
                {"id": "v2", "user_id": "u1", "make": "Subaru", "model": "Outback", "year": 2018, "seats": 5},
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CarpoolClient::new(&server.uri(), "service-key").unwrap();
        let vehicles = client.list_vehicles("u1").await.expect("list");
        assert_eq!(vehicles.len(), 2);
        assert!(vehicles[0].is_primary);
        assert_eq!(vehicles[1].seats, 5);
    }

    #[tokio::test]
    async fn test_insert_vehicle_requires_make_and_model() {
        let client = CarpoolClient::new("http://127.0.0.1:9", "service-key").unwrap();
        let vehicle = NewVehicle {
            user_id: "u1".to_string(),
            make: " ".to_string(),
            model: "Odyssey".to_string(),
            year: 2021,
            color: None,
            license_plate: None,
            seats: 7,
            is_primary: false,
        };

        let err = client.insert_vehicle(&vehicle).await.unwrap_err();
        assert!(matches!(err, CarpoolError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_vehicle_scoped_to_owner() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/vehicles"))
            .and(query_param("id", "eq.v2"))
            .and(query_param("user_id", "eq.u1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = CarpoolClient::new(&server.uri(), "service-key").unwrap();
        client.delete_vehicle("u1", "v2").await.expect("delete");
    }
}
