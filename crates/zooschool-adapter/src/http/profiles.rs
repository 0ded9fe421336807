/*
[INPUT]:  User ids and profile form data
[OUTPUT]: Profile rows from the `user_profiles` table
[POS]:    HTTP layer - profile endpoints (service key)
[UPDATE]: When profile fields change
*/

use chrono::Utc;
use reqwest::Method;
use reqwest::header::ACCEPT;

use crate::http::client::{RETURN_REPRESENTATION, SINGLE_OBJECT, eq};
use crate::http::{CarpoolClient, CarpoolError, Result};
use crate::types::UserProfile;

const USER_PROFILES: &str = "user_profiles";

impl CarpoolClient {
    /// Fetch a profile; a user without one yet yields `None`
    ///
    /// GET /rest/v1/user_profiles?user_id=eq.{user_id}&select=*
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let query = [("user_id", eq(user_id)), ("select", "*".to_string())];
        let builder = self
            .table_request(Method::GET, USER_PROFILES, &query)?
            .header(ACCEPT, SINGLE_OBJECT);

        match self.send_json(builder).await {
            Ok(profile) => Ok(Some(profile)),
            Err(CarpoolError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Insert or merge a profile keyed by `user_id`
    ///
    /// POST /rest/v1/user_profiles?on_conflict=user_id
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut profile = profile.clone();
        profile.updated_at = Some(Utc::now());

        let query = [("on_conflict", "user_id".to_string())];
        let builder = self
            .table_request(Method::POST, USER_PROFILES, &query)?
            .header(ACCEPT, SINGLE_OBJECT)
            .header(
                "Prefer",
                format!("{RETURN_REPRESENTATION},resolution=merge-duplicates"),
            )
            .json(&profile);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::CarpoolClient;
    use crate::types::UserProfile;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upsert_profile_merges_duplicates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/user_profiles"))
            .and(query_param("on_conflict", "user_id"))
            .and(header(
                "prefer",
                "return=representation,resolution=merge-duplicates",
            ))
            .and(body_partial_json(serde_json::json!({
                "user_id": "u1",
                "phone": "(555) 234-5678",
                "profile_completed": true,
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "user_id": "u1",
                "phone": "(555) 234-5678",
                "profile_completed": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CarpoolClient::new(&server.uri(), "service-key").unwrap();
        let profile = UserProfile {
            user_id: "u1".to_string(),
            phone: Some("(555) 234-5678".to_string()),
            profile_completed: true,
            ..UserProfile::default()
        };

        let saved = client.upsert_profile(&profile).await.expect("upsert");
        assert!(saved.profile_completed);
    }

    #[tokio::test]
    async fn test_get_profile_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/user_profiles"))
            .and(query_param("user_id", "eq.u2"))
            .respond_with(ResponseTemplate::new(406).set_body_json(serde_json::json!({
                "code": "PGRST116",
                "message": "no rows",
            })))
            .mount(&server)
            .await;

        let client = CarpoolClient::new(&server.uri(), "service-key").unwrap();
        assert!(client.get_profile("u2").await.unwrap().is_none());
    }
}
