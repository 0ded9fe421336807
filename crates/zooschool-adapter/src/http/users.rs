/*
[INPUT]:  Email addresses and new user rows
[OUTPUT]: User records from the `users` table
[POS]:    HTTP layer - user account endpoints (service key)
[UPDATE]: When the users table or lookup keys change
*/

use reqwest::Method;
use reqwest::header::ACCEPT;

use crate::http::client::{RETURN_REPRESENTATION, SINGLE_OBJECT, eq};
use crate::http::{CarpoolClient, CarpoolError, Result};
use crate::types::{NewUser, User};

const USERS: &str = "users";

impl CarpoolClient {
    /// Look up a user by (already normalised) email
    ///
    /// GET /rest/v1/users?email=eq.{email}&select=*
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = [("email", eq(email)), ("select", "*".to_string())];
        let builder = self
            .table_request(Method::GET, USERS, &query)?
            .header(ACCEPT, SINGLE_OBJECT);

        match self.send_json(builder).await {
            Ok(user) => Ok(Some(user)),
            Err(CarpoolError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// GET /rest/v1/users?id=eq.{id}&select=*
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let query = [("id", eq(id)), ("select", "*".to_string())];
        let builder = self
            .table_request(Method::GET, USERS, &query)?
            .header(ACCEPT, SINGLE_OBJECT);
        self.send_json(builder)
            .await
            .map_err(|err| rename_not_found(err, format!("user {id}")))
    }

    /// POST /rest/v1/users
    pub async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let builder = self
            .table_request(Method::POST, USERS, &[])?
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(user);
        self.send_json(builder).await
    }
}

pub(crate) fn rename_not_found(err: CarpoolError, resource: String) -> CarpoolError {
    match err {
        CarpoolError::NotFound { .. } => CarpoolError::NotFound { resource },
        other => other,
    }
}
