/*
[INPUT]:  Mock backend user rows
[OUTPUT]: Test results for signup/login/verify against the backend client
[POS]:    Integration tests - authentication
[UPDATE]: When auth flow or user table shape changes
*/

mod common;

use common::{client_for, no_rows_body, setup_mock_server, user_row};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zooschool_adapter::auth::{hash_password, session_cookie, token_from_cookie_header};
use zooschool_adapter::{
    AuthService, CarpoolClient, CarpoolError, Ed25519Signer, LoginRequest, SignupRequest,
    TokenIssuer,
};

fn auth_service(server: &MockServer) -> AuthService<CarpoolClient> {
    let issuer = TokenIssuer::new(Ed25519Signer::generate(), 3600);
    AuthService::new(client_for(server), issuer).with_bcrypt_cost(4)
}

fn signup_request() -> SignupRequest {
    SignupRequest {
        email: "Sarah@Example.com".to_string(),
        password: "hunter22!".to_string(),
        first_name: "Sarah".to_string(),
        last_name: "Johnson".to_string(),
        phone: Some("(555) 123-4567".to_string()),
        address: None,
        emergency_contact_name: None,
        emergency_contact_phone: None,
    }
}

async fn mount_no_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.sarah@example.com"))
        .respond_with(ResponseTemplate::new(406).set_body_json(no_rows_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_signup_inserts_hashed_user_and_issues_token() {
    let server = setup_mock_server().await;
    mount_no_user(&server).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_partial_json(json!({
            "email": "sarah@example.com",
            "first_name": "Sarah",
            "last_name": "Johnson",
            "profile_completed": false,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(user_row("u1", "sarah@example.com", "")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let auth = auth_service(&server);
    let session = assert_ok!(auth.signup(&signup_request()).await);

    assert_eq!(session.user.user_id, "u1");
    assert_eq!(session.user.name, "Sarah Johnson");

    let verified = assert_ok!(auth.verify(&session.token));
    assert_eq!(verified, session.user);

    let cookie = session_cookie(&session.token, true);
    let header = cookie.split(';').next().unwrap_or_default();
    assert_eq!(token_from_cookie_header(header), Some(session.token.as_str()));

    let requests = server.received_requests().await.unwrap_or_default();
    let insert = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("insert request");
    let body: serde_json::Value = serde_json::from_slice(&insert.body).unwrap();
    let stored_hash = body["password_hash"].as_str().unwrap();
    assert!(stored_hash.starts_with("$2"));
    assert_ne!(stored_hash, "hunter22!");
}

#[tokio::test]
async fn test_signup_existing_email_rejected() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_row("u1", "sarah@example.com", "x")),
        )
        .mount(&server)
        .await;

    let err = auth_service(&server)
        .signup(&signup_request())
        .await
        .unwrap_err();
    assert!(matches!(err, CarpoolError::UserExists { ref email } if email == "sarah@example.com"));
}

#[tokio::test]
async fn test_signup_conflict_on_insert_is_user_exists() {
    let server = setup_mock_server().await;
    mount_no_user(&server).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"users_email_key\"",
        })))
        .mount(&server)
        .await;

    let err = auth_service(&server)
        .signup(&signup_request())
        .await
        .unwrap_err();
    assert!(matches!(err, CarpoolError::UserExists { .. }));
}

#[tokio::test]
async fn test_login_against_stored_hash() {
    let server = setup_mock_server().await;
    let hash = hash_password("hunter22!", 4).await.unwrap();
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.sarah@example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_row("u1", "sarah@example.com", &hash)),
        )
        .mount(&server)
        .await;

    let auth = auth_service(&server);
    let session = assert_ok!(
        auth.login(&LoginRequest {
            email: "sarah@example.com".to_string(),
            password: "hunter22!".to_string(),
        })
        .await
    );
    assert_eq!(session.user.email, "sarah@example.com");
    assert!(!auth.session().is_expired());

    let err = auth
        .login(&LoginRequest {
            email: "sarah@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CarpoolError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    let server = setup_mock_server().await;
    mount_no_user(&server).await;

    let err = auth_service(&server)
        .login(&LoginRequest {
            email: "sarah@example.com".to_string(),
            password: "hunter22!".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CarpoolError::InvalidCredentials));
}

#[test]
fn test_token_from_other_service_rejected() {
    let mine = TokenIssuer::new(Ed25519Signer::generate(), 3600);
    let theirs = TokenIssuer::new(Ed25519Signer::generate(), 3600);
    let user = zooschool_adapter::SessionUser {
        user_id: "u1".to_string(),
        email: "sarah@example.com".to_string(),
        name: "Sarah Johnson".to_string(),
    };
    let (token, _) = theirs.issue(&user).unwrap();
    assert!(matches!(mine.verify(&token), Err(CarpoolError::InvalidSignature)));
}
