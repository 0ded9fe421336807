/*
[INPUT]:  Signup/login forms, a user store, and a token issuer
[OUTPUT]: Auth sessions (signed token + user claims)
[POS]:    Auth layer - orchestrates signup, login, verify, logout
[UPDATE]: When account rules or session claims change
*/

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::http::{CarpoolClient, CarpoolError, Result};
use crate::types::{AuthSession, LoginRequest, NewUser, SessionUser, SignupRequest, User};

use super::password::{DEFAULT_BCRYPT_COST, hash_password, validate_password, verify_password};
use super::{DEFAULT_TOKEN_TTL_SECONDS, PersistentKeyManager, SessionStore, TokenIssuer};

/// Key file name for the session signing key
pub const SESSION_KEY_NAME: &str = "session";

/// Where accounts live
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn insert_user(&self, user: &NewUser) -> Result<User>;
}

#[async_trait]
impl UserStore for CarpoolClient {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        CarpoolClient::find_user_by_email(self, email).await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        CarpoolClient::insert_user(self, user).await.map_err(|err| match err {
            // unique constraint on email lost a race with another signup
            CarpoolError::Api { code: 409, .. } => CarpoolError::UserExists {
                email: user.email.clone(),
            },
            other => other,
        })
    }
}

/// Email/password accounts backed by a [`UserStore`]
#[derive(Debug)]
pub struct AuthService<S> {
    store: S,
    issuer: TokenIssuer,
    session: SessionStore,
    bcrypt_cost: u32,
    /// Hash checked when no real one exists, so misses cost a full bcrypt round
    dummy_hash: OnceCell<String>,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, issuer: TokenIssuer) -> Self {
        Self {
            store,
            issuer,
            session: SessionStore::new(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Sign tokens with the persisted key under `key_dir`, creating it on first use.
    pub fn with_key_dir(store: S, key_dir: impl AsRef<Path>) -> Result<Self> {
        let keys = PersistentKeyManager::new(key_dir);
        let signer = keys.get_or_create_signer(SESSION_KEY_NAME).map_err(|e| {
            CarpoolError::Config(format!("failed to load or create session signing key: {e}"))
        })?;
        Ok(Self::new(
            store,
            TokenIssuer::new(signer, DEFAULT_TOKEN_TTL_SECONDS),
        ))
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self.dummy_hash = OnceCell::new();
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an account and sign it in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthSession> {
        let email = normalize_email(&request.email)?;
        let first_name = required(&request.first_name, "first name")?;
        let last_name = required(&request.last_name, "last name")?;
        validate_password(&request.password)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!(%email, "signup for existing account");
            return Err(CarpoolError::UserExists { email });
        }

        let password_hash = hash_password(&request.password, self.bcrypt_cost).await?;
        let new_user = NewUser {
            email,
            password_hash,
            first_name,
            last_name,
            phone: optional(&request.phone),
            address: optional(&request.address),
            emergency_contact_name: optional(&request.emergency_contact_name),
            emergency_contact_phone: optional(&request.emergency_contact_phone),
            profile_completed: false,
        };

        let user = self.store.insert_user(&new_user).await?;
        info!(user_id = %user.id, "account created");
        self.start_session(&user)
    }

    /// Check credentials and sign in. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
        let email = normalize_email(&request.email)?;
        if request.password.is_empty() {
            return Err(CarpoolError::Validation("password is required".to_string()));
        }

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            debug!(%email, "login for unknown account");
            self.burn_verify(&request.password).await?;
            return Err(CarpoolError::InvalidCredentials);
        };
        if user.password_hash.is_empty() {
            warn!(user_id = %user.id, "account has no password hash");
            self.burn_verify(&request.password).await?;
            return Err(CarpoolError::InvalidCredentials);
        }
        if !verify_password(&request.password, &user.password_hash).await? {
            return Err(CarpoolError::InvalidCredentials);
        }

        info!(user_id = %user.id, "signed in");
        self.start_session(&user)
    }

    pub fn verify(&self, token: &str) -> Result<SessionUser> {
        self.issuer.verify(token)
    }

    pub fn logout(&self) {
        if let Some(user) = self.session.user() {
            info!(user_id = %user.user_id, "signed out");
        }
        self.session.clear();
    }

    /// Verify against a throwaway hash of the configured cost; the result is discarded
    async fn burn_verify(&self, password: &str) -> Result<()> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| hash_password("zooschool-no-account", self.bcrypt_cost))
            .await?;
        verify_password(password, hash).await?;
        Ok(())
    }

    fn start_session(&self, user: &User) -> Result<AuthSession> {
        let claims = SessionUser {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.display_name(),
        };
        let (token, expires_at) = self.issuer.issue(&claims)?;
        let session = AuthSession {
            token,
            expires_at,
            user: claims,
        };
        self.session.set(session.clone());
        Ok(session)
    }
}

/// Default directory for the session signing key: `./.zooschool/keys`
pub fn default_key_dir() -> PathBuf {
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    base_dir.join(".zooschool").join("keys")
}

pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(CarpoolError::Validation("email is required".to_string()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(CarpoolError::Validation(format!("invalid email: {email}"))),
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CarpoolError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
