/*
[INPUT]:  Auth sessions from signup/login
[OUTPUT]: Current token, user, and expiration status
[POS]:    Auth layer - in-process session holder
[UPDATE]: When adding session refresh or changing storage strategy
*/

use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::types::{AuthSession, SessionUser};

/// Thread-safe holder of the signed-in session
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    data: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionStore {
    /// Create a new empty session store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, session: AuthSession) {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session);
    }

    /// Current token, if one is held and not yet expired
    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current().map(|session| session.user)
    }

    pub fn is_expired(&self) -> bool {
        self.current().is_none()
    }

    /// Held session including an expired one
    pub fn session(&self) -> Option<AuthSession> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    fn current(&self) -> Option<AuthSession> {
        self.session()
            .filter(|session| Utc::now() < session.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration) -> AuthSession {
        AuthSession {
            token: "test_token".to_string(),
            expires_at: Utc::now() + expires_in,
            user: SessionUser {
                user_id: "u1".to_string(),
                email: "sarah@example.com".to_string(),
                name: "Sarah Johnson".to_string(),
            },
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::new();
        assert!(store.token().is_none());
        assert!(store.is_expired());
    }

    #[test]
    fn test_set_and_get_token() {
        let store = SessionStore::new();
        store.set(session(Duration::hours(1)));

        assert_eq!(store.token(), Some("test_token".to_string()));
        assert_eq!(store.user().unwrap().name, "Sarah Johnson");
        assert!(!store.is_expired());
    }

    #[test]
    fn test_expired_session_hides_token() {
        let store = SessionStore::new();
        store.set(session(Duration::seconds(-1)));

        assert!(store.token().is_none());
        assert!(store.is_expired());
        assert!(store.session().is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.set(session(Duration::hours(1)));
        other.clear();
        assert!(store.session().is_none());
    }
}
