/*
[INPUT]:  Credentials, signing keys, and a user store
[OUTPUT]: Password hashes, signed session tokens, auth sessions
[POS]:    Auth layer - email/password accounts and session tokens
[UPDATE]: When auth flow or token format changes
*/

pub mod cookie;
pub mod password;
pub mod persistent_key;
pub mod service;
pub mod session;
pub mod signer;
pub mod token;

pub use cookie::{SESSION_COOKIE, cleared_cookie, session_cookie, token_from_cookie_header};
pub use password::{hash_password, validate_password, verify_password};
pub use persistent_key::PersistentKeyManager;
pub use service::{AuthService, UserStore, default_key_dir, normalize_email};
pub use session::SessionStore;
pub use signer::Ed25519Signer;
pub use token::{DEFAULT_TOKEN_TTL_SECONDS, TokenIssuer};
