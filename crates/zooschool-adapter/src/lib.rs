/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public ZooSchool adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod maps;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthService,
    Ed25519Signer,
    PersistentKeyManager,
    SessionStore,
    TokenIssuer,
    UserStore,
};

// Re-export commonly used types from http
pub use http::{
    CarpoolClient,
    CarpoolError,
    ClientConfig,
    Result,
};

// Re-export all types
pub use types::*;
