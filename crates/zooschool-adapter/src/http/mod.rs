/*
[INPUT]:  HTTP client configuration and backend table endpoints
[OUTPUT]: HTTP responses and typed backend results
[POS]:    HTTP layer - backend REST communication
[UPDATE]: When adding new tables or changing client behavior
*/

pub mod client;
pub mod error;
pub mod profiles;
pub mod trips;
pub mod users;
pub mod vehicles;

pub use error::{CarpoolError, Result};

pub use client::{CarpoolClient, ClientConfig};
