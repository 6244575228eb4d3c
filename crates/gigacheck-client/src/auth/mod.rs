//! OAuth client-credentials exchange
//!
//! The harness never refreshes: one credential is acquired per session and
//! used until the process exits.

pub mod token;

pub use token::{acquire_token, Credential, TokenProvider, TokenResponse};
