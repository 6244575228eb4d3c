//! gigacheck observability
//!
//! Subscriber setup and the spans the harness opens around scenarios and
//! HTTP requests.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::LoggingConfig;
pub use error::{ObservabilityError, Result};
pub use logging::{create_request_span, create_scenario_span, create_session_span, LogManager};
