//! # gigacheck-suite
//!
//! Parametrized contract scenarios for `POST /chat/completions`.
//!
//! Each [`Scenario`] sends exactly one request through a shared
//! [`gigacheck_client::Session`] and checks status, schema and the case's own
//! assertions. [`SuiteRunner`] runs a selection in order and produces a
//! [`SuiteReport`] with per-case steps and the request/response bodies.

pub mod accumulator;
pub mod cases;
pub mod context;
pub mod report;
pub mod runner;
pub mod scenario;

pub use accumulator::{ModelResponses, UniquenessCheck};
pub use context::{ScenarioContext, ScenarioError};
pub use report::{Attachment, CaseReport, Outcome, StepRecord, StepStatus, SuiteReport, Summary};
pub use runner::SuiteRunner;
pub use scenario::{filter_catalog, Expectation, Scenario, Severity};
