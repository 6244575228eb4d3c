//! Sequential suite runner
//!
//! Acquires the session credential once, then executes each case in order.
//! A credential failure is a setup error: every selected case is reported as
//! [`Outcome::SetupError`] and no chat request is sent.

use std::time::Instant;

use chrono::Utc;
use tracing::Instrument;

use gigacheck_client::Session;
use gigacheck_observability::{create_scenario_span, create_session_span};

use crate::accumulator::ModelResponses;
use crate::cases;
use crate::context::ScenarioContext;
use crate::report::{CaseReport, Outcome, SuiteReport};
use crate::scenario::Scenario;

pub struct SuiteRunner<'a> {
    session: &'a Session,
    responses: ModelResponses,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            responses: ModelResponses::default(),
        }
    }

    /// Replies gathered by the cross-model cases so far
    pub fn responses(&self) -> &ModelResponses {
        &self.responses
    }

    /// Run `cases` in order and build the report
    pub async fn run(&mut self, cases: &[Scenario]) -> SuiteReport {
        let started_at = Utc::now();
        let base_url = self.session.config().api.base_url.clone();
        let span = create_session_span(&base_url);

        let reports = async {
            tracing::info!(cases = cases.len(), "Starting suite");

            if let Err(e) = self.session.credential().await {
                tracing::error!(category = e.category(), error = %e, "Session setup failed");
                let message = e.to_string();
                return cases
                    .iter()
                    .map(|case| {
                        CaseReport::new(
                            case,
                            Outcome::SetupError {
                                message: message.clone(),
                            },
                        )
                    })
                    .collect::<Vec<_>>();
            }

            let mut reports = Vec::with_capacity(cases.len());
            for case in cases {
                reports.push(self.run_case(case).await);
            }
            reports
        }
        .instrument(span)
        .await;

        let report = SuiteReport::new(base_url, started_at, reports);
        tracing::info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            xfail = report.summary.expected_failures,
            xpass = report.summary.unexpected_passes,
            errors = report.summary.setup_errors,
            "Suite finished"
        );
        report
    }

    async fn run_case(&mut self, case: &Scenario) -> CaseReport {
        let id = case.id();
        let span = create_scenario_span(&id);
        let session = self.session;
        let responses = &mut self.responses;

        async move {
            let started = Instant::now();
            let mut ctx = ScenarioContext::new();
            let result = cases::execute(case, session, &mut ctx, responses).await;
            let outcome = Outcome::resolve(case.expectation(), result);

            match &outcome {
                Outcome::Failed { message } => tracing::warn!(error = %message, "Case failed"),
                Outcome::ExpectedFailure { reason, .. } => {
                    tracing::info!(reason = %reason, "Case failed as expected")
                }
                Outcome::UnexpectedPass { reason } => {
                    tracing::info!(reason = %reason, "Known-flaky case passed")
                }
                _ => tracing::info!(outcome = outcome.label(), "Case finished"),
            }

            let (steps, attachments) = ctx.into_parts();
            let mut report = CaseReport::new(case, outcome);
            report.steps = steps;
            report.attachments = attachments;
            report.duration_ms = started.elapsed().as_millis() as u64;
            report
        }
        .instrument(span)
        .await
    }
}
