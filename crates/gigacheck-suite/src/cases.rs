//! Assertions for each scenario

use gigacheck_client::Session;

use crate::accumulator::{ModelResponses, UniquenessCheck};
use crate::context::{ensure, ScenarioContext, ScenarioError};
use crate::scenario::{Scenario, EMPTY_MESSAGE_STATUS, INVALID_MODEL_STATUSES};

/// Run one case: exactly one POST, then the case's assertions
pub async fn execute(
    scenario: &Scenario,
    session: &Session,
    ctx: &mut ScenarioContext,
    responses: &mut ModelResponses,
) -> Result<(), ScenarioError> {
    let payload = scenario.payload(&session.config().api.model);
    let response = ctx.send(session, &payload).await?;

    match scenario {
        Scenario::Basic => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            ctx.expect_consistent_usage(&completion)?;
            ctx.step("Check reply has text", || {
                ensure(!completion.text().is_empty(), || "reply content is empty".to_string())
            })
        }
        Scenario::SystemPrompt => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            expect_assistant_role(ctx, completion.role())
        }
        Scenario::MultiTurn => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            ctx.step("Check tokens were used", || {
                ensure(completion.usage.total_tokens > 0, || {
                    "usage.total_tokens is 0".to_string()
                })
            })
        }
        Scenario::Temperature(_) => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            ctx.expect_consistent_usage(&completion)
        }
        Scenario::MaxTokens(cap) => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            ctx.expect_consistent_usage(&completion)?;
            let used = completion.usage.completion_tokens;
            ctx.step(format!("Check completion_tokens <= {}", cap), || {
                ensure(used <= *cap, || {
                    format!("completion_tokens {} exceeds max_tokens {}", used, cap)
                })
            })
        }
        Scenario::EmptyMessage => ctx.expect_status(&response, EMPTY_MESSAGE_STATUS),
        Scenario::InvalidModel(_) => ctx.expect_status_in(&response, &INVALID_MODEL_STATUSES),
        Scenario::ResponseStructure => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            expect_assistant_role(ctx, completion.role())?;
            ctx.expect_consistent_usage(&completion)
        }
        Scenario::CrossModel(model) => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            ctx.expect_consistent_usage(&completion)?;
            let check = responses.record(model, completion.text());
            ctx.step("Check replies differ between models", || match check {
                UniquenessCheck::Duplicates(pairs) => Err(ScenarioError::Assertion(format!(
                    "identical replies from {}",
                    pairs
                        .iter()
                        .map(|(a, b)| format!("{} and {}", a, b))
                        .collect::<Vec<_>>()
                        .join(", ")
                ))),
                UniquenessCheck::Pending { have, need } => {
                    tracing::debug!(have, need, "Waiting for more models before comparing");
                    Ok(())
                }
                UniquenessCheck::Distinct | UniquenessCheck::AlreadyChecked => Ok(()),
            })
        }
        Scenario::Multilingual => {
            ctx.expect_status(&response, 200)?;
            let completion = ctx.expect_completion(&response)?;
            ctx.expect_consistent_usage(&completion)?;
            ctx.step("Check reply contains Latin letters", || {
                ensure(contains_latin(completion.text()), || {
                    format!("no ASCII letters in reply: {}", completion.text())
                })
            })
        }
    }
}

fn expect_assistant_role(ctx: &mut ScenarioContext, role: Option<&str>) -> Result<(), ScenarioError> {
    ctx.step("Check reply role is assistant", || {
        ensure(role == Some("assistant"), || {
            format!("reply role must be assistant, got {:?}", role)
        })
    })
}

/// At least one ASCII letter
pub fn contains_latin(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}
