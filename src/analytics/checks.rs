//! End-to-end smoke checks for the admin stage-2 endpoint.

use reqwest::StatusCode;

use crate::analytics::{AdminClient, ClientError, Probe};
use crate::domain::Stage2Report;

/// Conversation id that no service should know about.
pub const UNKNOWN_CONVERSATION_ID: &str = "fake-id-12345";

/// Result of one probe.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub details: Vec<String>,
}

impl CheckOutcome {
    fn new(name: &str, passed: bool) -> Self {
        Self {
            name: name.to_string(),
            passed,
            details: Vec::new(),
        }
    }

    fn detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }
}

/// Probe the stage-2 endpoint with a good key, a wrong key, no key and an unknown id.
///
/// Stops after the first step when no conversation has messages yet.
pub async fn run_admin_checks(client: &AdminClient) -> Result<Vec<CheckOutcome>, ClientError> {
    let conversations = client.list_conversations().await?;
    let Some(conversation) = conversations.iter().find(|c| c.message_count > 0) else {
        return Ok(vec![CheckOutcome::new("find conversation with messages", false)
            .detail("No conversations with messages found. Please send a message first.")]);
    };

    let mut outcomes = vec![CheckOutcome::new("find conversation with messages", true).detail(
        format!(
            "Found conversation: {} with {} messages",
            conversation.id, conversation.message_count
        ),
    )];

    let probe = client
        .probe_stage2(&conversation.id, client.admin_key())
        .await?;
    let mut correct = CheckOutcome::new("correct admin key", probe.status == StatusCode::OK)
        .detail(format!("Status: {}", probe.status.as_u16()));
    if correct.passed {
        match serde_json::from_value::<Stage2Report>(probe.body) {
            Ok(report) => {
                correct = correct
                    .detail(format!("Conversation: {}", report.title))
                    .detail(format!("Total interactions: {}", report.total_interactions));
                correct = match report.stage2_data.as_deref() {
                    Some(data @ [first, ..]) => correct
                        .detail(format!(
                            "Found Stage 2 data for {} interactions",
                            data.len()
                        ))
                        .detail(format!(
                            "First question: {}...",
                            first.user_question.chars().take(50).collect::<String>()
                        ))
                        .detail(format!("Number of rankings: {}", first.stage2.len()))
                        .detail(format!(
                            "Aggregate rankings: {} models",
                            first.metadata.aggregate_rankings.len()
                        )),
                    _ => correct.detail(format!(
                        "Message: {}",
                        report.message.unwrap_or_default()
                    )),
                };
            }
            Err(e) => {
                correct.passed = false;
                correct = correct.detail(format!("Unexpected body: {}", e));
            }
        }
    } else {
        correct = correct.detail(format!("Response: {}", probe.body));
    }
    outcomes.push(correct);

    // Derived from the real key so it can never match it
    let wrong_key = format!("{}-wrong", client.admin_key().unwrap_or("admin"));
    let probe = client.probe_stage2(&conversation.id, Some(&wrong_key)).await?;
    outcomes.push(expect_status("wrong admin key", StatusCode::FORBIDDEN, probe));

    let probe = client.probe_stage2(&conversation.id, None).await?;
    outcomes.push(expect_status("missing admin key", StatusCode::FORBIDDEN, probe));

    let probe = client
        .probe_stage2(UNKNOWN_CONVERSATION_ID, client.admin_key())
        .await?;
    outcomes.push(expect_status(
        "unknown conversation",
        StatusCode::NOT_FOUND,
        probe,
    ));

    Ok(outcomes)
}

fn expect_status(name: &str, expected: StatusCode, probe: Probe) -> CheckOutcome {
    CheckOutcome::new(name, probe.status == expected)
        .detail(format!(
            "Status: {} (expected {})",
            probe.status.as_u16(),
            expected.as_u16()
        ))
        .detail(format!("Message: {}", probe.detail()))
}
