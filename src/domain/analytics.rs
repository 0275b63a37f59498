//! Stage-2 analytics payloads.
//!
//! Stage 2 is the peer-review round of a council answer: every model ranks
//! the anonymised responses of the others. These types mirror what the
//! conversation service returns to admins; they are read-only here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Conversation listing entry from `GET /api/conversations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub starred: bool,
}

/// Body of `GET /api/admin/conversations/{id}/stage2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage2Report {
    pub title: String,
    pub created_at: String,
    pub total_interactions: u64,
    #[serde(default)]
    pub stage2_data: Option<Vec<Stage2Interaction>>,
    /// Explanation sent when there is nothing to show.
    #[serde(default)]
    pub message: Option<String>,
}

/// One user question and the peer reviews it received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage2Interaction {
    pub message_index: u64,
    pub user_question: String,
    #[serde(default)]
    pub stage2: Vec<PeerReview>,
    #[serde(default)]
    pub metadata: Stage2Metadata,
}

/// A single model's ranking of its peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerReview {
    /// Reviewing model, e.g. `openai/gpt-4o`.
    pub model: String,
    /// Full review text.
    pub ranking: String,
    /// Anonymous labels in ranked order, e.g. `["Response B", "Response A"]`.
    #[serde(default)]
    pub parsed_ranking: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stage2Metadata {
    /// Anonymous label to real model id.
    #[serde(default)]
    pub label_to_model: BTreeMap<String, String>,
    /// Best first.
    #[serde(default)]
    pub aggregate_rankings: Vec<AggregateRanking>,
    #[serde(default)]
    pub is_crisis: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRanking {
    pub model: String,
    pub average_rank: f64,
    pub rankings_count: u64,
}

/// Last path segment of a model id (`openai/gpt-4o` becomes `gpt-4o`).
pub fn short_model_name(model: &str) -> &str {
    model.rsplit('/').next().unwrap_or(model)
}
