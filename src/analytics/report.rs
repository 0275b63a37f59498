//! Plain-text rendering of stage-2 analytics for terminals.

use crate::domain::{short_model_name, ConversationSummary, Stage2Interaction, Stage2Report};

const WIDTH: usize = 80;
const INDENT: &str = "  ";

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

/// Render the full stage-2 report for one conversation.
pub fn render_stage2(conversation_id: &str, report: &Stage2Report) -> String {
    let mut lines = vec![
        rule('='),
        format!("Stage 2 Analytics for Conversation: {}", conversation_id),
        rule('='),
        String::new(),
        format!("Conversation Title: {}", report.title),
        format!("Created: {}", report.created_at),
        format!("Total Interactions: {}", report.total_interactions),
        String::new(),
        rule('='),
    ];

    let interactions = match report.stage2_data.as_deref() {
        Some(data) if !data.is_empty() => data,
        _ => {
            lines.push(String::new());
            lines.push(
                report
                    .message
                    .clone()
                    .unwrap_or_else(|| "No Stage 2 data available".to_string()),
            );
            return join(lines);
        }
    };

    for (i, interaction) in interactions.iter().enumerate() {
        render_interaction(&mut lines, i + 1, interaction);
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines.push("End of Stage 2 Analytics".to_string());
    lines.push(rule('='));
    join(lines)
}

fn render_interaction(lines: &mut Vec<String>, number: usize, interaction: &Stage2Interaction) {
    let label_map = &interaction.metadata.label_to_model;

    lines.push(String::new());
    lines.push(rule('#'));
    lines.push(format!(
        "INTERACTION {} (Message Index: {})",
        number, interaction.message_index
    ));
    lines.push(rule('#'));

    lines.push(String::new());
    lines.push("User Question:".to_string());
    lines.push(format!("{}{}", INDENT, interaction.user_question));

    if !label_map.is_empty() {
        lines.push(String::new());
        lines.push("Model Mapping (Anonymization):".to_string());
        // BTreeMap iterates in label order
        for (label, model) in label_map {
            lines.push(format!("{}{} -> {}", INDENT, label, short_model_name(model)));
        }
    }

    let aggregate = &interaction.metadata.aggregate_rankings;
    if !aggregate.is_empty() {
        lines.push(String::new());
        lines.push("Aggregate Rankings (Street Cred):".to_string());
        for (rank, entry) in aggregate.iter().enumerate() {
            lines.push(format!(
                "{}#{}: {} (avg rank: {:.2}, {} votes)",
                INDENT,
                rank + 1,
                short_model_name(&entry.model),
                entry.average_rank,
                entry.rankings_count
            ));
        }
    }

    lines.push(String::new());
    lines.push(rule('-'));
    lines.push("INDIVIDUAL PEER REVIEWS:".to_string());
    lines.push(rule('-'));

    for (i, review) in interaction.stage2.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "[{}] Reviewer: {}",
            i + 1,
            short_model_name(&review.model)
        ));
        lines.push(rule('-'));

        if !review.parsed_ranking.is_empty() {
            lines.push(String::new());
            lines.push("Ranking Order:".to_string());
            for (pos, label) in review.parsed_ranking.iter().enumerate() {
                let model = label_map.get(label).map_or(label.as_str(), String::as_str);
                lines.push(format!(
                    "{}{}. {} ({})",
                    INDENT,
                    pos + 1,
                    label,
                    short_model_name(model)
                ));
            }
        }

        lines.push(String::new());
        lines.push("Full Review:".to_string());
        lines.push(rule('-'));
        for line in review.ranking.split('\n') {
            lines.extend(wrap_line(line));
        }
        lines.push(String::new());
    }

    if interaction.metadata.is_crisis {
        lines.push(String::new());
        lines.push("[!] CRISIS DETECTED - Crisis resources were shown to user".to_string());
    }
}

/// Indent a review line, word-wrapping anything wider than the terminal.
///
/// Lines that fit in 76 columns are kept verbatim (spacing included); longer
/// ones are re-flowed on whitespace so no output line passes 80 columns
/// unless a single word does.
pub fn wrap_line(line: &str) -> Vec<String> {
    if line.chars().count() <= WIDTH - INDENT.len() * 2 {
        return vec![format!("{}{}", INDENT, line)];
    }

    let mut wrapped = Vec::new();
    let mut current = INDENT.to_string();
    for word in line.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 <= WIDTH {
            current.push_str(word);
            current.push(' ');
        } else {
            wrapped.push(current.trim_end().to_string());
            current = format!("{}{} ", INDENT, word);
        }
    }
    if !current.trim().is_empty() {
        wrapped.push(current.trim_end().to_string());
    }
    wrapped
}

/// Render the conversation listing; conversations without messages are skipped.
pub fn render_conversation_list(conversations: &[ConversationSummary]) -> String {
    let mut lines = vec![
        String::new(),
        rule('='),
        "Available Conversations".to_string(),
        rule('='),
    ];

    for conv in conversations.iter().filter(|c| c.message_count > 0) {
        lines.push(String::new());
        lines.push(format!("ID: {}", conv.id));
        lines.push(format!("{}Title: {}", INDENT, conv.title));
        lines.push(format!("{}Messages: {}", INDENT, conv.message_count));
        lines.push(format!("{}Created: {}", INDENT, conv.created_at));
        if conv.starred {
            lines.push(format!("{}[STARRED]", INDENT));
        }
    }

    lines.push(String::new());
    lines.push(rule('='));
    join(lines)
}

fn join(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
