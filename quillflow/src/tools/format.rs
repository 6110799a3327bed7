//! Markdown rendering of the final response.

use crate::model::Source;

/// Renders the answer as markdown.
///
/// The summary section is always present. Claims, evidence, and sources
/// sections are only rendered when they have content.
#[must_use]
pub fn format_markdown(
    query: &str,
    summary: &str,
    claims: &[String],
    evidence: &[String],
    sources: &[Source],
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Research Summary for: **{query}**\n"));
    lines.push("## Overview\n".to_string());
    lines.push(format!("{summary}\n"));

    if !claims.is_empty() {
        lines.push("## Key Claims\n".to_string());
        for (idx, claim) in claims.iter().enumerate() {
            lines.push(format!("{}. {claim}", idx + 1));
        }
        lines.push(String::new());
    }

    if !evidence.is_empty() {
        lines.push("## Supporting Evidence\n".to_string());
        for (idx, item) in evidence.iter().enumerate() {
            lines.push(format!("{}. {item}", idx + 1));
        }
        lines.push(String::new());
    }

    if !sources.is_empty() {
        lines.push("## Sources Consulted\n".to_string());
        for (idx, source) in sources.iter().enumerate() {
            lines.push(format!("- {}. {}", idx + 1, source.title));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
