//! Output renderers and formatting helpers for CLI commands.
//!
//! Renderers are total over any JSON input: absent or mistyped fields are
//! skipped or shown as a placeholder, and an unexpected envelope collapses to
//! a single explanatory line.

use anyhow::anyhow;
use clap::ValueEnum;
use serde_json::Value;
use verity_api_models::{ApiResponse, Record, display_text};
use verity_config::OutputPreference;

use crate::client::{CliError, CliResult};

/// Visible width of a rendered code description.
pub(crate) const DESCRIPTION_CUTOFF: usize = 60;
/// Visible width of rendered matched-criteria text.
pub(crate) const CRITERIA_CUTOFF: usize = 120;
const ELLIPSIS: &str = "...";

pub(crate) const NO_RESULTS: &str = "No results found";
pub(crate) const NO_WEBHOOKS: &str = "No webhooks found";
pub(crate) const INVALID_FORMAT: &str = "Invalid response format";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    #[value(alias = "text")]
    Table,
    Json,
}

impl From<OutputFormat> for OutputPreference {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}

impl From<OutputPreference> for OutputFormat {
    fn from(preference: OutputPreference) -> Self {
        match preference {
            OutputPreference::Table => Self::Table,
            OutputPreference::Json => Self::Json,
        }
    }
}

/// Human-readable view selected by each command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum View {
    BatchTable,
    Coverage,
    WebhookList,
    WebhookDetail,
    WebhookDeleted { id: String },
    WebhookTest,
}

/// Render a decoded response either as pretty JSON or through `view`.
pub(crate) fn render(view: &View, response: &Value, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => render_json(response),
        OutputFormat::Table => Ok(match view {
            View::BatchTable => render_batch_table(response),
            View::Coverage => render_coverage(response),
            View::WebhookList => render_webhook_list(response),
            View::WebhookDetail => render_webhook_detail(response),
            View::WebhookDeleted { id } => format!("Webhook {id} deleted successfully\n"),
            View::WebhookTest => render_webhook_test(response),
        }),
    }
}

pub(crate) fn render_json(response: &Value) -> CliResult<String> {
    let text = serde_json::to_string_pretty(response)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    Ok(format!("{text}\n"))
}

pub(crate) fn render_batch_table(response: &Value) -> String {
    let Some(items) = ApiResponse::classify(response).non_empty_list() else {
        return finish(vec![NO_RESULTS.to_string()]);
    };

    let mut lines = vec![
        batch_row("CODE", "SYSTEM", "FOUND", "DESCRIPTION"),
        batch_row("----", "------", "-----", "-----------"),
    ];
    for entry in items.iter().filter_map(Record::from_value) {
        let description = entry
            .string("description")
            .map(|text| truncate(text, DESCRIPTION_CUTOFF))
            .unwrap_or_default();
        lines.push(batch_row(
            &entry.text("code"),
            &entry.text("code_system"),
            &entry.text("found"),
            &description,
        ));
    }
    finish(lines)
}

fn batch_row(code: &str, system: &str, found: &str, description: &str) -> String {
    format!("{code:<12} {system:<10} {found:<8} {description}")
        .trim_end()
        .to_string()
}

pub(crate) fn render_coverage(response: &Value) -> String {
    let Some(data) = ApiResponse::classify(response).object() else {
        return finish(vec![INVALID_FORMAT.to_string()]);
    };

    let verdict = if data.text("covered") == "true" {
        "COVERED"
    } else {
        "NOT COVERED"
    };
    let mut lines = vec![format!("Coverage: {verdict}")];

    if let Some(confidence) = data.value("confidence") {
        lines.push(format!("Confidence: {}", display_text(Some(confidence))));
    }

    if let Some(reasons) = data.non_empty_list("reasons") {
        lines.push(String::new());
        lines.push("Reasons:".to_string());
        for reason in reasons {
            lines.push(format!("  - {}", display_text(Some(reason))));
        }
    }

    if let Some(policy_id) = data.non_empty_string("policy_id") {
        lines.push(String::new());
        lines.push(format!("Policy: {policy_id}"));
    }

    if let Some(criteria) = data.non_empty_list("matched_criteria") {
        lines.push(String::new());
        lines.push("Matched Criteria:".to_string());
        for criterion in criteria.iter().filter_map(Record::from_value) {
            let section = criterion
                .string("section")
                .map(|section| format!("[{section}] "))
                .unwrap_or_default();
            let text = criterion
                .string("text")
                .map(|text| truncate(text, CRITERIA_CUTOFF))
                .unwrap_or_default();
            let line = format!("  {section}{text}");
            if !line.trim().is_empty() {
                lines.push(line.trim_end().to_string());
            }
        }
    }

    finish(lines)
}

pub(crate) fn render_webhook_list(response: &Value) -> String {
    let webhooks: Vec<Record<'_>> = ApiResponse::classify(response)
        .non_empty_list()
        .unwrap_or_default()
        .iter()
        .filter_map(Record::from_value)
        .collect();
    if webhooks.is_empty() {
        return finish(vec![NO_WEBHOOKS.to_string()]);
    }

    let mut lines = vec![format!("Found {} webhooks:", webhooks.len()), String::new()];
    for webhook in webhooks {
        push_webhook_block(&mut lines, webhook);
        lines.push("---".to_string());
    }
    finish(lines)
}

pub(crate) fn render_webhook_detail(response: &Value) -> String {
    let Some(webhook) = ApiResponse::classify(response).object() else {
        return finish(vec![INVALID_FORMAT.to_string()]);
    };
    let mut lines = Vec::new();
    push_webhook_block(&mut lines, webhook);
    finish(lines)
}

fn push_webhook_block(lines: &mut Vec<String>, webhook: Record<'_>) {
    lines.push(format!("ID: {}", webhook.text("id")));
    lines.push(format!("URL: {}", webhook.text("url")));
    if let Some(events) = webhook.list("events") {
        let names = events
            .iter()
            .map(|event| display_text(Some(event)))
            .collect::<Vec<_>>();
        lines.push(format!("Events: {}", names.join(", ")));
    }
    if let Some(status) = webhook.string("status") {
        lines.push(format!("Status: {status}"));
    }
    if let Some(secret) = webhook.non_empty_string("secret") {
        lines.push(format!("Secret: {secret}"));
    }
    if let Some(created_at) = webhook.string("created_at") {
        lines.push(format!("Created: {created_at}"));
    }
}

pub(crate) fn render_webhook_test(response: &Value) -> String {
    let Some(result) = ApiResponse::classify(response).object() else {
        return finish(vec![INVALID_FORMAT.to_string()]);
    };

    let mut lines = vec![format!("Test Result: {}", result.text("status"))];
    if let Some(code) = result.value("status_code") {
        lines.push(format!("Response Code: {}", display_text(Some(code))));
    }
    if let Some(duration) = result.value("duration_ms") {
        lines.push(format!("Duration: {}ms", display_text(Some(duration))));
    }
    if let Some(error) = result.non_empty_string("error") {
        lines.push(format!("Error: {error}"));
    }
    finish(lines)
}

/// Shorten `text` to at most `cutoff` visible characters, ending in `...`
/// when anything was removed.
#[must_use]
pub(crate) fn truncate(text: &str, cutoff: usize) -> String {
    if text.chars().count() <= cutoff {
        return text.to_string();
    }
    let keep = cutoff.saturating_sub(ELLIPSIS.len());
    let mut shortened: String = text.chars().take(keep).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}

fn finish(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
