//! Command table: every parsed command becomes a `RequestPlan` (verb, path,
//! payload, view) which `execute` sends and renders.

pub(crate) mod batch;
pub(crate) mod evaluate;
pub(crate) mod webhooks;

use std::io::Write;

use anyhow::anyhow;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cli::Command;
use crate::client::{ApiClient, CliError, CliResult};
use crate::output::{OutputFormat, View, render};

/// A fully built request plus the view used to render its response.
#[derive(Debug)]
pub(crate) struct RequestPlan {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<Value>,
    pub(crate) view: View,
}

impl RequestPlan {
    pub(crate) fn new(method: Method, path: impl Into<String>, view: View) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            view,
        }
    }

    pub(crate) fn with_body<T: Serialize>(mut self, payload: &T) -> CliResult<Self> {
        let body = serde_json::to_value(payload)
            .map_err(|err| CliError::failure(anyhow!("failed to encode request body: {err}")))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// Map a parsed command onto its request plan. Input-contract violations
/// are reported here, before anything is sent.
pub(crate) fn plan(command: Command) -> CliResult<RequestPlan> {
    match command {
        Command::Batch(args) => batch::plan_batch(&args),
        Command::Evaluate(args) => evaluate::plan_evaluate(&args),
        Command::Webhooks(command) => webhooks::plan_webhooks(command),
    }
}

/// Send a plan and write the rendered response to `out`.
pub(crate) async fn execute<W: Write>(
    client: &ApiClient,
    plan: RequestPlan,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    debug!(method = %plan.method, path = %plan.path, ?format, "executing command");
    let response = client
        .request(plan.method, &plan.path, plan.body.as_ref())
        .await?;
    let text = render(&plan.view, &response, format)?;
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write output: {err}")))
}

/// Trimmed copy of an optional string, `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
