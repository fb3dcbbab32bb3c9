use reqwest::Method;
use url::form_urlencoded;
use verity_api_models::{WebhookCreateRequest, WebhookUpdateRequest};

use crate::cli::WebhookCommand;
use crate::client::{CliError, CliResult};
use crate::commands::{RequestPlan, non_blank};
use crate::output::View;

pub(crate) const WEBHOOKS_PATH: &str = "/webhooks";

/// Split a comma-separated event list, trimming entries and dropping empties.
pub(crate) fn split_events(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|event| !event.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn build_webhook_create(url: &str, events: &str) -> WebhookCreateRequest {
    WebhookCreateRequest {
        url: url.trim().to_string(),
        events: split_events(events),
    }
}

/// Build a partial update; fields left unset (or blank) are not sent.
pub(crate) fn build_webhook_update(url: Option<&str>, events: Option<&str>) -> WebhookUpdateRequest {
    WebhookUpdateRequest {
        url: non_blank(url),
        events: events
            .map(split_events)
            .filter(|events| !events.is_empty()),
    }
}

pub(crate) fn plan_webhooks(command: WebhookCommand) -> CliResult<RequestPlan> {
    match command {
        WebhookCommand::List => Ok(RequestPlan::new(
            Method::GET,
            WEBHOOKS_PATH,
            View::WebhookList,
        )),
        WebhookCommand::Create(args) => {
            let payload = build_webhook_create(&args.url, &args.events);
            if payload.url.is_empty() {
                return Err(CliError::validation("--url must not be empty"));
            }
            if payload.events.is_empty() {
                return Err(CliError::validation(
                    "--events must name at least one event type",
                ));
            }
            RequestPlan::new(Method::POST, WEBHOOKS_PATH, View::WebhookDetail).with_body(&payload)
        }
        WebhookCommand::Update(args) => {
            let id = webhook_id(&args.id)?;
            let payload = build_webhook_update(args.url.as_deref(), args.events.as_deref());
            RequestPlan::new(Method::PATCH, webhook_path(id), View::WebhookDetail)
                .with_body(&payload)
        }
        WebhookCommand::Delete(args) => {
            let id = webhook_id(&args.id)?;
            Ok(RequestPlan::new(
                Method::DELETE,
                webhook_path(id),
                View::WebhookDeleted { id: id.to_string() },
            ))
        }
        WebhookCommand::Test(args) => {
            let id = webhook_id(&args.id)?;
            Ok(RequestPlan::new(
                Method::POST,
                format!("{}/test", webhook_path(id)),
                View::WebhookTest,
            ))
        }
    }
}

fn webhook_id(raw: &str) -> CliResult<&str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(CliError::validation("webhook id must not be empty"));
    }
    if matches!(id, "." | "..") {
        return Err(CliError::validation(format!("'{id}' is not a valid webhook id")));
    }
    Ok(id)
}

/// Path of one webhook. The id is percent-encoded into a single segment so
/// `/`, `?`, `#` and `%` cannot escape `/webhooks/{id}`.
fn webhook_path(id: &str) -> String {
    let segment = form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("{WEBHOOKS_PATH}/{segment}")
}
