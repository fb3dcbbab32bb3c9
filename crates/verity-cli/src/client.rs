//! HTTP transport and error types shared by every command.

use std::fmt::{self, Display, Formatter};

use anyhow::anyhow;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, trace};
use verity_config::ClientSettings;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
const USER_AGENT: &str = concat!("verity-cli/", env!("CARGO_PKG_VERSION"));

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    /// User-facing message, collapsed onto a single line.
    pub(crate) fn display_message(&self) -> String {
        let message = match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        };
        single_line(&message)
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Thin JSON-over-HTTP client bound to the configured API base URL.
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client carrying the request id, credentials, and timeout.
    pub(crate) fn new(settings: &ClientSettings, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        if let Some(api_key) = &settings.api_key {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                CliError::validation("API key contains characters that cannot be sent in a header")
            })?;
            bearer.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, bearer);
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    /// Resolve an API path against the base URL, keeping any version prefix
    /// the base URL carries.
    pub(crate) fn endpoint(&self, path: &str) -> CliResult<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|err| CliError::failure(anyhow!("invalid request path '{path}': {err}")))
    }

    /// Issue a request and decode the JSON response.
    ///
    /// An empty success body decodes to `Value::Null`. Non-2xx statuses,
    /// network failures, and undecodable bodies all surface as
    /// `CliError::Failure`.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> CliResult<Value> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            trace!(%body, "request body");
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            debug!(error = %err, "request failed");
            CliError::failure(anyhow!("request to {path} failed: {err}"))
        })?;

        if !response.status().is_success() {
            return Err(classify_problem(response).await);
        }

        let bytes = response.bytes().await.map_err(|err| {
            CliError::failure(anyhow!("failed to read response from {path}: {err}"))
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| CliError::failure(anyhow!("failed to decode response from {path}: {err}")))
    }
}

/// Classify an HTTP error response into a CLI error.
async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();

    let message = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .and_then(|body| problem_message(&body))
        .or_else(|| (!body_text.is_empty()).then_some(body_text));

    debug!(%status, "server returned an error status");
    let detail = match message {
        Some(message) => format!("{message} (status {status})"),
        None => format!("request failed with status {status}"),
    };
    CliError::failure(anyhow!(detail))
}

/// Pull a human-readable message out of a JSON error body.
fn problem_message(body: &Value) -> Option<String> {
    [
        body.pointer("/error/message"),
        body.get("error"),
        body.get("message"),
        body.get("detail"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .map(str::trim)
    .find(|message| !message.is_empty())
    .map(str::to_string)
}

fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) fn test_client(base_url: &str, api_key: Option<&str>) -> ApiClient {
    use std::time::Duration;
    use verity_config::OutputPreference;

    let settings = ClientSettings {
        base_url: base_url.parse().expect("valid base URL"),
        api_key: api_key.map(str::to_string),
        timeout: Duration::from_secs(5),
        output: OutputPreference::Table,
    };
    ApiClient::new(&settings, "trace-test").expect("client builds")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn endpoint_keeps_version_prefix() -> CliResult<()> {
        let client = test_client("https://api.example.com/api/v1", None);
        assert_eq!(
            client.endpoint("/codes/batch")?.as_str(),
            "https://api.example.com/api/v1/codes/batch"
        );
        let trailing = test_client("https://api.example.com/api/v1/", None);
        assert_eq!(
            trailing.endpoint("/webhooks/wh_1/test")?.as_str(),
            "https://api.example.com/api/v1/webhooks/wh_1/test"
        );
        Ok(())
    }

    #[test]
    fn problem_message_prefers_nested_error_message() {
        assert_eq!(
            problem_message(&json!({"error": {"message": "invalid code", "code": "E1"}})),
            Some("invalid code".to_string())
        );
        assert_eq!(
            problem_message(&json!({"error": "unauthorized"})),
            Some("unauthorized".to_string())
        );
        assert_eq!(
            problem_message(&json!({"message": "rate limited"})),
            Some("rate limited".to_string())
        );
        assert_eq!(problem_message(&json!({"error": {"code": 7}})), None);
    }

    #[test]
    fn display_message_is_single_line() {
        let err = CliError::failure(anyhow!("upstream said:\n  line one\n  line two"));
        assert_eq!(err.display_message(), "upstream said: line one line two");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(CliError::validation("bad input").exit_code(), 2);
    }

    #[tokio::test]
    async fn request_sends_bearer_and_request_id() -> CliResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/webhooks")
                .header("authorization", "Bearer vk_test")
                .header(HEADER_REQUEST_ID, "trace-test");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"data": []}));
        });

        let client = test_client(&format!("{}/api/v1", server.base_url()), Some("vk_test"));
        let body = client.request(Method::GET, "/webhooks", None).await?;
        assert_eq!(body, json!({"data": []}));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn empty_success_body_decodes_to_null() -> CliResult<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/v1/webhooks/wh_1");
            then.status(204);
        });

        let client = test_client(&format!("{}/api/v1", server.base_url()), None);
        let body = client
            .request(Method::DELETE, "/webhooks/wh_1", None)
            .await?;
        assert_eq!(body, Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn error_status_surfaces_server_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/coverage/evaluate");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({"error": {"message": "policy not found"}}));
        });

        let client = test_client(&format!("{}/api/v1", server.base_url()), None);
        let err = client
            .request(Method::POST, "/coverage/evaluate", Some(&json!({"policy_id": "X"})))
            .await
            .expect_err("404 should fail");
        assert!(matches!(err, CliError::Failure(_)));
        let message = err.display_message();
        assert!(message.contains("policy not found"), "{message}");
        assert!(message.contains("404"), "{message}");
    }

    #[tokio::test]
    async fn malformed_json_is_a_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/webhooks");
            then.status(200).body("<html>oops</html>");
        });

        let client = test_client(&format!("{}/api/v1", server.base_url()), None);
        let err = client
            .request(Method::GET, "/webhooks", None)
            .await
            .expect_err("html is not json");
        assert!(err.display_message().contains("failed to decode response"));
    }
}
