//! Config file schema and the resolved settings handed to the HTTP client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Preferred rendering of command output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputPreference {
    /// Human-readable tables and summaries.
    #[default]
    Table,
    /// Raw JSON passthrough.
    Json,
}

/// On-disk TOML document. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the API, including its version prefix.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Default output mode.
    #[serde(default)]
    pub output: Option<OutputPreference>,
}

/// Values supplied on the command line or through environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--api-key` / `VERITY_API_KEY`.
    pub api_key: Option<String>,
    /// `--api-url` / `VERITY_API_URL`.
    pub base_url: Option<String>,
    /// `--timeout` / `VERITY_HTTP_TIMEOUT_SECS`.
    pub timeout_secs: Option<u64>,
    /// `--output`.
    pub output: Option<OutputPreference>,
}

/// Fully resolved settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL every request path is appended to.
    pub base_url: Url,
    /// Bearer credential, when configured.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Output mode for this invocation.
    pub output: OutputPreference,
}
