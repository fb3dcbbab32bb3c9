//! Command-line client for the Verity medical coding and coverage API.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;
use verity_api_models::{CodeSystem, IncludeExtra};
use verity_config::{Overrides, SearchRoots, load_settings};
use verity_telemetry::{LogFormat, LoggingConfig, init_logging, level_for_verbosity};

use crate::client::{ApiClient, CliError, CliResult};
use crate::commands::{execute, plan};
use crate::output::OutputFormat;

const LOG_FORMAT_ENV: &str = "VERITY_LOG_FORMAT";

/// Parses CLI arguments, executes the requested command, and reports any
/// error on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_cli_logging(cli.verbose);

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let span = info_span!("command", command = command_name, trace_id = %trace_id);

    let roots = SearchRoots::from_env();
    let result = dispatch(cli, &trace_id, &roots, &mut io::stdout())
        .instrument(span)
        .await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            let message = err.display_message();
            debug!(command = command_name, error = %message, "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

async fn dispatch<W: Write>(
    cli: Cli,
    trace_id: &str,
    roots: &SearchRoots,
    out: &mut W,
) -> CliResult<()> {
    let plan = plan(cli.command)?;

    let overrides = Overrides {
        api_key: cli.api_key,
        base_url: cli.api_url,
        timeout_secs: cli.timeout,
        output: cli.output.map(Into::into),
    };
    let settings =
        load_settings(&overrides, cli.config.as_deref(), roots).map_err(CliError::failure)?;
    let client = ApiClient::new(&settings, trace_id)?;

    execute(&client, plan, settings.output.into(), out).await
}

fn init_cli_logging(verbosity: u8) {
    let format = env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|raw| LogFormat::parse(&raw))
        .unwrap_or(LogFormat::Compact);
    let config = LoggingConfig {
        level: level_for_verbosity(verbosity),
        format,
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err:#}");
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "verity",
    version,
    about = "Command-line client for the Verity medical coding and coverage API"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "VERITY_API_URL",
        help = "Base URL of the API, including the version prefix"
    )]
    pub(crate) api_url: Option<String>,
    #[arg(long, global = true, env = "VERITY_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = "VERITY_HTTP_TIMEOUT_SECS",
        help = "Request timeout in seconds"
    )]
    pub(crate) timeout: Option<u64>,
    #[arg(long, global = true, value_name = "PATH", help = "Read settings from this file")]
    pub(crate) config: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        help = "Select output format (table or json)"
    )]
    pub(crate) output: Option<OutputFormat>,
    #[arg(
        short = 'v',
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity on stderr"
    )]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Batch lookup of medical codes
    Batch(BatchArgs),
    /// Evaluate coverage for a procedure against a policy
    Evaluate(EvaluateArgs),
    /// Manage webhook subscriptions
    #[command(subcommand)]
    Webhooks(WebhookCommand),
}

#[derive(Subcommand, Debug)]
pub(crate) enum WebhookCommand {
    /// List webhook subscriptions
    List,
    /// Create a webhook subscription
    Create(WebhookCreateArgs),
    /// Update a webhook subscription
    Update(WebhookUpdateArgs),
    /// Delete a webhook subscription
    Delete(WebhookIdArgs),
    /// Send a test delivery to a webhook
    Test(WebhookIdArgs),
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    #[arg(required = true, value_name = "CODE", help = "Codes to look up")]
    pub(crate) codes: Vec<String>,
    #[arg(
        short = 's',
        long,
        value_enum,
        ignore_case = true,
        help = "Restrict matches to one code system"
    )]
    pub(crate) system: Option<CodeSystemArg>,
    #[arg(
        short = 'i',
        long,
        value_enum,
        value_delimiter = ',',
        help = "Attach extra data to each result"
    )]
    pub(crate) include: Vec<IncludeArg>,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    #[arg(value_name = "POLICY_ID", help = "Policy identifier")]
    pub(crate) policy_id: String,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Patient age in years; zero or negative is not sent"
    )]
    pub(crate) age: Option<i64>,
    #[arg(long, help = "Patient gender (M or F)")]
    pub(crate) gender: Option<String>,
    #[arg(
        short = 'd',
        long,
        value_delimiter = ',',
        help = "ICD-10 diagnosis codes"
    )]
    pub(crate) diagnosis: Vec<String>,
    #[arg(short = 'p', long, help = "CPT/HCPCS procedure code")]
    pub(crate) procedure: Option<String>,
    #[arg(short = 'm', long, help = "Procedure modifier")]
    pub(crate) modifier: Option<String>,
    #[arg(long = "pos", alias = "place-of-service", help = "Place of service code")]
    pub(crate) place_of_service: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct WebhookCreateArgs {
    #[arg(long, help = "Endpoint that receives deliveries")]
    pub(crate) url: String,
    #[arg(long, help = "Comma-separated event types")]
    pub(crate) events: String,
}

#[derive(Args, Debug)]
pub(crate) struct WebhookUpdateArgs {
    #[arg(help = "Webhook identifier")]
    pub(crate) id: String,
    #[arg(long, help = "Replacement endpoint URL")]
    pub(crate) url: Option<String>,
    #[arg(long, help = "Replacement comma-separated event types")]
    pub(crate) events: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct WebhookIdArgs {
    #[arg(help = "Webhook identifier")]
    pub(crate) id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum CodeSystemArg {
    #[value(name = "CPT")]
    Cpt,
    #[value(name = "HCPCS")]
    Hcpcs,
    #[value(name = "ICD-10", alias = "ICD10")]
    Icd10,
    #[value(name = "NDC")]
    Ndc,
}

impl From<CodeSystemArg> for CodeSystem {
    fn from(value: CodeSystemArg) -> Self {
        match value {
            CodeSystemArg::Cpt => Self::Cpt,
            CodeSystemArg::Hcpcs => Self::Hcpcs,
            CodeSystemArg::Icd10 => Self::Icd10,
            CodeSystemArg::Ndc => Self::Ndc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum IncludeArg {
    Rvu,
    Policies,
}

impl From<IncludeArg> for IncludeExtra {
    fn from(value: IncludeArg) -> Self {
        match value {
            IncludeArg::Rvu => Self::Rvu,
            IncludeArg::Policies => Self::Policies,
        }
    }
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Batch(_) => "batch",
        Command::Evaluate(_) => "evaluate",
        Command::Webhooks(WebhookCommand::List) => "webhooks_list",
        Command::Webhooks(WebhookCommand::Create(_)) => "webhooks_create",
        Command::Webhooks(WebhookCommand::Update(_)) => "webhooks_update",
        Command::Webhooks(WebhookCommand::Delete(_)) => "webhooks_delete",
        Command::Webhooks(WebhookCommand::Test(_)) => "webhooks_test",
    }
}
