use reqwest::Method;
use verity_api_models::{BatchLookupRequest, IncludeExtra};

use crate::cli::BatchArgs;
use crate::client::{CliError, CliResult};
use crate::commands::RequestPlan;
use crate::output::View;

pub(crate) const BATCH_PATH: &str = "/codes/batch";

/// Build the `/codes/batch` payload. `code_system` and `include` are omitted
/// entirely when not requested.
pub(crate) fn build_batch_lookup(args: &BatchArgs) -> BatchLookupRequest {
    let include = args
        .include
        .iter()
        .copied()
        .map(IncludeExtra::from)
        .collect::<Vec<_>>();
    BatchLookupRequest {
        codes: args.codes.clone(),
        code_system: args.system.map(Into::into),
        include: (!include.is_empty()).then(|| IncludeExtra::join(&include)),
    }
}

pub(crate) fn plan_batch(args: &BatchArgs) -> CliResult<RequestPlan> {
    if args.codes.iter().all(|code| code.trim().is_empty()) {
        return Err(CliError::validation("at least one code is required"));
    }
    RequestPlan::new(Method::POST, BATCH_PATH, View::BatchTable)
        .with_body(&build_batch_lookup(args))
}
