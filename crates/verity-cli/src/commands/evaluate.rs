use reqwest::Method;
use verity_api_models::CoverageEvaluateRequest;

use crate::cli::EvaluateArgs;
use crate::client::{CliError, CliResult};
use crate::commands::{RequestPlan, non_blank};
use crate::output::View;

pub(crate) const EVALUATE_PATH: &str = "/coverage/evaluate";

/// Build the `/coverage/evaluate` payload.
///
/// Only `policy_id` is always present. A zero or negative age and blank
/// strings are treated as "not supplied" and omitted.
pub(crate) fn build_coverage_evaluate(args: &EvaluateArgs) -> CoverageEvaluateRequest {
    let diagnosis_codes = args
        .diagnosis
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    CoverageEvaluateRequest {
        policy_id: args.policy_id.trim().to_string(),
        age: args
            .age
            .and_then(|age| u32::try_from(age).ok())
            .filter(|age| *age > 0),
        gender: non_blank(args.gender.as_deref()),
        diagnosis_codes: (!diagnosis_codes.is_empty()).then_some(diagnosis_codes),
        procedure_code: non_blank(args.procedure.as_deref()),
        modifier: non_blank(args.modifier.as_deref()),
        place_of_service: non_blank(args.place_of_service.as_deref()),
    }
}

pub(crate) fn plan_evaluate(args: &EvaluateArgs) -> CliResult<RequestPlan> {
    if args.policy_id.trim().is_empty() {
        return Err(CliError::validation("policy id must not be empty"));
    }
    RequestPlan::new(Method::POST, EVALUATE_PATH, View::Coverage)
        .with_body(&build_coverage_evaluate(args))
}
