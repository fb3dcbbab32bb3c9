//! Request payloads accepted by the Verity API.
//!
//! Optional fields use `Option` with `skip_serializing_if` so that "not
//! requested" is expressed by omitting the key. The service treats an absent
//! filter differently from a filter on the empty string.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Classification scheme a medical code belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CodeSystem {
    /// Current Procedural Terminology.
    #[serde(rename = "CPT")]
    Cpt,
    /// Healthcare Common Procedure Coding System.
    #[serde(rename = "HCPCS")]
    Hcpcs,
    /// International Classification of Diseases, 10th revision.
    #[serde(rename = "ICD-10")]
    Icd10,
    /// National Drug Code.
    #[serde(rename = "NDC")]
    Ndc,
}

impl CodeSystem {
    /// Wire representation of the code system.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpt => "CPT",
            Self::Hcpcs => "HCPCS",
            Self::Icd10 => "ICD-10",
            Self::Ndc => "NDC",
        }
    }
}

impl Display for CodeSystem {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Extra data a lookup may attach to each matched code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IncludeExtra {
    /// Relative value units.
    Rvu,
    /// Coverage policies referencing the code.
    Policies,
}

impl IncludeExtra {
    /// Wire representation of the extra.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rvu => "rvu",
            Self::Policies => "policies",
        }
    }

    /// Join a list of extras into the comma-separated form the API expects.
    #[must_use]
    pub fn join(extras: &[Self]) -> String {
        extras
            .iter()
            .map(|extra| extra.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Body of `POST /codes/batch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchLookupRequest {
    /// Codes to look up; never empty.
    pub codes: Vec<String>,
    /// Restrict matches to a single code system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_system: Option<CodeSystem>,
    /// Comma-joined list of extras to attach to each result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
}

/// Body of `POST /coverage/evaluate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageEvaluateRequest {
    /// Policy the evaluation runs against.
    pub policy_id: String,
    /// Patient age in years. Zero is indistinguishable from "unset" and is
    /// never sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Patient gender as a short code (for example `M` or `F`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// ICD-10 diagnosis codes supporting the procedure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    /// CPT/HCPCS procedure being evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_code: Option<String>,
    /// Procedure modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    /// Place-of-service code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_service: Option<String>,
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookCreateRequest {
    /// Endpoint the service delivers events to.
    pub url: String,
    /// Event types the subscription receives; never empty.
    pub events: Vec<String>,
}

/// Body of `PATCH /webhooks/{id}`. Only supplied fields are sent, so an
/// untouched patch serializes to `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookUpdateRequest {
    /// Replacement endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Replacement event type list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
}
