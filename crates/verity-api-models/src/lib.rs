#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared HTTP DTOs for the Verity coding and coverage API.
//!
//! Requests are modelled as one typed payload per endpoint so optional fields
//! are omitted from the wire instead of being sent as empty values. Responses
//! are left loosely typed: the service is free to add, drop or reshape fields,
//! and the CLI must render whatever arrives without failing.

pub mod request;
pub mod response;

pub use request::{
    BatchLookupRequest, CodeSystem, CoverageEvaluateRequest, IncludeExtra, WebhookCreateRequest,
    WebhookUpdateRequest,
};
pub use response::{ApiResponse, MISSING_PLACEHOLDER, Record, display_text};
