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
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for the Verity medical coding and coverage API.
//!
//! Layout:
//! - `cli.rs`: argument parsing and the top-level run loop
//! - `commands/`: request builders and the command table, grouped by concern
//! - `client.rs`: HTTP transport and CLI error types
//! - `output.rs`: response renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::run;
