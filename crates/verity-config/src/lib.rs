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

//! Credential and endpoint resolution for the Verity CLI.
//!
//! Layout: `model.rs` (file schema and resolved settings), `loader.rs`
//! (config file discovery and precedence rules), `defaults.rs` (fallback
//! values), `error.rs` (`ConfigError`).
//!
//! Precedence, later wins:
//! 1. Built-in defaults (timeout and output only; the base URL is required)
//! 2. Config file (`$VERITY_CONFIG`, `$XDG_CONFIG_HOME/verity/config.toml`,
//!    the platform config directory, then `~/.verity/config.toml`)
//! 3. Command-line flags and their environment variables

mod defaults;
pub mod error;
pub mod loader;
pub mod model;

pub use defaults::DEFAULT_TIMEOUT_SECS;
pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_ENV, SearchRoots, load_settings, resolve};
pub use model::{ClientSettings, ConfigFile, OutputPreference, Overrides};
