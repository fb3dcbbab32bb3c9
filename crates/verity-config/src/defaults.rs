//! Fallback values used when neither flags nor the config file set a field.
//! The API base URL has no fallback and must always be configured.

/// Per-request HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// File name looked up inside each config directory.
pub(crate) const CONFIG_FILE_NAME: &str = "config.toml";
/// Application directory name inside config roots.
pub(crate) const APP_DIR: &str = "verity";
/// Dot-directory used under the home directory.
pub(crate) const HOME_APP_DIR: &str = ".verity";
