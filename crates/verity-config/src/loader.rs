//! Config file discovery, parsing, and precedence resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::defaults::{APP_DIR, CONFIG_FILE_NAME, DEFAULT_TIMEOUT_SECS, HOME_APP_DIR};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ClientSettings, ConfigFile, Overrides};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VERITY_CONFIG";

/// Directories searched for a config file, captured up front so discovery
/// can be exercised without touching the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots {
    /// Value of `$VERITY_CONFIG`.
    pub explicit: Option<PathBuf>,
    /// Value of `$XDG_CONFIG_HOME`.
    pub xdg_config_home: Option<PathBuf>,
    /// Platform config directory (`dirs::config_dir`).
    pub config_dir: Option<PathBuf>,
    /// User home directory.
    pub home_dir: Option<PathBuf>,
}

impl SearchRoots {
    /// Capture the search roots from the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            explicit: env::var_os(CONFIG_ENV).map(PathBuf::from),
            xdg_config_home: env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            config_dir: dirs::config_dir(),
            home_dir: dirs::home_dir(),
        }
    }

    /// Candidate config file paths in search order, without duplicates.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = &self.explicit {
            paths.push(path.clone());
        }
        if let Some(root) = &self.xdg_config_home {
            paths.push(root.join(APP_DIR).join(CONFIG_FILE_NAME));
        }
        if let Some(root) = &self.config_dir {
            paths.push(root.join(APP_DIR).join(CONFIG_FILE_NAME));
        }
        if let Some(home) = &self.home_dir {
            paths.push(home.join(HOME_APP_DIR).join(CONFIG_FILE_NAME));
        }
        let mut unique = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        unique
    }

    /// First candidate that exists on disk.
    #[must_use]
    pub fn discover(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|path| path.is_file())
    }
}

impl ConfigFile {
    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not a valid config document.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file = toml::from_str::<Self>(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }
}

/// Load the config file (explicit path, or the first discovered one) and
/// resolve it against the supplied overrides.
///
/// # Errors
///
/// Returns an error when an explicit or discovered config file cannot be read
/// or parsed, or when a resolved value is invalid.
pub fn load_settings(
    overrides: &Overrides,
    explicit: Option<&Path>,
    roots: &SearchRoots,
) -> ConfigResult<ClientSettings> {
    let file = match explicit {
        Some(path) => ConfigFile::load(path)?,
        None => match roots.discover() {
            Some(path) => ConfigFile::load(&path)?,
            None => {
                debug!("no config file found; using defaults");
                ConfigFile::default()
            }
        },
    };
    resolve(overrides, &file)
}

/// Apply precedence (overrides, then file, then defaults) and validate.
///
/// Blank strings are treated as unset at every level.
///
/// # Errors
///
/// Returns [`ConfigError::MissingValue`] when no source supplies a base URL
/// and [`ConfigError::InvalidValue`] when the base URL does not parse,
/// uses a scheme other than `http`/`https`, or the timeout is zero.
pub fn resolve(overrides: &Overrides, file: &ConfigFile) -> ConfigResult<ClientSettings> {
    let raw_url = first_non_blank(&[overrides.base_url.as_deref(), file.base_url.as_deref()])
        .ok_or(ConfigError::MissingValue {
            field: "base_url",
            hint: "pass --api-url, set VERITY_API_URL, or add base_url to the config file",
        })?;
    let base_url = parse_base_url(raw_url)?;

    let api_key = first_non_blank(&[overrides.api_key.as_deref(), file.api_key.as_deref()])
        .map(str::to_string);

    let timeout_secs = overrides
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "timeout",
            value: timeout_secs.to_string(),
            reason: "must be greater than zero",
        });
    }

    Ok(ClientSettings {
        base_url,
        api_key,
        timeout: Duration::from_secs(timeout_secs),
        output: overrides.output.or(file.output).unwrap_or_default(),
    })
}

fn first_non_blank<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidValue {
        field: "base_url",
        value: raw.to_string(),
        reason: "not a valid URL",
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field: "base_url",
            value: raw.to_string(),
            reason: "scheme must be http or https",
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutputPreference;
    use std::error::Error;

    type TestResult = Result<(), Box<dyn Error>>;

    #[test]
    fn base_url_is_required() {
        let err = resolve(&Overrides::default(), &ConfigFile::default())
            .expect_err("a base URL must be configured");
        assert!(matches!(err, ConfigError::MissingValue { field: "base_url", .. }));
        assert!(err.to_string().contains("--api-url"));

        let blank = Overrides {
            base_url: Some("  ".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            resolve(&blank, &ConfigFile::default()),
            Err(ConfigError::MissingValue { .. })
        ));
    }

    #[test]
    fn defaults_fill_everything_but_the_base_url() -> TestResult {
        let file = ConfigFile {
            base_url: Some("https://coding.example/api/v1".into()),
            ..ConfigFile::default()
        };
        let settings = resolve(&Overrides::default(), &file)?;
        assert_eq!(settings.base_url.as_str(), "https://coding.example/api/v1");
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.output, OutputPreference::Table);
        Ok(())
    }

    #[test]
    fn overrides_win_over_file_values() -> TestResult {
        let file = ConfigFile {
            api_key: Some("file-key".into()),
            base_url: Some("https://file.example/api/v1".into()),
            timeout_secs: Some(5),
            output: Some(OutputPreference::Json),
        };
        let overrides = Overrides {
            api_key: Some("flag-key".into()),
            base_url: Some("https://flag.example/api/v2".into()),
            timeout_secs: Some(9),
            output: Some(OutputPreference::Table),
        };
        let settings = resolve(&overrides, &file)?;
        assert_eq!(settings.api_key.as_deref(), Some("flag-key"));
        assert_eq!(settings.base_url.as_str(), "https://flag.example/api/v2");
        assert_eq!(settings.timeout, Duration::from_secs(9));
        assert_eq!(settings.output, OutputPreference::Table);
        Ok(())
    }

    #[test]
    fn blank_overrides_fall_through_to_file() -> TestResult {
        let file = ConfigFile {
            api_key: Some("file-key".into()),
            base_url: Some("https://file.example/api/v1".into()),
            ..ConfigFile::default()
        };
        let overrides = Overrides {
            api_key: Some("   ".into()),
            base_url: Some(String::new()),
            ..Overrides::default()
        };
        let settings = resolve(&overrides, &file)?;
        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        assert_eq!(settings.base_url.as_str(), "https://file.example/api/v1");
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_url = Overrides {
            base_url: Some("not a url".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            resolve(&bad_url, &ConfigFile::default()),
            Err(ConfigError::InvalidValue { field: "base_url", .. })
        ));

        let bad_scheme = Overrides {
            base_url: Some("ftp://files.example".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            resolve(&bad_scheme, &ConfigFile::default()),
            Err(ConfigError::InvalidValue { reason, .. }) if reason.contains("scheme")
        ));

        let zero_timeout = Overrides {
            base_url: Some("https://coding.example/api/v1".into()),
            timeout_secs: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            resolve(&zero_timeout, &ConfigFile::default()),
            Err(ConfigError::InvalidValue { field: "timeout", .. })
        ));
    }

    #[test]
    fn candidates_follow_search_order() {
        let roots = SearchRoots {
            explicit: Some(PathBuf::from("/etc/verity.toml")),
            xdg_config_home: Some(PathBuf::from("/xdg")),
            config_dir: Some(PathBuf::from("/xdg")),
            home_dir: Some(PathBuf::from("/home/user")),
        };
        assert_eq!(
            roots.candidates(),
            vec![
                PathBuf::from("/etc/verity.toml"),
                PathBuf::from("/xdg/verity/config.toml"),
                PathBuf::from("/home/user/.verity/config.toml"),
            ]
        );
    }

    #[test]
    fn discover_returns_none_without_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        let roots = SearchRoots {
            home_dir: Some(dir.path().to_path_buf()),
            ..SearchRoots::default()
        };
        assert_eq!(roots.discover(), None);
        Ok(())
    }

    #[test]
    fn load_reports_parse_errors_with_path() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"k\"\nunexpected = true\n")?;
        let err = ConfigFile::load(&path).expect_err("unknown keys are rejected");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
        Ok(())
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let err = load_settings(
            &Overrides::default(),
            Some(Path::new("/definitely/not/here/verity.toml")),
            &SearchRoots::default(),
        )
        .expect_err("missing explicit file is an error");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
