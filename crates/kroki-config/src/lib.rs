//! Configuration management for the pandoc Kroki filter.
//!
//! Configuration is read once from the process environment into an immutable
//! [`Config`] value that is handed to each component at construction.
//!
//! CLI settings can be applied after loading via [`CliSettings`].
//!
//! ## Environment Variables
//!
//! - `KROKI_VERBOSE` - `1`, `true` or `yes` (case-insensitive) enables info logging
//! - `KROKI_SERVER` - Kroki base URL (default: `https://kroki.io`)
//! - `KROKI_CACHE` - cache directory (default: `.kroki-cache`), `~` and `${VAR}` expanded
//! - `KROKI_DIAGRAM_BLACKLIST` - comma-separated diagram identifiers to skip
//! - `KROKI_TIMEOUT` - per-request timeout in seconds (default: 40)

mod expand;

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable enabling informational logging.
pub const VERBOSE_VAR: &str = "KROKI_VERBOSE";
/// Environment variable overriding the Kroki server URL.
pub const SERVER_VAR: &str = "KROKI_SERVER";
/// Environment variable overriding the cache directory.
pub const CACHE_VAR: &str = "KROKI_CACHE";
/// Environment variable listing excluded diagram identifiers.
pub const BLACKLIST_VAR: &str = "KROKI_DIAGRAM_BLACKLIST";
/// Environment variable overriding the per-request timeout.
pub const TIMEOUT_VAR: &str = "KROKI_TIMEOUT";

/// Default public Kroki endpoint.
pub const DEFAULT_SERVER_URL: &str = "https://kroki.io";
/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".kroki-cache";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(40);

/// CLI settings that override environment values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Kroki server URL.
    pub kroki_url: Option<String>,
    /// Override cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Override per-request timeout.
    pub timeout: Option<Duration>,
    /// Override verbosity.
    pub verbose: Option<bool>,
}

/// Filter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sanitized Kroki base URL, without trailing slash.
    pub server_url: String,
    /// Directory holding rendered diagrams.
    pub cache_dir: PathBuf,
    /// Raw exclusion list. Filtering against known identifiers is done
    /// by the type registry.
    pub blacklist: Vec<String>,
    /// Whether informational logging is enabled.
    pub verbose: bool,
    /// Timeout applied to every Kroki request.
    pub timeout: Duration,
    /// Informational notes collected while loading (e.g. URL sanitization).
    ///
    /// Loading happens before logging is initialized, so notes are kept here
    /// and logged by the caller.
    pub notices: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            blacklist: Vec::new(),
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
            notices: Vec::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Variable the value came from (e.g., "`KROKI_CACHE`").
        field: String,
        /// Error message (e.g., "${`HOME`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a value cannot be parsed or expanded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if a value cannot be parsed or expanded.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(VERBOSE_VAR) {
            config.verbose = parse_flag(&value);
        }

        if let Some(raw) = lookup(SERVER_VAR) {
            config.set_server_url(&raw);
        }

        if let Some(raw) = lookup(CACHE_VAR) {
            let expanded = expand::expand_path(&raw, CACHE_VAR, &lookup)?;
            config.cache_dir = PathBuf::from(expanded);
        }

        if let Some(raw) = lookup(BLACKLIST_VAR) {
            config.blacklist = parse_list(&raw);
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    /// Load configuration from the environment, apply CLI settings and validate.
    ///
    /// # Errors
    ///
    /// Returns error if loading or validation fails.
    pub fn load(cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = Self::from_env()?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(kroki_url) = &settings.kroki_url {
            self.set_server_url(kroki_url);
        }
        if let Some(cache_dir) = &settings.cache_dir {
            self.cache_dir.clone_from(cache_dir);
        }
        if let Some(timeout) = settings.timeout {
            self.timeout = timeout;
        }
        if let Some(verbose) = settings.verbose {
            self.verbose = verbose;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server_url, SERVER_VAR)?;
        require_http_url(&self.server_url, SERVER_VAR)?;

        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{CACHE_VAR} cannot be empty"
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Validation(format!(
                "{TIMEOUT_VAR} must be greater than 0"
            )));
        }

        Ok(())
    }

    fn set_server_url(&mut self, raw: &str) {
        let sanitized = sanitize_server_url(raw);
        if sanitized != raw {
            self.notices
                .push(format!("Sanitized {SERVER_VAR}: {raw:?} -> {sanitized:?}"));
        }
        self.server_url = sanitized;
    }
}

/// Clean up a server URL copied from shell configuration.
///
/// Strips surrounding whitespace, then double quotes, then single quotes,
/// then any trailing slashes.
#[must_use]
pub fn sanitize_server_url(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim_end_matches('/')
        .to_owned()
}

/// Interpret a boolean-ish environment flag.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Split a comma-separated list, dropping blank entries.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            ConfigError::Validation(format!(
                "{TIMEOUT_VAR} must be a whole number of seconds, got {value:?}"
            ))
        })
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}
