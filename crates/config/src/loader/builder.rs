//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from environment variables, profile files, and direct builder methods.
//! - Validate and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Profile file loading logic (delegated to profile.rs).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over profile file values.
//! - Builder methods take precedence over environment variables when applied last.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use super::profile::apply_profile;
use crate::constants::{
    MAX_BATCH_CONCURRENCY, MAX_BULK_CHUNK_SIZE, MAX_MAX_RETRIES, MAX_PER_PAGE, MAX_TIMEOUT_SECS,
};
use crate::types::{AuthConfig, AuthStrategy, BatchConfig, Config, ConnectionConfig};

/// Configuration loader that builds config from environment variables and profiles.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    username: Option<String>,
    app_password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    batch_concurrency: Option<usize>,
    item_timeout: Option<Duration>,
    per_page: Option<u32>,
    use_bulk_endpoints: Option<bool>,
    bulk_chunk_size: Option<usize>,
    confirm_phrase: Option<String>,
    failure_preview: Option<usize>,
    order_resolution_url: Option<String>,
    profile_name: Option<String>,
    profile_missing: Option<String>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Set the active profile name to load from the config file.
    pub fn with_profile_name(mut self, name: String) -> Self {
        self.profile_name = Some(name);
        self
    }

    /// Override the config file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read configuration from a profile in the config file.
    ///
    /// If the profile is not found, this records the missing profile name
    /// for later error handling in `build()`.
    pub fn from_profile(mut self) -> Result<Self, ConfigError> {
        apply_profile(&mut self)?;
        Ok(self)
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the username used with an application password.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the application password.
    pub fn with_app_password(mut self, password: String) -> Self {
        self.app_password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the number of concurrent provider calls per batch.
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = Some(concurrency);
        self
    }

    /// Set the per-item timeout.
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = Some(timeout);
        self
    }

    /// Set the search page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Route batches through the array-accepting endpoints.
    pub fn with_bulk_endpoints(mut self, enabled: bool) -> Self {
        self.use_bulk_endpoints = Some(enabled);
        self
    }

    /// Set the number of targets per array-endpoint call.
    pub fn with_bulk_chunk_size(mut self, size: usize) -> Self {
        self.bulk_chunk_size = Some(size);
        self
    }

    /// Set the phrase required to confirm destructive batches.
    pub fn with_confirm_phrase(mut self, phrase: String) -> Self {
        self.confirm_phrase = Some(phrase);
        self
    }

    /// Set how many failures a rendered summary lists.
    pub fn with_failure_preview(mut self, count: usize) -> Self {
        self.failure_preview = Some(count);
        self
    }

    /// Set the link shown when enrollments need a purchase.
    pub fn with_order_resolution_url(mut self, url: String) -> Self {
        self.order_resolution_url = Some(url);
        self
    }

    /// Check if we have a complete configuration (base_url + auth).
    fn has_complete_config(&self) -> bool {
        let has_complete_auth =
            self.api_token.is_some() || (self.username.is_some() && self.app_password.is_some());

        self.base_url.is_some() && has_complete_auth
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        if let Some(ref profile_name) = self.profile_missing {
            // Only suppress ProfileNotFound if we have a complete config from env/CLI
            if !self.has_complete_config() {
                return Err(ConfigError::ProfileNotFound(profile_name.clone()));
            }
        }

        let base_url = self
            .base_url
            .as_deref()
            .map(validate_and_normalize_base_url)
            .transpose()?
            .ok_or(ConfigError::MissingBaseUrl)?;

        // API token takes precedence
        let strategy = if let Some(token) = self.api_token {
            AuthStrategy::ApiToken { token }
        } else if let (Some(username), Some(password)) = (self.username, self.app_password) {
            AuthStrategy::ApplicationPassword { username, password }
        } else {
            return Err(ConfigError::MissingAuth);
        };

        let mut connection = ConnectionConfig::new(base_url);
        if let Some(skip) = self.skip_verify {
            connection.skip_verify = skip;
        }
        if let Some(timeout) = self.timeout {
            connection.timeout = timeout;
        }
        if let Some(retries) = self.max_retries {
            connection.max_retries = retries;
        }
        validate_connection(&connection)?;

        let defaults = BatchConfig::default();
        let batch = BatchConfig {
            concurrency: self.batch_concurrency.unwrap_or(defaults.concurrency),
            item_timeout: self.item_timeout.unwrap_or(defaults.item_timeout),
            per_page: self.per_page.unwrap_or(defaults.per_page),
            use_bulk_endpoints: self
                .use_bulk_endpoints
                .unwrap_or(defaults.use_bulk_endpoints),
            bulk_chunk_size: self.bulk_chunk_size.unwrap_or(defaults.bulk_chunk_size),
            confirm_phrase: self.confirm_phrase.unwrap_or(defaults.confirm_phrase),
            failure_preview: self.failure_preview.unwrap_or(defaults.failure_preview),
            order_resolution_url: self.order_resolution_url.or(defaults.order_resolution_url),
        };
        validate_batch(&batch)?;

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
            batch,
        })
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn profile_name(&self) -> Option<&String> {
        self.profile_name.as_ref()
    }

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_profile_name(&mut self, name: Option<String>) {
        self.profile_name = name;
    }

    pub(crate) fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    pub(crate) fn set_profile_missing(&mut self, name: Option<String>) {
        self.profile_missing = name;
    }

    pub(crate) fn set_base_url(&mut self, url: Option<String>) {
        self.base_url = url;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_app_password(&mut self, password: Option<SecretString>) {
        self.app_password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_batch_concurrency(&mut self, concurrency: Option<usize>) {
        self.batch_concurrency = concurrency;
    }

    pub(crate) fn set_item_timeout(&mut self, timeout: Option<Duration>) {
        self.item_timeout = timeout;
    }

    pub(crate) fn set_per_page(&mut self, per_page: Option<u32>) {
        self.per_page = per_page;
    }

    pub(crate) fn set_use_bulk_endpoints(&mut self, enabled: Option<bool>) {
        self.use_bulk_endpoints = enabled;
    }

    pub(crate) fn set_bulk_chunk_size(&mut self, size: Option<usize>) {
        self.bulk_chunk_size = size;
    }

    pub(crate) fn set_confirm_phrase(&mut self, phrase: Option<String>) {
        self.confirm_phrase = phrase;
    }

    pub(crate) fn set_order_resolution_url(&mut self, url: Option<String>) {
        self.order_resolution_url = url;
    }
}

fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
    let timeout_secs = connection.timeout.as_secs();
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            message: "timeout must be greater than 0 seconds".to_string(),
        });
    }
    if timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "timeout exceeds maximum allowed value of {} seconds",
                MAX_TIMEOUT_SECS
            ),
        });
    }
    if connection.max_retries > MAX_MAX_RETRIES {
        return Err(ConfigError::InvalidMaxRetries {
            message: format!(
                "must be between 0 and {} (got {})",
                MAX_MAX_RETRIES, connection.max_retries
            ),
        });
    }
    Ok(())
}

fn validate_batch(batch: &BatchConfig) -> Result<(), ConfigError> {
    if batch.concurrency == 0 || batch.concurrency > MAX_BATCH_CONCURRENCY {
        return Err(ConfigError::InvalidBatch {
            message: format!(
                "concurrency must be between 1 and {} (got {})",
                MAX_BATCH_CONCURRENCY, batch.concurrency
            ),
        });
    }
    if batch.item_timeout.is_zero() {
        return Err(ConfigError::InvalidBatch {
            message: "item timeout must be greater than 0 seconds".to_string(),
        });
    }
    if batch.per_page == 0 || batch.per_page > MAX_PER_PAGE {
        return Err(ConfigError::InvalidBatch {
            message: format!(
                "per_page must be between 1 and {} (got {})",
                MAX_PER_PAGE, batch.per_page
            ),
        });
    }
    if batch.bulk_chunk_size == 0 || batch.bulk_chunk_size > MAX_BULK_CHUNK_SIZE {
        return Err(ConfigError::InvalidBatch {
            message: format!(
                "bulk chunk size must be between 1 and {} (got {})",
                MAX_BULK_CHUNK_SIZE, batch.bulk_chunk_size
            ),
        });
    }
    if batch.confirm_phrase.trim().is_empty() {
        return Err(ConfigError::InvalidBatch {
            message: "confirm phrase must not be empty".to_string(),
        });
    }
    if let Some(url) = &batch.order_resolution_url {
        url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
            var: "order_resolution_url".into(),
            message: format!("must be an absolute URL: {e}"),
        })?;
    }
    Ok(())
}

fn validate_and_normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "base_url".into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. https://academy.example.com): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "base_url".into(),
            message: "host is required (e.g. https://academy.example.com)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
