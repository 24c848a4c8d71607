//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `ROSTER_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Loading from profile files (see profile.rs).
//! - Building the final Config (see builder.rs).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid values return ConfigError::InvalidValue naming the variable, never echoing it.

use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable into `T`, mapping failures to `InvalidValue`.
fn parse_env<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expected.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
///
/// Environment variables take precedence over profile settings. `ROSTER_PROFILE`
/// and `ROSTER_CONFIG_PATH` only apply when the loader has no value yet.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.profile_name().is_none()
        && let Some(profile) = env_var_or_none("ROSTER_PROFILE")
    {
        loader.set_profile_name(Some(profile));
    }
    if loader.config_path().is_none()
        && let Some(path) = env_var_or_none("ROSTER_CONFIG_PATH")
    {
        loader.set_config_path(Some(PathBuf::from(path)));
    }

    if let Some(url) = env_var_or_none("ROSTER_BASE_URL") {
        loader.set_base_url(Some(url));
    }
    if let Some(username) = env_var_or_none("ROSTER_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("ROSTER_APP_PASSWORD") {
        loader.set_app_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = env_var_or_none("ROSTER_API_TOKEN") {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(skip) = parse_env::<bool>("ROSTER_SKIP_VERIFY", "must be true or false")? {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = parse_env::<u64>("ROSTER_TIMEOUT", "must be a number of seconds")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) =
        parse_env::<usize>("ROSTER_MAX_RETRIES", "must be a non-negative integer")?
    {
        loader.set_max_retries(Some(retries));
    }
    if let Some(concurrency) =
        parse_env::<usize>("ROSTER_BATCH_CONCURRENCY", "must be a positive integer")?
    {
        loader.set_batch_concurrency(Some(concurrency));
    }
    if let Some(secs) = parse_env::<u64>("ROSTER_ITEM_TIMEOUT", "must be a number of seconds")? {
        loader.set_item_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(per_page) = parse_env::<u32>("ROSTER_PER_PAGE", "must be a positive integer")? {
        loader.set_per_page(Some(per_page));
    }
    if let Some(enabled) =
        parse_env::<bool>("ROSTER_USE_BULK_ENDPOINTS", "must be true or false")?
    {
        loader.set_use_bulk_endpoints(Some(enabled));
    }
    if let Some(size) =
        parse_env::<usize>("ROSTER_BULK_CHUNK_SIZE", "must be a positive integer")?
    {
        loader.set_bulk_chunk_size(Some(size));
    }
    // Case-sensitive; only surrounding whitespace is dropped.
    if let Some(phrase) = env_var_or_none("ROSTER_CONFIRM_PHRASE") {
        loader.set_confirm_phrase(Some(phrase));
    }
    if let Some(url) = env_var_or_none("ROSTER_ORDER_RESOLUTION_URL") {
        loader.set_order_resolution_url(Some(url));
    }
    Ok(())
}
