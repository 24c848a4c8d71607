//! Profile file loading for configuration.
//!
//! Responsibilities:
//! - Load a named profile from the JSON profile file.
//! - Apply profile settings to a ConfigLoader instance.
//!
//! Invariants:
//! - Profile settings are applied before environment variables (env vars take precedence).
//! - Missing profiles are recorded for later error handling in build().

use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::{ProfileConfig, ProfileFile, default_config_path};

/// Apply profile configuration from the profile file to the loader.
///
/// If the file or the profile is not found, this records the missing profile
/// name for later error handling in `build()`.
pub fn apply_profile(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let profile_name = match loader.profile_name() {
        Some(name) => name.clone(),
        None => return Ok(()),
    };

    let config_path = match loader.config_path() {
        Some(path) => path.clone(),
        None => default_config_path().ok_or(ConfigError::ConfigDirUnavailable)?,
    };

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "Profile file does not exist");
        loader.set_profile_missing(Some(profile_name));
        return Ok(());
    }

    let file = ProfileFile::read(&config_path)?;
    match file.profile(&profile_name) {
        Some(profile) => {
            apply_profile_config(loader, profile);
            Ok(())
        }
        None => {
            loader.set_profile_missing(Some(profile_name));
            Ok(())
        }
    }
}

/// Apply profile configuration values to the loader.
fn apply_profile_config(loader: &mut ConfigLoader, profile: &ProfileConfig) {
    if let Some(url) = &profile.base_url {
        loader.set_base_url(Some(url.clone()));
    }
    if let Some(username) = &profile.username {
        loader.set_username(Some(username.clone()));
    }
    if let Some(password) = &profile.app_password {
        loader.set_app_password(Some(password.clone()));
    }
    if let Some(token) = &profile.api_token {
        loader.set_api_token(Some(token.clone()));
    }
    if let Some(skip) = profile.skip_verify {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = profile.timeout_seconds {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = profile.max_retries {
        loader.set_max_retries(Some(retries));
    }
    if let Some(concurrency) = profile.batch_concurrency {
        loader.set_batch_concurrency(Some(concurrency));
    }
    if let Some(secs) = profile.item_timeout_seconds {
        loader.set_item_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(per_page) = profile.per_page {
        loader.set_per_page(Some(per_page));
    }
    if let Some(enabled) = profile.use_bulk_endpoints {
        loader.set_use_bulk_endpoints(Some(enabled));
    }
    if let Some(size) = profile.bulk_chunk_size {
        loader.set_bulk_chunk_size(Some(size));
    }
    if let Some(phrase) = &profile.confirm_phrase {
        loader.set_confirm_phrase(Some(phrase.clone()));
    }
    if let Some(url) = &profile.order_resolution_url {
        loader.set_order_resolution_url(Some(url.clone()));
    }
}
