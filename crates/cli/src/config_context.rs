//! Configuration assembly for CLI commands.
//!
//! Responsibilities:
//! - Layer profile file, `ROSTER_*` environment and command-line flags into one
//!   `Config` through `ConfigLoader`.
//!
//! Does NOT handle:
//! - Loading `.env` (done in `main` before clap parses, so `.env` can feed
//!   clap's `env` defaults).
//!
//! Invariants:
//! - Precedence is flags > environment > profile > defaults.
//! - Blank `--config-path` values are ignored.

use anyhow::{Context, Result};
use roster_config::{Config, ConfigLoader};
use std::time::Duration;

use crate::args::Cli;

pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new();

    if let Some(path) = &cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(profile) = &cli.profile {
        loader = loader.with_profile_name(profile.clone());
    }

    let mut loader = loader
        .from_profile()
        .context("Failed to load configuration from profile")?
        .from_env()
        .context("Failed to load configuration from environment")?;

    if let Some(url) = &cli.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(username) = &cli.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(password) = &cli.app_password {
        loader = loader.with_app_password(password.clone());
    }
    if let Some(token) = &cli.api_token {
        loader = loader.with_api_token(token.clone());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }

    loader.build().context("Failed to build configuration")
}
