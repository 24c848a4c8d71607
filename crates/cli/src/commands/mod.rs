//! Command implementations.
//!
//! Responsibilities:
//! - `search`: one page of users or courses through `RemoteResultCursor`.
//! - `batch`: confirm and execute a batch through `ConfirmationGate` and
//!   `BatchActionCoordinator`.
//! - Parsing operator input (id lists, create files) into engine types.
//!
//! Does NOT handle:
//! - Output rendering (see `formatters`).

pub mod batch;
pub mod search;

use anyhow::Result;
use roster_client::{MetricsCollector, ProviderClient};
use roster_config::Config;
use roster_engine::{InvalidResourceId, NewUser, ResourceId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Operator input rejected before anything is sent.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    InvalidId(#[from] InvalidResourceId),

    #[error("Failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a JSON array of user specs: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),
}

pub(crate) fn build_client_from_config(config: &Config, metrics: bool) -> Result<ProviderClient> {
    let mut builder = ProviderClient::builder().from_config(config);
    if metrics {
        builder = builder.metrics(MetricsCollector::new());
    }
    Ok(builder.build()?)
}

pub(crate) fn parse_id(raw: &str) -> Result<ResourceId, InputError> {
    Ok(raw.parse::<ResourceId>()?)
}

pub(crate) fn parse_ids(raw: &[String]) -> Result<Vec<ResourceId>, InputError> {
    raw.iter().map(|s| parse_id(s)).collect()
}

pub(crate) fn read_user_specs(path: &Path) -> Result<Vec<NewUser>, InputError> {
    let body = std::fs::read_to_string(path).map_err(|source| InputError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| InputError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}
