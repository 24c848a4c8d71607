//! Profile configuration types for Roster.
//!
//! Responsibilities:
//! - Define `ProfileConfig` for storing named connection profiles.
//! - Define `ProfileFile`, the on-disk JSON document holding every profile.
//! - Resolve the default profile file location.
//!
//! Does NOT handle:
//! - Merging profiles with env vars (see `loader` module).
//! - Writing profiles back to disk.
//!
//! Invariants:
//! - All fields are optional to allow partial profile definitions.
//! - ProfileConfig uses `#[serde(default)]` for forward compatibility.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::secret_string;

/// Profile configuration for storing named connection profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Base URL of the provider site
    pub base_url: Option<String>,
    /// Username for application-password authentication
    pub username: Option<String>,
    /// Application password
    #[serde(with = "opt_secret_string", skip_serializing_if = "Option::is_none")]
    pub app_password: Option<SecretString>,
    /// API token for bearer authentication
    #[serde(with = "opt_secret_string", skip_serializing_if = "Option::is_none")]
    pub api_token: Option<SecretString>,
    /// Whether to skip TLS verification
    pub skip_verify: Option<bool>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Maximum number of retries for failed requests
    pub max_retries: Option<usize>,
    /// Concurrent provider calls per batch
    pub batch_concurrency: Option<usize>,
    /// Per-item timeout in seconds
    pub item_timeout_seconds: Option<u64>,
    /// Search page size
    pub per_page: Option<u32>,
    /// Use the array-accepting endpoints where available
    pub use_bulk_endpoints: Option<bool>,
    /// Targets per array-endpoint call
    pub bulk_chunk_size: Option<usize>,
    /// Phrase required to confirm destructive batches
    pub confirm_phrase: Option<String>,
    /// Link shown when enrollments need a purchase
    pub order_resolution_url: Option<String>,
}

mod opt_secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match secret {
            Some(s) => super::secret_string::serialize(s, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}

/// The profile file: a map of profile name to profile settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

impl ProfileFile {
    /// Read and parse a profile file.
    pub fn read(path: &Path) -> Result<Self, ProfileFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ProfileFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }
}

/// Errors reading a profile file.
#[derive(Debug, thiserror::Error)]
pub enum ProfileFileError {
    #[error("failed to read profile file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse profile file at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns the default path to the profile file.
///
/// - Linux: `~/.config/roster/config.json`
/// - macOS: `~/Library/Application Support/roster/config.json`
/// - Windows: `%AppData%\roster\config.json`
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "roster")
        .map(|dirs| dirs.config_dir().join("config.json"))
}
