//! Configuration management for Roster.
//!
//! This crate provides types and loaders for managing identity-provider
//! connection and batch-engine configuration from profile files, `.env`
//! files and environment variables.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{
    AuthConfig, AuthStrategy, BatchConfig, Config, ConnectionConfig, ProfileConfig, ProfileFile,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
