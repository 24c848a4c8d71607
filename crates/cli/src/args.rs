//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and `ROSTER_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not build the configuration (see `config_context` module).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster - Bulk user and enrollment administration", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  roster users search --term ana\n  roster suspend --ids 11,12 --reason 'left the company'\n  roster delete --ids 11,12 --reassign-to 1\n  roster enroll --user 7 --courses 101,102\n  roster create --file new_users.json --output json\n"
)]
pub struct Cli {
    /// Base URL of the provider site (e.g., https://academy.example.com)
    #[arg(short, long, global = true, env = "ROSTER_BASE_URL")]
    pub base_url: Option<String>,

    /// Username for application-password authentication
    #[arg(short, long, global = true, env = "ROSTER_USERNAME")]
    pub username: Option<String>,

    /// Application password (used with --username)
    #[arg(long, global = true, env = "ROSTER_APP_PASSWORD", hide_env_values = true)]
    pub app_password: Option<String>,

    /// API token for bearer authentication (preferred over application passwords)
    #[arg(short, long, global = true, env = "ROSTER_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ROSTER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for transient failures
    #[arg(long, global = true, env = "ROSTER_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "ROSTER_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Profile name to load from the config file
    #[arg(long, global = true, env = "ROSTER_PROFILE")]
    pub profile: Option<String>,

    /// Path to a custom configuration file (overrides default location)
    #[arg(long, global = true, env = "ROSTER_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Suppress progress output on stderr
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Write Prometheus metrics for this run to FILE when it ends
    #[arg(long, global = true, env = "ROSTER_METRICS_FILE", value_name = "FILE")]
    pub metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search users
    Users {
        #[command(subcommand)]
        command: SearchCommand,
    },

    /// Search courses
    Courses {
        #[command(subcommand)]
        command: SearchCommand,
    },

    /// Suspend user accounts
    Suspend {
        /// User ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        /// Reason recorded with the suspension
        #[arg(long)]
        reason: Option<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Reactivate suspended user accounts
    Unsuspend {
        /// User ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Permanently delete user accounts
    Delete {
        /// User ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        /// User that receives the deleted accounts' content
        #[arg(long, value_name = "ID")]
        reassign_to: Option<String>,

        /// Confirmation phrase (prompted for when omitted)
        #[arg(long, value_name = "PHRASE")]
        confirm: Option<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Create user accounts from a JSON file
    Create {
        /// JSON array of `{username, email, display_name?, password?, roles?}`
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Enroll one user into several courses
    Enroll {
        /// User id to enroll
        #[arg(long = "user", value_name = "ID")]
        user: String,

        /// Course ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        courses: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum SearchCommand {
    /// Search one page of results
    Search {
        /// Free-text filter (empty lists everything)
        #[arg(short, long, default_value = "")]
        term: String,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Results per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<u32>,

        /// Provider-side sort field (e.g. display_name)
        #[arg(long)]
        order_by: Option<String>,

        /// Sort descending
        #[arg(long, requires = "order_by")]
        desc: bool,
    },
}

/// Options shared by every batch command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Skip the confirmation prompt for non-destructive actions
    #[arg(short, long)]
    pub yes: bool,

    /// Validate and report without calling the provider
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of provider calls in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Route the batch through the array-accepting endpoints where available
    #[arg(long)]
    pub bulk: bool,
}
