//! CLI argument definitions for issue-sync.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// issue-sync - mirror a GitHub organization's open issues onto a project board.
///
/// Designed to run unattended from cron or a CI scheduler: all options can be
/// supplied through environment variables, output is JSON by default, and a
/// lock file prevents overlapping runs.
#[derive(Parser, Debug)]
#[command(name = "issue-sync")]
#[command(author, version, about = "Mirror a GitHub org's open issues onto a project board", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one reconciliation pass over the organization
    ///
    /// Scans every repository, lists its open issues, and adds any issue not
    /// yet tracked on the target project board. Re-running is safe: issues
    /// already on the board are never added twice.
    Sync {
        /// GitHub App identifier
        #[arg(long, env = "ISSUE_SYNC_APP_ID")]
        app_id: u64,

        /// GitHub App private key (PEM), inline
        #[arg(long, env = "ISSUE_SYNC_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,

        /// Path to the GitHub App private key (PEM) file
        #[arg(long, env = "ISSUE_SYNC_PRIVATE_KEY_FILE", conflicts_with = "private_key")]
        private_key_file: Option<PathBuf>,

        /// Organization login to scan
        #[arg(long, env = "ISSUE_SYNC_ORG")]
        org: String,

        /// Number of the target project board within the organization
        #[arg(long, env = "ISSUE_SYNC_PROJECT_NUMBER")]
        project_number: i32,

        /// Label that excludes an issue from the board (exact, case-sensitive)
        #[arg(long, env = "ISSUE_SYNC_OPT_OUT_LABEL", default_value = "no-project")]
        opt_out_label: String,

        /// Which project board API generation to target
        #[arg(long, env = "ISSUE_SYNC_PROJECT_MODEL", value_enum, default_value_t = ProjectModel::V2)]
        project_model: ProjectModel,

        /// Lock file path (default: <data dir>/issue-sync/sync.lock)
        #[arg(long, env = "ISSUE_SYNC_LOCK_FILE")]
        lock_file: Option<PathBuf>,

        /// Report what would be added without mutating the board
        #[arg(long)]
        dry_run: bool,

        /// Override the GitHub REST API base URL (for testing)
        #[arg(long, env = "ISSUE_SYNC_API_URL", hide = true)]
        api_url: Option<String>,

        /// Override the GitHub GraphQL endpoint URL (for testing)
        #[arg(long, env = "ISSUE_SYNC_GRAPHQL_URL", hide = true)]
        graphql_url: Option<String>,
    },

    /// Show build information
    BuildInfo,
}

/// Project board API generation.
///
/// The two generations are incompatible and never interleaved: the model is
/// fixed at configuration time and selects one resolver/mutator pair.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectModel {
    /// Legacy column/card boards (REST, one column per repository)
    Classic,
    /// Projects V2 (GraphQL, flat content-addressed items)
    V2,
}

/// Package version from Cargo.toml.
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Short git commit hash the binary was built from.
pub fn git_commit() -> &'static str {
    env!("ISSUE_SYNC_GIT_COMMIT")
}

/// Timestamp the binary was built at.
pub fn build_timestamp() -> &'static str {
    env!("ISSUE_SYNC_BUILD_TIMESTAMP")
}
