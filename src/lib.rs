//! issue-sync - keeps a GitHub organization's open issues mirrored onto a
//! project board.
//!
//! This library provides the core functionality for the `issue-sync` CLI:
//! GitHub App authentication, organization scanning, and the idempotent
//! reconciliation loop that adds untracked issues to the target project.

pub mod cli;
pub mod config;
pub mod github;
pub mod lockfile;
pub mod project;
pub mod report;
pub mod sync;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Library-level error type for issue-sync operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("No GitHub App installation found for organization '{0}'")]
    NoInstallation(String),

    #[error("Project number {number} not found in organization '{org}'")]
    ProjectNotFound { org: String, number: i32 },

    #[error("GraphQL request failed: {0}")]
    Graphql(String),

    #[error("Rate limited by GitHub, resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Another run holds the lock file at {0}")]
    LockHeld(PathBuf),
}

impl Error {
    /// Whether this error should abort the run before any mutation
    /// (missing credentials, installation, or project).
    pub fn is_setup_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::Jwt(_)
                | Error::Auth(_)
                | Error::NoInstallation(_)
                | Error::ProjectNotFound { .. }
        )
    }
}

/// Result type alias for issue-sync operations.
pub type Result<T> = std::result::Result<T, Error>;
