//! Organization repository scanning.

use serde::Deserialize;
use std::fmt;

use crate::Result;

use super::{GithubClient, ACCEPT_JSON};

/// A repository as returned by the org listing (only fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub has_issues: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Why a repository is excluded from the sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSkip {
    /// Owner login no longer matches the organization (transfer/rename race)
    ForeignOwner,
    IssuesDisabled,
    Archived,
    Fork,
}

impl fmt::Display for RepoSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoSkip::ForeignOwner => write!(f, "owner does not match organization"),
            RepoSkip::IssuesDisabled => write!(f, "issues disabled"),
            RepoSkip::Archived => write!(f, "archived"),
            RepoSkip::Fork => write!(f, "fork"),
        }
    }
}

/// List every repository of the organization.
pub fn list_repositories(client: &GithubClient, org: &str) -> Result<Vec<Repository>> {
    client.get_paged(
        &format!("/orgs/{}/repos", org),
        &[("type", "all".to_string())],
        ACCEPT_JSON,
    )
}

/// Exclusion policy, applied in order, short-circuiting.
pub fn skip_reason(repo: &Repository, org: &str) -> Option<RepoSkip> {
    if !repo.owner.login.eq_ignore_ascii_case(org) {
        Some(RepoSkip::ForeignOwner)
    } else if !repo.has_issues {
        Some(RepoSkip::IssuesDisabled)
    } else if repo.archived {
        Some(RepoSkip::Archived)
    } else if repo.fork {
        Some(RepoSkip::Fork)
    } else {
        None
    }
}
