//! Open issue listing per repository.
//!
//! The REST issues listing also returns pull requests; they carry a
//! `pull_request` key and are filtered out here. The membership check makes
//! re-processing idempotent, so no created-at time window is applied - every
//! open issue is examined every run.

use serde::Deserialize;
use std::fmt;

use crate::Result;

use super::{GithubClient, ACCEPT_JSON};

/// An issue as returned by the repository listing (only fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Numeric id, used as `content_id` by the classic card API.
    pub id: u64,
    /// Opaque content identity, used by the Projects V2 API.
    pub node_id: String,
    pub number: u64,
    pub title: String,
    /// API URL; classic cards reference their content by this URL.
    pub url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present iff this "issue" is actually a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// Why an issue is excluded from the sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSkip {
    PullRequest,
    OptOutLabel,
}

impl fmt::Display for IssueSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSkip::PullRequest => write!(f, "pull request"),
            IssueSkip::OptOutLabel => write!(f, "carries opt-out label"),
        }
    }
}

/// List every open issue of `org/repo`.
pub fn list_open_issues(client: &GithubClient, org: &str, repo: &str) -> Result<Vec<Issue>> {
    client.get_paged(
        &format!("/repos/{}/{}/issues", org, repo),
        &[("state", "open".to_string())],
        ACCEPT_JSON,
    )
}

/// Exclusion policy. The opt-out label match is exact and case-sensitive.
pub fn skip_reason(issue: &Issue, opt_out_label: &str) -> Option<IssueSkip> {
    if issue.pull_request.is_some() {
        Some(IssueSkip::PullRequest)
    } else if issue.labels.iter().any(|l| l.name == opt_out_label) {
        Some(IssueSkip::OptOutLabel)
    } else {
        None
    }
}
