//! Legacy column/card project boards (REST, inertia preview media type).
//!
//! Membership has no targeted lookup on this API generation: every column's
//! cards are enumerated and compared against the issue's content URL. That
//! is O(columns x cards) per issue per run and is this model's known
//! scalability limitation; it is kept as-is because optimizing it away would
//! change which API reads the equivalence argument rests on. Prefer the V2
//! model for new boards.

use serde::Deserialize;
use tracing::info;

use crate::github::issues::Issue;
use crate::github::{GithubClient, ACCEPT_INERTIA};
use crate::{Error, Result};

use super::{sanitize_group_name, ProjectBoard};

#[derive(Debug, Deserialize)]
struct Project {
    id: u64,
    number: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct Column {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Card {
    #[serde(default)]
    content_url: Option<String>,
}

/// A classic project board, resolved to its numeric id.
pub struct ClassicBoard {
    project_id: u64,
}

impl ClassicBoard {
    /// Find the organization project with the configured number.
    pub fn resolve(client: &GithubClient, org: &str, number: i32) -> Result<Self> {
        let projects: Vec<Project> =
            client.get_paged(&format!("/orgs/{}/projects", org), &[], ACCEPT_INERTIA)?;

        let project = projects
            .into_iter()
            .find(|p| p.number == number)
            .ok_or_else(|| Error::ProjectNotFound {
                org: org.to_string(),
                number,
            })?;

        Ok(Self {
            project_id: project.id,
        })
    }

    fn columns(&self, client: &GithubClient) -> Result<Vec<Column>> {
        client.get_paged(
            &format!("/projects/{}/columns", self.project_id),
            &[],
            ACCEPT_INERTIA,
        )
    }

    fn cards(&self, client: &GithubClient, column_id: u64) -> Result<Vec<Card>> {
        client.get_paged(
            &format!("/projects/columns/{}/cards", column_id),
            &[],
            ACCEPT_INERTIA,
        )
    }

    /// Find the column for a repository, creating it on first use.
    fn column_for_repo(&self, client: &GithubClient, repo_name: &str) -> Result<Column> {
        let wanted = sanitize_group_name(repo_name);
        if let Some(column) = self.columns(client)?.into_iter().find(|c| c.name == wanted) {
            return Ok(column);
        }

        info!(column = %wanted, "creating project column");
        client.post_json(
            &format!("/projects/{}/columns", self.project_id),
            &serde_json::json!({ "name": wanted }),
            ACCEPT_INERTIA,
        )
    }
}

impl ProjectBoard for ClassicBoard {
    fn contains(&self, client: &GithubClient, issue: &Issue) -> Result<bool> {
        for column in self.columns(client)? {
            let found = self
                .cards(client, column.id)?
                .iter()
                .any(|card| card.content_url.as_deref() == Some(issue.url.as_str()));
            if found {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn add(&mut self, client: &GithubClient, repo_name: &str, issue: &Issue) -> Result<()> {
        let column = self.column_for_repo(client, repo_name)?;
        let _: serde_json::Value = client.post_json(
            &format!("/projects/columns/{}/cards", column.id),
            &serde_json::json!({ "content_id": issue.id, "content_type": "Issue" }),
            ACCEPT_INERTIA,
        )?;
        Ok(())
    }
}
