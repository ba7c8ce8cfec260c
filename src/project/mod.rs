//! Project board backends.
//!
//! The two GitHub project generations are incompatible, so the membership
//! resolver and mutator live behind one trait with two implementations,
//! selected once at configuration time. A build never interleaves both code
//! paths; migrating a board between generations means switching the
//! configured model, not patching the sync loop.

pub mod classic;
pub mod v2;

use crate::cli::ProjectModel;
use crate::github::issues::Issue;
use crate::github::GithubClient;
use crate::Result;

/// A project board that can answer membership queries and accept new items.
///
/// The central invariant both implementations uphold: at most one item/card
/// per issue per project. `contains` must err on the side of "unknown" - a
/// lookup failure propagates instead of reporting absence, so uncertainty
/// never creates duplicates.
pub trait ProjectBoard {
    /// Does an item/card referencing this issue already exist on the board?
    fn contains(&self, client: &GithubClient, issue: &Issue) -> Result<bool>;

    /// Add the issue to the board. Only called after `contains` returned
    /// false; a failure is reported and retried on the next run.
    fn add(&mut self, client: &GithubClient, repo_name: &str, issue: &Issue) -> Result<()>;
}

/// Resolve the configured project on the chosen API generation.
pub fn resolve_board(
    client: &GithubClient,
    model: ProjectModel,
    org: &str,
    project_number: i32,
) -> Result<Box<dyn ProjectBoard>> {
    match model {
        ProjectModel::Classic => Ok(Box::new(classic::ClassicBoard::resolve(
            client,
            org,
            project_number,
        )?)),
        ProjectModel::V2 => Ok(Box::new(v2::V2Board::resolve(client, org, project_number)?)),
    }
}

/// Placeholder for characters outside the allowed grouping-name set.
const PLACEHOLDER: char = '_';

/// Sanitize a repository name into a grouping (column) name.
///
/// Deterministic and total: every character outside `[A-Za-z0-9_- ]` maps to
/// `_`. Two distinct repository names can sanitize identically; they then
/// share one grouping. That collision is accepted, not a bug.
pub fn sanitize_group_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ' ' {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}
