//! Run controller: one reconciliation pass.
//!
//! Sequence: acquire lock -> authenticate -> resolve board -> scan
//! repositories -> per repository fetch issues -> per issue resolve
//! membership -> add when absent -> release lock (on drop) -> report.
//!
//! Failure policy (matching the error taxonomy in the crate root):
//! setup-phase errors abort before any mutation; per-repository and
//! per-issue errors are logged, counted, and skipped so one bad item never
//! kills the run; a rate-limit error propagates to the caller, which reports
//! the reset time and ends the run. The next scheduled run retries anything
//! skipped - membership checks make that idempotent.

use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::github::auth::{installation_token, AppCredentials};
use crate::github::{issues, repos, GithubClient};
use crate::lockfile::RunLock;
use crate::project::resolve_board;
use crate::report::SyncReport;
use crate::{Error, Result};

/// Run one reconciliation pass over the organization.
pub fn run(config: &SyncConfig) -> Result<SyncReport> {
    let _lock = RunLock::acquire(&config.lock_file)?;

    let creds = AppCredentials {
        app_id: config.app_id,
        private_key_pem: config.private_key_pem.clone(),
    };
    let token = installation_token(&creds, &config.org, &config.api_url)?;
    debug!(expires_at = %token.expires_at, "installation token obtained");

    let client = GithubClient::new(
        token.token,
        config.api_url.clone(),
        config.graphql_url.clone(),
    );
    let mut board = resolve_board(
        &client,
        config.project_model,
        &config.org,
        config.project_number,
    )?;

    let mut report = SyncReport {
        dry_run: config.dry_run,
        ..Default::default()
    };

    // A listing failure is non-fatal: the run completes having processed
    // nothing and the next scheduled run retries.
    let repositories = match repos::list_repositories(&client, &config.org) {
        Ok(list) => list,
        Err(e @ Error::RateLimited { .. }) => return Err(e),
        Err(e) => {
            error!(org = %config.org, error = %e, "failed to list repositories");
            return Ok(report);
        }
    };

    for repo in &repositories {
        report.repos_scanned += 1;

        if let Some(reason) = repos::skip_reason(repo, &config.org) {
            info!(repo = %repo.name, %reason, "skipping repository");
            report.repos_skipped += 1;
            continue;
        }

        let issue_list = match issues::list_open_issues(&client, &config.org, &repo.name) {
            Ok(list) => list,
            Err(e @ Error::RateLimited { .. }) => return Err(e),
            Err(e) => {
                warn!(repo = %repo.name, error = %e, "failed to list issues, skipping repository");
                report.repos_failed += 1;
                continue;
            }
        };

        for issue in &issue_list {
            report.issues_examined += 1;

            if let Some(reason) = issues::skip_reason(issue, &config.opt_out_label) {
                debug!(repo = %repo.name, issue = issue.number, %reason, "skipping issue");
                report.issues_skipped += 1;
                continue;
            }

            // Never "assume absent and add": a failed lookup skips the
            // issue for this run rather than risking a duplicate.
            let present = match board.contains(&client, issue) {
                Ok(present) => present,
                Err(e @ Error::RateLimited { .. }) => return Err(e),
                Err(e) => {
                    warn!(repo = %repo.name, issue = issue.number, error = %e,
                        "membership lookup failed, skipping issue");
                    report.issues_errored += 1;
                    continue;
                }
            };

            if present {
                info!(repo = %repo.name, issue = issue.number, "already tracked, skipping");
                report.issues_already_tracked += 1;
                continue;
            }

            if config.dry_run {
                info!(repo = %repo.name, issue = issue.number, title = %issue.title,
                    "would add issue to project (dry run)");
                report.issues_added += 1;
                continue;
            }

            match board.add(&client, &repo.name, issue) {
                Ok(()) => {
                    info!(repo = %repo.name, issue = issue.number, title = %issue.title,
                        "added issue to project");
                    report.issues_added += 1;
                }
                Err(e @ Error::RateLimited { .. }) => return Err(e),
                Err(e) => {
                    warn!(repo = %repo.name, issue = issue.number, error = %e,
                        "failed to add issue, will retry next run");
                    report.issues_errored += 1;
                }
            }
        }
    }

    Ok(report)
}
