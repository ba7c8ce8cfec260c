//! Run report rendering.

use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Summary of one reconciliation pass.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub repos_scanned: usize,
    pub repos_skipped: usize,
    pub repos_failed: usize,
    pub issues_examined: usize,
    pub issues_added: usize,
    pub issues_already_tracked: usize,
    pub issues_skipped: usize,
    pub issues_errored: usize,
    pub dry_run: bool,
}

impl Output for SyncReport {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        if self.dry_run {
            out.push_str("Sync complete (dry run)\n");
        } else {
            out.push_str("Sync complete\n");
        }
        out.push_str(&format!(
            "  Repositories: {} scanned, {} skipped, {} failed\n",
            self.repos_scanned, self.repos_skipped, self.repos_failed
        ));
        out.push_str(&format!(
            "  Issues: {} examined, {} added, {} already tracked, {} skipped, {} errored",
            self.issues_examined,
            self.issues_added,
            self.issues_already_tracked,
            self.issues_skipped,
            self.issues_errored
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_to_json_is_valid() {
        let report = SyncReport {
            repos_scanned: 3,
            issues_added: 1,
            ..Default::default()
        };
        let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(value["repos_scanned"], 3);
        assert_eq!(value["issues_added"], 1);
        assert_eq!(value["dry_run"], false);
    }

    #[test]
    fn test_report_to_human_mentions_dry_run() {
        let report = SyncReport {
            dry_run: true,
            ..Default::default()
        };
        assert!(report.to_human().contains("dry run"));
    }
}
