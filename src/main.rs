//! issue-sync CLI - mirrors a GitHub org's open issues onto a project board.

use clap::Parser;
use issue_sync::cli::{Cli, Commands};
use issue_sync::config::{self, SyncOptions};
use issue_sync::report::Output;
use issue_sync::{sync, Error};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    // Log lines go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Sync {
            app_id,
            private_key,
            private_key_file,
            org,
            project_number,
            opt_out_label,
            project_model,
            lock_file,
            dry_run,
            api_url,
            graphql_url,
        } => {
            let opts = SyncOptions {
                app_id,
                private_key,
                private_key_file,
                org,
                project_number,
                opt_out_label,
                project_model: Some(project_model),
                lock_file,
                dry_run,
                api_url,
                graphql_url,
            };
            run_sync(opts, human);
        }

        Commands::BuildInfo => {
            if human {
                println!("Version: {}", issue_sync::cli::package_version());
                println!("Commit:  {}", issue_sync::cli::git_commit());
                println!("Built:   {}", issue_sync::cli::build_timestamp());
            } else {
                let info = serde_json::json!({
                    "version": issue_sync::cli::package_version(),
                    "commit": issue_sync::cli::git_commit(),
                    "built": issue_sync::cli::build_timestamp(),
                });
                println!("{}", info);
            }
        }
    }
}

fn run_sync(opts: SyncOptions, human: bool) {
    let config = match config::resolve(opts) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(
        version = issue_sync::cli::package_version(),
        commit = issue_sync::cli::git_commit(),
        org = %config.org,
        project = config.project_number,
        "starting sync"
    );

    match sync::run(&config) {
        Ok(report) => {
            if human {
                println!("{}", report.to_human());
            } else {
                println!("{}", report.to_json());
            }
        }
        // A concurrent run is normal under an overlapping scheduler: report
        // it and exit clean, with zero reads or writes performed.
        Err(Error::LockHeld(path)) => {
            tracing::info!(lock = %path.display(), "another run is in progress, exiting");
        }
        // Report the reset time; the next scheduled run picks up from here.
        Err(e @ Error::RateLimited { .. }) => {
            tracing::warn!("{}", e);
        }
        // Setup-phase failures are the only non-zero exits: the scheduler
        // should notice misconfiguration, but never a transient mid-run error.
        Err(e) if e.is_setup_fatal() => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        Err(e) => {
            tracing::error!("sync run failed: {}", e);
        }
    }
}
