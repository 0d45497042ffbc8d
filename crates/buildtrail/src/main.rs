//! buildtrail: what changed since the last build
//!
//! Looks up the revision a previous build was made from in published
//! build-info and prints the git history since then.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};

use buildtrail::config::{Command, Config};
use buildtrail::output::LineRenderer;
use buildtrail::Reconciler;
use buildtrail_builds::{ArtifactoryClient, BuildInfoService};
use buildtrail_git::{GitError, LogOutcome, LogQuery, OutputPattern};

/// Exit status when the recorded revision is not in local history
const EXIT_REVISION_NOT_FOUND: u8 = 2;

fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<ExitCode> {
    config.validate()?;

    let mut client = ArtifactoryClient::new(config.service_url()?)?;
    if let Some(token) = &config.access_token {
        client = client.with_access_token(token);
    }
    let reconciler = Reconciler::new(client, config.build_identity()?);
    let query = config.log_query()?;

    match &config.command {
        Command::Log { pattern, json } => {
            print_matches(&reconciler, &query, pattern.as_deref(), *json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::PlainLog { previous } => {
            let outcome = reconciler.plain_log_from_previous_build(&query, *previous)?;
            print_plain(outcome)
        }
        Command::ChangedLog => {
            let outcome = reconciler.plain_log_since_changed_build(&query)?;
            print_plain(outcome)
        }
        Command::BuildLink => {
            println!("{}", reconciler.last_build_link()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_matches<S: BuildInfoService>(
    reconciler: &Reconciler<S>,
    query: &LogQuery,
    pattern: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let renderer = LineRenderer::new(pattern, query.pretty_format()).context("Invalid --pattern")?;
    let mut stdout = std::io::stdout().lock();

    let handler = OutputPattern::new(renderer.regex().clone(), |caps| {
        let line = renderer
            .render(caps, json)
            .map_err(|e| GitError::handler(e.to_string()))?;
        writeln!(stdout, "{line}").map_err(GitError::from)
    });

    reconciler.parse_log_from_last_build(query, &mut [handler])?;
    Ok(())
}

fn print_plain(outcome: LogOutcome<String>) -> anyhow::Result<ExitCode> {
    match outcome {
        LogOutcome::Completed(text) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        LogOutcome::RevisionNotFound(err) => {
            warn!(revision = %err.revision(), "{err}");
            Ok(ExitCode::from(EXIT_REVISION_NOT_FOUND))
        }
    }
}
