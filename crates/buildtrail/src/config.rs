//! Configuration for the buildtrail CLI
//!
//! Every service setting can come from a flag or from the matching
//! `BUILDTRAIL_*` environment variable.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use buildtrail_builds::{BuildIdentity, BuildsError};
use buildtrail_git::{Commit, GitError, LogQuery};

/// buildtrail - what changed since the last build
#[derive(Parser, Debug, Clone)]
#[command(name = "buildtrail")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// What to produce
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the build-info service (e.g. https://acme.jfrog.io/artifactory)
    #[arg(long, env = "BUILDTRAIL_URL", global = true)]
    pub url: Option<String>,

    /// Access token sent as a bearer token
    #[arg(long, env = "BUILDTRAIL_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    /// Build name whose history is consulted
    #[arg(short, long, env = "BUILDTRAIL_BUILD_NAME", global = true)]
    pub build_name: Option<String>,

    /// Project key the build belongs to
    #[arg(long, env = "BUILDTRAIL_PROJECT", global = true)]
    pub project: Option<String>,

    /// Path to the .git directory
    ///
    /// Defaults to searching the current directory and its parents.
    #[arg(long, global = true)]
    pub dot_git: Option<PathBuf>,

    /// Maximum number of commits to list
    #[arg(long, default_value_t = 100, global = true)]
    pub limit: usize,

    /// git log --pretty format
    #[arg(long, default_value = Commit::PRETTY_FORMAT, global = true)]
    pub format: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List commits since the latest build, one matched line at a time
    ///
    /// Without --pattern, lines are parsed with the default "%H %s" format.
    Log {
        /// Regex each output line is matched against
        #[arg(long)]
        pattern: Option<String>,

        /// Print matches as JSON objects
        #[arg(long)]
        json: bool,
    },

    /// Print raw log output since a previous build
    PlainLog {
        /// Which build to start from: 0 is the latest, 1 the one before, ...
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        previous: i64,
    },

    /// Print raw log output since the last build made from a different commit
    ChangedLog,

    /// Print the evidence dashboard link of the latest build
    BuildLink,
}

impl Config {
    /// The service URL
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingUrl` if no URL was given.
    pub fn service_url(&self) -> Result<&str, ConfigError> {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingUrl)
    }

    /// The build being reconciled against
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Build` if the build name is missing.
    pub fn build_identity(&self) -> Result<BuildIdentity, ConfigError> {
        Ok(BuildIdentity::new(
            self.build_name.clone().unwrap_or_default(),
            self.project.clone(),
        )?)
    }

    /// The git log query described by the flags
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Query` if the limit is zero.
    pub fn log_query(&self) -> Result<LogQuery, ConfigError> {
        let query = LogQuery::new(self.limit, self.format.clone())?;
        Ok(match &self.dot_git {
            Some(path) => query.with_dot_git(path.clone()),
            None => query,
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service URL or build name is missing
    /// - The limit is zero
    /// - The .git path is given but doesn't exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service_url()?;
        self.build_identity()?;
        self.log_query()?;
        if let Some(dot_git) = &self.dot_git
            && !dot_git.exists()
        {
            return Err(ConfigError::DotGitNotFound(dot_git.clone()));
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No service URL was given
    #[error("Service URL is required (--url or BUILDTRAIL_URL)")]
    MissingUrl,

    /// The build identity is incomplete
    #[error("{0} (--build-name or BUILDTRAIL_BUILD_NAME)")]
    Build(#[from] BuildsError),

    /// The log query is invalid
    #[error("{0}")]
    Query(#[from] GitError),

    /// The .git path does not exist
    #[error(".git path not found: {0}")]
    DotGitNotFound(PathBuf),
}
