// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Reconciliation of local git history with published build-info
//!
//! A [`Reconciler`] finds the revision a previous build was made from and
//! lists the commits made since. Every log operation first checks that git
//! is on PATH and that a `.git` store can be found, so local problems are
//! reported before the build-info service is contacted.
//!
//! # Example
//!
//! ```no_run
//! use buildtrail::reconcile::Reconciler;
//! use buildtrail_builds::{ArtifactoryClient, BuildIdentity};
//! use buildtrail_git::{LogOutcome, LogQuery};
//!
//! let client = ArtifactoryClient::new("https://acme.jfrog.io/artifactory").expect("client");
//! let identity = BuildIdentity::new("widgets", None).expect("identity");
//! let reconciler = Reconciler::new(client, identity);
//!
//! let query = LogQuery::new(100, "%H %s").expect("query");
//! match reconciler.plain_log_from_previous_build(&query, 1).expect("log") {
//!     LogOutcome::Completed(text) => print!("{text}"),
//!     LogOutcome::RevisionNotFound(err) => eprintln!("{err}"),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use buildtrail_builds::{BuildHistory, BuildIdentity, BuildInfoService, BuildsError, build_link};
use buildtrail_git::log::DEFAULT_PROGRAM;
use buildtrail_git::repo::require_program;
use buildtrail_git::{GitError, GitStore, LogCommand, LogOutcome, LogQuery, OutputPattern};

// ============================================================================
// Error Types
// ============================================================================

/// Reconciliation errors
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Local git problem
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Build-info lookup problem
    #[error("Build info error: {0}")]
    Builds(#[from] BuildsError),

    /// The current directory could not be determined
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Reconciler
// ============================================================================

/// Correlates a local repository with one build's published history
pub struct Reconciler<S> {
    service: S,
    identity: BuildIdentity,
    git_program: String,
    start_dir: Option<PathBuf>,
}

/// A located store together with the remote URL build-info is keyed by
struct Workspace {
    store: GitStore,
    vcs_url: String,
}

impl<S: BuildInfoService> Reconciler<S> {
    /// Reconcile against `identity`'s builds as recorded by `service`
    pub fn new(service: S, identity: BuildIdentity) -> Self {
        Self {
            service,
            identity,
            git_program: DEFAULT_PROGRAM.to_string(),
            start_dir: None,
        }
    }

    /// Run `program` instead of `git`
    #[must_use]
    pub fn with_git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = program.into();
        self
    }

    /// Search for `.git` upward from `dir` instead of the current directory
    #[must_use]
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// The build being reconciled against
    #[must_use]
    pub fn identity(&self) -> &BuildIdentity {
        &self.identity
    }

    fn history(&self) -> BuildHistory<'_, S> {
        BuildHistory::new(&self.service, &self.identity)
    }

    fn locate_store(&self, query: &LogQuery) -> Result<GitStore, ReconcileError> {
        let start = match &self.start_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(GitStore::locate(query.dot_git.as_deref(), &start)?)
    }

    /// Check git is runnable, then find the store and its remote URL
    fn prepare(&self, query: &LogQuery) -> Result<Workspace, ReconcileError> {
        require_program(&self.git_program)?;
        let store = self.locate_store(query)?;
        let vcs_url = store.remote_url()?;
        debug!(store = %store.dot_git().display(), vcs_url = %vcs_url, "Prepared workspace");
        Ok(Workspace { store, vcs_url })
    }

    fn log_command(&self, query: &LogQuery, store: &GitStore, revision: &str) -> LogCommand {
        LogCommand::new(query, store.root(), revision).with_program(self.git_program.clone())
    }

    /// Dispatch the commits since the latest build to `patterns`
    ///
    /// When the latest build's revision is no longer in history the outcome
    /// is logged and treated as "nothing new".
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError` for local git problems, service failures and
    /// handler errors.
    pub fn parse_log_from_last_build(
        &self,
        query: &LogQuery,
        patterns: &mut [OutputPattern<'_>],
    ) -> Result<(), ReconcileError> {
        let workspace = self.prepare(query)?;
        let revision = self.history().latest_revision(&workspace.vcs_url)?;
        info!(
            build = %self.identity.name(),
            revision = %revision,
            "Listing commits since latest build"
        );
        self.parse_from(query, &workspace.store, patterns, &revision)
    }

    /// Dispatch the commits since `revision` to `patterns`
    ///
    /// An empty `revision` dispatches the full history up to the limit. A
    /// revision missing from history is logged and treated as "nothing new".
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError` for local git problems and handler errors.
    pub fn parse_log_from_revision(
        &self,
        query: &LogQuery,
        patterns: &mut [OutputPattern<'_>],
        revision: &str,
    ) -> Result<(), ReconcileError> {
        let store = self.locate_store(query)?;
        self.parse_from(query, &store, patterns, revision)
    }

    fn parse_from(
        &self,
        query: &LogQuery,
        store: &GitStore,
        patterns: &mut [OutputPattern<'_>],
        revision: &str,
    ) -> Result<(), ReconcileError> {
        match self.log_command(query, store, revision).run_parsed(patterns)? {
            LogOutcome::Completed(()) => Ok(()),
            LogOutcome::RevisionNotFound(err) => {
                info!(revision = %err.revision(), "{err}");
                Ok(())
            }
        }
    }

    /// Raw log output since the build at `offset` (0 is the latest)
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError` for local git problems, a negative offset and
    /// service failures. A revision missing from history is returned as
    /// [`LogOutcome::RevisionNotFound`].
    pub fn plain_log_from_previous_build(
        &self,
        query: &LogQuery,
        offset: i64,
    ) -> Result<LogOutcome<String>, ReconcileError> {
        let workspace = self.prepare(query)?;
        let revision = self.history().revision_at(offset, &workspace.vcs_url)?;
        info!(
            build = %self.identity.name(),
            offset,
            revision = %revision,
            "Listing commits since previous build"
        );
        Ok(self
            .log_command(query, &workspace.store, &revision)
            .run_plain()?)
    }

    /// Raw log output since the newest build whose revision differs from the latest
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError` for local git problems, service failures and
    /// when no earlier build has a different revision. A revision missing
    /// from history is returned as [`LogOutcome::RevisionNotFound`].
    pub fn plain_log_since_changed_build(
        &self,
        query: &LogQuery,
    ) -> Result<LogOutcome<String>, ReconcileError> {
        let workspace = self.prepare(query)?;
        let revision = self
            .history()
            .revision_from_previous_build(&workspace.vcs_url)?;
        info!(
            build = %self.identity.name(),
            revision = %revision,
            "Listing commits since last build with a different revision"
        );
        Ok(self
            .log_command(query, &workspace.store, &revision)
            .run_plain()?)
    }

    /// Evidence dashboard link of the latest build
    ///
    /// # Errors
    ///
    /// Returns `BuildsError::BuildNotFound` when the build has no runs, and
    /// link conversion or service errors otherwise.
    pub fn last_build_link(&self) -> Result<String, ReconcileError> {
        let published =
            self.history()
                .previous_build(0)?
                .ok_or_else(|| BuildsError::BuildNotFound {
                    name: self.identity.name().to_string(),
                })?;
        Ok(build_link(&published)?)
    }
}
