// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `git log` extraction anchored at a recorded revision
//!
//! A [`LogCommand`] lists the commits made after a reference revision,
//! either dispatching each output line to caller-supplied [`OutputPattern`]s
//! or returning the output verbatim. When the reference revision no longer
//! exists in history (squash, force-push) the result is
//! [`LogOutcome::RevisionNotFound`] rather than an error.
//!
//! # Example
//!
//! ```no_run
//! use buildtrail_git::log::{LogCommand, LogOutcome, LogQuery, OutputPattern};
//!
//! let query = LogQuery::new(50, "%H %s").expect("valid query");
//! let command = LogCommand::new(&query, ".git", "4f1c0de8a9b2c3d4e5f60718293a4b5c6d7e8f90");
//!
//! let mut shas = Vec::new();
//! let mut patterns = vec![OutputPattern::parse(r"^([0-9a-f]{40}) ", |caps| {
//!     shas.push(caps[1].to_string());
//!     Ok(())
//! })
//! .expect("valid pattern")];
//!
//! match command.run_parsed(&mut patterns).expect("git log") {
//!     LogOutcome::Completed(()) => {}
//!     LogOutcome::RevisionNotFound(err) => eprintln!("{err}"),
//! }
//! ```

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

use crate::error::GitError;

/// Prefix of the diagnostic git prints when a range start cannot be resolved
pub const REVISION_RANGE_PREFIX: &str = "fatal: Invalid revision range";

/// Program invoked when no override is given
pub const DEFAULT_PROGRAM: &str = "git";

static REVISION_RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^fatal: Invalid revision range(?: ([a-fA-F0-9]+)\.\.)?")
        .expect("revision range pattern is valid")
});

/// What to ask `git log` for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    limit: usize,
    pretty_format: String,
    /// Explicit `.git` location; discovered from the working directory if unset
    pub dot_git: Option<PathBuf>,
}

impl LogQuery {
    /// Create a query returning at most `limit` entries formatted with `pretty_format`
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidLimit` if `limit` is zero.
    pub fn new(limit: usize, pretty_format: impl Into<String>) -> Result<Self, GitError> {
        if limit == 0 {
            return Err(GitError::InvalidLimit);
        }
        Ok(Self {
            limit,
            pretty_format: pretty_format.into(),
            dot_git: None,
        })
    }

    /// Use an explicit `.git` location instead of discovering one
    #[must_use]
    pub fn with_dot_git(mut self, path: impl Into<PathBuf>) -> Self {
        self.dot_git = Some(path.into());
        self
    }

    /// Maximum number of entries
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The `--pretty` format string
    #[must_use]
    pub fn pretty_format(&self) -> &str {
        &self.pretty_format
    }
}

/// The reference revision is no longer reachable in the repository history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Revision '{revision}' that was fetched from the build info does not exist in the git revision range"
)]
pub struct RevisionRangeError {
    revision: String,
}

impl RevisionRangeError {
    /// Create the error for `revision`
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
        }
    }

    /// The revision that could not be located
    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }
}

/// Result of a log invocation that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum LogOutcome<T> {
    /// git ran to completion
    Completed(T),
    /// The reference revision was rewritten out of history
    RevisionNotFound(RevisionRangeError),
}

impl<T> LogOutcome<T> {
    /// The completed value, discarding a revision-range outcome
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::RevisionNotFound(_) => None,
        }
    }

    /// Whether the reference revision was missing
    #[must_use]
    pub fn is_revision_not_found(&self) -> bool {
        matches!(self, Self::RevisionNotFound(_))
    }

    /// Transform the completed value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LogOutcome<U> {
        match self {
            Self::Completed(value) => LogOutcome::Completed(f(value)),
            Self::RevisionNotFound(err) => LogOutcome::RevisionNotFound(err),
        }
    }
}

type Handler<'a> = Box<dyn FnMut(&Captures<'_>) -> Result<(), GitError> + 'a>;

/// A line matcher with the handler invoked for each match
pub struct OutputPattern<'a> {
    regex: Regex,
    handler: Handler<'a>,
}

impl<'a> OutputPattern<'a> {
    /// Pair a compiled regex with its handler
    pub fn new(
        regex: Regex,
        handler: impl FnMut(&Captures<'_>) -> Result<(), GitError> + 'a,
    ) -> Self {
        Self {
            regex,
            handler: Box::new(handler),
        }
    }

    /// Compile `pattern` and pair it with `handler`
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidPattern` if the regex does not compile.
    pub fn parse(
        pattern: &str,
        handler: impl FnMut(&Captures<'_>) -> Result<(), GitError> + 'a,
    ) -> Result<Self, GitError> {
        Ok(Self::new(Regex::new(pattern)?, handler))
    }

    fn dispatch(&mut self, line: &str) -> Result<bool, GitError> {
        match self.regex.captures(line) {
            Some(caps) => (self.handler)(&caps).map(|()| true),
            None => Ok(false),
        }
    }
}

impl fmt::Debug for OutputPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputPattern")
            .field("regex", &self.regex.as_str())
            .finish_non_exhaustive()
    }
}

/// A single `git log` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCommand {
    program: String,
    store_root: PathBuf,
    limit: usize,
    pretty_format: String,
    revision: String,
}

impl LogCommand {
    /// Prepare `git log` for `query`, run from `store_root`, starting after `revision`
    ///
    /// An empty `revision` lists history from HEAD without a lower bound.
    pub fn new(query: &LogQuery, store_root: impl Into<PathBuf>, revision: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            store_root: store_root.into(),
            limit: query.limit,
            pretty_format: query.pretty_format.clone(),
            revision: revision.into(),
        }
    }

    /// Run `program` instead of `git`
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The program that will be executed
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Directory the process runs in
    #[must_use]
    pub fn store_root(&self) -> &Path {
        &self.store_root
    }

    /// The lower bound revision (empty for full history)
    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Arguments passed to the program
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            format!("--pretty={}", self.pretty_format),
            format!("-{}", self.limit),
        ];
        if !self.revision.is_empty() {
            args.push(format!("{}..", self.revision));
        }
        args
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.args())
            .current_dir(&self.store_root)
            .stdin(Stdio::null());
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> GitError {
        GitError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    /// Run and dispatch each stdout line to every matching pattern
    ///
    /// Lines are handled as they arrive. Error output is checked for the
    /// revision-range diagnostic once the process has exited.
    ///
    /// # Errors
    ///
    /// Returns the first handler error (the process is killed), a spawn or
    /// read failure, or `GitError::LogFailed` for any other unsuccessful exit.
    pub fn run_parsed(
        &self,
        patterns: &mut [OutputPattern<'_>],
    ) -> Result<LogOutcome<()>, GitError> {
        debug!(
            program = %self.program,
            root = %self.store_root.display(),
            args = ?self.args(),
            "Running git log (parsed)"
        );

        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GitError::Io(std::io::Error::other("stdout was not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GitError::Io(std::io::Error::other("stderr was not captured")))?;

        let (dispatched, stderr_text) = std::thread::scope(|scope| {
            let drain = scope.spawn(move || read_all(stderr));
            let dispatched = dispatch_lines(BufReader::new(stdout), patterns);
            if dispatched.is_err() {
                // Unblock a child still writing to a pipe nobody reads.
                let _ = child.kill();
            }
            let stderr_text = drain
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (dispatched, stderr_text)
        });
        let status = child.wait()?;

        let matched = dispatched?;
        let stderr_text = stderr_text?;
        debug!(matched, status = %status, "git log finished");

        if stderr_text
            .lines()
            .any(|line| REVISION_RANGE_PATTERN.is_match(line.trim()))
        {
            return Ok(LogOutcome::RevisionNotFound(RevisionRangeError::new(
                &self.revision,
            )));
        }
        if !status.success() {
            return Err(GitError::LogFailed {
                code: status.code(),
                stderr: stderr_text.trim().to_string(),
            });
        }
        Ok(LogOutcome::Completed(()))
    }

    /// Run and return stdout verbatim
    ///
    /// # Errors
    ///
    /// Returns a spawn failure, or `GitError::LogFailed` when git fails for a
    /// reason other than a missing revision.
    pub fn run_plain(&self) -> Result<LogOutcome<String>, GitError> {
        debug!(
            program = %self.program,
            root = %self.store_root.display(),
            args = ?self.args(),
            "Running git log (plain)"
        );

        let output = self.command().output().map_err(|e| self.spawn_error(e))?;
        if output.status.success() {
            return Ok(LogOutcome::Completed(
                String::from_utf8_lossy(&output.stdout).into_owned(),
            ));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.trim().starts_with(REVISION_RANGE_PREFIX) {
            return Ok(LogOutcome::RevisionNotFound(RevisionRangeError::new(
                &self.revision,
            )));
        }
        Err(GitError::LogFailed {
            code: output.status.code(),
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Feed each line of `reader` through `patterns`, returning the match count
fn dispatch_lines(
    mut reader: impl BufRead,
    patterns: &mut [OutputPattern<'_>],
) -> Result<usize, GitError> {
    let mut matched = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(matched);
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        for pattern in patterns.iter_mut() {
            if pattern.dispatch(line)? {
                matched += 1;
            }
        }
    }
}

fn read_all(mut reader: impl Read) -> Result<String, GitError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
