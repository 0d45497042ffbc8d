// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for buildtrail-git

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating a repository or running `git log`
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// The git executable could not be resolved on PATH
    #[error("Could not find '{program}' on PATH")]
    ToolNotFound {
        /// The program that was looked up
        program: String,
    },

    /// No `.git` entry in the start directory or any of its ancestors
    #[error("Could not find .git (searched upward from {path})")]
    RepositoryNotFound {
        /// The directory the search started from
        path: PathBuf,
    },

    /// The repository has no remote with a URL
    #[error("No remote URL configured for repository at {path}")]
    NoRemote {
        /// Path of the `.git` store
        path: PathBuf,
    },

    /// The log limit was zero
    #[error("Log limit must be a positive number")]
    InvalidLimit,

    /// An output pattern failed to compile
    #[error("Invalid output pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The git process could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start
        program: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error while reading process output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// git exited unsuccessfully for a reason other than a missing revision
    #[error("Failed executing git log command (exit code {code:?}): {stderr}")]
    LogFailed {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured error output
        stderr: String,
    },

    /// An output handler rejected a line
    #[error("Output handler failed: {message}")]
    Handler {
        /// Message supplied by the handler
        message: String,
    },
}

impl GitError {
    /// Build a handler error from any displayable message
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }
}
