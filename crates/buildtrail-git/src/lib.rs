// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildtrail-git: git history extraction for buildtrail
//!
//! This library crate locates the local `.git` store, reads the remote URL
//! recorded in build-info, and runs `git log` from a recorded revision to
//! HEAD.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use buildtrail_git::{GitStore, LogCommand, LogQuery};
//!
//! let store = GitStore::discover(std::path::Path::new(".")).expect("find .git");
//! let query = LogQuery::new(20, "%H %s").expect("valid query");
//! let outcome = LogCommand::new(&query, store.root(), "")
//!     .run_plain()
//!     .expect("git log");
//!
//! if let Some(text) = outcome.completed() {
//!     print!("{text}");
//! }
//! ```

pub mod commit;
pub mod error;
pub mod log;
pub mod repo;

pub use commit::Commit;
pub use error::GitError;
pub use log::{LogCommand, LogOutcome, LogQuery, OutputPattern, RevisionRangeError};
pub use repo::GitStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::error::GitError;
    pub use crate::log::{LogCommand, LogOutcome, LogQuery, OutputPattern, RevisionRangeError};
    pub use crate::repo::GitStore;
}
