//! Commit entries parsed from `git log` output

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sha>[0-9a-fA-F]{40}) (?P<subject>.*)$").expect("entry pattern is valid")
});

/// One line of `git log --pretty=%H %s` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// First line of the commit message
    pub subject: String,
}

impl Commit {
    /// The `--pretty` format whose lines [`Commit::from_line`] understands
    pub const PRETTY_FORMAT: &'static str = "%H %s";

    /// Regex matching one [`Commit::PRETTY_FORMAT`] line, with `sha` and `subject` groups
    #[must_use]
    pub fn pattern() -> &'static Regex {
        &ENTRY_PATTERN
    }

    /// Parse a [`Commit::PRETTY_FORMAT`] line
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        let caps = ENTRY_PATTERN.captures(line)?;
        Some(Self {
            sha: caps["sha"].to_string(),
            subject: caps["subject"].to_string(),
        })
    }

    /// Abbreviated sha for display
    #[must_use]
    pub fn short_sha(&self) -> &str {
        abbreviate_sha(&self.sha)
    }
}

/// Characters kept by [`abbreviate_sha`]
pub const SHORT_SHA_LEN: usize = 7;

/// First [`SHORT_SHA_LEN`] characters of `sha`, or all of it when shorter
///
/// Cuts on a character boundary, so arbitrary captured text is safe.
#[must_use]
pub fn abbreviate_sha(sha: &str) -> &str {
    sha.char_indices()
        .nth(SHORT_SHA_LEN)
        .map_or(sha, |(end, _)| &sha[..end])
}
