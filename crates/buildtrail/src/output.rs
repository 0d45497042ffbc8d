// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Rendering of matched log lines

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use buildtrail_git::Commit;
use buildtrail_git::commit::abbreviate_sha;

/// How `log` turns output lines into printed lines
#[derive(Debug, Clone)]
pub enum LineRenderer {
    /// Default pretty format: lines are parsed into [`Commit`]s
    Commits,
    /// User pattern or custom format: named groups are rendered as captured
    Captures(Regex),
}

impl LineRenderer {
    /// Pick the renderer for an optional user pattern and the pretty format
    ///
    /// Without a pattern, the default pretty format is parsed into commits
    /// and any other format is passed through line by line.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if `pattern` does not compile.
    pub fn new(pattern: Option<&str>, pretty_format: &str) -> Result<Self, regex::Error> {
        match pattern {
            Some(pattern) => Ok(Self::Captures(Regex::new(pattern)?)),
            None if pretty_format == Commit::PRETTY_FORMAT => Ok(Self::Commits),
            None => Ok(Self::Captures(Regex::new(r"^(?P<line>.*)$")?)),
        }
    }

    /// Regex lines are matched against
    #[must_use]
    pub fn regex(&self) -> &Regex {
        match self {
            Self::Commits => Commit::pattern(),
            Self::Captures(regex) => regex,
        }
    }

    /// Render one match as text or as a JSON object
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if JSON serialization fails.
    pub fn render(&self, caps: &Captures<'_>, json: bool) -> Result<String, serde_json::Error> {
        match self {
            Self::Commits => match Commit::from_line(&caps[0]) {
                Some(commit) if json => serde_json::to_string(&commit),
                Some(commit) => Ok(format!("{} {}", commit.short_sha(), commit.subject)),
                None => Ok(caps[0].to_string()),
            },
            Self::Captures(regex) if json => serde_json::to_string(&captures_to_json(regex, caps)),
            Self::Captures(_) => Ok(captures_to_text(caps)),
        }
    }
}

/// Named groups of `caps` as a JSON object
///
/// Groups that did not participate in the match are `null`. A regex
/// without named groups yields `{"line": <whole match>}`.
#[must_use]
pub fn captures_to_json(regex: &Regex, caps: &Captures<'_>) -> Map<String, Value> {
    let mut object = Map::new();
    for name in regex.capture_names().flatten() {
        let value = caps
            .name(name)
            .map_or(Value::Null, |m| Value::String(m.as_str().to_string()));
        object.insert(name.to_string(), value);
    }
    if object.is_empty() {
        object.insert("line".to_string(), Value::String(caps[0].to_string()));
    }
    object
}

/// Human-readable rendering of one match
///
/// Matches with `sha` and `subject` groups print as abbreviated sha plus
/// subject; anything else prints the whole match.
#[must_use]
pub fn captures_to_text(caps: &Captures<'_>) -> String {
    match (caps.name("sha"), caps.name("subject")) {
        (Some(sha), Some(subject)) => {
            format!("{} {}", abbreviate_sha(sha.as_str()), subject.as_str())
        }
        _ => caps[0].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const LINE: &str = "1234567890abcdef1234567890abcdef12345678 Fix the frobnicator";

    fn render(renderer: &LineRenderer, line: &str, json: bool) -> String {
        let caps = renderer.regex().captures(line).expect("line should match");
        renderer.render(&caps, json).expect("should render")
    }

    #[test]
    fn test_default_format_renders_commits() {
        let renderer = LineRenderer::new(None, "%H %s").expect("renderer");
        assert!(matches!(renderer, LineRenderer::Commits));
        assert_eq!(render(&renderer, LINE, false), "1234567 Fix the frobnicator");
    }

    #[test]
    fn test_default_format_json_is_commit() {
        let renderer = LineRenderer::new(None, "%H %s").expect("renderer");
        let commit: Commit =
            serde_json::from_str(&render(&renderer, LINE, true)).expect("commit json");
        assert_eq!(commit.sha, "1234567890abcdef1234567890abcdef12345678");
        assert_eq!(commit.subject, "Fix the frobnicator");
    }

    #[test]
    fn test_custom_format_passes_lines_through() {
        let renderer = LineRenderer::new(None, "%h|%an").expect("renderer");
        assert_eq!(render(&renderer, "abc1234|Ada", false), "abc1234|Ada");
        assert_eq!(
            render(&renderer, "abc1234|Ada", true),
            r#"{"line":"abc1234|Ada"}"#
        );
    }

    #[test]
    fn test_user_pattern_with_multibyte_sha_group() {
        let renderer =
            LineRenderer::new(Some(r"^(?P<sha>\S+) (?P<subject>.*)$"), "%an %s").expect("renderer");
        assert_eq!(render(&renderer, "ééééé subject", false), "ééééé subject");
        assert_eq!(
            render(&renderer, "ééééééééé subject", false),
            "ééééééé subject"
        );
    }

    #[test]
    fn test_json_named_groups() {
        let regex = Commit::pattern();
        let caps = regex.captures(LINE).expect("match");
        let json = Value::Object(captures_to_json(regex, &caps));
        assert_eq!(
            json,
            serde_json::json!({
                "sha": "1234567890abcdef1234567890abcdef12345678",
                "subject": "Fix the frobnicator",
            })
        );
    }

    #[test]
    fn test_json_unmatched_optional_group_is_null() {
        let regex = Regex::new(r"^(?P<sha>\w+)(?: (?P<tag>v\d+))?").expect("regex");
        let caps = regex.captures("abc").expect("match");
        let json = captures_to_json(&regex, &caps);
        assert_eq!(json["tag"], Value::Null);
    }

    #[test]
    fn test_json_without_named_groups() {
        let regex = Regex::new(r"^\w+").expect("regex");
        let caps = regex.captures("abc def").expect("match");
        let json = captures_to_json(&regex, &caps);
        assert_eq!(json.len(), 1);
        assert_eq!(json["line"], Value::String("abc".to_string()));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(LineRenderer::new(Some("(unclosed"), "%H %s").is_err());
    }
}
