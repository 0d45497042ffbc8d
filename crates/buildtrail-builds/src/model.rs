// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build-info records as published by the build-tracking service
//!
//! Field names follow the service's JSON build-info format, so the same
//! types deserialize REST responses and serve as fixtures in tests.

use serde::{Deserialize, Serialize};

use crate::error::BuildsError;

/// Build number that asks the service for the most recent run
pub const LATEST_BUILD_NUMBER: &str = "LATEST";

/// A version-control binding recorded by a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vcs {
    /// Repository URL
    #[serde(default)]
    pub url: String,
    /// Commit the build was made from
    #[serde(default)]
    pub revision: String,
    /// Branch name, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Commit message, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The recorded metadata of one build run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Build name
    #[serde(default)]
    pub name: String,
    /// Build number
    #[serde(default)]
    pub number: String,
    /// ISO-8601 start time
    #[serde(default)]
    pub started: String,
    /// Version-control bindings, in recorded order
    #[serde(default, rename = "vcs")]
    pub vcs_list: Vec<Vcs>,
}

impl BuildInfo {
    /// Revision recorded for `vcs_url`, or an empty string if none matches
    ///
    /// The first binding whose URL equals `vcs_url` wins.
    #[must_use]
    pub fn revision_for(&self, vcs_url: &str) -> &str {
        self.vcs_list
            .iter()
            .find(|vcs| vcs.url == vcs_url)
            .map_or("", |vcs| vcs.revision.as_str())
    }

    /// Revision of the first recorded binding, regardless of URL
    #[must_use]
    pub fn first_revision(&self) -> Option<&str> {
        self.vcs_list.first().map(|vcs| vcs.revision.as_str())
    }
}

/// A build run together with its service API URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedBuildInfo {
    /// Service API URL of this build run
    #[serde(default)]
    pub uri: String,
    /// The recorded metadata
    #[serde(rename = "buildInfo")]
    pub build_info: BuildInfo,
}

/// One entry in a build's run listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRun {
    /// Run URI of the form `/<number>`
    pub uri: String,
    /// ISO-8601 start time, if listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
}

impl BuildRun {
    /// The build number this run refers to
    #[must_use]
    pub fn number(&self) -> &str {
        self.uri.strip_prefix('/').unwrap_or(&self.uri)
    }
}

/// The runs of a build, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRuns {
    /// Service API URL of the build
    #[serde(default)]
    pub uri: String,
    /// Runs as ordered by the service
    #[serde(default, rename = "buildsNumbers")]
    pub builds_numbers: Vec<BuildRun>,
}

/// Which build to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIdentity {
    name: String,
    project: Option<String>,
}

impl BuildIdentity {
    /// Identify a build by name, optionally scoped to a project
    ///
    /// # Errors
    ///
    /// Returns `BuildsError::MissingBuildName` if `name` is blank.
    pub fn new(name: impl Into<String>, project: Option<String>) -> Result<Self, BuildsError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BuildsError::MissingBuildName);
        }
        Ok(Self {
            name,
            project: project.filter(|p| !p.trim().is_empty()),
        })
    }

    /// Build name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project key, if any
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Parameters addressing one run of this build
    #[must_use]
    pub fn params(&self, build_number: Option<&str>) -> BuildInfoParams {
        BuildInfoParams {
            build_name: self.name.clone(),
            build_number: build_number.map(str::to_string),
            project_key: self.project.clone(),
        }
    }
}

/// Request parameters for build-info lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfoParams {
    /// Build name
    pub build_name: String,
    /// Build number or [`LATEST_BUILD_NUMBER`]; unused when listing runs
    pub build_number: Option<String>,
    /// Project key, if any
    pub project_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const PUBLISHED_JSON: &str = r#"{
        "uri": "https://acme.jfrog.io/artifactory/api/build/widgets/42",
        "buildInfo": {
            "version": "1.0.1",
            "name": "widgets",
            "number": "42",
            "started": "2024-01-01T00:00:00.000+0000",
            "vcs": [
                {
                    "url": "https://github.com/acme/widgets.git",
                    "revision": "1945ab9c752534e733c38ba0109dc3b741f0a6eb",
                    "branch": "main",
                    "message": "Release 42"
                },
                {
                    "url": "https://github.com/acme/shared.git",
                    "revision": "c460aeb7fb2d109c17e43de0ce681faec0b7374d"
                }
            ]
        }
    }"#;

    #[test]
    fn test_deserialize_published_build_info() {
        let published: PublishedBuildInfo =
            serde_json::from_str(PUBLISHED_JSON).expect("should deserialize");
        assert_eq!(published.build_info.name, "widgets");
        assert_eq!(published.build_info.number, "42");
        assert_eq!(published.build_info.vcs_list.len(), 2);
        assert_eq!(
            published.build_info.vcs_list[0].branch.as_deref(),
            Some("main")
        );
        assert_eq!(published.build_info.vcs_list[1].branch, None);
    }

    #[test]
    fn test_revision_for_matches_url() {
        let published: PublishedBuildInfo =
            serde_json::from_str(PUBLISHED_JSON).expect("should deserialize");
        let info = &published.build_info;
        assert_eq!(
            info.revision_for("https://github.com/acme/shared.git"),
            "c460aeb7fb2d109c17e43de0ce681faec0b7374d"
        );
        assert_eq!(info.revision_for("https://github.com/acme/missing.git"), "");
    }

    #[test]
    fn test_revision_for_first_match_wins() {
        let info = BuildInfo {
            vcs_list: vec![
                Vcs {
                    url: "u".to_string(),
                    revision: "first".to_string(),
                    ..Default::default()
                },
                Vcs {
                    url: "u".to_string(),
                    revision: "second".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(info.revision_for("u"), "first");
    }

    #[test]
    fn test_first_revision() {
        assert_eq!(BuildInfo::default().first_revision(), None);
        let published: PublishedBuildInfo =
            serde_json::from_str(PUBLISHED_JSON).expect("should deserialize");
        assert_eq!(
            published.build_info.first_revision(),
            Some("1945ab9c752534e733c38ba0109dc3b741f0a6eb")
        );
    }

    #[test]
    fn test_deserialize_build_runs() {
        let json = r#"{
            "uri": "https://acme.jfrog.io/artifactory/api/build/widgets",
            "buildsNumbers": [
                {"uri": "/42", "started": "2024-01-02T00:00:00.000+0000"},
                {"uri": "/41", "started": "2024-01-01T00:00:00.000+0000"}
            ]
        }"#;
        let runs: BuildRuns = serde_json::from_str(json).expect("should deserialize");
        let numbers: Vec<&str> = runs.builds_numbers.iter().map(BuildRun::number).collect();
        assert_eq!(numbers, vec!["42", "41"]);
    }

    #[test]
    fn test_build_run_number_without_slash() {
        let run = BuildRun {
            uri: "17".to_string(),
            started: None,
        };
        assert_eq!(run.number(), "17");
    }

    #[test]
    fn test_build_identity_requires_name() {
        assert!(matches!(
            BuildIdentity::new("  ", None),
            Err(BuildsError::MissingBuildName)
        ));
    }

    #[test]
    fn test_build_identity_params() {
        let identity =
            BuildIdentity::new("widgets", Some("acme".to_string())).expect("valid identity");
        assert_eq!(
            identity.params(Some(LATEST_BUILD_NUMBER)),
            BuildInfoParams {
                build_name: "widgets".to_string(),
                build_number: Some("LATEST".to_string()),
                project_key: Some("acme".to_string()),
            }
        );
    }

    #[test]
    fn test_build_identity_blank_project_dropped() {
        let identity = BuildIdentity::new("widgets", Some(String::new())).expect("valid identity");
        assert_eq!(identity.project(), None);
    }
}
