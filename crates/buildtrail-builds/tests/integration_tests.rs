// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for buildtrail-builds
//!
//! History walking over build-info decoded from REST-shaped JSON.

use std::collections::HashMap;

use buildtrail_builds::{
    BuildHistory, BuildIdentity, BuildInfoParams, BuildInfoService, BuildRuns, BuildsError,
    LATEST_BUILD_NUMBER, PublishedBuildInfo, build_link,
};
use similar_asserts::assert_eq;

const REPO: &str = "https://github.com/acme/widgets.git";

const RUNS_JSON: &str = r#"{
    "uri": "https://acme.jfrog.io/artifactory/api/build/widgets",
    "buildsNumbers": [
        {"uri": "/12", "started": "2024-03-02T09:00:00.000+0000"},
        {"uri": "/11", "started": "2024-03-01T09:00:00.000+0000"},
        {"uri": "/10", "started": "2024-02-28T09:00:00.000+0000"}
    ]
}"#;

fn build_json(number: &str, started: &str, revision: &str) -> String {
    format!(
        r#"{{
        "uri": "https://acme.jfrog.io/artifactory/api/build/widgets/{number}?project=acme",
        "buildInfo": {{
            "version": "1.0.1",
            "name": "widgets",
            "number": "{number}",
            "started": "{started}",
            "agent": {{"name": "GitHub Actions", "version": "1"}},
            "vcs": [
                {{
                    "url": "{REPO}",
                    "revision": "{revision}",
                    "branch": "main",
                    "message": "Release {number}"
                }},
                {{
                    "url": "https://github.com/acme/shared.git",
                    "revision": "ffffffffffffffffffffffffffffffffffffffff"
                }}
            ],
            "modules": []
        }}
    }}"#
    )
}

/// A service answering from JSON documents keyed by build number
struct JsonService {
    runs: String,
    builds: HashMap<String, String>,
}

impl JsonService {
    fn new() -> Self {
        let builds = [
            ("12", "2024-03-02T09:00:00.000+0000", "c".repeat(40)),
            ("11", "2024-03-01T09:00:00.000+0000", "c".repeat(40)),
            ("10", "2024-02-28T09:00:00.000+0000", "a".repeat(40)),
        ]
        .into_iter()
        .map(|(number, started, revision)| {
            (number.to_string(), build_json(number, started, &revision))
        })
        .collect();
        Self {
            runs: RUNS_JSON.to_string(),
            builds,
        }
    }
}

impl BuildInfoService for JsonService {
    fn get_build_info(
        &self,
        params: &BuildInfoParams,
    ) -> Result<Option<PublishedBuildInfo>, BuildsError> {
        let number = match params.build_number.as_deref() {
            None | Some(LATEST_BUILD_NUMBER) => "12",
            Some(number) => number,
        };
        Ok(self
            .builds
            .get(number)
            .map(|json| serde_json::from_str(json).expect("fixture should decode")))
    }

    fn get_build_runs(&self, _params: &BuildInfoParams) -> Result<Option<BuildRuns>, BuildsError> {
        Ok(Some(
            serde_json::from_str(&self.runs).expect("fixture should decode"),
        ))
    }
}

fn identity() -> BuildIdentity {
    BuildIdentity::new("widgets", Some("acme".to_string())).expect("identity")
}

#[test]
fn test_runs_listing_decodes_numbers() {
    let runs: BuildRuns = serde_json::from_str(RUNS_JSON).expect("should decode");
    let numbers: Vec<&str> = runs.builds_numbers.iter().map(|r| r.number()).collect();
    assert_eq!(numbers, vec!["12", "11", "10"]);
}

#[test]
fn test_build_info_ignores_unknown_fields() {
    let published: PublishedBuildInfo =
        serde_json::from_str(&build_json("7", "2024-01-01T00:00:00.000+0000", "abc"))
            .expect("should decode");
    assert_eq!(published.build_info.number, "7");
    assert_eq!(published.build_info.vcs_list.len(), 2);
    assert_eq!(published.build_info.vcs_list[0].branch.as_deref(), Some("main"));
    assert_eq!(published.build_info.revision_for(REPO), "abc");
}

#[test]
fn test_latest_revision_from_json() {
    let service = JsonService::new();
    let identity = identity();
    let history = BuildHistory::new(&service, &identity);
    assert_eq!(
        history.latest_revision(REPO).expect("lookup"),
        "c".repeat(40)
    );
}

#[test]
fn test_previous_build_from_json() {
    let service = JsonService::new();
    let identity = identity();
    let history = BuildHistory::new(&service, &identity);
    assert_eq!(history.revision_at(2, REPO).expect("lookup"), "a".repeat(40));
    assert_eq!(history.revision_at(3, REPO).expect("lookup"), "");
}

#[test]
fn test_changed_build_from_json() {
    let service = JsonService::new();
    let identity = identity();
    let history = BuildHistory::new(&service, &identity);

    let changed = history
        .first_build_with_different_revision()
        .expect("lookup")
        .expect("a differing build exists");
    assert_eq!(changed.build_info.number, "10");
    assert_eq!(
        history.revision_from_previous_build(REPO).expect("lookup"),
        "a".repeat(40)
    );
}

#[test]
fn test_link_for_latest_build_keeps_project_query() {
    let service = JsonService::new();
    let identity = identity();
    let history = BuildHistory::new(&service, &identity);

    let latest = history
        .previous_build(0)
        .expect("lookup")
        .expect("latest build exists");
    assert_eq!(
        build_link(&latest).expect("link"),
        "https://acme.jfrog.io/ui/builds/widgets/12/1709370000000/Evidence?project=acme"
    );
}
