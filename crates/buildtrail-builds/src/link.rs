// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Dashboard links for published builds

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::error::BuildsError;
use crate::model::PublishedBuildInfo;

static API_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https://.+?)/artifactory/api/build/([^/]+)/([^?]+)(\?.+)?")
        .expect("API URL pattern is valid")
});

/// Timestamp layout used by build-info (`2024-01-01T00:00:00.000+0000`)
const BUILD_INFO_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Parse a build start time
///
/// Accepts RFC 3339 as well as the numeric-offset layout build-info uses.
///
/// # Errors
///
/// Returns `BuildsError::InvalidTimestamp` if neither layout matches.
pub fn parse_started(value: &str) -> Result<DateTime<FixedOffset>, BuildsError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, BUILD_INFO_TIMESTAMP))
        .map_err(|source| BuildsError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Turn a build's API URL and start time into its evidence dashboard URL
///
/// `https://<host>/artifactory/api/build/<name>/<number>[?query]` becomes
/// `https://<host>/ui/builds/<name>/<number>/<epoch-millis>/Evidence[?query]`.
///
/// # Errors
///
/// Returns `BuildsError::InvalidTimestamp` for an unparseable start time and
/// `BuildsError::InvalidApiUrl` when the URL does not have the expected shape.
pub fn dashboard_link(api_url: &str, started: &str) -> Result<String, BuildsError> {
    let epoch_millis = parse_started(started)?.timestamp_millis();

    let caps = API_URL_PATTERN
        .captures(api_url)
        .ok_or_else(|| BuildsError::InvalidApiUrl {
            uri: api_url.to_string(),
        })?;
    let base_url = &caps[1];
    let build_name = &caps[2];
    let build_number = &caps[3];
    let query = caps.get(4).map_or("", |m| m.as_str());

    Ok(format!(
        "{base_url}/ui/builds/{build_name}/{build_number}/{epoch_millis}/Evidence{query}"
    ))
}

/// Dashboard link for a published build run
///
/// # Errors
///
/// See [`dashboard_link`].
pub fn build_link(published: &PublishedBuildInfo) -> Result<String, BuildsError> {
    dashboard_link(&published.uri, &published.build_info.started)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BuildInfo;
    use similar_asserts::assert_eq;

    #[test]
    fn test_dashboard_link_with_query() {
        let link = dashboard_link(
            "https://x.jfrog.io/artifactory/api/build/myBuild/17?project=p",
            "2024-01-01T00:00:00.000Z",
        )
        .expect("should convert");
        assert_eq!(
            link,
            "https://x.jfrog.io/ui/builds/myBuild/17/1704067200000/Evidence?project=p"
        );
    }

    #[test]
    fn test_dashboard_link_without_query() {
        let link = dashboard_link(
            "https://x.jfrog.io/artifactory/api/build/myBuild/17",
            "2024-01-01T00:00:00.123Z",
        )
        .expect("should convert");
        assert_eq!(
            link,
            "https://x.jfrog.io/ui/builds/myBuild/17/1704067200123/Evidence"
        );
    }

    #[test]
    fn test_dashboard_link_build_info_offset_layout() {
        let link = dashboard_link(
            "https://x.jfrog.io/artifactory/api/build/myBuild/17",
            "2024-01-01T02:00:00.000+0200",
        )
        .expect("should convert");
        assert!(link.contains("/1704067200000/"));
    }

    #[test]
    fn test_dashboard_link_invalid_url() {
        let result = dashboard_link(
            "https://x.jfrog.io/api/v1/builds/myBuild",
            "2024-01-01T00:00:00.000Z",
        );
        match result {
            Err(BuildsError::InvalidApiUrl { uri }) => {
                assert_eq!(uri, "https://x.jfrog.io/api/v1/builds/myBuild");
            }
            other => panic!("Expected InvalidApiUrl, got {other:?}"),
        }
    }

    #[test]
    fn test_dashboard_link_plain_http_rejected() {
        let result = dashboard_link(
            "http://x.jfrog.io/artifactory/api/build/myBuild/17",
            "2024-01-01T00:00:00.000Z",
        );
        assert!(matches!(result, Err(BuildsError::InvalidApiUrl { .. })));
    }

    #[test]
    fn test_dashboard_link_invalid_timestamp() {
        let result = dashboard_link(
            "https://x.jfrog.io/artifactory/api/build/myBuild/17",
            "yesterday",
        );
        assert!(matches!(result, Err(BuildsError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_build_link_uses_record_fields() {
        let published = PublishedBuildInfo {
            uri: "https://x.jfrog.io/artifactory/api/build/widgets/42".to_string(),
            build_info: BuildInfo {
                started: "2024-01-01T00:00:00.000+0000".to_string(),
                ..Default::default()
            },
        };
        assert_eq!(
            build_link(&published).expect("should convert"),
            "https://x.jfrog.io/ui/builds/widgets/42/1704067200000/Evidence"
        );
    }
}
