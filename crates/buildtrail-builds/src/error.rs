// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for buildtrail-builds

use thiserror::Error;

/// Errors that can occur while reading build history
#[derive(Debug, Error)]
pub enum BuildsError {
    /// A negative previous-build position was requested
    #[error(
        "Invalid input for previous build position ({position}). Input must be a non negative number"
    )]
    InvalidPosition {
        /// The rejected position
        position: i64,
    },

    /// The build name was empty
    #[error("Build name is required")]
    MissingBuildName,

    /// No earlier build recorded a different first revision than the latest
    #[error("No previous build with a differing commit was found")]
    NoDifferingBuild,

    /// The requested build has no published runs
    #[error("Build not found: {name}")]
    BuildNotFound {
        /// The build name that was looked up
        name: String,
    },

    /// A build URI did not have the expected `/artifactory/api/build/` shape
    #[error("Invalid API URL format: {uri}")]
    InvalidApiUrl {
        /// The URI that failed to match
        uri: String,
    },

    /// A build start time could not be parsed
    #[error("Invalid build start timestamp '{value}': {source}")]
    InvalidTimestamp {
        /// The timestamp text
        value: String,
        /// Underlying parse error
        source: chrono::ParseError,
    },

    /// The service base URL could not be parsed or extended
    #[error("Invalid service URL: {0}")]
    InvalidServiceUrl(#[from] url::ParseError),

    /// The service base URL cannot carry path segments
    #[error("Service URL cannot be used as a base: {url}")]
    CannotBeBase {
        /// The offending URL
        url: String,
    },

    /// Transport or decoding failure talking to the service
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    /// The service answered with an unexpected status
    #[error("Service returned {status} for {url}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
        /// Response body, if readable
        body: String,
    },
}
