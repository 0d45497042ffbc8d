// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildtrail-builds: build history lookups for buildtrail
//!
//! This library crate reads published build-info from a build-tracking
//! service and selects the build a changelog should start from.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use buildtrail_builds::{ArtifactoryClient, BuildHistory, BuildIdentity};
//!
//! let client = ArtifactoryClient::new("https://acme.jfrog.io/artifactory")
//!     .expect("valid URL")
//!     .with_access_token("token");
//! let identity = BuildIdentity::new("widgets", None).expect("build name");
//! let history = BuildHistory::new(&client, &identity);
//!
//! let revision = history
//!     .latest_revision("https://github.com/acme/widgets.git")
//!     .expect("lookup");
//! println!("last built revision: {revision}");
//! ```

pub mod artifactory;
pub mod error;
pub mod history;
pub mod link;
pub mod model;
pub mod service;

pub use artifactory::ArtifactoryClient;
pub use error::BuildsError;
pub use history::BuildHistory;
pub use link::{build_link, dashboard_link};
pub use model::{
    BuildIdentity, BuildInfo, BuildInfoParams, BuildRun, BuildRuns, LATEST_BUILD_NUMBER,
    PublishedBuildInfo, Vcs,
};
pub use service::BuildInfoService;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::BuildsError;
    pub use crate::history::BuildHistory;
    pub use crate::model::{BuildIdentity, PublishedBuildInfo};
    pub use crate::service::BuildInfoService;
}
