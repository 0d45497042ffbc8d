// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Reference build selection
//!
//! Walks a build's published runs to pick the build whose recorded revision
//! a changelog should start from. Three policies are offered:
//!
//! - [`BuildHistory::latest_build`]: the most recent run.
//! - [`BuildHistory::previous_build`]: the run at a position in the listing
//!   (0 is the latest).
//! - [`BuildHistory::first_build_with_different_revision`]: the newest run
//!   whose first recorded revision differs from the latest run's.
//!
//! A build that does not exist, a listing that is too short, or a run deleted
//! between listing and fetch all yield `None` rather than an error.

use tracing::debug;

use crate::error::BuildsError;
use crate::model::{BuildIdentity, LATEST_BUILD_NUMBER, PublishedBuildInfo};
use crate::service::BuildInfoService;

/// Build history of one build, read through a [`BuildInfoService`]
#[derive(Debug)]
pub struct BuildHistory<'a, S: ?Sized> {
    service: &'a S,
    identity: &'a BuildIdentity,
}

impl<'a, S: BuildInfoService + ?Sized> BuildHistory<'a, S> {
    /// Read `identity`'s history from `service`
    pub fn new(service: &'a S, identity: &'a BuildIdentity) -> Self {
        Self { service, identity }
    }

    /// The most recent published run, if any
    ///
    /// # Errors
    ///
    /// Propagates service errors.
    pub fn latest_build(&self) -> Result<Option<PublishedBuildInfo>, BuildsError> {
        let params = self.identity.params(Some(LATEST_BUILD_NUMBER));
        let published = self.service.get_build_info(&params)?;
        debug!(
            build = %self.identity.name(),
            found = published.is_some(),
            "Fetched latest build"
        );
        Ok(published)
    }

    /// Revision the latest run recorded for `vcs_url`
    ///
    /// Empty when there is no run or the run did not record `vcs_url`.
    ///
    /// # Errors
    ///
    /// Propagates service errors.
    pub fn latest_revision(&self, vcs_url: &str) -> Result<String, BuildsError> {
        Ok(matching_revision(self.latest_build()?.as_ref(), vcs_url))
    }

    /// The run at `position` in the newest-first listing
    ///
    /// # Errors
    ///
    /// Returns `BuildsError::InvalidPosition` for a negative position, before
    /// the service is contacted. Propagates service errors.
    pub fn previous_build(
        &self,
        position: i64,
    ) -> Result<Option<PublishedBuildInfo>, BuildsError> {
        let index =
            usize::try_from(position).map_err(|_| BuildsError::InvalidPosition { position })?;

        let Some(runs) = self.service.get_build_runs(&self.identity.params(None))? else {
            debug!(build = %self.identity.name(), "Build has no runs");
            return Ok(None);
        };
        let Some(run) = runs.builds_numbers.get(index) else {
            debug!(
                build = %self.identity.name(),
                position,
                available = runs.builds_numbers.len(),
                "Not enough runs for requested position"
            );
            return Ok(None);
        };

        let published = self
            .service
            .get_build_info(&self.identity.params(Some(run.number())))?;
        if published.is_none() {
            debug!(number = %run.number(), "Run deleted after listing");
        }
        Ok(published)
    }

    /// Revision the run at `position` recorded for `vcs_url`
    ///
    /// # Errors
    ///
    /// See [`BuildHistory::previous_build`].
    pub fn revision_at(&self, position: i64, vcs_url: &str) -> Result<String, BuildsError> {
        Ok(matching_revision(
            self.previous_build(position)?.as_ref(),
            vcs_url,
        ))
    }

    /// The newest run whose first recorded revision differs from the latest run's
    ///
    /// Only the first entry of each run's VCS list is compared; the
    /// repository URL plays no part in the selection.
    ///
    /// # Errors
    ///
    /// Returns `BuildsError::NoDifferingBuild` when every listed run carries
    /// the latest run's revision. Propagates service errors.
    pub fn first_build_with_different_revision(
        &self,
    ) -> Result<Option<PublishedBuildInfo>, BuildsError> {
        let Some(runs) = self.service.get_build_runs(&self.identity.params(None))? else {
            return Ok(None);
        };
        let Some((newest, older)) = runs.builds_numbers.split_first() else {
            return Ok(None);
        };

        let Some(baseline) = self
            .service
            .get_build_info(&self.identity.params(Some(newest.number())))?
        else {
            debug!(number = %newest.number(), "Latest run deleted after listing");
            return Ok(None);
        };
        let baseline_revision = baseline.build_info.first_revision();

        for run in older {
            let Some(published) = self
                .service
                .get_build_info(&self.identity.params(Some(run.number())))?
            else {
                debug!(number = %run.number(), "Run deleted after listing");
                return Ok(None);
            };
            if published.build_info.first_revision() != baseline_revision {
                debug!(
                    number = %run.number(),
                    baseline = %newest.number(),
                    "Found run with a differing revision"
                );
                return Ok(Some(published));
            }
        }

        Err(BuildsError::NoDifferingBuild)
    }

    /// Revision recorded for `vcs_url` by the first run with a differing revision
    ///
    /// # Errors
    ///
    /// See [`BuildHistory::first_build_with_different_revision`].
    pub fn revision_from_previous_build(&self, vcs_url: &str) -> Result<String, BuildsError> {
        Ok(matching_revision(
            self.first_build_with_different_revision()?.as_ref(),
            vcs_url,
        ))
    }
}

fn matching_revision(published: Option<&PublishedBuildInfo>, vcs_url: &str) -> String {
    published
        .map(|p| p.build_info.revision_for(vcs_url).to_string())
        .unwrap_or_default()
}
