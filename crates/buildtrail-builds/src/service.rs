// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The build-info service seam

use crate::error::BuildsError;
use crate::model::{BuildInfoParams, BuildRuns, PublishedBuildInfo};

/// Read access to a build-tracking service
///
/// `Ok(None)` means the service answered but has no such build; it is not
/// an error.
pub trait BuildInfoService {
    /// Fetch one build run's recorded metadata
    ///
    /// `params.build_number` may be [`crate::model::LATEST_BUILD_NUMBER`].
    ///
    /// # Errors
    ///
    /// Returns `BuildsError` if the service cannot be reached or answers
    /// with an unexpected status.
    fn get_build_info(
        &self,
        params: &BuildInfoParams,
    ) -> Result<Option<PublishedBuildInfo>, BuildsError>;

    /// List a build's runs, newest first
    ///
    /// # Errors
    ///
    /// Returns `BuildsError` if the service cannot be reached or answers
    /// with an unexpected status.
    fn get_build_runs(&self, params: &BuildInfoParams) -> Result<Option<BuildRuns>, BuildsError>;
}

impl<S: BuildInfoService + ?Sized> BuildInfoService for &S {
    fn get_build_info(
        &self,
        params: &BuildInfoParams,
    ) -> Result<Option<PublishedBuildInfo>, BuildsError> {
        (**self).get_build_info(params)
    }

    fn get_build_runs(&self, params: &BuildInfoParams) -> Result<Option<BuildRuns>, BuildsError> {
        (**self).get_build_runs(params)
    }
}
