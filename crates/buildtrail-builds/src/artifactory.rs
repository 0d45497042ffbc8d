// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Artifactory REST implementation of [`BuildInfoService`]
//!
//! Uses the build REST API:
//! - `GET {base}/api/build/{name}` lists runs
//! - `GET {base}/api/build/{name}/{number}` fetches one run
//!
//! Both accept a `project` query parameter. A 404 is reported as "not found".

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::BuildsError;
use crate::model::{BuildInfoParams, BuildRuns, LATEST_BUILD_NUMBER, PublishedBuildInfo};
use crate::service::BuildInfoService;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // 404 means "not found", other statuses are mapped below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

/// Blocking client for an Artifactory instance
pub struct ArtifactoryClient {
    base: Url,
    access_token: Option<String>,
    agent: ureq::Agent,
}

impl ArtifactoryClient {
    /// Create a client for the Artifactory at `base_url` (e.g. `https://acme.jfrog.io/artifactory`)
    ///
    /// # Errors
    ///
    /// Returns `BuildsError::InvalidServiceUrl` if `base_url` does not parse,
    /// or `BuildsError::CannotBeBase` if it cannot carry path segments.
    pub fn new(base_url: &str) -> Result<Self, BuildsError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(BuildsError::CannotBeBase {
                url: base_url.to_string(),
            });
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            access_token: None,
            agent: make_agent(DEFAULT_TIMEOUT),
        })
    }

    /// Send `token` as a bearer token on every request
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Replace the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = make_agent(timeout);
        self
    }

    /// URL of `api/build/{segments...}` with the project query applied
    ///
    /// # Errors
    ///
    /// Returns `BuildsError::InvalidServiceUrl` if the URL cannot be built.
    pub fn build_url(&self, segments: &[&str], project: Option<&str>) -> Result<Url, BuildsError> {
        let mut url = self.base.join("api/build")?;
        url.path_segments_mut()
            .map_err(|()| BuildsError::CannotBeBase {
                url: self.base.to_string(),
            })?
            .extend(segments);
        if let Some(project) = project {
            url.query_pairs_mut().append_pair("project", project);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, BuildsError> {
        debug!(url = %url, "GET");
        let mut request = self.agent.get(url.as_str());
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call()?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(BuildsError::Status {
                status,
                url: url.to_string(),
                body,
            });
        }

        Ok(Some(response.into_body().read_json()?))
    }
}

impl BuildInfoService for ArtifactoryClient {
    fn get_build_info(
        &self,
        params: &BuildInfoParams,
    ) -> Result<Option<PublishedBuildInfo>, BuildsError> {
        let number = match params.build_number.as_deref() {
            None | Some(LATEST_BUILD_NUMBER) => {
                // The REST API has no "latest" alias; the listing's head is the latest run.
                let Some(runs) = self.get_build_runs(params)? else {
                    return Ok(None);
                };
                let Some(latest) = runs.builds_numbers.first() else {
                    return Ok(None);
                };
                latest.number().to_string()
            }
            Some(number) => number.to_string(),
        };

        let url = self.build_url(
            &[&params.build_name, &number],
            params.project_key.as_deref(),
        )?;
        self.get_json(url)
    }

    fn get_build_runs(&self, params: &BuildInfoParams) -> Result<Option<BuildRuns>, BuildsError> {
        let url = self.build_url(&[&params.build_name], params.project_key.as_deref())?;
        self.get_json(url)
    }
}
