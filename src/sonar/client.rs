// SPDX-License-Identifier: PMPL-1.0-or-later
//! Client for the SonarQube measures API
//!
//! The token is passed only to `basic_auth()`. It is never logged or
//! included in error messages.

use reqwest::Client;
use std::time::Duration;

use super::{metric_keys, Measures, MeasuresResponse};
use crate::config::SonarConfig;
use crate::error::{Error, Result};

/// SonarQube client shared by every callback
pub struct SonarClient {
    client: Client,
    token: String,
}

impl SonarClient {
    /// Create a new SonarQube client
    pub fn new(config: &SonarConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .ok_or_else(|| Error::Config("sonar.token is required".to_string()))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            token,
        })
    }

    /// Fetch the requested measures of one project.
    ///
    /// The HTTP status is not inspected: a response that decodes as a
    /// measures list is accepted, anything else is an error.
    pub async fn fetch_measures(&self, server_url: &str, project_key: &str) -> Result<Measures> {
        let url = format!("{}/api/measures/search", server_url.trim_end_matches('/'));
        let keys = metric_keys();

        let response = self
            .client
            .get(&url)
            .query(&[("projectKeys", project_key), ("metricKeys", keys.as_str())])
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        let body: MeasuresResponse = response.json().await?;
        tracing::debug!(
            "Received {} measure(s) for {}",
            body.measures.len(),
            project_key
        );

        Ok(Measures::from_response(body))
    }
}
