// SPDX-License-Identifier: PMPL-1.0-or-later
//! SonarQube webhook handler
//!
//! SonarQube posts here when a project analysis completes. The robot to
//! notify is named by the `access_token` query parameter, so one bot serves
//! any number of DingTalk groups.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::dingtalk::DingTalkClient;
use crate::error::Result;
use crate::formatter::{CardTemplate, ScanReport};
use crate::sonar::SonarClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sonar: Arc<SonarClient>,
    pub dingtalk: Arc<DingTalkClient>,
    pub template: Arc<CardTemplate>,
}

impl AppState {
    /// Build the clients once per process
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            sonar: Arc::new(SonarClient::new(&config.sonar)?),
            dingtalk: Arc::new(DingTalkClient::new(&config.dingtalk)?),
            template: Arc::new(CardTemplate::from(&config.card)),
        })
    }
}

/// Create webhook router
pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/dingtalk", post(handle_sonar_callback))
}

/// First value of a query parameter; a repeated parameter is not an error
pub fn first_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Analysis-completed payload sent by SonarQube. Missing fields read as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanCallback {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub project: CallbackProject,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackProject {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// SonarQube analysis callback handler
async fn handle_sonar_callback(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> impl IntoResponse {
    let access_token = first_param(&params, "access_token").unwrap_or_default().to_string();

    let callback = match serde_json::from_slice::<ScanCallback>(&body) {
        Ok(callback) => callback,
        Err(e) => {
            tracing::warn!("Rejecting malformed SonarQube callback: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                format!("invalid callback payload: {}", e),
            );
        }
    };

    tracing::info!(
        "Received SonarQube callback for {} (task: {}, status: {})",
        callback.project.key,
        callback.task_id.as_deref().unwrap_or("-"),
        callback.status.as_deref().unwrap_or("-"),
    );

    let measures = match state
        .sonar
        .fetch_measures(&callback.server_url, &callback.project.key)
        .await
    {
        Ok(measures) => measures,
        Err(e) => {
            tracing::error!("request measures error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("request measures error: {}", e),
            );
        }
    };

    let report = ScanReport {
        project_name: callback.project.name,
        project_key: callback.project.key,
        server_url: callback.server_url,
        measures,
    };
    let message = state.template.render(&report);

    // Delivery failures are logged and echoed back, but never fail the callback.
    let outcome = match state.dingtalk.send(&access_token, &message).await {
        Ok(response) => {
            tracing::info!(
                "Sent scan card for {} to DingTalk ({})",
                report.project_key,
                response.status()
            );
            format!("{:?}", response)
        }
        Err(e) => {
            tracing::warn!("DingTalk delivery for {} failed: {}", report.project_key, e);
            format!("dingtalk delivery error: {}", e)
        }
    };

    (StatusCode::OK, outcome)
}
