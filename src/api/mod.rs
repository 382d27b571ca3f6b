// SPDX-License-Identifier: PMPL-1.0-or-later
//! API layer - SonarQube webhook and health endpoints

pub mod webhooks;

pub use webhooks::{webhook_router, AppState};

use axum::{routing::get, Router};

/// Full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(webhook_router())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
