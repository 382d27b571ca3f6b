// SPDX-License-Identifier: PMPL-1.0-or-later
//! sonarbot - SonarQube analysis results delivered to DingTalk
//!
//! SonarQube calls the bot's webhook when a project analysis finishes. The
//! bot pulls the project's measures back from SonarQube, renders them into a
//! DingTalk action card and posts it to the robot named in the callback URL.
//!
//! # Architecture
//!
//! ```text
//! SonarQube → POST /dingtalk → sonarbot → GET /api/measures/search
//!                                       → POST robot/send → DingTalk
//! ```

pub mod api;
pub mod config;
pub mod dingtalk;
pub mod error;
pub mod formatter;
pub mod sonar;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::AppState;
    pub use crate::config::Config;
    pub use crate::dingtalk::{ChatMessage, DingTalkClient};
    pub use crate::error::{Error, Result};
    pub use crate::formatter::{CardTemplate, ScanReport};
    pub use crate::sonar::{Measures, MetricKind, QualityGate, SonarClient};
}
