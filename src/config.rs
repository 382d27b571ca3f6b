// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration management for sonarbot
//!
//! Settings come from an optional TOML file, then `SONARBOT__*` environment
//! variables, then command-line flags (applied by `main`).
//!
//! The SonarQube token is held in memory only. Avoid logging `Config`
//! directly since the derived `Debug` prints it.

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// SonarQube measures API access
    #[serde(default)]
    pub sonar: SonarConfig,

    /// DingTalk robot API
    #[serde(default)]
    pub dingtalk: DingTalkConfig,

    /// Action card rendering
    #[serde(default)]
    pub card: CardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0:9001".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SonarConfig {
    /// User token sent as the basic-auth username on every measures request
    pub token: Option<String>,

    /// Request timeout (seconds); unset leaves the transport default
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DingTalkConfig {
    /// Base URL of the robot API
    #[serde(default = "default_dingtalk_api_url")]
    pub api_url: String,

    /// Request timeout (seconds); unset leaves the transport default
    pub timeout_secs: Option<u64>,
}

impl Default for DingTalkConfig {
    fn default() -> Self {
        Self {
            api_url: default_dingtalk_api_url(),
            timeout_secs: None,
        }
    }
}

fn default_dingtalk_api_url() -> String {
    "https://oapi.dingtalk.com".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardConfig {
    /// Header image shown when the quality gate passed
    #[serde(default = "default_passing_image")]
    pub passing_image: String,

    /// Header image shown when the quality gate failed
    #[serde(default = "default_failing_image")]
    pub failing_image: String,

    /// Open card links in the desktop client's side panel
    #[serde(default)]
    pub pc_slide: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            passing_image: default_passing_image(),
            failing_image: default_failing_image(),
            pc_slide: false,
        }
    }
}

pub(crate) fn default_passing_image() -> String {
    "http://s1.ax1x.com/2020/10/29/BGMeTe.png".to_string()
}

pub(crate) fn default_failing_image() -> String {
    "http://s1.ax1x.com/2020/10/29/BGMZwD.png".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let path = Path::new(path);

        let mut builder = config::Config::builder();
        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
        }
        let builder =
            builder.add_source(config::Environment::with_prefix("SONARBOT").separator("__"));

        let config = builder.build()?;
        let parsed: Config = config.try_deserialize()?;

        Ok(parsed)
    }

    /// Apply command-line overrides on top of file and environment values
    pub fn with_overrides(mut self, addr: Option<String>, token: Option<String>) -> Self {
        if let Some(addr) = addr {
            self.server.addr = addr;
        }
        if token.is_some() {
            self.sonar.token = token;
        }
        self
    }

    /// The SonarQube token, if one was supplied and is non-empty
    pub fn token(&self) -> Option<&str> {
        self.sonar.token.as_deref().filter(|t| !t.is_empty())
    }
}
