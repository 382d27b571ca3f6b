// SPDX-License-Identifier: PMPL-1.0-or-later
//! Client for DingTalk robot webhooks

use reqwest::{Client, Response};
use std::time::Duration;

use super::ChatMessage;
use crate::config::DingTalkConfig;
use crate::error::Result;

/// Posts messages to `robot/send`
pub struct DingTalkClient {
    client: Client,
    api_url: String,
}

impl DingTalkClient {
    pub fn new(config: &DingTalkConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_url: config.api_url.clone(),
        })
    }

    /// Robot endpoint for an access token. The token is not validated; an
    /// empty one produces an empty parameter.
    pub fn send_url(&self, access_token: &str) -> String {
        format!(
            "{}/robot/send?access_token={}",
            self.api_url.trim_end_matches('/'),
            access_token
        )
    }

    /// Post a message. The response is returned as-is; DingTalk reports
    /// rejections in the body with a 200 status.
    pub async fn send(&self, access_token: &str, message: &ChatMessage) -> Result<Response> {
        let response = self
            .client
            .post(self.send_url(access_token))
            .json(message)
            .send()
            .await?;
        Ok(response)
    }
}
