// SPDX-License-Identifier: PMPL-1.0-or-later
//! DingTalk robot messages and delivery

pub mod client;

pub use client::DingTalkClient;

use serde::{Deserialize, Serialize};

/// Outbound robot message; always an action card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub msgtype: String,
    #[serde(rename = "actionCard")]
    pub action_card: ActionCard,
}

impl ChatMessage {
    pub fn action_card(card: ActionCard) -> Self {
        Self {
            msgtype: "actionCard".to_string(),
            action_card: card,
        }
    }
}

/// Card with a markdown body and a row or column of buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCard {
    pub title: String,
    pub text: String,
    /// "0" stacks buttons vertically, "1" lays them out horizontally
    pub btn_orientation: String,
    pub btns: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub title: String,
    #[serde(rename = "actionURL")]
    pub action_url: String,
}

/// Wrap a URL so the DingTalk client opens it in-app.
///
/// With `pc_slide` the desktop client opens it in its side panel instead of
/// the system browser.
pub fn dingtalk_link(url: &str, pc_slide: bool) -> String {
    format!(
        "dingtalk://dingtalkclient/page/link?pcSlide={}&url={}",
        pc_slide,
        urlencoding::encode(url)
    )
}
