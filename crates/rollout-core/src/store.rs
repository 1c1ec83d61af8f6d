use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Architecture, ChannelMap, PendingReleases, Release, Revision, RevisionId};

// ── Store ──

/// Normalized console state for a single package.
///
/// Reducers take it by value and return the next value; selectors borrow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    pub revisions: BTreeMap<RevisionId, Revision>,
    pub releases: Vec<Release>,
    pub channel_map: ChannelMap,
    pub pending_releases: PendingReleases,
    pub architectures: Vec<Architecture>,
    pub current_track: String,
    pub options: Options,
    /// Branch keys whose disclosure is open.
    pub branches: Vec<String>,
    pub history: HistoryState,
    pub notification: NotificationState,
    pub modal: ModalState,
    pub available_revisions_select: AvailableRevisionsSelect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub tracks: Vec<String>,
    pub flags: Flags,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tracks: vec![crate::channel::DEFAULT_TRACK.to_string()],
            flags: Flags::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Flags {
    pub is_progressive_releases_enabled: bool,
}

// ── History panel ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryState {
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<HistoryFilters>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

// ── Notification & modal ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationState {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub can_dismiss: bool,
}

/// Fields carried by a show-notification action; present fields overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_dismiss: Option<bool>,
}

impl NotificationPayload {
    pub fn apply(self, state: &mut NotificationState) {
        if let Some(v) = self.status {
            state.status = Some(v);
        }
        if let Some(v) = self.appearance {
            state.appearance = Some(v);
        }
        if let Some(v) = self.content {
            state.content = Some(v);
        }
        if let Some(v) = self.can_dismiss {
            state.can_dismiss = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalState {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ModalAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalAction {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    /// Action dispatched when the button is pressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ModalAction>>,
}

impl ModalPayload {
    pub fn apply(self, state: &mut ModalState) {
        if let Some(v) = self.title {
            state.title = Some(v);
        }
        if let Some(v) = self.content {
            state.content = Some(v);
        }
        if let Some(v) = self.actions {
            state.actions = v;
        }
    }
}

// ── Available revisions filter ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailableRevisionsSelect {
    /// Unreleased and uploaded within the last week.
    Recent,
    /// Never released to any channel.
    Unreleased,
    /// Built by the hosted CI builder.
    Launchpad,
    #[default]
    All,
}

impl fmt::Display for AvailableRevisionsSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Recent => "recent",
            Self::Unreleased => "unreleased",
            Self::Launchpad => "launchpad",
            Self::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for AvailableRevisionsSelect {
    type Err = std::convert::Infallible;

    /// Unrecognized values select everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "recent" => Self::Recent,
            "unreleased" => Self::Unreleased,
            "launchpad" => Self::Launchpad,
            _ => Self::All,
        })
    }
}
