use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::channel::channel_key;

/// Revision number assigned by the store server.
pub type RevisionId = u64;

/// Architecture tag (e.g. "amd64", "arm64").
pub type Architecture = String;

/// Rendered channel key (e.g. "latest/stable").
pub type ChannelKey = String;

/// Build attribute set on revisions built by the hosted CI builder.
pub const BUILD_REQUEST_ID: &str = "build-request-id";

/// Window in which an unreleased revision counts as "recent".
pub const RECENT_REVISION_DAYS: i64 = 7;

// ── Revisions ──

/// An uploaded build artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub revision: RevisionId,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub architectures: BTreeSet<Architecture>,
    /// Channels this revision is currently released to.
    #[serde(default)]
    pub channels: Vec<ChannelKey>,
    #[serde(default)]
    pub confinement: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}

impl Revision {
    pub fn supports(&self, arch: &str) -> bool {
        self.architectures.contains(arch)
    }

    pub fn is_released(&self) -> bool {
        !self.channels.is_empty()
    }

    /// CI build request this revision came from, if any.
    pub fn build_request_id(&self) -> Option<&str> {
        self.attributes.get(BUILD_REQUEST_ID).and_then(|v| v.as_str())
    }

    pub fn is_devmode(&self) -> bool {
        self.confinement == "devmode" || self.grade == "devel"
    }

    /// True if both revisions list at least one common architecture.
    pub fn shares_architecture(&self, other: &Revision) -> bool {
        self.architectures
            .iter()
            .any(|arch| other.architectures.contains(arch))
    }
}

// ── Release log ──

/// One entry of the committed release log.
///
/// A `None` revision records that the channel was closed. The current state
/// of a channel/architecture is the most recent entry matching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub revision: Option<RevisionId>,
    pub architecture: Architecture,
    pub track: String,
    pub risk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub when: OffsetDateTime,
    #[serde(
        rename = "expiration-date",
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<OffsetDateTime>,
    #[serde(rename = "isProgressive", default)]
    pub is_progressive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progressive: Option<Progressive>,
}

impl Release {
    pub fn channel(&self) -> ChannelKey {
        channel_key(&self.track, &self.risk, self.branch.as_deref())
    }

    pub fn matches(&self, channel: &str, arch: &str) -> bool {
        self.architecture == arch && self.channel() == channel
    }

    pub fn is_closed(&self) -> bool {
        self.revision.is_none()
    }
}

// ── Progressive rollouts ──

/// Percentage rollout parameters. `key` identifies one rollout across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progressive {
    pub percentage: f64,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub key: String,
    /// Fields that differ from the in-flight rollout, filled in by
    /// classification. `Some(vec![])` is a no-op edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<ProgressiveChange>>,
}

impl Progressive {
    pub fn new(percentage: f64, paused: bool, key: &str) -> Self {
        Self {
            percentage,
            paused,
            key: key.to_string(),
            changes: None,
        }
    }
}

/// One changed rollout field, serialized as `{"key": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "lowercase")]
pub enum ProgressiveChange {
    Percentage(f64),
    Paused(bool),
}

// ── Staged changes ──

/// A staged, uncommitted release of `revision` to `channel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRelease {
    pub channel: ChannelKey,
    pub revision: Revision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progressive: Option<Progressive>,
    /// Committed releases of this channel, most recent first, captured when
    /// the change was staged.
    #[serde(
        rename = "previousReleases",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub previous_releases: Vec<Release>,
    /// Older staged item this one supersedes (cancelled rollout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<Box<PendingRelease>>,
}

impl PendingRelease {
    pub fn new(revision: Revision, channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            revision,
            progressive: None,
            previous_releases: Vec::new(),
            replaces: None,
        }
    }

    pub fn revision_id(&self) -> RevisionId {
        self.revision.revision
    }
}

/// `channel → architecture → revision`; one revision per cell.
pub type ChannelMap = BTreeMap<ChannelKey, BTreeMap<Architecture, Revision>>;

/// `revision id → channel → staged item`.
pub type PendingReleases = BTreeMap<RevisionId, BTreeMap<ChannelKey, PendingRelease>>;

// ── Derived views ──

/// A live branch derived from the release log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub track: String,
    pub risk: String,
    pub branch: String,
    #[serde(with = "time::serde::rfc3339")]
    pub when: OffsetDateTime,
    pub revision: Option<RevisionId>,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration: OffsetDateTime,
}

impl Branch {
    pub fn channel(&self) -> ChannelKey {
        channel_key(&self.track, &self.risk, Some(&self.branch))
    }
}
