use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pseudo-channel holding the user's architecture→revision selection
/// before any real channel is chosen.
pub const AVAILABLE: &str = "AVAILABLE";

/// Track used when a channel key names only a risk (e.g. `stable`).
pub const DEFAULT_TRACK: &str = "latest";

/// Risk levels, most stable first.
pub const RISKS: &[&str] = &["stable", "candidate", "beta", "edge"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("empty channel name")]
    Empty,

    #[error("empty segment in channel name '{0}'")]
    EmptySegment(String),

    #[error("unknown risk '{risk}' in channel name '{channel}'")]
    UnknownRisk { risk: String, channel: String },

    #[error("too many segments in channel name '{0}' (expected track/risk/branch)")]
    TooManySegments(String),
}

/// A `(track, risk, branch)` triple addressing one release slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelName {
    pub track: String,
    pub risk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl ChannelName {
    pub fn new(track: &str, risk: &str, branch: Option<&str>) -> Self {
        Self {
            track: track.to_string(),
            risk: risk.to_string(),
            branch: branch.map(|b| b.to_string()),
        }
    }

    /// Rendered key, e.g. `latest/edge/my-fix`.
    pub fn key(&self) -> String {
        channel_key(&self.track, &self.risk, self.branch.as_deref())
    }

    /// Canonical key for a user-supplied channel (`edge` → `latest/edge`).
    ///
    /// Strings that do not parse as a channel, such as [`AVAILABLE`], are
    /// returned unchanged.
    pub fn normalize(channel: &str) -> String {
        channel
            .parse::<ChannelName>()
            .map(|c| c.key())
            .unwrap_or_else(|_| channel.to_string())
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.track, self.risk)?;
        if let Some(branch) = &self.branch {
            write!(f, "/{branch}")?;
        }
        Ok(())
    }
}

impl FromStr for ChannelName {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ChannelError::Empty);
        }
        let parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ChannelError::EmptySegment(s.to_string()));
        }

        // A bare risk implies the default track; two segments may be either
        // track/risk or risk/branch depending on whether the first is a risk.
        let (track, risk, branch) = match parts.as_slice() {
            [risk] => (DEFAULT_TRACK, *risk, None),
            [first, second] if RISKS.contains(first) => (DEFAULT_TRACK, *first, Some(*second)),
            [track, risk] => (*track, *risk, None),
            [track, risk, branch] => (*track, *risk, Some(*branch)),
            _ => return Err(ChannelError::TooManySegments(s.to_string())),
        };

        if !RISKS.contains(&risk) {
            return Err(ChannelError::UnknownRisk {
                risk: risk.to_string(),
                channel: s.to_string(),
            });
        }

        Ok(ChannelName::new(track, risk, branch))
    }
}

/// Render a channel key from its parts.
pub fn channel_key(track: &str, risk: &str, branch: Option<&str>) -> String {
    match branch {
        Some(b) if !b.is_empty() => format!("{track}/{risk}/{b}"),
        _ => format!("{track}/{risk}"),
    }
}
