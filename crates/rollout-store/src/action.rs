use std::collections::BTreeMap;

use rollout_core::{
    AvailableRevisionsSelect, ChannelMap, HistoryFilters, ModalPayload, NotificationPayload,
    PendingRelease, Progressive, Release, Revision, RevisionId,
};
use serde::{Deserialize, Serialize};

/// Every state transition the console understands.
///
/// Serialized as `{"type": "UPDATE_RELEASES", ...fields}`. Any other `type`
/// deserializes to [`Action::Unknown`], which every reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // ── Server data ──
    UpdateRevisions {
        #[serde(with = "revision_map")]
        revisions: BTreeMap<RevisionId, Revision>,
    },
    UpdateReleases {
        releases: Vec<Release>,
    },
    UpdateArchitectures {
        architectures: Vec<String>,
    },
    InitChannelMap {
        #[serde(rename = "channelMap")]
        channel_map: ChannelMap,
    },

    // ── Navigation ──
    SetCurrentTrack {
        track: String,
    },
    OpenBranches {
        branch: String,
    },
    CloseBranches {
        branch: String,
    },
    OpenHistory {
        #[serde(default)]
        filters: Option<HistoryFilters>,
    },
    CloseHistory,
    SetAvailableRevisionsSelect {
        value: AvailableRevisionsSelect,
    },

    // ── Selection ──
    SelectRevision {
        revision: Revision,
        #[serde(default)]
        toggle: bool,
    },
    ClearSelectedRevisions,

    // ── Staging ──
    ReleaseRevision {
        revision: Revision,
        channel: String,
        #[serde(default)]
        progressive: Option<Progressive>,
        #[serde(rename = "previousReleases", default)]
        previous_releases: Vec<Release>,
    },
    UndoRelease {
        revision: Revision,
        channel: String,
    },
    CancelPendingReleases,
    SetProgressiveReleasePercentage {
        percentage: f64,
    },
    UpdateProgressiveRelease {
        progressive: Progressive,
    },
    PauseProgressiveRelease {
        key: String,
    },
    ResumeProgressiveRelease {
        key: String,
    },
    CancelProgressiveRelease {
        channel: String,
        #[serde(rename = "previousRevision")]
        previous_revision: Revision,
        replaces: PendingRelease,
    },
    CloseChannel {
        channel: String,
    },

    // ── Commit results ──
    ReleaseRevisionSuccess {
        revision: Revision,
        channel: String,
    },
    CloseChannelSuccess {
        channel: String,
    },

    // ── Feedback ──
    ShowNotification(NotificationPayload),
    HideNotification,
    OpenModal(ModalPayload),
    CloseModal,

    #[serde(other)]
    Unknown,
}

impl Action {
    /// Wire name of the action, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::UpdateRevisions { .. } => "UPDATE_REVISIONS",
            Action::UpdateReleases { .. } => "UPDATE_RELEASES",
            Action::UpdateArchitectures { .. } => "UPDATE_ARCHITECTURES",
            Action::InitChannelMap { .. } => "INIT_CHANNEL_MAP",
            Action::SetCurrentTrack { .. } => "SET_CURRENT_TRACK",
            Action::OpenBranches { .. } => "OPEN_BRANCHES",
            Action::CloseBranches { .. } => "CLOSE_BRANCHES",
            Action::OpenHistory { .. } => "OPEN_HISTORY",
            Action::CloseHistory => "CLOSE_HISTORY",
            Action::SetAvailableRevisionsSelect { .. } => "SET_AVAILABLE_REVISIONS_SELECT",
            Action::SelectRevision { .. } => "SELECT_REVISION",
            Action::ClearSelectedRevisions => "CLEAR_SELECTED_REVISIONS",
            Action::ReleaseRevision { .. } => "RELEASE_REVISION",
            Action::UndoRelease { .. } => "UNDO_RELEASE",
            Action::CancelPendingReleases => "CANCEL_PENDING_RELEASES",
            Action::SetProgressiveReleasePercentage { .. } => "SET_PROGRESSIVE_RELEASE_PERCENTAGE",
            Action::UpdateProgressiveRelease { .. } => "UPDATE_PROGRESSIVE_RELEASE",
            Action::PauseProgressiveRelease { .. } => "PAUSE_PROGRESSIVE_RELEASE",
            Action::ResumeProgressiveRelease { .. } => "RESUME_PROGRESSIVE_RELEASE",
            Action::CancelProgressiveRelease { .. } => "CANCEL_PROGRESSIVE_RELEASE",
            Action::CloseChannel { .. } => "CLOSE_CHANNEL",
            Action::ReleaseRevisionSuccess { .. } => "RELEASE_REVISION_SUCCESS",
            Action::CloseChannelSuccess { .. } => "CLOSE_CHANNEL_SUCCESS",
            Action::ShowNotification(_) => "SHOW_NOTIFICATION",
            Action::HideNotification => "HIDE_NOTIFICATION",
            Action::OpenModal(_) => "OPEN_MODAL",
            Action::CloseModal => "CLOSE_MODAL",
            Action::Unknown => "UNKNOWN",
        }
    }
}

/// `{id: Revision}` payloads, re-keyed by each revision's own id.
///
/// Integer map keys do not survive the buffering serde does for tagged
/// enums, so keys are read as strings and ignored.
mod revision_map {
    use std::collections::BTreeMap;

    use rollout_core::{Revision, RevisionId};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<RevisionId, Revision>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let keyed: BTreeMap<String, &Revision> =
            map.iter().map(|(id, r)| (id.to_string(), r)).collect();
        keyed.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<RevisionId, Revision>, D::Error> {
        let keyed = BTreeMap::<String, Revision>::deserialize(deserializer)?;
        Ok(keyed
            .into_values()
            .map(|r| (r.revision, r))
            .collect())
    }
}

/// Parse one action object or an array of them.
pub fn parse_actions(json: &str) -> serde_json::Result<Vec<Action>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}
