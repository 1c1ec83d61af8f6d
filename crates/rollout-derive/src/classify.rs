use std::collections::BTreeMap;

use rollout_core::{PendingRelease, Progressive, ProgressiveChange, Store};
use serde::Serialize;
use tracing::debug;

/// Which save request a staged change turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    /// Plain release, or a progressive release with no release history.
    NewRelease,
    /// Edit of an in-flight rollout with the same key.
    ProgressiveUpdate,
    /// New rollout replacing a previously released revision.
    NewReleaseToProgress,
    /// Staged to cancel the rollout it replaces.
    CancelProgressive,
}

/// Staged changes split by the request shape the save endpoint needs.
///
/// Keys are `"{revision}-{channel}"`. Cancellations are keyed by the
/// replaced item, not the replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatePendingReleases {
    pub new_releases: BTreeMap<String, PendingRelease>,
    pub progressive_updates: BTreeMap<String, PendingRelease>,
    pub new_releases_to_progress: BTreeMap<String, PendingRelease>,
    pub cancel_progressive: BTreeMap<String, PendingRelease>,
}

impl SeparatePendingReleases {
    pub fn len(&self) -> usize {
        self.new_releases.len()
            + self.progressive_updates.len()
            + self.new_releases_to_progress.len()
            + self.cancel_progressive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decide which bucket one staged change belongs to.
///
/// Only the first entry of `previous_releases` (the most recent) is
/// consulted. A progressive change with no history at all is a plain new
/// release.
pub fn classify_pending_release(pending: &PendingRelease) -> PendingKind {
    if pending.replaces.is_some() {
        return PendingKind::CancelProgressive;
    }
    let Some(progressive) = &pending.progressive else {
        return PendingKind::NewRelease;
    };
    let Some(previous) = pending.previous_releases.first() else {
        return PendingKind::NewRelease;
    };
    let same_rollout = previous.is_progressive
        && previous
            .progressive
            .as_ref()
            .map_or(false, |p| p.key == progressive.key);
    if same_rollout {
        PendingKind::ProgressiveUpdate
    } else {
        PendingKind::NewReleaseToProgress
    }
}

/// Fields of `next` that differ from `previous`, in `percentage`, `paused` order.
pub fn progressive_changes(previous: &Progressive, next: &Progressive) -> Vec<ProgressiveChange> {
    let mut changes = Vec::new();
    if previous.percentage != next.percentage {
        changes.push(ProgressiveChange::Percentage(next.percentage));
    }
    if previous.paused != next.paused {
        changes.push(ProgressiveChange::Paused(next.paused));
    }
    changes
}

/// Partition every staged change into exactly one bucket.
pub fn get_separate_pending_releases(state: &Store) -> SeparatePendingReleases {
    let mut out = SeparatePendingReleases::default();

    for (revision_id, row) in &state.pending_releases {
        for (channel, pending) in row {
            let key = format!("{revision_id}-{channel}");
            match classify_pending_release(pending) {
                PendingKind::CancelProgressive => {
                    let key = pending
                        .replaces
                        .as_ref()
                        .map(|r| format!("{}-{}", r.revision_id(), r.channel))
                        .unwrap_or(key);
                    out.cancel_progressive.insert(key, pending.clone());
                }
                PendingKind::ProgressiveUpdate => {
                    let mut item = pending.clone();
                    let previous = pending
                        .previous_releases
                        .first()
                        .and_then(|r| r.progressive.as_ref());
                    if let (Some(previous), Some(next)) = (previous, item.progressive.as_mut()) {
                        next.changes = Some(progressive_changes(previous, next));
                    }
                    out.progressive_updates.insert(key, item);
                }
                PendingKind::NewReleaseToProgress => {
                    out.new_releases_to_progress.insert(key, pending.clone());
                }
                PendingKind::NewRelease => {
                    out.new_releases.insert(key, pending.clone());
                }
            }
        }
    }

    debug!(
        new = out.new_releases.len(),
        updates = out.progressive_updates.len(),
        to_progress = out.new_releases_to_progress.len(),
        cancels = out.cancel_progressive.len(),
        "classified pending releases"
    );
    out
}
