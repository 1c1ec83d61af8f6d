use rollout_core::{Progressive, Revision, Store};

use crate::releases::cell_history;

pub fn is_progressive_release_enabled(state: &Store) -> bool {
    state.options.flags.is_progressive_releases_enabled
}

/// Progressive rollout state of one channel/architecture cell.
///
/// Returns `(previous_revision, pending_progressive_status)`:
///
/// - `previous_revision` is what the rollout moves away from. For a
///   committed progressive release it is the most recent earlier release of
///   a different revision; for a staged change (`is_pending`) it is the
///   revision currently committed to the cell.
/// - `pending_progressive_status` is a copy of the progressive parameters of
///   the change staged for this cell, if any.
///
/// Both are `None` while progressive releases are disabled.
pub fn get_progressive_state(
    state: &Store,
    channel: &str,
    arch: &str,
    is_pending: bool,
) -> (Option<Revision>, Option<Progressive>) {
    if !is_progressive_release_enabled(state) {
        return (None, None);
    }

    let history = cell_history(state, channel, arch);
    let release = history.first().copied();

    let previous_revision = if is_pending {
        state
            .channel_map
            .get(channel)
            .and_then(|row| row.get(arch))
            .or_else(|| {
                release
                    .and_then(|r| r.revision)
                    .and_then(|id| state.revisions.get(&id))
            })
            .cloned()
    } else {
        match release {
            Some(current) if current.is_progressive => history
                .iter()
                .skip(1)
                .filter_map(|r| r.revision)
                .find(|id| Some(*id) != current.revision)
                .and_then(|id| state.revisions.get(&id))
                .cloned(),
            _ => None,
        }
    };

    let pending_progressive_status = state
        .pending_releases
        .values()
        .filter_map(|row| row.get(channel))
        .find(|p| p.revision.supports(arch))
        .and_then(|p| p.progressive.clone());

    (previous_revision, pending_progressive_status)
}
