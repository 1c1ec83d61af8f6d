use rollout_core::{ChannelMap, PendingRelease, Store};

/// Committed channel map with every staged release layered on top.
///
/// Each staged item fills the cells of its channel for every architecture
/// its revision supports. The committed map is left untouched.
pub fn get_pending_channel_map(state: &Store) -> ChannelMap {
    let mut map = state.channel_map.clone();
    for row in state.pending_releases.values() {
        for (channel, pending) in row {
            let cells = map.entry(channel.clone()).or_default();
            for arch in &pending.revision.architectures {
                cells.insert(arch.clone(), pending.revision.clone());
            }
        }
    }
    map
}

/// True if the optimistic revision for this cell differs from the committed one.
pub fn has_pending_release(state: &Store, channel: &str, arch: &str) -> bool {
    let pending_map = get_pending_channel_map(state);
    let Some(pending) = pending_map.get(channel).and_then(|row| row.get(arch)) else {
        return false;
    };
    match state.channel_map.get(channel).and_then(|row| row.get(arch)) {
        Some(committed) => committed.revision != pending.revision,
        None => true,
    }
}

/// Staged item covering this channel/architecture cell, if any.
pub fn get_pending_release<'a>(
    state: &'a Store,
    channel: &str,
    arch: &str,
) -> Option<&'a PendingRelease> {
    state
        .pending_releases
        .values()
        .filter_map(|row| row.get(channel))
        .find(|p| p.revision.supports(arch))
}
