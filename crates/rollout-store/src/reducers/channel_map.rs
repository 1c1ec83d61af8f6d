use rollout_core::{ChannelMap, ChannelName, Revision, AVAILABLE};

use crate::action::Action;

pub fn reduce(mut state: ChannelMap, action: &Action) -> ChannelMap {
    match action {
        Action::InitChannelMap { channel_map } => channel_map.clone(),
        Action::SelectRevision { revision, toggle } => {
            select_revision(&mut state, revision, *toggle);
            state
        }
        Action::ClearSelectedRevisions => {
            state.remove(AVAILABLE);
            state
        }
        Action::ReleaseRevisionSuccess { revision, channel } => {
            let row = state.entry(ChannelName::normalize(channel)).or_default();
            for arch in &revision.architectures {
                row.insert(arch.clone(), revision.clone());
            }
            state
        }
        Action::CloseChannelSuccess { channel } => {
            state.remove(&ChannelName::normalize(channel));
            state
        }
        _ => state,
    }
}

/// Put `revision` into the selection row for each of its architectures.
/// With `toggle`, an architecture already holding this revision is cleared.
fn select_revision(state: &mut ChannelMap, revision: &Revision, toggle: bool) {
    let row = state.entry(AVAILABLE.to_string()).or_default();
    for arch in &revision.architectures {
        let already = row
            .get(arch)
            .map(|r| r.revision == revision.revision)
            .unwrap_or(false);
        if toggle && already {
            row.remove(arch);
        } else {
            row.insert(arch.clone(), revision.clone());
        }
    }
    if row.is_empty() {
        state.remove(AVAILABLE);
    }
}
