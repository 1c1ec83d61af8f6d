use std::collections::BTreeMap;

use rollout_core::{ChannelName, Revision, RevisionId};

use crate::action::Action;

pub fn reduce(
    mut state: BTreeMap<RevisionId, Revision>,
    action: &Action,
) -> BTreeMap<RevisionId, Revision> {
    match action {
        // Shallow merge: ids missing from the payload are kept.
        Action::UpdateRevisions { revisions } => {
            for (id, revision) in revisions {
                state.insert(*id, revision.clone());
            }
            state
        }
        Action::ReleaseRevisionSuccess { revision, channel } => {
            let channel = ChannelName::normalize(channel);
            if let Some(r) = state.get_mut(&revision.revision) {
                if !r.channels.contains(&channel) {
                    r.channels.push(channel);
                }
            }
            state
        }
        _ => state,
    }
}
