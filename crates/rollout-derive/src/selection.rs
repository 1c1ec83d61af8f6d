use std::collections::BTreeSet;

use rollout_core::{Revision, RevisionId, Store, AVAILABLE};

/// Revision selected for `arch` in the available-revisions row.
pub fn get_selected_revision<'a>(state: &'a Store, arch: &str) -> Option<&'a Revision> {
    state.channel_map.get(AVAILABLE)?.get(arch)
}

/// Distinct selected revision ids, ascending.
pub fn get_selected_revisions(state: &Store) -> Vec<RevisionId> {
    let Some(row) = state.channel_map.get(AVAILABLE) else {
        return Vec::new();
    };
    row.values()
        .map(|r| r.revision)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn get_selected_architectures(state: &Store) -> Vec<&str> {
    state
        .channel_map
        .get(AVAILABLE)
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// True if any selected revision is devmode or devel grade.
pub fn has_devmode_revisions(state: &Store) -> bool {
    state
        .channel_map
        .get(AVAILABLE)
        .map_or(false, |row| row.values().any(Revision::is_devmode))
}
