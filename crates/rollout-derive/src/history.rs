use std::collections::BTreeSet;

use rollout_core::{HistoryFilters, Release, Revision, Store};
use serde::Serialize;

use crate::releases::latest_first;

/// A revision joined with the release that put it in the history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub revision: Revision,
    pub release: Release,
}

/// Release history for the history panel.
///
/// Channel closures are dropped, the panel filters applied, and only the
/// most recent release of each revision kept. Releases of revisions missing
/// from `revisions` are skipped.
pub fn get_filtered_release_history(state: &Store) -> Vec<HistoryEntry> {
    let filters = state.history.filters.as_ref();
    let mut seen = BTreeSet::new();

    latest_first(&state.releases)
        .into_iter()
        .filter(|r| !r.is_closed())
        .filter(|r| filters.map_or(true, |f| passes(f, r)))
        .filter_map(|r| {
            let id = r.revision?;
            if !seen.insert(id) {
                return None;
            }
            let revision = state.revisions.get(&id)?;
            Some(HistoryEntry {
                revision: revision.clone(),
                release: r.clone(),
            })
        })
        .collect()
}

fn passes(filters: &HistoryFilters, release: &Release) -> bool {
    let arch_ok = filters
        .arch
        .as_ref()
        .map_or(true, |a| *a == release.architecture);
    let track_ok = filters.track.as_ref().map_or(true, |t| *t == release.track);
    let risk_ok = filters.risk.as_ref().map_or(true, |r| *r == release.risk);
    let branch_ok = filters
        .branch
        .as_ref()
        .map_or(true, |b| release.branch.as_ref() == Some(b));
    arch_ok && track_ok && risk_ok && branch_ok
}
