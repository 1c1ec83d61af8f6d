use rollout_core::{AvailableRevisionsSelect, Revision, Store, RECENT_REVISION_DAYS};
use time::{Duration, OffsetDateTime};

/// All known revisions, newest (highest id) first.
pub fn get_all_revisions(state: &Store) -> Vec<&Revision> {
    state.revisions.values().rev().collect()
}

/// Revisions never released to any channel.
pub fn get_unreleased_revisions(state: &Store) -> Vec<&Revision> {
    get_all_revisions(state)
        .into_iter()
        .filter(|r| !r.is_released())
        .collect()
}

/// Unreleased revisions uploaded less than a week before `now`.
/// Revisions without an upload time are not recent.
pub fn get_recent_revisions(state: &Store, now: OffsetDateTime) -> Vec<&Revision> {
    let window = Duration::days(RECENT_REVISION_DAYS);
    get_unreleased_revisions(state)
        .into_iter()
        .filter(|r| r.created_at.map_or(false, |created| now - created < window))
        .collect()
}

/// Revisions built by the hosted CI builder.
pub fn get_launchpad_revisions(state: &Store) -> Vec<&Revision> {
    get_all_revisions(state)
        .into_iter()
        .filter(|r| r.build_request_id().is_some())
        .collect()
}

pub fn has_build_request_id(state: &Store) -> bool {
    state
        .revisions
        .values()
        .any(|r| r.build_request_id().is_some())
}

/// Revisions produced by one CI build request.
pub fn get_revisions_from_build<'a>(state: &'a Store, build_id: &str) -> Vec<&'a Revision> {
    get_all_revisions(state)
        .into_iter()
        .filter(|r| r.build_request_id() == Some(build_id))
        .collect()
}

pub fn get_available_revisions_by_selection(
    state: &Store,
    value: AvailableRevisionsSelect,
    now: OffsetDateTime,
) -> Vec<&Revision> {
    match value {
        AvailableRevisionsSelect::Recent => get_recent_revisions(state, now),
        AvailableRevisionsSelect::Unreleased => get_unreleased_revisions(state),
        AvailableRevisionsSelect::Launchpad => get_launchpad_revisions(state),
        AvailableRevisionsSelect::All => get_all_revisions(state),
    }
}

/// Available revisions using the store's current filter.
pub fn get_filtered_available_revisions(state: &Store, now: OffsetDateTime) -> Vec<&Revision> {
    get_available_revisions_by_selection(state, state.available_revisions_select, now)
}

pub fn get_filtered_available_revisions_for_arch<'a>(
    state: &'a Store,
    arch: &str,
    now: OffsetDateTime,
) -> Vec<&'a Revision> {
    get_filtered_available_revisions(state, now)
        .into_iter()
        .filter(|r| r.supports(arch))
        .collect()
}
