use rollout_core::{Release, Store};

/// Release log ordered most recent first. Ties keep log order.
pub(crate) fn latest_first(releases: &[Release]) -> Vec<&Release> {
    let mut sorted: Vec<&Release> = releases.iter().collect();
    sorted.sort_by(|a, b| b.when.cmp(&a.when));
    sorted
}

/// Every committed release of one channel/architecture cell, most recent first.
pub(crate) fn cell_history<'a>(state: &'a Store, channel: &str, arch: &str) -> Vec<&'a Release> {
    latest_first(&state.releases)
        .into_iter()
        .filter(|r| r.matches(channel, arch))
        .collect()
}
