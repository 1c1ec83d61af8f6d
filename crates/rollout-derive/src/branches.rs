use std::collections::BTreeSet;

use rollout_core::{Branch, Store, DEFAULT_TRACK};
use time::OffsetDateTime;

use crate::releases::latest_first;

/// Live branches of the current track, most recently released first.
///
/// Each `(track, risk, branch)` is represented by its most recent release;
/// a closure shows up with `revision: None`. Branches with no expiration, or
/// whose expiration is not after `now`, are left out. With no current track
/// set, branches of every track are listed.
pub fn get_branches(state: &Store, now: OffsetDateTime) -> Vec<Branch> {
    let track = state.current_track.as_str();
    let mut seen = BTreeSet::new();
    let mut branches = Vec::new();

    for release in latest_first(&state.releases) {
        let Some(branch) = release.branch.as_deref() else {
            continue;
        };
        if !track.is_empty() && release.track != track {
            continue;
        }
        if !seen.insert((release.track.as_str(), release.risk.as_str(), branch)) {
            continue;
        }
        let Some(expiration) = release.expiration_date else {
            continue;
        };
        if expiration <= now {
            continue;
        }
        branches.push(Branch {
            track: release.track.clone(),
            risk: release.risk.clone(),
            branch: branch.to_string(),
            when: release.when,
            revision: release.revision,
            expiration,
        });
    }

    branches
}

/// Tracks to offer: configured tracks, then tracks seen in the release log,
/// with the default track first.
pub fn get_tracks(state: &Store) -> Vec<String> {
    let mut tracks: Vec<String> = Vec::new();
    let seen = state
        .options
        .tracks
        .iter()
        .chain(state.releases.iter().map(|r| &r.track));
    for track in seen {
        if !tracks.contains(track) {
            tracks.push(track.clone());
        }
    }
    if let Some(pos) = tracks.iter().position(|t| t == DEFAULT_TRACK) {
        let default = tracks.remove(pos);
        tracks.insert(0, default);
    }
    tracks
}
