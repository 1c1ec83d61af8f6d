use rollout_core::{ChannelName, PendingRelease, PendingReleases, Progressive, Release, Revision};

use crate::action::Action;

pub fn reduce(mut state: PendingReleases, action: &Action) -> PendingReleases {
    match action {
        Action::ReleaseRevision {
            revision,
            channel,
            progressive,
            previous_releases,
        } => {
            stage(
                &mut state,
                revision,
                channel,
                progressive.clone(),
                previous_releases,
                None,
            );
            state
        }
        Action::UndoRelease { revision, channel } => {
            if let Some(row) = state.get_mut(&revision.revision) {
                row.remove(&ChannelName::normalize(channel));
            }
            prune(&mut state);
            state
        }
        Action::CancelPendingReleases => PendingReleases::new(),
        Action::SetProgressiveReleasePercentage { percentage } => {
            let percentage = percentage.clamp(0.0, 100.0);
            for_each_progressive(&mut state, |p| p.percentage = percentage);
            state
        }
        Action::UpdateProgressiveRelease { progressive } => {
            for_each_progressive(&mut state, |p| {
                if p.key == progressive.key {
                    p.percentage = progressive.percentage.clamp(0.0, 100.0);
                    p.paused = progressive.paused;
                }
            });
            state
        }
        Action::PauseProgressiveRelease { key } => {
            set_paused(&mut state, key, true);
            state
        }
        Action::ResumeProgressiveRelease { key } => {
            set_paused(&mut state, key, false);
            state
        }
        Action::CancelProgressiveRelease {
            channel,
            previous_revision,
            replaces,
        } => {
            stage(
                &mut state,
                previous_revision,
                channel,
                None,
                &[],
                Some(replaces.clone()),
            );
            state
        }
        Action::CloseChannel { channel } => {
            let channel = ChannelName::normalize(channel);
            for row in state.values_mut() {
                row.remove(&channel);
            }
            prune(&mut state);
            state
        }
        // Committed: the staged item for this cell is no longer pending.
        Action::ReleaseRevisionSuccess { revision, channel } => {
            if let Some(row) = state.get_mut(&revision.revision) {
                row.remove(&ChannelName::normalize(channel));
            }
            prune(&mut state);
            state
        }
        _ => state,
    }
}

/// Stage `revision` on `channel` (normalized to its full key), first
/// dropping any other staged item on the same channel that shares an
/// architecture with it.
fn stage(
    state: &mut PendingReleases,
    revision: &Revision,
    channel: &str,
    progressive: Option<Progressive>,
    previous_releases: &[Release],
    replaces: Option<PendingRelease>,
) {
    let channel = ChannelName::normalize(channel);
    for row in state.values_mut() {
        let overlaps = row
            .get(&channel)
            .map(|p| p.revision.shares_architecture(revision))
            .unwrap_or(false);
        if overlaps {
            row.remove(&channel);
        }
    }
    prune(state);

    let item = PendingRelease {
        channel: channel.clone(),
        revision: revision.clone(),
        progressive,
        previous_releases: previous_releases.to_vec(),
        replaces: replaces.map(Box::new),
    };
    state
        .entry(revision.revision)
        .or_default()
        .insert(channel, item);
}

fn for_each_progressive(state: &mut PendingReleases, mut f: impl FnMut(&mut Progressive)) {
    for item in state.values_mut().flat_map(|row| row.values_mut()) {
        if let Some(p) = item.progressive.as_mut() {
            f(p);
        }
    }
}

fn set_paused(state: &mut PendingReleases, key: &str, paused: bool) {
    for_each_progressive(state, |p| {
        if p.key == key {
            p.paused = paused;
        }
    });
}

/// Drop revision rows with no staged channels left.
fn prune(state: &mut PendingReleases) {
    state.retain(|_, row| !row.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{release, rev};

    fn release_action(id: u64, archs: &[&str], channel: &str, progressive: Option<Progressive>) -> Action {
        Action::ReleaseRevision {
            revision: rev(id, archs),
            channel: channel.into(),
            progressive,
            previous_releases: Vec::new(),
        }
    }

    #[test]
    fn stage_keys_by_revision_then_channel() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        let state = reduce(state, &release_action(5, &["amd64"], "latest/beta", None));
        assert_eq!(state.len(), 1);
        assert_eq!(state[&5].len(), 2);
        assert_eq!(state[&5]["latest/edge"].channel, "latest/edge");
    }

    #[test]
    fn short_channel_names_stage_under_full_key() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        let state = reduce(state, &release_action(6, &["amd64"], "edge", None));
        assert!(!state.contains_key(&5));
        assert_eq!(state[&6].keys().collect::<Vec<_>>(), vec!["latest/edge"]);
        assert_eq!(state[&6]["latest/edge"].channel, "latest/edge");

        let state = reduce(
            state,
            &Action::UndoRelease {
                revision: rev(6, &["amd64"]),
                channel: "edge".into(),
            },
        );
        assert!(state.is_empty());
    }

    #[test]
    fn stage_replaces_overlapping_item_on_same_channel() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64", "arm64"], "latest/edge", None),
        );
        let state = reduce(state, &release_action(6, &["arm64"], "latest/edge", None));
        assert!(!state.contains_key(&5));
        assert!(state[&6].contains_key("latest/edge"));
    }

    #[test]
    fn stage_keeps_disjoint_architectures() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        let state = reduce(state, &release_action(6, &["arm64"], "latest/edge", None));
        assert!(state.contains_key(&5));
        assert!(state.contains_key(&6));
    }

    #[test]
    fn stage_records_previous_releases() {
        let prev = release(Some(1), "latest", "edge", "amd64", 10);
        let state = reduce(
            PendingReleases::new(),
            &Action::ReleaseRevision {
                revision: rev(5, &["amd64"]),
                channel: "latest/edge".into(),
                progressive: None,
                previous_releases: vec![prev.clone()],
            },
        );
        assert_eq!(state[&5]["latest/edge"].previous_releases, vec![prev]);
    }

    #[test]
    fn undo_removes_item_and_empty_row() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        let state = reduce(
            state,
            &Action::UndoRelease {
                revision: rev(5, &["amd64"]),
                channel: "latest/edge".into(),
            },
        );
        assert!(state.is_empty());
    }

    #[test]
    fn cancel_pending_clears_everything() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        assert!(reduce(state, &Action::CancelPendingReleases).is_empty());
    }

    #[test]
    fn percentage_applies_to_progressive_items_only() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", Some(Progressive::new(10.0, false, "k"))),
        );
        let state = reduce(state, &release_action(6, &["amd64"], "latest/beta", None));
        let state = reduce(
            state,
            &Action::SetProgressiveReleasePercentage { percentage: 140.0 },
        );
        let p = state[&5]["latest/edge"].progressive.as_ref().unwrap();
        assert_eq!(p.percentage, 100.0);
        assert!(state[&6]["latest/beta"].progressive.is_none());
    }

    #[test]
    fn update_pause_resume_match_by_key() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", Some(Progressive::new(10.0, false, "a"))),
        );
        let state = reduce(
            state,
            &release_action(6, &["amd64"], "latest/beta", Some(Progressive::new(10.0, false, "b"))),
        );

        let state = reduce(
            state,
            &Action::UpdateProgressiveRelease {
                progressive: Progressive::new(30.0, false, "a"),
            },
        );
        assert_eq!(state[&5]["latest/edge"].progressive.as_ref().unwrap().percentage, 30.0);
        assert_eq!(state[&6]["latest/beta"].progressive.as_ref().unwrap().percentage, 10.0);

        let state = reduce(state, &Action::PauseProgressiveRelease { key: "b".into() });
        assert!(state[&6]["latest/beta"].progressive.as_ref().unwrap().paused);
        assert!(!state[&5]["latest/edge"].progressive.as_ref().unwrap().paused);

        let state = reduce(state, &Action::ResumeProgressiveRelease { key: "b".into() });
        assert!(!state[&6]["latest/beta"].progressive.as_ref().unwrap().paused);
    }

    #[test]
    fn cancel_progressive_stages_previous_with_replaces() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(9, &["amd64"], "latest/beta", Some(Progressive::new(20.0, false, "k"))),
        );
        let replaced = state[&9]["latest/beta"].clone();
        let state = reduce(
            state,
            &Action::CancelProgressiveRelease {
                channel: "latest/beta".into(),
                previous_revision: rev(8, &["amd64"]),
                replaces: replaced.clone(),
            },
        );
        assert!(!state.contains_key(&9));
        let item = &state[&8]["latest/beta"];
        assert!(item.progressive.is_none());
        assert_eq!(item.replaces.as_deref(), Some(&replaced));
    }

    #[test]
    fn close_channel_drops_staged_items_for_channel() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        let state = reduce(state, &release_action(5, &["amd64"], "latest/beta", None));
        let state = reduce(
            state,
            &Action::CloseChannel {
                channel: "latest/edge".into(),
            },
        );
        assert_eq!(state[&5].keys().collect::<Vec<_>>(), vec!["latest/beta"]);
    }

    #[test]
    fn release_success_clears_committed_item() {
        let state = reduce(
            PendingReleases::new(),
            &release_action(5, &["amd64"], "latest/edge", None),
        );
        let state = reduce(
            state,
            &Action::ReleaseRevisionSuccess {
                revision: rev(5, &["amd64"]),
                channel: "latest/edge".into(),
            },
        );
        assert!(state.is_empty());
    }
}
