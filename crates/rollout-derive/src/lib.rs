//! Read-only projections over the console [`Store`](rollout_core::Store).
//!
//! Every function takes the store explicitly and never mutates it. Missing
//! or inconsistent data yields `None` or an empty result; callers treat that
//! as "not loaded yet".

mod available;
mod branches;
mod channel_map;
mod classify;
mod history;
mod progressive;
mod releases;
mod requests;
mod selection;

pub use available::{
    get_all_revisions, get_available_revisions_by_selection, get_filtered_available_revisions,
    get_filtered_available_revisions_for_arch, get_launchpad_revisions, get_recent_revisions,
    get_revisions_from_build, get_unreleased_revisions, has_build_request_id,
};
pub use branches::{get_branches, get_tracks};
pub use channel_map::{get_pending_channel_map, get_pending_release, has_pending_release};
pub use classify::{
    classify_pending_release, get_separate_pending_releases, progressive_changes, PendingKind,
    SeparatePendingReleases,
};
pub use history::{get_filtered_release_history, HistoryEntry};
pub use progressive::{get_progressive_state, is_progressive_release_enabled};
pub use requests::{build_release_requests, ProgressiveRequest, ReleaseRequest};
pub use selection::{
    get_selected_architectures, get_selected_revision, get_selected_revisions,
    has_devmode_revisions,
};

#[cfg(test)]
pub(crate) mod test_support {
    use rollout_core::{Progressive, Release, Revision};
    use time::{Duration, OffsetDateTime};

    pub fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(secs)
    }

    pub fn rev(id: u64, archs: &[&str]) -> Revision {
        Revision {
            revision: id,
            version: format!("1.{id}"),
            architectures: archs.iter().map(|a| a.to_string()).collect(),
            channels: Vec::new(),
            confinement: "strict".into(),
            grade: "stable".into(),
            attributes: Default::default(),
            created_at: None,
        }
    }

    pub fn release(revision: Option<u64>, channel: &str, arch: &str, secs: i64) -> Release {
        let parsed: rollout_core::ChannelName = channel.parse().unwrap();
        Release {
            revision,
            architecture: arch.into(),
            track: parsed.track,
            risk: parsed.risk,
            branch: parsed.branch,
            when: at(secs),
            expiration_date: None,
            is_progressive: false,
            progressive: None,
        }
    }

    pub fn progressive_release(
        revision: u64,
        channel: &str,
        arch: &str,
        secs: i64,
        progressive: Progressive,
    ) -> Release {
        Release {
            is_progressive: true,
            progressive: Some(progressive),
            ..release(Some(revision), channel, arch, secs)
        }
    }
}
