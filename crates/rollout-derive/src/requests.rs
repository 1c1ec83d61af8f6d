use rollout_core::{ChannelKey, PendingRelease, Progressive, RevisionId};
use serde::Serialize;

use crate::classify::SeparatePendingReleases;

/// Progressive block of a release request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressiveRequest {
    pub percentage: f64,
    pub paused: bool,
    pub key: String,
}

impl From<&Progressive> for ProgressiveRequest {
    fn from(p: &Progressive) -> Self {
        Self {
            percentage: p.percentage,
            paused: p.paused,
            key: p.key.clone(),
        }
    }
}

/// One release call for the save endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseRequest {
    pub revision: RevisionId,
    pub channels: Vec<ChannelKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progressive: Option<ProgressiveRequest>,
}

/// Build the save payload from classified staged changes.
///
/// Plain new releases of the same revision share one request. Progressive
/// items each get their own request carrying their rollout parameters.
/// Cancellations release the replacement revision with no progressive block.
/// Order: plain releases, new rollouts, rollout updates, cancellations.
pub fn build_release_requests(separated: &SeparatePendingReleases) -> Vec<ReleaseRequest> {
    let mut requests: Vec<ReleaseRequest> = Vec::new();

    for pending in separated.new_releases.values() {
        match &pending.progressive {
            None => push_merged(&mut requests, pending),
            Some(p) => requests.push(single(pending, Some(p.into()))),
        }
    }
    for pending in separated.new_releases_to_progress.values() {
        requests.push(single(pending, pending.progressive.as_ref().map(Into::into)));
    }
    for pending in separated.progressive_updates.values() {
        requests.push(single(pending, pending.progressive.as_ref().map(Into::into)));
    }
    for pending in separated.cancel_progressive.values() {
        requests.push(single(pending, None));
    }

    requests
}

fn single(pending: &PendingRelease, progressive: Option<ProgressiveRequest>) -> ReleaseRequest {
    ReleaseRequest {
        revision: pending.revision_id(),
        channels: vec![pending.channel.clone()],
        progressive,
    }
}

fn push_merged(requests: &mut Vec<ReleaseRequest>, pending: &PendingRelease) {
    let existing = requests
        .iter_mut()
        .find(|r| r.revision == pending.revision_id() && r.progressive.is_none());
    match existing {
        Some(request) => {
            if !request.channels.contains(&pending.channel) {
                request.channels.push(pending.channel.clone());
            }
        }
        None => requests.push(single(pending, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rev;

    fn item(id: u64, channel: &str, progressive: Option<Progressive>) -> PendingRelease {
        PendingRelease {
            progressive,
            ..PendingRelease::new(rev(id, &["amd64"]), channel)
        }
    }

    #[test]
    fn empty_buckets_build_nothing() {
        assert!(build_release_requests(&SeparatePendingReleases::default()).is_empty());
    }

    #[test]
    fn plain_releases_of_one_revision_merge() {
        let mut sep = SeparatePendingReleases::default();
        sep.new_releases.insert("5-latest/beta".into(), item(5, "latest/beta", None));
        sep.new_releases.insert("5-latest/edge".into(), item(5, "latest/edge", None));
        sep.new_releases.insert("6-latest/edge".into(), item(6, "latest/candidate", None));

        let requests = build_release_requests(&sep);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].revision, 5);
        assert_eq!(requests[0].channels, vec!["latest/beta", "latest/edge"]);
        assert_eq!(requests[1].channels, vec!["latest/candidate"]);
    }

    #[test]
    fn progressive_items_carry_parameters() {
        let mut sep = SeparatePendingReleases::default();
        sep.new_releases_to_progress.insert(
            "5-latest/edge".into(),
            item(5, "latest/edge", Some(Progressive::new(20.0, false, "k1"))),
        );
        sep.progressive_updates.insert(
            "6-latest/beta".into(),
            item(6, "latest/beta", Some(Progressive::new(50.0, true, "k2"))),
        );

        let requests = build_release_requests(&sep);
        assert_eq!(
            requests[0].progressive,
            Some(ProgressiveRequest {
                percentage: 20.0,
                paused: false,
                key: "k1".into()
            })
        );
        assert_eq!(requests[1].revision, 6);
        assert!(requests[1].progressive.as_ref().unwrap().paused);
    }

    #[test]
    fn cancellation_releases_replacement_without_progressive() {
        let mut cancel = item(8, "latest/beta", None);
        cancel.replaces = Some(Box::new(item(
            9,
            "latest/beta",
            Some(Progressive::new(20.0, false, "k")),
        )));
        let mut sep = SeparatePendingReleases::default();
        sep.cancel_progressive.insert("9-latest/beta".into(), cancel);

        let requests = build_release_requests(&sep);
        assert_eq!(
            requests,
            vec![ReleaseRequest {
                revision: 8,
                channels: vec!["latest/beta".into()],
                progressive: None,
            }]
        );
        let json = serde_json::to_value(&requests[0]).unwrap();
        assert!(json.get("progressive").is_none());
    }
}
