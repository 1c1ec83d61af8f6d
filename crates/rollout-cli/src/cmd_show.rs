use std::path::Path;

use rollout_core::{AvailableRevisionsSelect, Revision, Store};
use rollout_derive::{
    build_release_requests, get_branches, get_filtered_available_revisions,
    get_filtered_available_revisions_for_arch, get_filtered_release_history,
    get_pending_channel_map, get_separate_pending_releases, has_pending_release,
};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::open_store;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt_time(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_default()
}

fn fmt_revision(rev: Option<u64>) -> String {
    rev.map_or_else(|| "closed".to_string(), |r| r.to_string())
}

// ── History ──

/// `rollout history`
pub fn history(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    let entries = get_filtered_release_history(&store);
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("(no releases)");
    }
    for e in &entries {
        println!(
            "{}  r{} {}  {} {}",
            fmt_time(e.release.when),
            e.revision.revision,
            e.revision.version,
            e.release.channel(),
            e.release.architecture
        );
    }
    Ok(())
}

// ── Channel map ──

/// `rollout channels`
pub fn channels(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    if json {
        return print_json(&get_pending_channel_map(&store));
    }
    print!("{}", render_channels(&store));
    Ok(())
}

/// One line per cell; staged cells are marked with `*`.
fn render_channels(store: &Store) -> String {
    let map = get_pending_channel_map(store);
    if map.is_empty() {
        return "(no channels)\n".to_string();
    }
    let mut out = String::new();
    for (channel, row) in &map {
        out.push_str(channel);
        out.push('\n');
        for (arch, rev) in row {
            let mark = if has_pending_release(store, channel, arch) {
                "*"
            } else {
                " "
            };
            out.push_str(&format!("  {mark} {arch}: r{} {}\n", rev.revision, rev.version));
        }
    }
    out
}

// ── Branches ──

/// `rollout branches`
pub fn branches(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    let branches = get_branches(&store, OffsetDateTime::now_utc());
    if json {
        return print_json(&branches);
    }
    if branches.is_empty() {
        println!("(no live branches)");
    }
    for b in &branches {
        println!(
            "{}  {}  expires {}",
            b.channel(),
            fmt_revision(b.revision),
            fmt_time(b.expiration)
        );
    }
    Ok(())
}

// ── Available revisions ──

/// `rollout available`
pub fn available(
    root: &Path,
    select: Option<AvailableRevisionsSelect>,
    arch: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(root)?;
    if let Some(select) = select {
        store.available_revisions_select = select;
    }
    let now = OffsetDateTime::now_utc();
    let revisions: Vec<&Revision> = match arch {
        Some(arch) => get_filtered_available_revisions_for_arch(&store, arch, now),
        None => get_filtered_available_revisions(&store, now),
    };
    if json {
        return print_json(&revisions);
    }
    println!("Showing: {}", store.available_revisions_select);
    if revisions.is_empty() {
        println!("(no revisions)");
    }
    for rev in revisions {
        let archs: Vec<&str> = rev.architectures.iter().map(String::as_str).collect();
        println!(
            "r{}  {}  [{}]  {}",
            rev.revision,
            rev.version,
            archs.join(", "),
            if rev.channels.is_empty() {
                "-".to_string()
            } else {
                rev.channels.join(", ")
            }
        );
    }
    Ok(())
}

// ── Pending ──

#[derive(Serialize)]
struct PendingView {
    buckets: rollout_derive::SeparatePendingReleases,
    requests: Vec<rollout_derive::ReleaseRequest>,
}

/// `rollout pending`
pub fn pending(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    let buckets = get_separate_pending_releases(&store);
    let requests = build_release_requests(&buckets);
    if json {
        return print_json(&PendingView { buckets, requests });
    }
    if buckets.is_empty() {
        println!("(nothing staged)");
        return Ok(());
    }
    let sections = [
        ("New releases", &buckets.new_releases),
        ("New progressive rollouts", &buckets.new_releases_to_progress),
        ("Rollout updates", &buckets.progressive_updates),
        ("Cancelled rollouts", &buckets.cancel_progressive),
    ];
    for (title, bucket) in sections {
        if bucket.is_empty() {
            continue;
        }
        println!("{title}:");
        for (key, item) in bucket {
            println!("  {key} -> r{} {}", item.revision_id(), item.channel);
        }
    }
    println!("Requests: {}", requests.len());
    for r in &requests {
        match &r.progressive {
            Some(p) => println!(
                "  r{} {} ({}%{})",
                r.revision,
                r.channels.join(", "),
                p.percentage,
                if p.paused { ", paused" } else { "" }
            ),
            None => println!("  r{} {}", r.revision, r.channels.join(", ")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollout_core::PendingRelease;

    fn rev(id: u64) -> Revision {
        Revision {
            revision: id,
            version: format!("1.{id}"),
            architectures: ["amd64".to_string()].into_iter().collect(),
            channels: Vec::new(),
            confinement: "strict".into(),
            grade: "stable".into(),
            attributes: Default::default(),
            created_at: None,
        }
    }

    #[test]
    fn channels_mark_staged_cells() {
        let mut store = Store::default();
        store
            .channel_map
            .entry("latest/stable".into())
            .or_default()
            .insert("amd64".into(), rev(1));
        store
            .pending_releases
            .entry(2)
            .or_default()
            .insert("latest/edge".into(), PendingRelease::new(rev(2), "latest/edge"));

        let out = render_channels(&store);
        assert!(out.contains("latest/edge\n  * amd64: r2 1.2"));
        assert!(out.contains("latest/stable\n    amd64: r1 1.1"));
    }

    #[test]
    fn empty_channel_map() {
        assert_eq!(render_channels(&Store::default()), "(no channels)\n");
    }

    #[test]
    fn views_require_workspace() {
        let dir = tempfile::tempdir().unwrap();
        assert!(history(dir.path(), true).is_err());
        assert!(pending(dir.path(), false).is_err());
    }

    #[test]
    fn views_run_on_fresh_workspace() {
        let dir = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(dir.path()).unwrap();
        history(dir.path(), false).unwrap();
        channels(dir.path(), true).unwrap();
        branches(dir.path(), false).unwrap();
        available(dir.path(), Some(AvailableRevisionsSelect::Recent), Some("amd64"), false).unwrap();
        pending(dir.path(), true).unwrap();
    }
}
