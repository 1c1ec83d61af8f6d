//! Pure state transitions.
//!
//! Each slice of [`Store`] has its own reducer taking the slice by value and
//! returning the next value. Actions a slice does not handle fall through
//! unchanged. [`reduce`] runs every slice reducer for one action.

mod channel_map;
mod pending_releases;
mod revisions;
mod ui;

use rollout_core::Store;

use crate::action::Action;

/// Apply one action to the whole store.
pub fn reduce(state: Store, action: &Action) -> Store {
    let Store {
        revisions,
        releases,
        channel_map,
        pending_releases,
        architectures,
        current_track,
        options,
        branches,
        history,
        notification,
        modal,
        available_revisions_select,
    } = state;

    Store {
        revisions: revisions::reduce(revisions, action),
        releases: ui::releases(releases, action),
        channel_map: channel_map::reduce(channel_map, action),
        pending_releases: pending_releases::reduce(pending_releases, action),
        architectures: ui::architectures(architectures, action),
        current_track: ui::current_track(current_track, action),
        options,
        branches: ui::branches(branches, action),
        history: ui::history(history, action),
        notification: ui::notification(notification, action),
        modal: ui::modal(modal, action),
        available_revisions_select: ui::available_revisions_select(
            available_revisions_select,
            action,
        ),
    }
}
