//! Scalar and disclosure slices: release log, architectures, current track,
//! open branches, history panel, notification, modal, revision filter.

use rollout_core::{
    AvailableRevisionsSelect, HistoryState, ModalState, NotificationState, Release,
};

use crate::action::Action;

/// Updates replace the whole log.
pub fn releases(state: Vec<Release>, action: &Action) -> Vec<Release> {
    match action {
        Action::UpdateReleases { releases } => releases.clone(),
        _ => state,
    }
}

pub fn architectures(state: Vec<String>, action: &Action) -> Vec<String> {
    match action {
        Action::UpdateArchitectures { architectures } => architectures.clone(),
        _ => state,
    }
}

pub fn current_track(state: String, action: &Action) -> String {
    match action {
        Action::SetCurrentTrack { track } => track.clone(),
        _ => state,
    }
}

pub fn branches(mut state: Vec<String>, action: &Action) -> Vec<String> {
    match action {
        Action::OpenBranches { branch } => {
            if !state.contains(branch) {
                state.push(branch.clone());
            }
            state
        }
        Action::CloseBranches { branch } => {
            state.retain(|b| b != branch);
            state
        }
        _ => state,
    }
}

pub fn history(state: HistoryState, action: &Action) -> HistoryState {
    match action {
        Action::OpenHistory { filters } => HistoryState {
            is_open: true,
            filters: filters.clone(),
        },
        Action::CloseHistory => HistoryState {
            is_open: false,
            filters: None,
        },
        // Closing a channel also hides the history panel; filters are kept.
        Action::CloseChannel { .. } => HistoryState {
            is_open: false,
            ..state
        },
        _ => state,
    }
}

pub fn notification(mut state: NotificationState, action: &Action) -> NotificationState {
    match action {
        Action::ShowNotification(payload) => {
            state.visible = true;
            payload.clone().apply(&mut state);
            state
        }
        Action::HideNotification => {
            state.visible = false;
            state
        }
        _ => state,
    }
}

pub fn modal(mut state: ModalState, action: &Action) -> ModalState {
    match action {
        Action::OpenModal(payload) => {
            state.visible = true;
            payload.clone().apply(&mut state);
            state
        }
        Action::CloseModal => {
            state.visible = false;
            state
        }
        _ => state,
    }
}

pub fn available_revisions_select(
    state: AvailableRevisionsSelect,
    action: &Action,
) -> AvailableRevisionsSelect {
    match action {
        Action::SetAvailableRevisionsSelect { value } => *value,
        _ => state,
    }
}
