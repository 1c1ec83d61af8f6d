use rollout_core::Store;
use tracing::{debug, trace};

use crate::action::Action;
use crate::reducers::reduce;

/// Holds the current store and applies actions to it in order.
#[derive(Debug, Clone, Default)]
pub struct Console {
    store: Store,
    version: u64,
}

impl Console {
    pub fn new(store: Store) -> Self {
        Self { store, version: 0 }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    /// Number of actions applied since construction.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dispatch(&mut self, action: &Action) {
        if matches!(action, Action::Unknown) {
            trace!("ignoring unknown action");
            return;
        }
        debug!(action = action.kind(), version = self.version, "dispatch");
        let current = std::mem::take(&mut self.store);
        self.store = reduce(current, action);
        self.version += 1;
    }

    pub fn dispatch_all<'a>(&mut self, actions: impl IntoIterator<Item = &'a Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{release, rev};

    #[test]
    fn dispatch_applies_in_order() {
        let mut console = Console::default();
        console.dispatch_all(&[
            Action::SetCurrentTrack {
                track: "latest".into(),
            },
            Action::UpdateReleases {
                releases: vec![release(Some(1), "latest", "stable", "amd64", 10)],
            },
            Action::SetCurrentTrack {
                track: "22.04".into(),
            },
        ]);
        assert_eq!(console.store().current_track, "22.04");
        assert_eq!(console.store().releases.len(), 1);
        assert_eq!(console.version(), 3);
    }

    #[test]
    fn unknown_actions_do_not_bump_version() {
        let mut store = Store::default();
        store.revisions.insert(1, rev(1, &["amd64"]));
        let mut console = Console::new(store.clone());
        console.dispatch(&Action::Unknown);
        assert_eq!(console.version(), 0);
        assert_eq!(console.into_store(), store);
    }
}
