//! Central store
//!
//! Holds the state slices, applies actions through [`reduce`], and broadcasts
//! every dispatched action to subscribers.

use crate::actions::Action;
use crate::state::{reduce, State};
use std::sync::{Mutex, RwLock};
use tokio::sync::broadcast;

const ACTION_CHANNEL_CAPACITY: usize = 256;

/// Where workflows send their actions.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}

#[derive(Debug)]
pub struct Store {
    state: RwLock<State>,
    sender: broadcast::Sender<Action>,
    /// Every dispatched action, when recording is enabled.
    history: Option<Mutex<Vec<Action>>>,
}

impl Store {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(ACTION_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(State::default()),
            sender,
            history: None,
        }
    }

    /// Store that also records the dispatched actions, in order.
    pub fn recording() -> Self {
        Self {
            history: Some(Mutex::new(Vec::new())),
            ..Self::new()
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> State {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Recorded actions; empty unless built with [`Store::recording`].
    pub fn actions(&self) -> Vec<Action> {
        match &self.history {
            Some(history) => history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
            None => Vec::new(),
        }
    }

    /// Receive every action dispatched after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.sender.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: Action) {
        tracing::trace!(action = action.kind(), "dispatch");
        {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            reduce(&mut state, &action);
        }
        if let Some(history) = &self.history {
            history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(action.clone());
        }
        // No subscribers is fine.
        let _ = self.sender.send(action);
    }
}

impl<D: Dispatch + ?Sized> Dispatch for std::sync::Arc<D> {
    fn dispatch(&self, action: Action) {
        (**self).dispatch(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{NotificationId, Toast};

    #[test]
    fn dispatch_reduces_and_records() {
        let store = Store::recording();
        store.dispatch(Action::IsFetching(true));
        store.dispatch(Action::ShowToast(Toast::error("boom")));

        assert!(store.state().loading.is_fetching);
        assert_eq!(
            store.actions(),
            vec![
                Action::IsFetching(true),
                Action::ShowToast(Toast::error("boom"))
            ]
        );
    }

    #[test]
    fn plain_store_does_not_record() {
        let store = Store::new();
        store.dispatch(Action::IsLoading(true));
        assert!(store.actions().is_empty());
        assert!(store.state().loading.is_loading);
    }

    #[tokio::test]
    async fn subscribers_see_dispatched_actions() {
        let store = Store::new();
        let mut rx = store.subscribe();
        let id = NotificationId::adding(&[1]);
        store.dispatch(Action::DeleteNotification(id.clone()));
        assert_eq!(rx.recv().await.unwrap(), Action::DeleteNotification(id));
    }
}
