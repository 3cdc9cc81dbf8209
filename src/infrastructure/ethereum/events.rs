//! Provider events and their subscription handle

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::wallet::{chain_id_hex, ProviderError};

/// Events a wallet provider emits while a session is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Authorized accounts changed; empty means the wallet locked or revoked access
    AccountsChanged(Vec<String>),
    /// Active chain switched (hex id)
    ChainChanged(String),
    /// Provider became reachable again
    Connect { chain_id: String },
    /// Provider stopped answering
    Disconnect { message: String },
}

/// Live listener registration
///
/// Dropping the subscription stops the task feeding it, so a replaced or
/// cleared session never leaves a listener behind.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::Receiver<ProviderEvent>,
    task: Option<JoinHandle<()>>,
}

impl EventSubscription {
    pub fn new(rx: mpsc::Receiver<ProviderEvent>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Subscription fed directly by whoever holds the sender
    pub fn from_receiver(rx: mpsc::Receiver<ProviderEvent>) -> Self {
        Self { rx, task: None }
    }

    /// Next queued event without waiting
    pub fn try_next(&mut self) -> Option<ProviderEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Last observed provider snapshot, used to turn polls into events
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    accounts: Option<Vec<String>>,
    chain_id: Option<String>,
    /// `None` until the first poll succeeds
    reachable: Option<bool>,
}

impl WatchState {
    /// Fold one poll result into the state and return what changed
    ///
    /// The first successful poll only records a baseline.
    pub fn observe(
        &mut self,
        poll: Result<(Vec<String>, u64), ProviderError>,
    ) -> Vec<ProviderEvent> {
        let mut events = Vec::new();
        match poll {
            Ok((accounts, chain_id)) => {
                let chain_id = chain_id_hex(chain_id);
                if self.reachable == Some(false) {
                    events.push(ProviderEvent::Connect {
                        chain_id: chain_id.clone(),
                    });
                }
                if self
                    .accounts
                    .as_ref()
                    .is_some_and(|previous| previous != &accounts)
                {
                    events.push(ProviderEvent::AccountsChanged(accounts.clone()));
                }
                if self
                    .chain_id
                    .as_ref()
                    .is_some_and(|previous| previous != &chain_id)
                {
                    events.push(ProviderEvent::ChainChanged(chain_id.clone()));
                }
                self.accounts = Some(accounts);
                self.chain_id = Some(chain_id);
                self.reachable = Some(true);
            }
            Err(err) => {
                if self.reachable == Some(true) {
                    self.reachable = Some(false);
                    events.push(ProviderEvent::Disconnect {
                        message: err.to_string(),
                    });
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_first_poll_is_baseline() {
        let mut state = WatchState::default();
        assert!(state.observe(Ok((accounts(&["0xaa"]), 1))).is_empty());
        assert!(state.observe(Ok((accounts(&["0xaa"]), 1))).is_empty());
    }

    #[test]
    fn test_account_and_chain_changes() {
        let mut state = WatchState::default();
        state.observe(Ok((accounts(&["0xaa"]), 1)));

        assert_eq!(
            state.observe(Ok((accounts(&["0xbb", "0xaa"]), 1))),
            vec![ProviderEvent::AccountsChanged(accounts(&["0xbb", "0xaa"]))]
        );
        assert_eq!(
            state.observe(Ok((accounts(&["0xbb", "0xaa"]), 137))),
            vec![ProviderEvent::ChainChanged("0x89".to_string())]
        );
        assert_eq!(
            state.observe(Ok((Vec::new(), 137))),
            vec![ProviderEvent::AccountsChanged(Vec::new())]
        );
    }

    #[test]
    fn test_disconnect_and_reconnect() {
        let mut state = WatchState::default();
        state.observe(Ok((accounts(&["0xaa"]), 1)));

        let events = state.observe(Err(ProviderError::Transport("refused".into())));
        assert!(matches!(events.as_slice(), [ProviderEvent::Disconnect { .. }]));
        assert!(state
            .observe(Err(ProviderError::Transport("refused".into())))
            .is_empty());

        assert_eq!(
            state.observe(Ok((accounts(&["0xaa"]), 1))),
            vec![ProviderEvent::Connect {
                chain_id: "0x1".to_string()
            }]
        );
    }

    #[test]
    fn test_failure_before_first_success_is_not_a_disconnect() {
        let mut state = WatchState::default();
        assert!(state
            .observe(Err(ProviderError::Transport("timeout".into())))
            .is_empty());
        assert!(state.observe(Ok((accounts(&["0xaa"]), 1))).is_empty());

        let events = state.observe(Err(ProviderError::Transport("refused".into())));
        assert!(matches!(events.as_slice(), [ProviderEvent::Disconnect { .. }]));
    }

    #[tokio::test]
    async fn test_drop_aborts_feeding_task() {
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(async move {
            loop {
                if tx.send(ProviderEvent::ChainChanged("0x1".into())).await.is_err() {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        });
        let abort = task.abort_handle();
        let subscription = EventSubscription::new(rx, task);
        drop(subscription);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(abort.is_finished());
    }
}
