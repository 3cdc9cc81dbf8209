//! Async worker - runs in Tokio runtime and performs every provider call

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinSet;

use crate::domain::wallet::{AccountInfo, ConnectError};
use crate::infrastructure::ethereum::{detect_provider, ProviderConfig, WalletProvider};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::infrastructure::runtime::session::{SessionUpdate, WalletSession};

type ConnectOutcome = (u64, Result<(WalletSession, AccountInfo), ConnectError>);

/// Provider, session and in-flight connects owned by the worker
///
/// The session is replaced on every successful connect and cleared on
/// disconnect or reload, which also releases its listeners. Connects run as
/// tasks so a wallet prompt never stalls the loop; reload aborts them.
#[derive(Default)]
pub struct WalletWorker {
    provider: Option<Arc<dyn WalletProvider>>,
    session: Option<WalletSession>,
    connects: JoinSet<ConnectOutcome>,
}

impl WalletWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a (possibly missing) provider and silently reconnect
    pub async fn install(&mut self, provider: Option<Arc<dyn WalletProvider>>) -> Vec<RuntimeEvent> {
        self.abort_connects();
        self.session = None;
        self.provider = provider;

        let Some(provider) = self.provider.clone() else {
            return Vec::new();
        };
        let (session, account) = WalletSession::restore(provider).await;
        self.session = Some(session);
        account
            .map(|account| vec![RuntimeEvent::Restored { account }])
            .unwrap_or_default()
    }

    /// Start an interactive connect in the background
    ///
    /// Without a provider the outcome is known right away and returned.
    pub fn start_connect(&mut self, id: u64) -> Option<RuntimeEvent> {
        let Some(provider) = self.provider.clone() else {
            return Some(RuntimeEvent::ConnectFinished {
                id,
                result: Err(ConnectError::ProviderMissing),
            });
        };
        self.connects
            .spawn(async move { (id, WalletSession::connect(provider).await) });
        None
    }

    /// Wait for the next in-flight connect to finish
    ///
    /// Returns `None` right away when nothing is in flight. Cancel safe.
    pub async fn next_connect(&mut self) -> Option<RuntimeEvent> {
        let joined = self.connects.join_next().await?;
        let (id, result) = match joined {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "connect task failed");
                return None;
            }
        };
        let result = result.map(|(session, account)| {
            self.session = Some(session);
            account
        });
        Some(RuntimeEvent::ConnectFinished { id, result })
    }

    pub fn pending_connects(&self) -> usize {
        self.connects.len()
    }

    pub fn abort_connects(&mut self) {
        if !self.connects.is_empty() {
            tracing::info!(count = self.connects.len(), "aborting pending wallet requests");
        }
        // Dropping the set aborts its tasks.
        self.connects = JoinSet::new();
    }

    pub fn disconnect(&mut self) {
        self.session = None;
    }

    /// Drain queued provider events and translate them
    pub async fn poll_session(&mut self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return events;
        };
        let mut queued = Vec::new();
        while let Some(event) = session.try_next_event() {
            queued.push(event);
        }
        for event in queued {
            let update = session.handle_event(event).await;
            events.extend(update.map(|update| match update {
                SessionUpdate::Resolved(account) => RuntimeEvent::AccountResolved { account },
                SessionUpdate::Cleared => RuntimeEvent::AccountsCleared,
                SessionUpdate::ChainChanged(chain_id) => RuntimeEvent::ChainChanged { chain_id },
            }));
        }
        events
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

/// Run the async worker loop
pub async fn run_async_worker(
    endpoints: Vec<ProviderConfig>,
    poll_interval: Duration,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    if endpoints.is_empty() {
        anyhow::bail!("No wallet endpoints configured");
    }

    let mut worker = WalletWorker::new();
    reload(&mut worker, &endpoints, poll_interval, &evt_tx).await;

    loop {
        // Process commands (non-blocking)
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => {
                    worker.abort_connects();
                    return Ok(());
                }
                RuntimeCommand::Reload => {
                    worker.abort_connects();
                    reload(&mut worker, &endpoints, poll_interval, &evt_tx).await;
                }
                RuntimeCommand::Connect { id } => {
                    if let Some(event) = worker.start_connect(id) {
                        let _ = evt_tx.send(event);
                    }
                }
                RuntimeCommand::Disconnect => worker.disconnect(),
            }
        }

        for event in worker.poll_session().await {
            let _ = evt_tx.send(event);
        }

        tokio::select! {
            Some(event) = worker.next_connect() => {
                let _ = evt_tx.send(event);
            }
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }
    }
}

async fn reload(
    worker: &mut WalletWorker,
    endpoints: &[ProviderConfig],
    poll_interval: Duration,
    evt_tx: &Sender<RuntimeEvent>,
) {
    let (provider, info) = match detect_provider(endpoints, poll_interval).await {
        Some((provider, info)) => (Some(provider), Some(info)),
        None => (None, None),
    };
    let _ = evt_tx.send(RuntimeEvent::ProviderDetected { info });
    for event in worker.install(provider).await {
        let _ = evt_tx.send(event);
    }
}
