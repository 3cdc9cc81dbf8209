//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI owns all wallet state and only ever talks to the provider through
//! this bridge. Provider calls run on a dedicated Tokio runtime thread; their
//! outcomes come back as `RuntimeEvent`s drained once per frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::domain::wallet::{AccountInfo, ConnectError};
use crate::infrastructure::ethereum::{ProviderConfig, ProviderInfo};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCommand {
    /// Drop the session, re-detect the provider and silently reconnect
    Reload,
    /// Interactive account request, tagged so the UI can match the outcome
    Connect { id: u64 },
    /// End the session and its listeners; the provider is not contacted
    Disconnect,
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Result of provider detection; `None` means no wallet is available
    ProviderDetected { info: Option<ProviderInfo> },
    /// Previously authorized account found without prompting
    Restored { account: AccountInfo },
    /// Interactive connect finished
    ConnectFinished {
        id: u64,
        result: Result<AccountInfo, ConnectError>,
    },
    /// Account details re-resolved after a provider event
    AccountResolved { account: AccountInfo },
    /// Provider reported no accounts or went away
    AccountsCleared,
    /// Active chain switched
    ChainChanged { chain_id: String },
    /// Error occurred
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread for the given wallet endpoints
    pub fn new(endpoints: Vec<ProviderConfig>, poll_interval: Duration) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("wallet-worker".to_string())
            .spawn(move || {
                let rt = Runtime::new().expect("Failed to create Tokio runtime");
                rt.block_on(async {
                    if let Err(err) =
                        run_async_worker(endpoints, poll_interval, cmd_rx, evt_tx.clone()).await
                    {
                        tracing::error!(error = %format!("{err:#}"), "wallet worker exited");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
