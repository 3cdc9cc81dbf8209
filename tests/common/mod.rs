//! In-memory wallet provider for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::U256;
use tokio::sync::{mpsc, Notify};

use walletbar::domain::wallet::ProviderError;
use walletbar::infrastructure::ethereum::{EventSubscription, ProviderEvent, WalletProvider};

pub const ALICE: &str = "0x1234567890AbcdEF1234567890aBcdef12345678";
pub const BOB: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";

/// 1.5 ether
pub fn one_and_a_half_eth() -> U256 {
    U256::from(1_500_000_000_000_000_000u128)
}

pub struct MockProvider {
    pub request_result: Mutex<Result<Vec<String>, ProviderError>>,
    pub authorized: Mutex<Vec<String>>,
    pub balance: Mutex<Result<U256, ProviderError>>,
    pub chain_id: Mutex<u64>,
    pub calls: Mutex<Vec<&'static str>>,
    /// When set, `eth_requestAccounts` waits for this before answering
    pub gate: Mutex<Option<Arc<Notify>>>,
    listeners: Mutex<Vec<mpsc::Sender<ProviderEvent>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            request_result: Mutex::new(Ok(vec![ALICE.to_string()])),
            authorized: Mutex::new(Vec::new()),
            balance: Mutex::new(Ok(one_and_a_half_eth())),
            chain_id: Mutex::new(1),
            calls: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(code: i64, message: &str) -> Self {
        let mock = Self::new();
        *mock.request_result.lock().unwrap() = Err(ProviderError::Rpc {
            code,
            message: message.to_string(),
        });
        mock
    }

    pub fn with_authorized(accounts: &[&str]) -> Self {
        let mock = Self::new();
        *mock.authorized.lock().unwrap() = accounts.iter().map(|a| a.to_string()).collect();
        mock
    }

    /// Hold every account request open until the returned handle fires
    pub fn gated(self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        (self, gate)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| **call == name).count()
    }

    /// Deliver an event to every live listener
    pub async fn emit(&self, event: ProviderEvent) {
        let listeners: Vec<_> = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            let _ = listener.send(event.clone()).await;
        }
    }

    /// Listeners whose session is still alive
    pub fn live_listeners(&self) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .iter()
            .filter(|listener| !listener.is_closed())
            .count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait::async_trait]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record("eth_requestAccounts");
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.request_result.lock().unwrap().clone()
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record("eth_accounts");
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn get_balance(&self, _address: &str) -> Result<U256, ProviderError> {
        self.record("eth_getBalance");
        self.balance.lock().unwrap().clone()
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record("eth_chainId");
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn client_version(&self) -> Result<String, ProviderError> {
        self.record("web3_clientVersion");
        Ok("MockWallet/v1.0".to_string())
    }

    async fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        let (tx, rx) = mpsc::channel(16);
        self.listeners.lock().unwrap().push(tx);
        Ok(EventSubscription::from_receiver(rx))
    }

    fn endpoint_name(&self) -> String {
        "mock://wallet".to_string()
    }
}
