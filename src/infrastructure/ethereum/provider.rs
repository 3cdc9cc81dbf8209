//! Wallet provider abstraction and Alloy implementation
//!
//! A wallet here is any JSON-RPC endpoint that understands the EIP-1193
//! account methods (`eth_requestAccounts`, `eth_accounts`). Desktop wallets
//! such as Frame expose one locally; dev nodes answer `eth_accounts` too.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::transports::TransportError;
use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::domain::wallet::ProviderError;
use crate::infrastructure::ethereum::events::{EventSubscription, WatchState};

/// Provider configuration
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// What was found when probing an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub endpoint: String,
    pub client_version: String,
}

/// The wallet surface the connection flow depends on
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync + 'static {
    /// Ask for account access; the wallet may prompt the user
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Accounts already authorized, never prompts
    async fn accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Balance in wei
    async fn get_balance(&self, address: &str) -> Result<U256, ProviderError>;

    async fn chain_id(&self) -> Result<u64, ProviderError>;

    async fn client_version(&self) -> Result<String, ProviderError>;

    /// Start listening for account, chain and connectivity changes
    async fn subscribe(&self) -> Result<EventSubscription, ProviderError>;

    fn endpoint_name(&self) -> String;
}

type WalletFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Alloy-backed wallet over HTTP, WebSocket or IPC
#[derive(Clone)]
pub struct AlloyWallet {
    provider: WalletFillProvider,
    endpoint: String,
    poll_interval: Duration,
}

/// Create a wallet provider from configuration
pub async fn create_provider(config: ProviderConfig, poll_interval: Duration) -> Result<AlloyWallet> {
    let endpoint = config.display();
    let provider = match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            ProviderBuilder::new().connect_http(rpc_url)
        }
        ProviderConfig::WebSocket(url) => ProviderBuilder::new()
            .connect(&url)
            .await
            .context("Failed to create WebSocket provider")?,
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc = IpcConnect::new(path.to_string_lossy().to_string());
            ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .context("Failed to create IPC provider")?
        }
    };
    Ok(AlloyWallet {
        provider,
        endpoint,
        poll_interval,
    })
}

/// Try endpoints in order; the first one that answers becomes the wallet
pub async fn detect_provider(
    endpoints: &[ProviderConfig],
    poll_interval: Duration,
) -> Option<(Arc<dyn WalletProvider>, ProviderInfo)> {
    for config in endpoints {
        let wallet = match create_provider(config.clone(), poll_interval).await {
            Ok(wallet) => wallet,
            Err(err) => {
                tracing::warn!(endpoint = %config.display(), error = %format!("{err:#}"), "wallet endpoint unavailable");
                continue;
            }
        };
        match wallet.client_version().await {
            Ok(client_version) => {
                let info = ProviderInfo {
                    endpoint: wallet.endpoint_name(),
                    client_version,
                };
                tracing::info!(endpoint = %info.endpoint, client = %info.client_version, "wallet provider detected");
                return Some((Arc::new(wallet), info));
            }
            Err(err) => {
                tracing::warn!(endpoint = %config.display(), error = %err, "wallet endpoint did not answer");
            }
        }
    }
    None
}

fn map_transport_error(err: TransportError) -> ProviderError {
    match err.as_error_resp() {
        Some(payload) => ProviderError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        None => ProviderError::Transport(err.to_string()),
    }
}

fn address_strings(accounts: Vec<Address>) -> Vec<String> {
    accounts
        .into_iter()
        .map(|address| address.to_checksum(None))
        .collect()
}

#[async_trait::async_trait]
impl WalletProvider for AlloyWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .map_err(map_transport_error)?;
        Ok(address_strings(accounts))
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(map_transport_error)?;
        Ok(address_strings(accounts))
    }

    async fn get_balance(&self, address: &str) -> Result<U256, ProviderError> {
        let address = Address::from_str(address)
            .map_err(|_| ProviderError::InvalidAddress(address.to_string()))?;
        self.provider
            .get_balance(address)
            .await
            .map_err(map_transport_error)
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(map_transport_error)
    }

    async fn client_version(&self) -> Result<String, ProviderError> {
        self.provider
            .get_client_version()
            .await
            .map_err(map_transport_error)
    }

    async fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        // Wallet endpoints do not push EIP-1193 events over JSON-RPC, so
        // account and chain changes are observed by polling.
        let (tx, rx) = mpsc::channel(32);
        let wallet = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(wallet.poll_interval);
            let mut state = WatchState::default();
            loop {
                ticker.tick().await;
                let poll = match wallet.accounts().await {
                    Ok(accounts) => wallet.chain_id().await.map(|chain| (accounts, chain)),
                    Err(err) => Err(err),
                };
                for event in state.observe(poll) {
                    tracing::debug!(?event, "provider event");
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
        });
        Ok(EventSubscription::new(rx, task))
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
