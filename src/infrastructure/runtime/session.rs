//! Wallet session - one provider plus its live event listeners

use std::sync::Arc;

use crate::domain::wallet::{chain_id_hex, format_balance, AccountInfo, ConnectError};
use crate::infrastructure::ethereum::{EventSubscription, ProviderEvent, WalletProvider};

/// State change a provider event translates into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Resolved(AccountInfo),
    Cleared,
    ChainChanged(String),
}

/// Listeners stay registered exactly as long as the session lives
pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    subscription: Option<EventSubscription>,
}

impl WalletSession {
    /// Open a session and register listeners
    pub async fn open(provider: Arc<dyn WalletProvider>) -> Self {
        let subscription = match provider.subscribe().await {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                tracing::warn!(error = %err, "wallet events unavailable");
                None
            }
        };
        Self {
            provider,
            subscription,
        }
    }

    /// Silent reconnect: open a session and adopt an already authorized account
    pub async fn restore(provider: Arc<dyn WalletProvider>) -> (Self, Option<AccountInfo>) {
        let session = Self::open(provider).await;
        let account = match session.provider.accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(address) => Some(session.resolve_account(address).await),
                None => None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "could not read authorized accounts");
                None
            }
        };
        (session, account)
    }

    /// Interactive connect; suspends until the wallet answers
    pub async fn connect(
        provider: Arc<dyn WalletProvider>,
    ) -> Result<(Self, AccountInfo), ConnectError> {
        tracing::info!(endpoint = %provider.endpoint_name(), "requesting wallet connection");
        let accounts = provider.request_accounts().await.map_err(|err| {
            tracing::warn!(error = %err, "account request failed");
            ConnectError::from(err)
        })?;
        let Some(address) = accounts.first().cloned() else {
            return Err(ConnectError::NoAccountsReturned);
        };
        let session = Self::open(provider).await;
        let account = session.resolve_account(&address).await;
        Ok((session, account))
    }

    /// Look up balance and chain for an address
    ///
    /// Failed lookups are logged and leave the field empty.
    pub async fn resolve_account(&self, address: &str) -> AccountInfo {
        let (balance, chain_id) =
            futures::join!(self.provider.get_balance(address), self.provider.chain_id());

        let balance = balance
            .map(format_balance)
            .unwrap_or_else(|err| {
                tracing::warn!(%address, error = %err, "balance lookup failed");
                String::new()
            });
        let chain_id = chain_id.map(chain_id_hex).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "chain id lookup failed");
            String::new()
        });

        AccountInfo {
            address: address.to_string(),
            balance,
            chain_id,
        }
    }

    /// Translate a provider event into a state change
    pub async fn handle_event(&self, event: ProviderEvent) -> Option<SessionUpdate> {
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                tracing::info!(?accounts, "wallet accounts changed");
                match accounts.first() {
                    Some(address) => {
                        Some(SessionUpdate::Resolved(self.resolve_account(address).await))
                    }
                    None => Some(SessionUpdate::Cleared),
                }
            }
            ProviderEvent::ChainChanged(chain_id) => {
                tracing::info!(%chain_id, "wallet network changed");
                Some(SessionUpdate::ChainChanged(chain_id))
            }
            ProviderEvent::Connect { chain_id } => {
                tracing::info!(%chain_id, "wallet provider connected");
                let accounts = self.provider.accounts().await.ok()?;
                let address = accounts.first()?;
                Some(SessionUpdate::Resolved(self.resolve_account(address).await))
            }
            ProviderEvent::Disconnect { message } => {
                tracing::info!(%message, "wallet provider disconnected");
                Some(SessionUpdate::Cleared)
            }
        }
    }

    pub fn try_next_event(&mut self) -> Option<ProviderEvent> {
        self.subscription.as_mut()?.try_next()
    }
}
