//! Wallet state container
//!
//! `WalletStore` is the single owner of connection and modal state. The UI
//! thread mutates it in response to key presses and to outcomes reported by
//! the async worker; it never talks to a provider itself. Operations that
//! need a provider round-trip return a flag telling the caller to dispatch
//! the request, and the outcome comes back through `finish_connect`,
//! `restore`, `apply_account` and friends.

use std::time::{Duration, Instant};

use super::error::ConnectError;
use super::format::format_address;
use super::network::NetworkRegistry;
use super::state::{AccountInfo, ConnectionState, ModalState, ModalStep};

/// Delay before a successful connection closes the modal on its own
pub const DEFAULT_AUTO_CLOSE: Duration = Duration::from_millis(2000);

/// A scheduled auto-close, only honoured while the modal generation matches
#[derive(Debug, Clone, Copy)]
struct AutoClose {
    generation: u64,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct WalletStore {
    connection: ConnectionState,
    modal: ModalState,
    registry: NetworkRegistry,
    auto_close_delay: Duration,
    auto_close: Option<AutoClose>,
    /// Bumped on every open/close so stale timers can tell they are stale
    modal_generation: u64,
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new(NetworkRegistry::default(), DEFAULT_AUTO_CLOSE)
    }
}

impl WalletStore {
    pub fn new(registry: NetworkRegistry, auto_close_delay: Duration) -> Self {
        Self {
            connection: ConnectionState::default(),
            modal: ModalState::default(),
            registry,
            auto_close_delay,
            auto_close: None,
            modal_generation: 0,
        }
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    /// `0x1234...abcd` for the current account, empty when disconnected
    pub fn formatted_address(&self) -> String {
        format_address(&self.connection.account)
    }

    pub fn open_modal(&mut self) {
        self.modal = ModalState {
            show: true,
            step: ModalStep::Select,
        };
        self.connection.error.clear();
        self.cancel_auto_close();
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState {
            show: false,
            step: ModalStep::Select,
        };
        self.connection.error.clear();
        self.connection.is_connecting = false;
        self.cancel_auto_close();
    }

    /// Start an interactive connect
    ///
    /// Returns `true` when the caller must now request accounts from the
    /// provider. Without a provider the modal moves straight to the error
    /// step and nothing is requested.
    pub fn begin_connect(&mut self, provider_installed: bool) -> bool {
        if !provider_installed {
            self.fail(ConnectError::ProviderMissing);
            return false;
        }
        self.connection.is_connecting = true;
        self.connection.error.clear();
        self.modal.step = ModalStep::Connecting;
        true
    }

    /// The error step's "Try Again" only acts from the select step
    pub fn retry(&mut self, provider_installed: bool) -> bool {
        if self.modal.step != ModalStep::Select {
            return false;
        }
        self.begin_connect(provider_installed)
    }

    /// Record the outcome of an interactive connect
    pub fn finish_connect(&mut self, result: Result<AccountInfo, ConnectError>, now: Instant) {
        match result {
            Ok(info) => {
                self.apply_account(info);
                self.modal.step = ModalStep::Success;
                self.auto_close = Some(AutoClose {
                    generation: self.modal_generation,
                    due: now + self.auto_close_delay,
                });
                tracing::info!(
                    account = %self.connection.account,
                    network = %self.connection.network_name,
                    "wallet connected"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "wallet connection failed");
                self.fail(err);
            }
        }
        self.connection.is_connecting = false;
    }

    /// Adopt an account found by the silent startup check
    pub fn restore(&mut self, info: AccountInfo) {
        tracing::info!(account = %info.address, "restored previously authorized account");
        self.apply_account(info);
    }

    /// Swap in freshly resolved account details
    pub fn apply_account(&mut self, info: AccountInfo) {
        if info.address.is_empty() {
            self.clear_account();
            return;
        }
        self.connection.account = info.address;
        self.connection.is_connected = true;
        self.connection.balance = info.balance;
        if !info.chain_id.is_empty() {
            self.set_chain(info.chain_id);
        }
    }

    /// Provider reported no accounts or disconnected
    pub fn clear_account(&mut self) {
        self.connection.clear_account();
    }

    pub fn apply_chain_changed(&mut self, chain_id: impl Into<String>) {
        self.set_chain(chain_id.into());
    }

    /// Local reset only; the provider is not contacted
    pub fn disconnect(&mut self) {
        self.connection.account.clear();
        self.connection.balance.clear();
        self.connection.is_connected = false;
        self.connection.error.clear();
        self.connection.chain_id.clear();
        self.connection.network_name.clear();
        tracing::info!("wallet disconnected");
    }

    /// Forget everything, as a fresh page load would
    pub fn reset(&mut self) {
        self.connection = ConnectionState::default();
        self.modal = ModalState::default();
        self.modal_generation += 1;
        self.auto_close = None;
    }

    /// Fire the success auto-close if it is due and still current
    ///
    /// Returns `true` when the modal was closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.auto_close else {
            return false;
        };
        if pending.generation != self.modal_generation {
            self.auto_close = None;
            return false;
        }
        if now < pending.due {
            return false;
        }
        self.close_modal();
        true
    }

    pub fn auto_close_pending(&self) -> bool {
        self.auto_close
            .is_some_and(|pending| pending.generation == self.modal_generation)
    }

    fn fail(&mut self, err: ConnectError) {
        self.connection.error = err.to_string();
        self.modal.step = ModalStep::Error;
    }

    fn set_chain(&mut self, chain_id: String) {
        self.connection.network_name = self.registry.name_for(&chain_id);
        self.connection.chain_id = chain_id;
    }

    fn cancel_auto_close(&mut self) {
        self.modal_generation += 1;
        self.auto_close = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn connected_info() -> AccountInfo {
        AccountInfo {
            address: ADDR.to_string(),
            balance: "1.5000".to_string(),
            chain_id: "0x1".to_string(),
        }
    }

    #[test]
    fn test_open_and_close_modal() {
        let mut store = WalletStore::default();
        store.open_modal();
        assert_eq!(
            store.modal(),
            ModalState {
                show: true,
                step: ModalStep::Select
            }
        );

        store.close_modal();
        assert!(!store.modal().show);
        assert_eq!(store.modal().step, ModalStep::Select);
        assert!(!store.connection().is_connecting);
    }

    #[test]
    fn test_connect_without_provider_fails_immediately() {
        let mut store = WalletStore::default();
        store.open_modal();

        assert!(!store.begin_connect(false));
        assert_eq!(store.modal().step, ModalStep::Error);
        assert!(store.connection().error.contains("not installed"));
        assert!(!store.connection().is_connecting);
    }

    #[test]
    fn test_successful_connect_populates_state() {
        let mut store = WalletStore::default();
        store.open_modal();
        assert!(store.begin_connect(true));
        assert_eq!(store.modal().step, ModalStep::Connecting);
        assert!(store.connection().is_connecting);

        store.finish_connect(Ok(connected_info()), Instant::now());

        let conn = store.connection();
        assert_eq!(store.modal().step, ModalStep::Success);
        assert!(conn.is_connected);
        assert!(!conn.is_connecting);
        assert_eq!(conn.account, ADDR);
        assert_eq!(conn.balance, "1.5000");
        assert_eq!(conn.network_name, "Ethereum Mainnet");
        assert_eq!(store.formatted_address(), "0x1234...5678");
    }

    #[test]
    fn test_failed_connect_clears_connecting() {
        for err in [
            ConnectError::UserRejected,
            ConnectError::RequestAlreadyPending,
            ConnectError::GenericConnectionFailure,
            ConnectError::NoAccountsReturned,
        ] {
            let mut store = WalletStore::default();
            store.open_modal();
            store.begin_connect(true);
            store.finish_connect(Err(err), Instant::now());

            assert_eq!(store.modal().step, ModalStep::Error);
            assert_eq!(store.connection().error, err.to_string());
            assert!(!store.connection().is_connecting);
            assert!(!store.connection().is_connected);
        }
    }

    #[test]
    fn test_auto_close_after_delay() {
        let mut store = WalletStore::default();
        let start = Instant::now();
        store.open_modal();
        store.begin_connect(true);
        store.finish_connect(Ok(connected_info()), start);

        assert!(!store.tick(start + Duration::from_millis(1999)));
        assert!(store.modal().show);

        assert!(store.tick(start + DEFAULT_AUTO_CLOSE));
        assert!(!store.modal().show);
        assert_eq!(store.modal().step, ModalStep::Select);
        assert!(store.connection().is_connected);
    }

    #[test]
    fn test_manual_close_cancels_auto_close() {
        let mut store = WalletStore::default();
        let start = Instant::now();
        store.open_modal();
        store.begin_connect(true);
        store.finish_connect(Ok(connected_info()), start);

        store.close_modal();
        store.open_modal();
        assert!(!store.auto_close_pending());

        assert!(!store.tick(start + Duration::from_secs(5)));
        assert!(store.modal().show);
    }

    #[test]
    fn test_disconnect_is_local_reset() {
        let mut store = WalletStore::default();
        store.restore(connected_info());
        assert!(store.connection().is_connected);

        store.disconnect();
        let conn = store.connection();
        assert!(!conn.is_connected);
        assert!(conn.account.is_empty());
        assert!(conn.balance.is_empty());
        assert!(conn.chain_id.is_empty());
        assert!(conn.error.is_empty());
        assert_eq!(store.formatted_address(), "");
    }

    #[test]
    fn test_retry_only_from_select() {
        let mut store = WalletStore::default();
        store.open_modal();
        store.begin_connect(true);
        store.finish_connect(Err(ConnectError::UserRejected), Instant::now());

        assert!(!store.retry(true));
        assert_eq!(store.modal().step, ModalStep::Error);
    }

    #[test]
    fn test_chain_change_updates_network() {
        let mut store = WalletStore::default();
        store.restore(connected_info());
        store.apply_chain_changed("0x89");
        assert_eq!(store.connection().chain_id, "0x89");
        assert_eq!(store.connection().network_name, "Polygon Mainnet");

        store.apply_chain_changed("0x7a69");
        assert_eq!(store.connection().network_name, "Unknown Network (0x7a69)");
    }

    #[test]
    fn test_empty_account_clears() {
        let mut store = WalletStore::default();
        store.restore(connected_info());
        store.apply_account(AccountInfo::default());
        assert!(!store.connection().is_connected);
        assert!(store.connection().account.is_empty());
    }

    #[test]
    fn test_missing_chain_keeps_previous_network() {
        let mut store = WalletStore::default();
        store.restore(connected_info());
        store.apply_account(AccountInfo::new("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd"));
        assert_eq!(store.connection().network_name, "Ethereum Mainnet");
        assert!(store.connection().balance.is_empty());
    }
}
