use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;

use crate::config::{Config, DEFAULT_INSTALL_URL};
use crate::core::{Action, Context, Module, NotifyLevel};
use crate::domain::wallet::WalletStore;
use crate::infrastructure::ethereum::ProviderInfo;
use crate::infrastructure::runtime::RuntimeEvent;
use crate::ui::modal::WalletModal;
use crate::ui::navbar::{Navbar, LINKS};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: NotifyLevel,
    pub since: Instant,
}

pub struct App {
    pub ctx: Context,
    pub wallet: WalletStore,
    pub modal: WalletModal,
    pub navbar: Navbar,
    /// Detected wallet endpoint, `None` when nothing answered
    pub provider: Option<ProviderInfo>,
    /// Provider detection is in flight
    pub detecting: bool,
    pub active_link: usize,
    pub install_url: String,
    pub status: Option<StatusMessage>,
    pub connected_at: Option<DateTime<Local>>,
    pub spinner_tick: usize,
    pub should_quit: bool,
    /// Id handed to the next connect request
    next_connect_id: u64,
    /// Connects numbered below this were issued before the last reload
    reload_floor: u64,
    /// Connect whose outcome belongs to the dialog currently shown
    modal_connect: Option<u64>,
    pending_connect: Option<u64>,
    pending_disconnect: bool,
    pending_reload: bool,
    pending_install: Option<String>,
    pending_copy: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_store(WalletStore::default(), DEFAULT_INSTALL_URL.to_string())
    }

    pub fn from_config(config: &Config) -> Self {
        let store = WalletStore::new(config.network_registry(), config.auto_close_delay());
        Self::with_store(store, config.install_url().to_string())
    }

    fn with_store(wallet: WalletStore, install_url: String) -> Self {
        let mut app = Self {
            ctx: Context::new(),
            wallet,
            modal: WalletModal::default(),
            navbar: Navbar,
            provider: None,
            detecting: true,
            active_link: 0,
            install_url,
            status: None,
            connected_at: None,
            spinner_tick: 0,
            should_quit: false,
            next_connect_id: 1,
            reload_floor: 1,
            modal_connect: None,
            pending_connect: None,
            pending_disconnect: false,
            pending_reload: false,
            pending_install: None,
            pending_copy: None,
        };
        app.sync_context();
        app
    }

    /// Refresh the snapshot handed to key handlers
    pub fn sync_context(&mut self) {
        let connection = self.wallet.connection();
        self.ctx.wallet_installed = self.provider.is_some();
        self.ctx.modal_step = self.wallet.modal().step;
        self.ctx.is_connected = connection.is_connected;
        self.ctx.is_connecting = connection.is_connecting;
        self.ctx.account = connection.account.clone();
    }

    pub fn is_metamask_installed(&self) -> bool {
        self.provider.is_some()
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: NotifyLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, NotifyLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn connected_since(&self) -> Option<String> {
        self.connected_at
            .map(|at| format!("since {}", at.format("%H:%M")))
    }

    pub fn open_wallet_modal(&mut self) {
        self.modal.reset();
        self.modal_connect = None;
        self.wallet.open_modal();
    }

    pub fn close_wallet_modal(&mut self) {
        self.wallet.close_modal();
        self.modal_connect = None;
        self.modal.reset();
    }

    pub fn connect_metamask(&mut self) {
        let installed = self.is_metamask_installed();
        if self.wallet.begin_connect(installed) {
            self.queue_connect();
        }
    }

    pub fn retry(&mut self) {
        let installed = self.is_metamask_installed();
        if self.wallet.retry(installed) {
            self.queue_connect();
        } else {
            tracing::debug!(step = ?self.wallet.modal().step, "retry ignored outside select step");
        }
    }

    pub fn disconnect_wallet(&mut self) {
        self.wallet.disconnect();
        self.connected_at = None;
        self.pending_disconnect = true;
        self.set_status("Wallet disconnected", NotifyLevel::Info);
    }

    pub fn install_metamask(&mut self) {
        self.pending_install = Some(self.install_url.clone());
    }

    /// Start over as a fresh page load would
    pub fn reload(&mut self) {
        tracing::info!("reloading wallet state");
        self.wallet.reset();
        self.modal.reset();
        self.provider = None;
        self.detecting = true;
        self.connected_at = None;
        self.reload_floor = self.next_connect_id;
        self.modal_connect = None;
        self.pending_connect = None;
        self.pending_disconnect = false;
        self.pending_reload = true;
        self.set_status("Reloading…", NotifyLevel::Info);
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::OpenWalletModal => self.open_wallet_modal(),
            Action::CloseWalletModal => self.close_wallet_modal(),
            Action::ConnectMetaMask => self.connect_metamask(),
            Action::InstallMetaMask => self.install_metamask(),
            Action::Retry => self.retry(),
            Action::Reload => self.reload(),
            Action::Disconnect => self.disconnect_wallet(),
            Action::SelectLink(idx) => {
                if idx < LINKS.len() {
                    self.active_link = idx;
                }
            }
            Action::Copy(text) => {
                if !text.is_empty() {
                    self.pending_copy = Some(text);
                }
            }
            Action::Notify(text, level) => self.set_status(text, level),
            Action::Quit => self.should_quit = true,
        }
        self.sync_context();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.sync_context();
        let action = if self.wallet.modal().show {
            self.modal.handle_key(key, &self.ctx)
        } else {
            self.navbar.handle_key(key, &self.ctx)
        };
        self.dispatch(action);
    }

    pub fn apply_runtime_event(&mut self, event: RuntimeEvent, now: Instant) {
        match event {
            RuntimeEvent::ProviderDetected { info } => {
                self.detecting = false;
                match &info {
                    Some(info) => self.set_status(
                        format!("Wallet detected at {}", info.endpoint),
                        NotifyLevel::Info,
                    ),
                    None => self.set_status("No wallet detected", NotifyLevel::Warn),
                }
                self.provider = info;
            }
            RuntimeEvent::Restored { account } => {
                self.wallet.restore(account);
                self.mark_connected();
            }
            RuntimeEvent::ConnectFinished { id, result } => {
                if id < self.reload_floor {
                    tracing::debug!(id, "dropping connect result from before reload");
                    return;
                }
                if self.modal_connect == Some(id) {
                    self.modal_connect = None;
                    self.wallet.finish_connect(result, now);
                } else {
                    // The dialog that started this connect was closed.
                    match result {
                        Ok(account) => self.wallet.apply_account(account),
                        Err(err) => self.set_status(err.to_string(), NotifyLevel::Warn),
                    }
                }
                self.mark_connected();
            }
            RuntimeEvent::AccountResolved { .. }
            | RuntimeEvent::AccountsCleared
            | RuntimeEvent::ChainChanged { .. }
                if self.detecting =>
            {
                tracing::debug!(?event, "dropping session event queued before reload");
                return;
            }
            RuntimeEvent::AccountResolved { account } => {
                tracing::info!(account = %account.address, "account changed");
                self.wallet.apply_account(account);
                self.mark_connected();
            }
            RuntimeEvent::AccountsCleared => {
                tracing::info!("wallet reported no accounts");
                self.wallet.clear_account();
                self.connected_at = None;
            }
            RuntimeEvent::ChainChanged { chain_id } => {
                tracing::info!(chain_id = %chain_id, "chain changed, reloading");
                self.wallet.apply_chain_changed(chain_id);
                self.reload();
            }
            RuntimeEvent::Error { message } => {
                self.set_status(message, NotifyLevel::Error);
            }
        }
        self.sync_context();
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let Some(status) = self.status.as_ref() {
            if now.saturating_duration_since(status.since) > STATUS_TTL {
                self.status = None;
            }
        }
        if self.wallet.tick(now) {
            self.modal.reset();
        }
        if self.wallet.connection().is_connecting {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
        self.sync_context();
    }

    pub fn take_connect_request(&mut self) -> Option<u64> {
        self.pending_connect.take()
    }

    pub fn take_disconnect_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_disconnect)
    }

    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_reload)
    }

    pub fn take_install_request(&mut self) -> Option<String> {
        self.pending_install.take()
    }

    pub fn take_copy_request(&mut self) -> Option<String> {
        self.pending_copy.take()
    }

    fn queue_connect(&mut self) {
        let id = self.next_connect_id;
        self.next_connect_id += 1;
        tracing::info!(id, "requesting wallet accounts");
        self.modal_connect = Some(id);
        self.pending_connect = Some(id);
        self.spinner_tick = 0;
    }

    fn mark_connected(&mut self) {
        if !self.wallet.connection().is_connected {
            self.connected_at = None;
        } else if self.connected_at.is_none() {
            self.connected_at = Some(Local::now());
        }
    }
}
