//! Shared context passed to modules

use crate::domain::wallet::ModalStep;

/// Snapshot of wallet state modules need to decide on an action
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Whether a wallet provider was detected
    pub wallet_installed: bool,

    pub modal_step: ModalStep,

    pub is_connected: bool,

    pub is_connecting: bool,

    /// Full address of the connected account, empty otherwise
    pub account: String,

    /// Last text copied to the clipboard
    pub clipboard: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set clipboard content
    pub fn set_clipboard(&mut self, content: String) {
        self.clipboard = Some(content);
    }
}
