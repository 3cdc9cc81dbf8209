//! Actions that modules can return to communicate with the app

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Show the wallet modal at its select step
    OpenWalletModal,

    /// Hide the wallet modal
    CloseWalletModal,

    /// Start an interactive connect
    ConnectMetaMask,

    /// Open the wallet install page in the system browser
    InstallMetaMask,

    /// Error step "Try Again"
    Retry,

    /// Reset everything and re-detect the provider
    Reload,

    /// Forget the connected account locally
    Disconnect,

    /// Select a navbar link
    SelectLink(usize),

    /// Copy text to clipboard
    Copy(String),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
