//! Connection and modal state records

/// Everything the navbar and modal know about the wallet
///
/// Empty strings mean "unknown". `is_connected` implies a non-empty account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub account: String,
    /// Ether amount, four decimals
    pub balance: String,
    /// Hex chain id, e.g. `0x1`
    pub chain_id: String,
    pub network_name: String,
    pub is_connected: bool,
    pub is_connecting: bool,
    pub error: String,
}

impl ConnectionState {
    /// Drop the account while keeping the last known chain
    pub fn clear_account(&mut self) {
        self.account.clear();
        self.balance.clear();
        self.is_connected = false;
        self.error.clear();
    }
}

/// Phase of the connection dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalStep {
    #[default]
    Select,
    Connecting,
    Success,
    Error,
}

impl ModalStep {
    pub fn title(&self) -> &'static str {
        match self {
            ModalStep::Select => "Connect Your Wallet",
            ModalStep::Connecting => "Connecting to MetaMask",
            ModalStep::Success => "Successfully Connected!",
            ModalStep::Error => "Connection Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    pub show: bool,
    pub step: ModalStep,
}

/// Result of resolving an account against the provider
///
/// `balance` and `chain_id` stay empty when their lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    pub balance: String,
    pub chain_id: String,
}

impl AccountInfo {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}
