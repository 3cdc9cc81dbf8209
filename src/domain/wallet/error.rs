//! Provider and connection error taxonomy

use thiserror::Error;

/// EIP-1193 code for a request the user declined
pub const USER_REJECTED_CODE: i64 = 4001;

/// Code returned while another permission request is still open in the wallet
pub const REQUEST_PENDING_CODE: i64 = -32002;

/// Raw failure reported by a wallet provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// JSON-RPC error payload returned by the wallet
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProviderError {
    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// User-facing reasons an interactive connect can fail
///
/// The display strings are what the navbar banner and modal show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("MetaMask is not installed. Please install MetaMask extension.")]
    ProviderMissing,
    #[error("Connection rejected. Please approve the connection in MetaMask.")]
    UserRejected,
    #[error("MetaMask is already processing a request. Please wait.")]
    RequestAlreadyPending,
    #[error("No accounts found. Please check your MetaMask wallet.")]
    NoAccountsReturned,
    #[error("Failed to connect to MetaMask. Please try again.")]
    GenericConnectionFailure,
}

impl From<ProviderError> for ConnectError {
    fn from(err: ProviderError) -> Self {
        match err.code() {
            Some(USER_REJECTED_CODE) => ConnectError::UserRejected,
            Some(REQUEST_PENDING_CODE) => ConnectError::RequestAlreadyPending,
            _ => ConnectError::GenericConnectionFailure,
        }
    }
}
