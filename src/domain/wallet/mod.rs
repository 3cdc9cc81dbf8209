//! Wallet connection domain models
//!
//! Everything here is synchronous and side-effect free. Provider calls live
//! in `infrastructure`; this module only records their outcomes.

mod error;
mod format;
mod network;
mod state;
mod store;

pub use error::{ConnectError, ProviderError, REQUEST_PENDING_CODE, USER_REJECTED_CODE};
pub use format::{chain_id_hex, format_address, format_balance};
pub use network::NetworkRegistry;
pub use state::{AccountInfo, ConnectionState, ModalState, ModalStep};
pub use store::{WalletStore, DEFAULT_AUTO_CLOSE};
