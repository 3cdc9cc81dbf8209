//! Ethereum infrastructure - wallet provider boundary and Alloy implementation

mod events;
mod provider;

pub use events::{EventSubscription, ProviderEvent, WatchState};
pub use provider::{
    create_provider, detect_provider, AlloyWallet, ProviderConfig, ProviderInfo, WalletProvider,
};
