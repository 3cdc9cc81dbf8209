//! Runtime infrastructure - Tokio runtime bridge for async operations

mod bridge;
mod session;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
pub use session::{SessionUpdate, WalletSession};
pub use worker::{run_async_worker, WalletWorker};
