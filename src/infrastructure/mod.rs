//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The wallet provider boundary and its Alloy implementation
//! - Tokio runtime bridge for async operations

pub mod ethereum;
pub mod runtime;
