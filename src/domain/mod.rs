//! Domain layer - wallet bookkeeping independent of transport and rendering

pub mod wallet;
