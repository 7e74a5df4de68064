//! tododeck library
//!
//! Core components: the todo store with its derivation pipeline, the
//! key-value persistence port, and the identity/session port.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod identity;
pub mod storage;
pub mod store;
pub mod types;
