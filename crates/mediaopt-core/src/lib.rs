//! mediaopt core library
//!
//! Configuration and the storage adapter tag shared by the storage,
//! optimizer and CLI crates.

pub mod config;
pub mod constants;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use storage_types::AdapterType;
