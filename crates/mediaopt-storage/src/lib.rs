//! mediaopt storage library
//!
//! Filesystem abstraction used by the optimizer coordinator: a backing store
//! (local disk or S3) reached through a [`StorageGateway`], and a local
//! scratch area where remote files are staged while they are optimized.
//!
//! # Key format
//!
//! Keys are relative paths inside a backend's root (`media/ab/cd/image.jpg`).
//! Keys must not contain `..` or a leading `/`. Validation is centralized in
//! the `keys` module so all backends agree on it.

pub mod factory;
pub mod gateway;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_gateway, create_scratch};
pub use gateway::{MediaStorage, StorageGateway};
#[cfg(feature = "storage-local")]
pub use local::LocalFilesystem;
pub use mediaopt_core::AdapterType;
#[cfg(feature = "storage-s3")]
pub use s3::S3Filesystem;
pub use traits::{ByteStream, Filesystem, ScratchFilesystem, StorageError, StorageResult};
