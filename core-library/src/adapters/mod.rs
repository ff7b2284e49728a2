//! Media index adapter implementations
//!
//! Concrete implementations of the `MediaIndex` trait for hosts without a
//! platform media store.

#[cfg(not(target_arch = "wasm32"))]
pub mod sqlite_native;

#[cfg(not(target_arch = "wasm32"))]
pub use sqlite_native::SqliteMediaIndex;
