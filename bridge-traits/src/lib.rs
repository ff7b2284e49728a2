//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and platform-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Data access
//! - [`MediaIndex`](media_index::MediaIndex) - Queryable index of audio metadata
//!   returning positional cursors (MediaStore on Android, SQLite on desktop)
//! - [`SettingsStore`](storage::SettingsStore) - Key-value preferences storage
//!
//! ### Execution
//! - [`WorkerExecutor`](background::WorkerExecutor) - Dedicated background worker
//!   that runs loader jobs sequentially
//!
//! ### Utilities
//! - [`LoggerSink`](logger::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ In Progress |
//! | Android  | TBD                 | 📋 Planned |
//! | iOS      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Report an unavailable index as `Ok(None)` rather than an error
//! - Include error context (e.g., column positions, table names)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so that handles can be moved
//! onto the background worker.
//!
//! ## Examples
//!
//! ### Implementing MediaIndex
//!
//! ```ignore
//! use bridge_traits::media_index::{IndexCursor, IndexQuery, MediaIndex};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct ContentResolverIndex { /* JNI handles */ }
//!
//! #[async_trait]
//! impl MediaIndex for ContentResolverIndex {
//!     async fn query(&self, query: &IndexQuery) -> Result<Option<Box<dyn IndexCursor>>> {
//!         // Forward to ContentResolver.query(...)
//!         todo!()
//!     }
//! }
//! ```

pub mod background;
pub mod error;
pub mod logger;
pub mod media_index;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use background::{run_on_worker, WorkerExecutor, WorkerJob};
pub use logger::{LogEntry, LogLevel, LoggerSink};
pub use media_index::{CursorGuard, IndexCursor, IndexQuery, MediaIndex, QueryValue, RowsCursor};
pub use storage::SettingsStore;
