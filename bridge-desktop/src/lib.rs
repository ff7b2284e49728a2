//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `WorkerExecutor` using a dedicated Tokio task fed by a channel
//! - `SettingsStore` using a SQLite-backed key-value table
//!
//! The desktop media index lives in `core-library::adapters` next to the
//! schema it owns.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{SqliteSettingsStore, TokioWorkerExecutor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let worker = TokioWorkerExecutor::new("artist-loader").unwrap();
//!     let settings = SqliteSettingsStore::in_memory().await.unwrap();
//!
//!     // Hand both to CoreConfig::builder()
//! }
//! ```

mod background;
mod settings;

pub use background::TokioWorkerExecutor;
pub use settings::SqliteSettingsStore;
