//! # Core Configuration Module
//!
//! Provides configuration management for the library core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all host capabilities and settings the core needs. It
//! enforces fail-fast validation so missing bridges surface at startup rather
//! than on the first artist load.
//!
//! ## Required Dependencies
//!
//! - `MediaIndex` - Required for artist queries
//! - `SettingsStore` - Required for the sort-order preference
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `WorkerExecutor` - Background loading (desktop default: Tokio worker)
//!
//! When the `desktop-shims` feature is enabled and the builder runs inside a
//! Tokio runtime, a `TokioWorkerExecutor` is injected if none is provided.
//! Without a worker, loads run on the caller's task.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .media_index(Arc::new(MyMediaStoreIndex::new(resolver)))
//!     .settings_store(Arc::new(MySettingsStore))
//!     .unknown_artist("<unknown>")
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all required dependencies and provides actionable error
//! messages when capabilities are missing:
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // This will panic with an actionable error message
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required bridges");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{MediaIndex, SettingsStore, WorkerExecutor};
use std::sync::Arc;

/// Name given to the default desktop worker
pub const DEFAULT_WORKER_NAME: &str = "core-library-loader";

/// Core configuration for the library core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Media index queried for artists (required)
    pub media_index: Arc<dyn MediaIndex>,

    /// User preferences storage (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Worker that loads run on (optional)
    pub worker_executor: Option<Arc<dyn WorkerExecutor>>,

    /// Library behaviour settings
    pub library: LibrarySettings,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("media_index", &"MediaIndex { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field(
                "worker_executor",
                &self
                    .worker_executor
                    .as_ref()
                    .map(|_| "WorkerExecutor { ... }"),
            )
            .field("library", &self.library)
            .finish()
    }
}

/// Settings for artist loading and sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySettings {
    /// Placeholder artist name filtered out of every list.
    ///
    /// `None` keeps the media index's own placeholder.
    pub unknown_artist: Option<String>,

    /// Compare digit runs by numeric value when sorting names
    pub numeric_collation: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            unknown_artist: None,
            numeric_collation: true,
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The unknown-artist placeholder, when set, is not blank
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.library.unknown_artist {
            if name.trim().is_empty() {
                return Err(Error::Config(
                    "Unknown artist placeholder cannot be blank. \
                     Leave it unset to use the media index default."
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn media_index_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaIndex".to_string(),
        message: "MediaIndex implementation is required for artist queries. \
                 Android: inject a MediaStore-backed index. \
                 Desktop: use core_library::adapters::SqliteMediaIndex."
            .to_string(),
    }
}

fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for user preferences. \
                 Desktop: use bridge_desktop::SqliteSettingsStore. \
                 Mobile: inject platform-native settings (SharedPreferences/UserDefaults)."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_worker_executor() -> Option<Arc<dyn WorkerExecutor>> {
    use bridge_desktop::TokioWorkerExecutor;

    match TokioWorkerExecutor::new(DEFAULT_WORKER_NAME) {
        Ok(executor) => {
            let executor: Arc<dyn WorkerExecutor> = Arc::new(executor);
            Some(executor)
        }
        Err(e) => {
            tracing::debug!(error = %e, "No default worker, loads will run inline");
            None
        }
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_worker_executor() -> Option<Arc<dyn WorkerExecutor>> {
    None
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    media_index: Option<Arc<dyn MediaIndex>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    worker_executor: Option<Arc<dyn WorkerExecutor>>,
    library: LibrarySettings,
}

impl CoreConfigBuilder {
    /// Sets the media index implementation (required).
    pub fn media_index(mut self, index: Arc<dyn MediaIndex>) -> Self {
        self.media_index = Some(index);
        self
    }

    /// Sets the settings store implementation (required).
    ///
    /// The sort-order preference is read from and written to this store.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the worker executor implementation (optional).
    pub fn worker_executor(mut self, executor: Arc<dyn WorkerExecutor>) -> Self {
        self.worker_executor = Some(executor);
        self
    }

    /// Overrides the placeholder artist name that is filtered out.
    pub fn unknown_artist(mut self, name: impl Into<String>) -> Self {
        self.library.unknown_artist = Some(name.into());
        self
    }

    /// Enables or disables numeric collation of names.
    ///
    /// Default: true
    pub fn numeric_collation(mut self, enabled: bool) -> Self {
        self.library.numeric_collation = enabled;
        self
    }

    /// Sets all library settings at once.
    pub fn library(mut self, library: LibrarySettings) -> Self {
        self.library = library;
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - Required bridges are missing (MediaIndex, SettingsStore)
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let media_index = self.media_index.ok_or_else(media_index_missing_error)?;
        let settings_store = self
            .settings_store
            .ok_or_else(settings_store_missing_error)?;

        let worker_executor = self
            .worker_executor
            .or_else(provide_default_worker_executor);

        let config = CoreConfig {
            media_index,
            settings_store,
            worker_executor,
            library: self.library,
        };

        config.validate()?;

        Ok(config)
    }
}
