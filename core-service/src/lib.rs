//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (media index,
//! settings, background worker) into the shared Rust core and exposes the
//! artist list to the UI layer. Desktop apps typically enable the
//! `desktop-shims` feature (which depends on `bridge-desktop`) and start from
//! [`bootstrap_desktop`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::WorkerExecutor;
use core_library::loader::ArtistLoaderConfig;
use core_library::{
    ArtistListLoader, ArtistSortOrder, ArtistSummary, IcuLocaleSort, SettingsSortOrderProvider,
    SortOrderProvider,
};
use core_runtime::config::CoreConfig;
use tracing::{debug, info};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    loader: ArtistListLoader,
    preferences: Arc<SettingsSortOrderProvider>,
    sorter: Arc<IcuLocaleSort>,
    worker: Option<Arc<dyn WorkerExecutor>>,
}

impl CoreService {
    /// Create a new service from a validated configuration.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let preferences = Arc::new(SettingsSortOrderProvider::new(Arc::clone(
            &config.settings_store,
        )));
        let sorter =
            Arc::new(IcuLocaleSort::new().with_numeric_ordering(config.library.numeric_collation));

        let mut loader_config = ArtistLoaderConfig::default();
        if let Some(name) = config.library.unknown_artist.clone() {
            loader_config.unknown_artist = name;
        }

        let loader = ArtistListLoader::new(
            Arc::clone(&config.media_index),
            preferences.clone(),
            sorter.clone(),
        )
        .with_config(loader_config);

        info!(
            background_worker = config.worker_executor.is_some(),
            unknown_artist = %loader.config().unknown_artist,
            "Core service initialized"
        );

        Ok(Self {
            loader,
            preferences,
            sorter,
            worker: config.worker_executor,
        })
    }

    /// Load the artist list, on the background worker when one is configured.
    pub async fn artists(&self) -> Result<Vec<ArtistSummary>> {
        let artists = match &self.worker {
            Some(worker) => self.loader.load_on(worker.as_ref()).await?,
            None => self.loader.load().await?,
        };
        Ok(artists)
    }

    /// Current artist sort order
    pub async fn artist_sort_order(&self) -> Result<ArtistSortOrder> {
        Ok(self.preferences.artist_sort_order().await?)
    }

    /// Persist a new artist sort order. The next [`artists`](Self::artists)
    /// call uses it.
    pub async fn set_artist_sort_order(&self, order: ArtistSortOrder) -> Result<()> {
        self.preferences.set_artist_sort_order(order).await?;
        debug!(sort_order = %order, "Artist sort order changed");
        Ok(())
    }

    /// Section header an artist is listed under in name orderings.
    pub fn section_label(&self, name: &str) -> Result<String> {
        Ok(self.sorter.section_label(name)?)
    }

    /// The underlying loader
    pub fn loader(&self) -> &ArtistListLoader {
        &self.loader
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Opens the SQLite media index at `media_db_url` and the settings database
/// at `settings_path`; the background worker is created on the current
/// Tokio runtime.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_service::bootstrap_desktop;
///
/// let core = bootstrap_desktop("sqlite://media.db", "settings.db".into()).await?;
/// let artists = core.artists().await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap_desktop(
    media_db_url: &str,
    settings_path: std::path::PathBuf,
) -> Result<CoreService> {
    use bridge_desktop::SqliteSettingsStore;
    use core_library::adapters::SqliteMediaIndex;

    let media_index = SqliteMediaIndex::new(media_db_url).await?;
    let settings_store = SqliteSettingsStore::new(settings_path).await?;

    let config = CoreConfig::builder()
        .media_index(Arc::new(media_index))
        .settings_store(Arc::new(settings_store))
        .build()?;

    CoreService::new(config)
}
