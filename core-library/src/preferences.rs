//! Sort-order preference lookup

use crate::error::Result;
use crate::sort_order::ArtistSortOrder;
use async_trait::async_trait;
use bridge_traits::storage::SettingsStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Settings key holding the artist sort order
pub const ARTIST_SORT_ORDER_KEY: &str = "artist_sort_order";

/// Source of the user's requested artist ordering
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SortOrderProvider: Send + Sync {
    /// Current artist sort order. Implementations default rather than fail
    /// when nothing has been stored yet.
    async fn artist_sort_order(&self) -> Result<ArtistSortOrder>;
}

/// [`SortOrderProvider`] backed by a host [`SettingsStore`]
pub struct SettingsSortOrderProvider {
    store: Arc<dyn SettingsStore>,
}

impl SettingsSortOrderProvider {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Persist a new artist sort order
    pub async fn set_artist_sort_order(&self, order: ArtistSortOrder) -> Result<()> {
        self.store
            .set_string(ARTIST_SORT_ORDER_KEY, order.key())
            .await?;
        debug!(sort_order = %order, "Updated artist sort order");
        Ok(())
    }
}

#[async_trait]
impl SortOrderProvider for SettingsSortOrderProvider {
    async fn artist_sort_order(&self) -> Result<ArtistSortOrder> {
        let Some(stored) = self.store.get_string(ARTIST_SORT_ORDER_KEY).await? else {
            return Ok(ArtistSortOrder::default());
        };

        match stored.parse() {
            Ok(order) => Ok(order),
            Err(e) => {
                warn!(stored = %stored, error = %e, "Ignoring invalid artist sort order");
                Ok(ArtistSortOrder::default())
            }
        }
    }
}
