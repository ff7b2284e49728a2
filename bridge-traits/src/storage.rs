//! Preference Storage
//!
//! Key-value storage for user preferences such as the artist sort order.

use async_trait::async_trait;

use crate::error::Result;

/// Settings store trait
///
/// Persists user preferences across restarts:
/// - **Android**: SharedPreferences / DataStore
/// - **iOS**: UserDefaults
/// - **Desktop**: SQLite-backed key-value table
///
/// Values are stored as strings; typed accessors live with the callers that
/// know what a key means.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn save_preference(store: &dyn SettingsStore) -> Result<()> {
///     store.set_string("artist_sort_order", "artist_key DESC").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;
}
