//! Artist list loader

use std::sync::Arc;

use bridge_traits::background::{run_on_worker, WorkerExecutor};
use bridge_traits::error::BridgeError;
use bridge_traits::media_index::{uris, CursorGuard, IndexCursor, IndexQuery, MediaIndex};
use tracing::{debug, info_span, warn, Instrument};

use crate::collation::LocaleSort;
use crate::error::{LibraryError, Result};
use crate::models::{ArtistSummary, UNKNOWN_ARTIST};
use crate::preferences::SortOrderProvider;
use crate::sort_order::ArtistSortOrder;

/// Columns requested from the index, in decode order
pub const ARTIST_PROJECTION: [&str; 4] = ["_id", "artist", "number_of_albums", "number_of_tracks"];

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_ALBUMS: usize = 2;
const COL_TRACKS: usize = 3;

/// Query for the artists collection ordered by `order`
///
/// Requests [`ARTIST_PROJECTION`] with no selection.
pub fn artist_query(order: ArtistSortOrder) -> IndexQuery {
    IndexQuery::new(uris::EXTERNAL_ARTISTS, &ARTIST_PROJECTION).with_sort_order(order.key())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistLoaderConfig {
    /// Collection queried for artists
    pub uri: String,
    /// Placeholder name that is never returned
    pub unknown_artist: String,
}

impl Default for ArtistLoaderConfig {
    fn default() -> Self {
        Self {
            uri: uris::EXTERNAL_ARTISTS.to_string(),
            unknown_artist: UNKNOWN_ARTIST.to_string(),
        }
    }
}

/// Loads the artist list from a [`MediaIndex`]
///
/// Every load issues a single query ordered by the current sort-order
/// preference, drops the unknown-artist placeholder and, for the name
/// orderings, replaces the index's ordering with a locale-aware one.
///
/// The preference is read once per load and that value drives both the
/// query ordering and the decision to re-sort.
#[derive(Clone)]
pub struct ArtistListLoader {
    index: Arc<dyn MediaIndex>,
    sort_orders: Arc<dyn SortOrderProvider>,
    sorter: Arc<dyn LocaleSort>,
    config: ArtistLoaderConfig,
}

impl ArtistListLoader {
    pub fn new(
        index: Arc<dyn MediaIndex>,
        sort_orders: Arc<dyn SortOrderProvider>,
        sorter: Arc<dyn LocaleSort>,
    ) -> Self {
        Self {
            index,
            sort_orders,
            sorter,
            config: ArtistLoaderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ArtistLoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ArtistLoaderConfig {
        &self.config
    }

    /// Load the artist list on the current task
    pub async fn load(&self) -> Result<Vec<ArtistSummary>> {
        let span = info_span!("artist_loader.load", uri = %self.config.uri);
        self.load_inner().instrument(span).await
    }

    /// Load the artist list on `executor` and wait for the result
    pub async fn load_on(&self, executor: &dyn WorkerExecutor) -> Result<Vec<ArtistSummary>> {
        let loader = self.clone();
        run_on_worker(executor, async move { loader.load().await }).await?
    }

    async fn load_inner(&self) -> Result<Vec<ArtistSummary>> {
        let order = self.sort_orders.artist_sort_order().await?;

        let query = IndexQuery {
            uri: self.config.uri.clone(),
            ..artist_query(order)
        };

        let Some(cursor) = self.index.query(&query).await? else {
            warn!(sort_order = %order, "Media index unavailable, returning no artists");
            return Ok(Vec::new());
        };

        let artists = self.collect_rows(CursorGuard::new(cursor))?;

        if !order.is_name_based() {
            return Ok(artists);
        }

        let sorted = self.sorter.localize_sort(artists, order)?;
        debug!(sort_order = %order, count = sorted.len(), "Applied locale sort");
        Ok(sorted)
    }

    /// Drain the cursor; the guard closes it on return, including early
    /// returns on decode errors.
    fn collect_rows(&self, mut cursor: CursorGuard) -> Result<Vec<ArtistSummary>> {
        let mut artists = Vec::with_capacity(cursor.count());
        let mut skipped = 0usize;

        while cursor.move_to_next()? {
            match decode_row(&*cursor, &self.config.unknown_artist)? {
                Some(artist) => artists.push(artist),
                None => skipped += 1,
            }
        }

        debug!(rows = artists.len() + skipped, skipped, "Read artist rows");
        Ok(artists)
    }
}

fn decode_row(cursor: &dyn IndexCursor, unknown_artist: &str) -> Result<Option<ArtistSummary>> {
    let name = match cursor.get_string(COL_NAME)? {
        Some(name) if name != unknown_artist => name,
        _ => return Ok(None),
    };

    Ok(Some(ArtistSummary {
        id: cursor.get_i64(COL_ID)?,
        name,
        album_count: read_count(cursor, COL_ALBUMS)?,
        track_count: read_count(cursor, COL_TRACKS)?,
    }))
}

fn read_count(cursor: &dyn IndexCursor, column: usize) -> Result<u32> {
    let value = cursor.get_i32(column)?;
    u32::try_from(value).map_err(|_| {
        LibraryError::from(BridgeError::Decode {
            column,
            message: format!("negative count {}", value),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::{IcuLocaleSort, MockLocaleSort};
    use crate::preferences::MockSortOrderProvider;
    use async_trait::async_trait;
    use bridge_desktop::TokioWorkerExecutor;
    use bridge_traits::media_index::{QueryValue, RowsCursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const SENTINEL: &str = "Unknown Artist";

    fn row(id: i64, name: &str, albums: i64, tracks: i64) -> Vec<QueryValue> {
        vec![
            QueryValue::Integer(id),
            QueryValue::from(name),
            QueryValue::Integer(albums),
            QueryValue::Integer(tracks),
        ]
    }

    fn scenario_rows() -> Vec<Vec<QueryValue>> {
        vec![
            row(1, "Abba", 2, 20),
            row(2, SENTINEL, 0, 0),
            row(3, "Beck", 1, 10),
        ]
    }

    struct TrackedCursor {
        inner: RowsCursor,
        closes: Arc<AtomicUsize>,
    }

    impl IndexCursor for TrackedCursor {
        fn count(&self) -> usize {
            self.inner.count()
        }

        fn move_to_next(&mut self) -> bridge_traits::error::Result<bool> {
            self.inner.move_to_next()
        }

        fn value(&self, column: usize) -> bridge_traits::error::Result<&QueryValue> {
            self.inner.value(column)
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.inner.close();
        }

        fn is_closed(&self) -> bool {
            self.inner.is_closed()
        }
    }

    /// Index serving fixed rows, or no cursor at all when `rows` is `None`
    struct FakeIndex {
        rows: Option<Vec<Vec<QueryValue>>>,
        queries: Mutex<Vec<IndexQuery>>,
        closes: Arc<AtomicUsize>,
    }

    impl FakeIndex {
        fn new(rows: Option<Vec<Vec<QueryValue>>>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                queries: Mutex::new(Vec::new()),
                closes: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }

        fn queries(&self) -> Vec<IndexQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaIndex for FakeIndex {
        async fn query(
            &self,
            query: &IndexQuery,
        ) -> bridge_traits::error::Result<Option<Box<dyn IndexCursor>>> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.rows.clone().map(|rows| {
                Box::new(TrackedCursor {
                    inner: RowsCursor::new(rows),
                    closes: Arc::clone(&self.closes),
                }) as Box<dyn IndexCursor>
            }))
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl MediaIndex for FailingIndex {
        async fn query(
            &self,
            _query: &IndexQuery,
        ) -> bridge_traits::error::Result<Option<Box<dyn IndexCursor>>> {
            Err(BridgeError::OperationFailed("provider crashed".to_string()))
        }
    }

    struct FixedOrder(ArtistSortOrder);

    #[async_trait]
    impl SortOrderProvider for FixedOrder {
        async fn artist_sort_order(&self) -> Result<ArtistSortOrder> {
            Ok(self.0)
        }
    }

    fn loader(index: Arc<dyn MediaIndex>, order: ArtistSortOrder) -> ArtistListLoader {
        ArtistListLoader::new(index, Arc::new(FixedOrder(order)), Arc::new(IcuLocaleSort::new()))
            .with_config(ArtistLoaderConfig {
                unknown_artist: SENTINEL.to_string(),
                ..ArtistLoaderConfig::default()
            })
    }

    fn ids(artists: &[ArtistSummary]) -> Vec<i64> {
        artists.iter().map(|a| a.id).collect()
    }

    #[tokio::test]
    async fn test_non_name_order_keeps_index_order() {
        let index = FakeIndex::new(Some(scenario_rows()));
        let artists = loader(index.clone(), ArtistSortOrder::MostAlbums)
            .load()
            .await
            .unwrap();

        assert_eq!(
            artists,
            vec![
                ArtistSummary::new(1, "Abba", 2, 20),
                ArtistSummary::new(3, "Beck", 1, 10),
            ]
        );
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_name_descending_is_locale_sorted() {
        let index = FakeIndex::new(Some(scenario_rows()));
        let artists = loader(index.clone(), ArtistSortOrder::NameDescending)
            .load()
            .await
            .unwrap();

        assert_eq!(ids(&artists), vec![3, 1]);
        assert_eq!(artists[0].name, "Beck");
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_index_yields_empty_list() {
        let index = FakeIndex::new(None);
        let artists = loader(index.clone(), ArtistSortOrder::NameAscending)
            .load()
            .await
            .unwrap();

        assert!(artists.is_empty());
        assert_eq!(index.closes(), 0);
    }

    #[tokio::test]
    async fn test_empty_cursor_yields_empty_list() {
        let index = FakeIndex::new(Some(Vec::new()));
        let artists = loader(index.clone(), ArtistSortOrder::NameAscending)
            .load()
            .await
            .unwrap();

        assert!(artists.is_empty());
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_query_shape() {
        let index = FakeIndex::new(Some(Vec::new()));
        loader(index.clone(), ArtistSortOrder::MostTracks)
            .load()
            .await
            .unwrap();

        let queries = index.queries();
        assert_eq!(queries.len(), 1);

        let query = &queries[0];
        assert_eq!(query.uri, uris::EXTERNAL_ARTISTS);
        assert_eq!(query.projection, ARTIST_PROJECTION);
        assert_eq!(query.selection, None);
        assert!(query.selection_args.is_empty());
        assert_eq!(query.sort_order.as_deref(), Some("number_of_tracks DESC"));
    }

    #[tokio::test]
    async fn test_load_issues_artist_query() {
        let index = FakeIndex::new(Some(Vec::new()));
        loader(index.clone(), ArtistSortOrder::NameDescending)
            .load()
            .await
            .unwrap();

        assert_eq!(
            index.queries(),
            vec![artist_query(ArtistSortOrder::NameDescending)]
        );
    }

    #[tokio::test]
    async fn test_configured_uri_replaces_default_collection() {
        let index = FakeIndex::new(Some(Vec::new()));
        let loader = loader(index.clone(), ArtistSortOrder::MostAlbums).with_config(
            ArtistLoaderConfig {
                uri: "content://media/internal/audio/artists".to_string(),
                ..ArtistLoaderConfig::default()
            },
        );
        loader.load().await.unwrap();

        let query = &index.queries()[0];
        assert_eq!(query.uri, "content://media/internal/audio/artists");
        assert_eq!(query.projection, ARTIST_PROJECTION);
        assert_eq!(query.sort_order.as_deref(), Some("number_of_albums DESC"));
    }

    #[tokio::test]
    async fn test_sort_error_propagates_after_cursor_closed() {
        let mut sorter = MockLocaleSort::new();
        sorter
            .expect_localize_sort()
            .times(1)
            .returning(|_, _| Err(LibraryError::Collation("no collation data".to_string())));

        let index = FakeIndex::new(Some(scenario_rows()));
        let loader = ArtistListLoader::new(
            index.clone(),
            Arc::new(FixedOrder(ArtistSortOrder::NameAscending)),
            Arc::new(sorter),
        );

        let result = loader.load().await;

        assert!(matches!(
            result,
            Err(LibraryError::Collation(message)) if message == "no collation data"
        ));
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_every_sentinel_row_removed() {
        let index = FakeIndex::new(Some(vec![
            row(1, SENTINEL, 0, 4),
            row(2, "Muse", 7, 80),
            row(3, SENTINEL, 0, 2),
            row(4, "Air", 5, 50),
            row(5, SENTINEL, 1, 1),
        ]));

        let artists = loader(index, ArtistSortOrder::MostTracks)
            .load()
            .await
            .unwrap();

        assert_eq!(ids(&artists), vec![2, 4]);
        assert!(artists.iter().all(|a| a.name != SENTINEL));
    }

    #[tokio::test]
    async fn test_default_placeholder_and_null_names_skipped() {
        let index = FakeIndex::new(Some(vec![
            row(1, UNKNOWN_ARTIST, 1, 1),
            vec![
                QueryValue::Integer(2),
                QueryValue::Null,
                QueryValue::Integer(1),
                QueryValue::Integer(1),
            ],
            row(3, "Portishead", 3, 33),
        ]));

        let loader = ArtistListLoader::new(
            index,
            Arc::new(FixedOrder(ArtistSortOrder::MostAlbums)),
            Arc::new(IcuLocaleSort::new()),
        );
        let artists = loader.load().await.unwrap();

        assert_eq!(artists, vec![ArtistSummary::new(3, "Portishead", 3, 33)]);
    }

    #[tokio::test]
    async fn test_preference_read_once_and_result_comes_from_sorter() {
        let mut sort_orders = MockSortOrderProvider::new();
        sort_orders
            .expect_artist_sort_order()
            .times(1)
            .returning(|| Ok(ArtistSortOrder::NameAscending));

        let mut sorter = MockLocaleSort::new();
        sorter
            .expect_localize_sort()
            .withf(|items, order| items.len() == 2 && *order == ArtistSortOrder::NameAscending)
            .times(1)
            .returning(|items, _| Ok(items.into_iter().rev().collect()));

        let index = FakeIndex::new(Some(scenario_rows()));
        let loader = ArtistListLoader::new(index, Arc::new(sort_orders), Arc::new(sorter))
            .with_config(ArtistLoaderConfig {
                unknown_artist: SENTINEL.to_string(),
                ..ArtistLoaderConfig::default()
            });

        let artists = loader.load().await.unwrap();
        assert_eq!(ids(&artists), vec![3, 1]);
    }

    #[tokio::test]
    async fn test_sorter_not_consulted_for_count_orders() {
        for order in [ArtistSortOrder::MostTracks, ArtistSortOrder::MostAlbums] {
            let mut sorter = MockLocaleSort::new();
            sorter.expect_localize_sort().never();

            let index = FakeIndex::new(Some(vec![row(9, "Zaz", 1, 9), row(4, "Air", 9, 1)]));
            let loader = ArtistListLoader::new(index, Arc::new(FixedOrder(order)), Arc::new(sorter));

            let artists = loader.load().await.unwrap();
            assert_eq!(ids(&artists), vec![9, 4]);
        }
    }

    #[tokio::test]
    async fn test_name_sort_is_permutation_of_filtered_rows() {
        let index = FakeIndex::new(Some(vec![
            row(1, "Émilie Simon", 1, 12),
            row(2, "abba", 9, 90),
            row(3, SENTINEL, 0, 3),
            row(4, "2Pac", 4, 40),
            row(5, "Beck", 6, 60),
        ]));

        let artists = loader(index, ArtistSortOrder::NameAscending)
            .load()
            .await
            .unwrap();

        let mut sorted_ids = ids(&artists);
        sorted_ids.sort_unstable();
        assert_eq!(sorted_ids, vec![1, 2, 4, 5]);
        assert_eq!(ids(&artists), vec![4, 2, 5, 1]);
    }

    #[tokio::test]
    async fn test_repeated_loads_are_identical() {
        let index = FakeIndex::new(Some(scenario_rows()));
        let loader = loader(index.clone(), ArtistSortOrder::NameAscending);

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(index.closes(), 2);
    }

    #[tokio::test]
    async fn test_decode_error_propagates_and_closes_cursor() {
        let index = FakeIndex::new(Some(vec![
            row(1, "Abba", 2, 20),
            vec![
                QueryValue::Integer(2),
                QueryValue::from("Beck"),
                QueryValue::from("two"),
                QueryValue::Integer(10),
            ],
        ]));

        let result = loader(index.clone(), ArtistSortOrder::MostTracks).load().await;

        assert!(matches!(
            result,
            Err(LibraryError::Bridge(BridgeError::Decode { column: 2, .. }))
        ));
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_negative_count_rejected() {
        let index = FakeIndex::new(Some(vec![row(1, "Abba", -1, 20)]));
        let result = loader(index.clone(), ArtistSortOrder::MostTracks).load().await;

        assert!(matches!(
            result,
            Err(LibraryError::Bridge(BridgeError::Decode { column: 2, .. }))
        ));
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_index_error_propagates() {
        let loader = loader(Arc::new(FailingIndex), ArtistSortOrder::NameAscending);
        let result = loader.load().await;

        assert!(matches!(
            result,
            Err(LibraryError::Bridge(BridgeError::OperationFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_on_worker() {
        let executor = TokioWorkerExecutor::new("artist-loader").unwrap();
        let index = FakeIndex::new(Some(scenario_rows()));

        let artists = loader(index.clone(), ArtistSortOrder::MostAlbums)
            .load_on(&executor)
            .await
            .unwrap();

        assert_eq!(ids(&artists), vec![1, 3]);
        assert_eq!(index.closes(), 1);
    }

    #[tokio::test]
    async fn test_load_on_stopped_worker_fails() {
        let executor = TokioWorkerExecutor::new("artist-loader").unwrap();
        executor.shutdown();

        let index = FakeIndex::new(Some(scenario_rows()));
        let result = loader(index.clone(), ArtistSortOrder::MostAlbums)
            .load_on(&executor)
            .await;

        assert!(matches!(
            result,
            Err(LibraryError::Bridge(BridgeError::NotAvailable(_)))
        ));
        assert!(index.queries().is_empty());
    }
}
