//! Native SQLite Media Index
//!
//! Implements the `MediaIndex` trait over a local `artists` table using `sqlx`
//! with the native SQLite driver. Desktop hosts and tests use it in place of
//! the platform media store.
//!
//! ## Features
//!
//! - Column whitelist for projections and ordering clauses
//! - Pass-through selections with positional arguments
//! - WAL mode for file-backed databases
//! - An `Ok(None)` answer once the pool has been closed

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::media_index::{uris, IndexCursor, IndexQuery, MediaIndex, QueryValue, RowsCursor};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info, warn};

const CREATE_ARTISTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS artists (
        _id INTEGER PRIMARY KEY,
        artist TEXT,
        artist_key TEXT NOT NULL,
        number_of_albums INTEGER NOT NULL DEFAULT 0,
        number_of_tracks INTEGER NOT NULL DEFAULT 0
    )
"#;

/// Columns a query may project or order by
const ARTIST_COLUMNS: [&str; 5] = [
    "_id",
    "artist",
    "artist_key",
    "number_of_albums",
    "number_of_tracks",
];

/// SQLite implementation of [`MediaIndex`]
pub struct SqliteMediaIndex {
    pool: Pool<Sqlite>,
}

impl SqliteMediaIndex {
    /// Open (or create) an index at `database_url`
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::DatabaseError` if the URL is invalid, the pool
    /// cannot be created or the schema cannot be applied.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!(database_url = %database_url, "Opening SQLite media index");

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| BridgeError::DatabaseError(format!("Invalid database URL: {}", e)))?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create connection pool");
                BridgeError::DatabaseError(format!("Connection pool creation failed: {}", e))
            })?;

        Self::from_pool(pool).await
    }

    /// Create an in-memory index (for testing)
    pub async fn in_memory() -> Result<Self> {
        // One long-lived connection, otherwise each connection sees its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Connection failed: {}", e)))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the `artists` table if needed
    pub async fn from_pool(pool: Pool<Sqlite>) -> Result<Self> {
        sqlx::query(CREATE_ARTISTS_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Schema setup failed: {}", e)))?;

        debug!("SQLite media index ready");
        Ok(Self { pool })
    }

    /// Insert or replace an artist row
    ///
    /// `name: None` stores a row without artist metadata.
    pub async fn insert_artist(
        &self,
        id: i64,
        name: Option<&str>,
        album_count: u32,
        track_count: u32,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO artists (_id, artist, artist_key, number_of_albums, number_of_tracks)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(_id) DO UPDATE SET
                artist = excluded.artist,
                artist_key = excluded.artist_key,
                number_of_albums = excluded.number_of_albums,
                number_of_tracks = excluded.number_of_tracks
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(artist_key(name.unwrap_or_default()))
        .bind(i64::from(album_count))
        .bind(i64::from(track_count))
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::DatabaseError(format!("Insert failed: {}", e)))?;

        Ok(())
    }

    /// Close the pool. Later queries answer `Ok(None)`.
    pub async fn close(&self) {
        info!("Closing SQLite media index");
        self.pool.close().await;
    }

    /// Convert a sqlx row to positional values
    fn row_to_values(row: &SqliteRow) -> Vec<QueryValue> {
        (0..row.len())
            .map(|i| {
                if let Ok(v) = row.try_get::<Option<i64>, _>(i) {
                    v.map(QueryValue::Integer).unwrap_or(QueryValue::Null)
                } else if let Ok(v) = row.try_get::<Option<f64>, _>(i) {
                    v.map(QueryValue::Real).unwrap_or(QueryValue::Null)
                } else if let Ok(v) = row.try_get::<Option<String>, _>(i) {
                    v.map(QueryValue::Text).unwrap_or(QueryValue::Null)
                } else if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(i) {
                    v.map(QueryValue::Blob).unwrap_or(QueryValue::Null)
                } else {
                    QueryValue::Null
                }
            })
            .collect()
    }

    /// Convert QueryValue parameters to sqlx-compatible format
    fn bind_params<'q>(
        query: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        params: &'q [QueryValue],
    ) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        let mut query = query;
        for param in params {
            query = match param {
                QueryValue::Null => query.bind(None::<i64>),
                QueryValue::Integer(i) => query.bind(i),
                QueryValue::Real(r) => query.bind(r),
                QueryValue::Text(s) => query.bind(s.as_str()),
                QueryValue::Blob(b) => query.bind(b.as_slice()),
            };
        }
        query
    }

    fn build_sql(query: &IndexQuery) -> Result<String> {
        if query.uri != uris::EXTERNAL_ARTISTS {
            return Err(BridgeError::OperationFailed(format!(
                "Unknown collection: {}",
                query.uri
            )));
        }

        if query.projection.is_empty() {
            return Err(BridgeError::OperationFailed(
                "Projection must name at least one column".to_string(),
            ));
        }
        for column in &query.projection {
            check_column(column)?;
        }

        let mut sql = format!("SELECT {} FROM artists", query.projection.join(", "));

        if let Some(selection) = query.selection.as_deref().filter(|s| !s.trim().is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(selection);
        }

        if let Some(sort_order) = query.sort_order.as_deref().filter(|s| !s.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_clause(sort_order)?);
        }

        Ok(sql)
    }
}

/// Grouping key stored alongside each name; leading articles and punctuation
/// are ignored and case is folded.
pub fn artist_key(name: &str) -> String {
    let folded = name.trim().to_lowercase();
    let stripped = folded
        .strip_prefix("the ")
        .map(str::trim_start)
        .unwrap_or(&folded);

    stripped
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_column(column: &str) -> Result<()> {
    if ARTIST_COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(BridgeError::OperationFailed(format!(
            "Unknown column: {}",
            column
        )))
    }
}

/// Validate and normalize `column [ASC|DESC], ...`
fn order_clause(sort_order: &str) -> Result<String> {
    sort_order
        .split(',')
        .map(|term| {
            let mut parts = term.split_whitespace();
            let column = parts.next().ok_or_else(|| {
                BridgeError::OperationFailed(format!("Invalid sort order: {}", sort_order))
            })?;
            check_column(column)?;

            let direction = match parts.next() {
                None => "ASC",
                Some(d) if d.eq_ignore_ascii_case("asc") => "ASC",
                Some(d) if d.eq_ignore_ascii_case("desc") => "DESC",
                Some(_) => {
                    return Err(BridgeError::OperationFailed(format!(
                        "Invalid sort order: {}",
                        sort_order
                    )))
                }
            };

            if parts.next().is_some() {
                return Err(BridgeError::OperationFailed(format!(
                    "Invalid sort order: {}",
                    sort_order
                )));
            }

            Ok(format!("{} {}", column, direction))
        })
        .collect::<Result<Vec<_>>>()
        .map(|terms| terms.join(", "))
}

#[async_trait]
impl MediaIndex for SqliteMediaIndex {
    async fn query(&self, query: &IndexQuery) -> Result<Option<Box<dyn IndexCursor>>> {
        if self.pool.is_closed() {
            warn!(uri = %query.uri, "Media index is closed");
            return Ok(None);
        }

        let sql = Self::build_sql(query)?;
        debug!(sql = %sql, param_count = query.selection_args.len(), "Executing index query");

        let sqlx_query = Self::bind_params(sqlx::query(&sql), &query.selection_args);
        let rows = sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Query failed: {}", e)))?;

        let values: Vec<Vec<QueryValue>> = rows.iter().map(Self::row_to_values).collect();
        debug!(row_count = values.len(), "Index query executed");

        let cursor: Box<dyn IndexCursor> = Box::new(RowsCursor::new(values));
        Ok(Some(cursor))
    }
}
