//! Media Index Abstraction
//!
//! Provides a platform-agnostic trait for querying the device's index of audio
//! metadata (artists, albums, tracks):
//! - Android: `MediaStore` through `ContentResolver.query`
//! - Desktop: SQLite via sqlx (see `core-library::adapters`)
//!
//! ## Design
//!
//! Queries mirror the content-provider shape: a collection URI, a column
//! projection, an optional selection with positional arguments, and an
//! ordering clause. Results come back as a forward-only [`IndexCursor`] whose
//! columns are addressed by position in the projection. An index that cannot
//! serve the query at all answers `Ok(None)` instead of failing.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::media_index::{CursorGuard, IndexQuery, MediaIndex, uris};
//!
//! let query = IndexQuery::new(uris::EXTERNAL_ARTISTS, &["_id", "artist"])
//!     .with_sort_order("artist_key");
//!
//! if let Some(cursor) = index.query(&query).await? {
//!     let mut cursor = CursorGuard::new(cursor);
//!     while cursor.move_to_next()? {
//!         let id = cursor.get_i64(0)?;
//!         let name = cursor.get_string(1)?;
//!     }
//! } // cursor closed here
//! ```

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Well-known collection URIs.
pub mod uris {
    /// Artists on external storage.
    pub const EXTERNAL_ARTISTS: &str = "content://media/external/audio/artists";
}

// =============================================================================
// Values
// =============================================================================

/// Represents an index value that can be null, integer, real, text, or blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl QueryValue {
    /// Convert to i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to &str if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            QueryValue::Null => "null",
            QueryValue::Integer(_) => "integer",
            QueryValue::Real(_) => "real",
            QueryValue::Text(_) => "text",
            QueryValue::Blob(_) => "blob",
        }
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

// =============================================================================
// Query
// =============================================================================

/// A single query against the media index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    /// Collection to query
    pub uri: String,
    /// Requested columns; cursor positions follow this order
    pub projection: Vec<String>,
    /// Filter clause with `?` placeholders, `None` for all rows
    pub selection: Option<String>,
    /// Positional arguments for `selection`
    pub selection_args: Vec<QueryValue>,
    /// Ordering clause, `None` for the index default
    pub sort_order: Option<String>,
}

impl IndexQuery {
    /// Query all rows of `uri` with the given projection
    pub fn new(uri: impl Into<String>, projection: &[&str]) -> Self {
        Self {
            uri: uri.into(),
            projection: projection.iter().map(|c| c.to_string()).collect(),
            selection: None,
            selection_args: Vec::new(),
            sort_order: None,
        }
    }

    /// Restrict rows with a selection clause
    pub fn with_selection(mut self, selection: impl Into<String>, args: Vec<QueryValue>) -> Self {
        self.selection = Some(selection.into());
        self.selection_args = args;
        self
    }

    /// Request an ordering
    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Forward-only cursor over query results
///
/// A fresh cursor is positioned before the first row; call
/// [`move_to_next`](IndexCursor::move_to_next) before reading. Columns are
/// addressed by their position in the query's projection.
pub trait IndexCursor: Send {
    /// Number of rows in the result set
    fn count(&self) -> usize;

    /// Advance to the next row. Returns `false` once past the last row.
    fn move_to_next(&mut self) -> Result<bool>;

    /// Raw value at `column` of the current row
    fn value(&self, column: usize) -> Result<&QueryValue>;

    /// Release the underlying resource. Must be safe to call more than once.
    fn close(&mut self);

    /// Whether [`close`](IndexCursor::close) has been called
    fn is_closed(&self) -> bool;

    /// Read an integer column
    fn get_i64(&self, column: usize) -> Result<i64> {
        let value = self.value(column)?;
        value.as_i64().ok_or_else(|| BridgeError::Decode {
            column,
            message: format!("expected integer, found {}", value.type_name()),
        })
    }

    /// Read an integer column that must fit in 32 bits
    fn get_i32(&self, column: usize) -> Result<i32> {
        let value = self.get_i64(column)?;
        i32::try_from(value).map_err(|_| BridgeError::Decode {
            column,
            message: format!("integer {} out of range for i32", value),
        })
    }

    /// Read a text column; `None` when the column holds null
    fn get_string(&self, column: usize) -> Result<Option<String>> {
        match self.value(column)? {
            QueryValue::Null => Ok(None),
            QueryValue::Text(s) => Ok(Some(s.clone())),
            other => Err(BridgeError::Decode {
                column,
                message: format!("expected text, found {}", other.type_name()),
            }),
        }
    }
}

/// In-memory cursor over materialized rows
#[derive(Debug, Default)]
pub struct RowsCursor {
    rows: Vec<Vec<QueryValue>>,
    position: Option<usize>,
    closed: bool,
}

impl RowsCursor {
    pub fn new(rows: Vec<Vec<QueryValue>>) -> Self {
        Self {
            rows,
            position: None,
            closed: false,
        }
    }
}

impl IndexCursor for RowsCursor {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn move_to_next(&mut self) -> Result<bool> {
        if self.closed {
            return Err(BridgeError::OperationFailed(
                "Cursor already closed".to_string(),
            ));
        }

        let next = self.position.map_or(0, |p| p + 1);
        if next < self.rows.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            self.position = Some(self.rows.len());
            Ok(false)
        }
    }

    fn value(&self, column: usize) -> Result<&QueryValue> {
        let row = self
            .position
            .and_then(|p| self.rows.get(p))
            .ok_or_else(|| {
                BridgeError::OperationFailed("Cursor is not positioned on a row".to_string())
            })?;

        row.get(column).ok_or_else(|| BridgeError::Decode {
            column,
            message: format!("row has only {} columns", row.len()),
        })
    }

    fn close(&mut self) {
        self.closed = true;
        self.rows.clear();
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Scoped cursor ownership
///
/// Closes the wrapped cursor when dropped, so every exit path (including `?`
/// returns in the middle of iteration) releases it exactly once.
pub struct CursorGuard {
    cursor: Box<dyn IndexCursor>,
}

impl CursorGuard {
    pub fn new(cursor: Box<dyn IndexCursor>) -> Self {
        Self { cursor }
    }
}

impl Deref for CursorGuard {
    type Target = dyn IndexCursor;

    fn deref(&self) -> &Self::Target {
        self.cursor.as_ref()
    }
}

impl DerefMut for CursorGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cursor.as_mut()
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        if !self.cursor.is_closed() {
            self.cursor.close();
        }
    }
}

// =============================================================================
// Index Trait
// =============================================================================

/// Media index trait
///
/// # Returns
///
/// - `Ok(Some(cursor))` when the query ran (the cursor may be empty)
/// - `Ok(None)` when the index is unavailable and produced no cursor
/// - `Err` when the index rejected the query
#[async_trait::async_trait]
pub trait MediaIndex: Send + Sync {
    async fn query(&self, query: &IndexQuery) -> Result<Option<Box<dyn IndexCursor>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn artist_row(id: i64, name: &str) -> Vec<QueryValue> {
        vec![QueryValue::Integer(id), QueryValue::from(name)]
    }

    struct CountingCursor {
        inner: RowsCursor,
        closes: Arc<AtomicUsize>,
    }

    impl IndexCursor for CountingCursor {
        fn count(&self) -> usize {
            self.inner.count()
        }

        fn move_to_next(&mut self) -> Result<bool> {
            self.inner.move_to_next()
        }

        fn value(&self, column: usize) -> Result<&QueryValue> {
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

    #[test]
    fn test_query_builder() {
        let query = IndexQuery::new(uris::EXTERNAL_ARTISTS, &["_id", "artist"])
            .with_sort_order("artist_key DESC");

        assert_eq!(query.projection, vec!["_id", "artist"]);
        assert_eq!(query.selection, None);
        assert!(query.selection_args.is_empty());
        assert_eq!(query.sort_order.as_deref(), Some("artist_key DESC"));
    }

    #[test]
    fn test_rows_cursor_iteration() {
        let mut cursor = RowsCursor::new(vec![artist_row(1, "Abba"), artist_row(2, "Beck")]);
        assert_eq!(cursor.count(), 2);

        assert!(cursor.move_to_next().unwrap());
        assert_eq!(cursor.get_i64(0).unwrap(), 1);
        assert_eq!(cursor.get_string(1).unwrap().as_deref(), Some("Abba"));

        assert!(cursor.move_to_next().unwrap());
        assert_eq!(cursor.get_i64(0).unwrap(), 2);

        assert!(!cursor.move_to_next().unwrap());
        assert!(!cursor.move_to_next().unwrap());
    }

    #[test]
    fn test_read_before_first_row_fails() {
        let cursor = RowsCursor::new(vec![artist_row(1, "Abba")]);
        assert!(cursor.get_i64(0).is_err());
    }

    #[test]
    fn test_decode_errors_carry_column() {
        let mut cursor = RowsCursor::new(vec![vec![
            QueryValue::from("not a number"),
            QueryValue::Integer(7),
        ]]);
        cursor.move_to_next().unwrap();

        assert!(matches!(
            cursor.get_i64(0),
            Err(BridgeError::Decode { column: 0, .. })
        ));
        assert!(matches!(
            cursor.get_string(1),
            Err(BridgeError::Decode { column: 1, .. })
        ));
        assert!(matches!(
            cursor.get_i64(5),
            Err(BridgeError::Decode { column: 5, .. })
        ));
    }

    #[test]
    fn test_i32_range_checked() {
        let mut cursor = RowsCursor::new(vec![vec![
            QueryValue::Integer(12),
            QueryValue::Integer(i64::from(i32::MAX) + 1),
        ]]);
        cursor.move_to_next().unwrap();

        assert_eq!(cursor.get_i32(0).unwrap(), 12);
        assert!(matches!(
            cursor.get_i32(1),
            Err(BridgeError::Decode { column: 1, .. })
        ));
    }

    #[test]
    fn test_null_text_is_none() {
        let mut cursor = RowsCursor::new(vec![vec![QueryValue::Integer(1), QueryValue::Null]]);
        cursor.move_to_next().unwrap();
        assert_eq!(cursor.get_string(1).unwrap(), None);
    }

    #[test]
    fn test_guard_closes_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let cursor = CountingCursor {
            inner: RowsCursor::new(vec![artist_row(1, "Abba")]),
            closes: Arc::clone(&closes),
        };

        {
            let mut guard = CursorGuard::new(Box::new(cursor));
            assert!(guard.move_to_next().unwrap());
        }

        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_skips_already_closed_cursor() {
        let closes = Arc::new(AtomicUsize::new(0));
        let cursor = CountingCursor {
            inner: RowsCursor::new(vec![]),
            closes: Arc::clone(&closes),
        };

        {
            let mut guard = CursorGuard::new(Box::new(cursor));
            guard.close();
        }

        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closed_cursor_rejects_iteration() {
        let mut cursor = RowsCursor::new(vec![artist_row(1, "Abba")]);
        cursor.close();
        assert!(cursor.is_closed());
        assert!(cursor.move_to_next().is_err());
    }
}
