//! Artist sort-order keys
//!
//! Each key doubles as the ordering clause handed to the media index, so the
//! string form must stay stable: it is what the preference store persists.

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Orderings offered on the artist screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArtistSortOrder {
    /// A to Z by name
    #[default]
    NameAscending,
    /// Z to A by name
    NameDescending,
    /// Artists with the most tracks first
    MostTracks,
    /// Artists with the most albums first
    MostAlbums,
}

impl ArtistSortOrder {
    pub const ALL: [ArtistSortOrder; 4] = [
        ArtistSortOrder::NameAscending,
        ArtistSortOrder::NameDescending,
        ArtistSortOrder::MostTracks,
        ArtistSortOrder::MostAlbums,
    ];

    /// Persisted key, also used as the index ordering clause
    pub fn key(self) -> &'static str {
        match self {
            ArtistSortOrder::NameAscending => "artist_key",
            ArtistSortOrder::NameDescending => "artist_key DESC",
            ArtistSortOrder::MostTracks => "number_of_tracks DESC",
            ArtistSortOrder::MostAlbums => "number_of_albums DESC",
        }
    }

    /// Name orderings are re-sorted with locale collation after loading;
    /// the index's own order is trusted for the numeric ones.
    pub fn is_name_based(self) -> bool {
        matches!(
            self,
            ArtistSortOrder::NameAscending | ArtistSortOrder::NameDescending
        )
    }

    pub fn direction(self) -> SortDirection {
        match self {
            ArtistSortOrder::NameAscending => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

impl fmt::Display for ArtistSortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ArtistSortOrder {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|order| order.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LibraryError::InvalidInput {
                field: "artist_sort_order".to_string(),
                message: format!("unknown sort order key '{}'", s),
            })
    }
}

impl TryFrom<String> for ArtistSortOrder {
    type Error = LibraryError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ArtistSortOrder> for String {
    fn from(order: ArtistSortOrder) -> Self {
        order.key().to_string()
    }
}
