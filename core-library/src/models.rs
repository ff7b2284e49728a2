//! Domain models for the library screens

use serde::{Deserialize, Serialize};

/// Placeholder name the media index uses for tracks without artist metadata.
pub const UNKNOWN_ARTIST: &str = "<unknown>";

/// One row of the artist list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistSummary {
    /// Identifier, unique per artist in the index
    pub id: i64,
    /// Display name
    pub name: String,
    /// Number of albums attributed to the artist
    pub album_count: u32,
    /// Number of tracks attributed to the artist
    pub track_count: u32,
}

impl ArtistSummary {
    pub fn new(id: i64, name: impl Into<String>, album_count: u32, track_count: u32) -> Self {
        Self {
            id,
            name: name.into(),
            album_count,
            track_count,
        }
    }
}
