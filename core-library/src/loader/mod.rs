//! List loaders for the library screens
//!
//! A loader owns one query shape. It runs the query, decodes the cursor into
//! domain models and applies the ordering the user asked for. Loaders run on
//! a host-supplied [`WorkerExecutor`](bridge_traits::background::WorkerExecutor)
//! through `load_on`, or inline through `load`.

pub mod artist;

pub use artist::{artist_query, ArtistListLoader, ArtistLoaderConfig, ARTIST_PROJECTION};
