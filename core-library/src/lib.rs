//! # Library Access Module
//!
//! Loads the artist list shown by the library screens from the platform media
//! index.
//!
//! ## Overview
//!
//! This module provides:
//! - [`ArtistListLoader`](loader::ArtistListLoader): query, filter and sort
//! - Sort-order keys and the preference lookup that selects one
//! - Locale-aware sorting with section buckets for indexed lists
//! - A SQLite-backed media index for desktop hosts and tests

pub mod adapters;
pub mod collation;
pub mod error;
pub mod loader;
pub mod models;
pub mod preferences;
pub mod sort_order;

pub use collation::{IcuLocaleSort, LocaleSort};
pub use error::{LibraryError, Result};
pub use loader::{ArtistListLoader, ArtistLoaderConfig};
pub use models::ArtistSummary;
pub use preferences::{SettingsSortOrderProvider, SortOrderProvider};
pub use sort_order::{ArtistSortOrder, SortDirection};
