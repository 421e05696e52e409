//! Client-side list state and derivation.
//!
//! # Modules
//!
//! - `store`: canonical/working lists with delete and restore
//! - `filter`: name/city query predicate and render-time view derivation
//! - `sort`: sort modes and the stable sort engine

pub mod filter;
pub mod sort;
pub mod store;

pub use filter::{derive_view, match_range, matches, Query};
pub use sort::{sort_listings, SortMode};
pub use store::{delete_listing, restore_listings, Directory};
