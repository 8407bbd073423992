//! I/O glue for consonance.
//!
//! Loads the artist catalog from CSV, talks to the external metadata
//! services (Last.fm for artist search and tags, Spotify for artist
//! images), and drives a recommendation request from three free-text
//! artist queries to a ranked, display-ready result list.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod recommend;
pub mod sources;

pub use catalog::{load_catalog, open_catalog, CatalogColumns};
pub use config::Config;
pub use error::{EtlError, EtlResult};
pub use recommend::{RecommendSettings, Recommender, SlotOutcome};
pub use sources::{ArtistResolver, ImageLookup, NoImages, TagSource};
