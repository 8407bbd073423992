pub mod catalog;
pub mod ranking;
pub mod seed;

pub use catalog::{CatalogEntry, RawCatalogRow};
pub use ranking::{RankedMatch, Recommendation};
pub use seed::{ArtistIdentity, SeedArtist, SeedTag, DEFAULT_TAG_LIMIT};
