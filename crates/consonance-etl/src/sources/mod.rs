//! External metadata sources and the narrow traits the request flow
//! depends on.
//!
//! Each remote service is wrapped so that only plain domain values cross
//! the boundary: an [`ArtistIdentity`] from a name search, ranked
//! [`SeedTag`]s from a tag lookup, an image URL from an image lookup.

use async_trait::async_trait;

use consonance_core::model::{ArtistIdentity, SeedTag};

use crate::error::EtlResult;

pub mod lastfm;
pub mod resilience;
pub mod spotify;

pub use lastfm::LastFmClient;
pub use spotify::SpotifyClient;

/// Resolves free-text user input to at most one artist identity.
#[async_trait]
pub trait ArtistResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> EtlResult<Option<ArtistIdentity>>;
}

/// Supplies an artist's top tags, most relevant first.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Return at most `limit` tags. An artist without tags yields an empty
    /// list, not an error.
    async fn top_tags(&self, artist: &ArtistIdentity, limit: usize) -> EtlResult<Vec<SeedTag>>;
}

/// Looks up a display image for an artist name.
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn image_url(&self, name: &str) -> EtlResult<Option<String>>;
}

/// Image lookup that never finds anything; used when images are disabled
/// or no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

#[async_trait]
impl ImageLookup for NoImages {
    async fn image_url(&self, _name: &str) -> EtlResult<Option<String>> {
        Ok(None)
    }
}
