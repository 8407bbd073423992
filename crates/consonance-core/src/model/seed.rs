use serde::{Deserialize, Serialize};

/// Number of top tags taken per seed artist unless configured otherwise.
pub const DEFAULT_TAG_LIMIT: usize = 5;

/// An artist identity as returned by a name-resolution service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistIdentity {
    /// Canonical artist name as reported by the resolver.
    pub name: String,

    /// `MusicBrainz` artist ID, when the resolver knows it.
    pub mbid: Option<String>,

    /// Profile URL at the resolving service.
    pub url: Option<String>,
}

impl ArtistIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mbid: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_mbid(mut self, mbid: impl Into<String>) -> Self {
        self.mbid = Some(mbid.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Whether two identities refer to the same artist.
    ///
    /// Names are compared case-insensitively; the `MusicBrainz` ID is not
    /// consulted because not every resolver result carries one.
    #[must_use]
    pub fn same_artist(&self, other: &Self) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
    }
}

/// A tag as handed over by a tag source, with its relevance rank
/// (0 = most relevant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTag {
    pub name: String,
    pub rank: u32,
}

impl SeedTag {
    #[must_use]
    pub fn new(name: impl Into<String>, rank: u32) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }
}

/// One of the artists the user supplied as the basis for a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedArtist {
    pub name: String,

    /// Tag names, most relevant first.
    pub tags: Vec<String>,
}

impl SeedArtist {
    #[must_use]
    pub fn new(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }

    /// Build a seed from ranked tags, keeping the `limit` most relevant.
    #[must_use]
    pub fn from_ranked_tags(name: impl Into<String>, mut tags: Vec<SeedTag>, limit: usize) -> Self {
        tags.sort_by_key(|tag| tag.rank);
        tags.truncate(limit);
        Self {
            name: name.into(),
            tags: tags.into_iter().map(|tag| tag.name).collect(),
        }
    }

    /// Whether the tag source returned nothing for this artist.
    #[must_use]
    pub fn has_no_tags(&self) -> bool {
        self.tags.iter().all(|tag| tag.trim().is_empty())
    }
}
