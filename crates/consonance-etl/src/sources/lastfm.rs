//! Last.fm client: artist search and top tags.
//!
//! Artist search backs seed-name resolution; top tags are the folksonomy
//! labels a seed artist's preference is built from. Last.fm reports some
//! failures (unknown artist, rate limit) as an HTTP 200 carrying an error
//! object, so every response is checked for one before it is decoded.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use consonance_core::model::{ArtistIdentity, SeedTag};

use crate::config::Config;
use crate::error::{EtlError, EtlResult};
use crate::sources::resilience::{retry_transient, RateLimiter};
use crate::sources::{ArtistResolver, TagSource};

const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";
const SOURCE_NAME: &str = "Last.fm";

/// Last.fm error code for an unknown artist.
const ERROR_INVALID_PARAMETERS: u32 = 6;
/// Last.fm error code for an exceeded rate limit.
const ERROR_RATE_LIMIT: u32 = 29;
/// Codes Last.fm documents as temporary: operation failed, service
/// offline, temporary error.
const TRANSIENT_ERRORS: &[u32] = &[8, 11, 16];
/// Codes caused by the configured key: authentication failed, invalid
/// key, suspended key.
const KEY_ERRORS: &[u32] = &[4, 10, 26];

// ---------------------------------------------------------------------------
// API response types (private -- Last.fm nests JSON awkwardly)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiError {
    error: u32,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiResponse<T> {
    Error(ApiError),
    Ok(T),
}

#[derive(Debug, Deserialize)]
struct TopTagsResponse {
    toptags: TopTags,
}

#[derive(Debug, Deserialize)]
struct TopTags {
    #[serde(default)]
    tag: Vec<LastFmTag>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    artistmatches: ArtistMatches,
}

#[derive(Debug, Deserialize)]
struct ArtistMatches {
    #[serde(default)]
    artist: Vec<LastFmArtist>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single folksonomy tag returned by the Last.fm API.
#[derive(Debug, Clone, Deserialize)]
pub struct LastFmTag {
    /// Human-readable tag name (e.g. "shoegaze", "dream pop").
    pub name: String,
}

/// An artist match from `artist.search`.
#[derive(Debug, Clone, Deserialize)]
pub struct LastFmArtist {
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<LastFmArtist> for ArtistIdentity {
    fn from(artist: LastFmArtist) -> Self {
        let mut identity = ArtistIdentity::new(artist.name);
        if let Some(mbid) = artist.mbid.filter(|m| !m.is_empty()) {
            identity = identity.with_mbid(mbid);
        }
        if let Some(url) = artist.url.filter(|u| !u.is_empty()) {
            identity = identity.with_url(url);
        }
        identity
    }
}

/// Convert Last.fm's tag list (already ordered by count) into ranked seed
/// tags, keeping the first `limit`.
fn to_seed_tags(tags: Vec<LastFmTag>, limit: usize) -> Vec<SeedTag> {
    tags.into_iter()
        .take(limit)
        .zip(0u32..)
        .map(|(tag, rank)| SeedTag::new(tag.name, rank))
        .collect()
}

fn decode<T: DeserializeOwned>(body: &str, entity: &str) -> EtlResult<T> {
    let response: ApiResponse<T> =
        serde_json::from_str(body).map_err(|e| EtlError::parse(SOURCE_NAME, e.to_string()))?;

    match response {
        ApiResponse::Ok(value) => Ok(value),
        ApiResponse::Error(err) if err.error == ERROR_INVALID_PARAMETERS => {
            Err(EtlError::NotFound {
                entity: entity.to_string(),
                source_name: SOURCE_NAME.to_string(),
            })
        }
        ApiResponse::Error(err) if err.error == ERROR_RATE_LIMIT => Err(EtlError::RateLimited {
            source_name: SOURCE_NAME.to_string(),
        }),
        ApiResponse::Error(err) => {
            let message = format!("error {}: {}", err.error, err.message);
            if TRANSIENT_ERRORS.contains(&err.error) {
                Err(EtlError::http(SOURCE_NAME, message))
            } else if KEY_ERRORS.contains(&err.error) {
                Err(EtlError::NotConfigured {
                    source_name: SOURCE_NAME.to_string(),
                    message,
                })
            } else {
                Err(EtlError::api(SOURCE_NAME, message))
            }
        }
    }
}

/// Last.fm API client.
///
/// Wraps an HTTP client, an API key, and a rate limiter. The Last.fm API
/// allows up to 5 requests per second for non-commercial use.
#[derive(Debug, Clone)]
pub struct LastFmClient {
    http: Client,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl LastFmClient {
    /// Create a new Last.fm API client.
    ///
    /// The `api_key` must be a valid Last.fm API key obtained from
    /// <https://www.last.fm/api/account/create>.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: String) -> EtlResult<Self> {
        let http = Client::builder()
            .user_agent("consonance/0.1.0 (https://github.com/oxur/consonance)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_key,
            rate_limiter: RateLimiter::new(5),
        })
    }

    /// Create a client from the configured API key.
    ///
    /// # Errors
    /// Returns [`EtlError::NotConfigured`] if no key is set.
    pub fn from_config(config: &Config) -> EtlResult<Self> {
        let api_key = config
            .lastfm_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| EtlError::NotConfigured {
                source_name: SOURCE_NAME.to_string(),
                message: "set lastfm_api_key or CONSONANCE_LASTFM_API_KEY".to_string(),
            })?;
        Self::new(api_key)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        entity: &str,
    ) -> EtlResult<T> {
        retry_transient(SOURCE_NAME, move || async move {
            self.rate_limiter.acquire().await;

            let response = self
                .http
                .get(LASTFM_API_BASE)
                .query(&[
                    ("method", method),
                    ("api_key", self.api_key.as_str()),
                    ("format", "json"),
                ])
                .query(params)
                .send()
                .await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                return Err(EtlError::from_status(SOURCE_NAME, response.status()));
            }

            // Last.fm answers some API errors with 4xx plus an error body,
            // so decode the body whenever there is one.
            let status = response.status();
            let body = response.text().await?;
            match decode(&body, entity) {
                Err(EtlError::Parse { .. }) if !status.is_success() => {
                    Err(EtlError::from_status(SOURCE_NAME, status))
                }
                other => other,
            }
        })
        .await
    }

    /// Search for an artist by name, returning the first match.
    pub async fn search_artist(&self, query: &str) -> EtlResult<Option<LastFmArtist>> {
        let result: SearchResponse = self
            .call(
                "artist.search",
                &[("artist", query), ("limit", "1")],
                &format!("artist {query}"),
            )
            .await?;

        Ok(result.results.artistmatches.artist.into_iter().next())
    }

    /// Get top tags for an artist.
    ///
    /// Calls the `artist.getTopTags` Last.fm API method and returns the
    /// raw tag list, ordered by count.
    pub async fn get_artist_tags(&self, artist: &str) -> EtlResult<Vec<LastFmTag>> {
        let result: TopTagsResponse = self
            .call(
                "artist.getTopTags",
                &[("artist", artist), ("autocorrect", "1")],
                &format!("artist {artist}"),
            )
            .await?;

        Ok(result.toptags.tag)
    }
}

#[async_trait]
impl ArtistResolver for LastFmClient {
    async fn resolve(&self, query: &str) -> EtlResult<Option<ArtistIdentity>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        match self.search_artist(query).await {
            Ok(found) => Ok(found.map(ArtistIdentity::from)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl TagSource for LastFmClient {
    async fn top_tags(&self, artist: &ArtistIdentity, limit: usize) -> EtlResult<Vec<SeedTag>> {
        match self.get_artist_tags(&artist.name).await {
            Ok(tags) => Ok(to_seed_tags(tags, limit)),
            Err(e) if e.is_not_found() => {
                log::warn!("Last.fm has no tags for {}", artist.name);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
