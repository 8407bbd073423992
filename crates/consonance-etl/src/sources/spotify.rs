//! Spotify client for artist images.
//!
//! Uses the client-credentials flow: a bearer token is requested with the
//! app's client ID and secret and reused until shortly before it expires.
//! Only artist search is used; the first image of the first match is the
//! artist's display image.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{EtlError, EtlResult};
use crate::sources::resilience::{retry_transient, RateLimiter};
use crate::sources::ImageLookup;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";
const SOURCE_NAME: &str = "Spotify";

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<SpotifyArtist>,
}

/// An artist object from Spotify's search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

/// An image reference. Spotify lists images widest first.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

fn first_image(artist: Option<SpotifyArtist>) -> Option<String> {
    artist
        .and_then(|artist| artist.images.into_iter().next())
        .map(|image| image.url)
}

/// A failed token request. Spotify answers bad client credentials with
/// 400 or 401, which no retry can fix.
fn token_error(status: StatusCode) -> EtlError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => EtlError::NotConfigured {
            source_name: SOURCE_NAME.to_string(),
            message: format!("client credentials rejected ({status})"),
        },
        _ => EtlError::from_status(SOURCE_NAME, status),
    }
}

/// Spotify Web API client, limited to artist image lookup.
#[derive(Debug)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
    rate_limiter: RateLimiter,
}

impl SpotifyClient {
    /// Create a new Spotify client from app credentials.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(client_id: String, client_secret: String) -> EtlResult<Self> {
        let http = Client::builder()
            .user_agent("consonance/0.1.0 (https://github.com/oxur/consonance)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            token: Mutex::new(None),
            rate_limiter: RateLimiter::new(5),
        })
    }

    /// Return a valid access token, requesting a new one if the cached
    /// token is missing or about to expire.
    async fn access_token(&self) -> EtlResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        log::debug!("Requesting Spotify access token");
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(token_error(status));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| EtlError::parse(SOURCE_NAME, e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    /// Search for an artist by name and return the best match.
    pub async fn search_artist(&self, name: &str) -> EtlResult<Option<SpotifyArtist>> {
        let query = format!("artist:{name}");
        let query = query.as_str();
        let response: SearchResponse = retry_transient(SOURCE_NAME, move || async move {
            let token = self.access_token().await?;
            self.rate_limiter.acquire().await;

            let response = self
                .http
                .get(SEARCH_URL)
                .bearer_auth(token)
                .query(&[("q", query), ("type", "artist"), ("limit", "1")])
                .send()
                .await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => Err(EtlError::RateLimited {
                    source_name: SOURCE_NAME.to_string(),
                }),
                StatusCode::UNAUTHORIZED => {
                    self.invalidate_token().await;
                    Err(EtlError::http(SOURCE_NAME, "access token rejected"))
                }
                status if !status.is_success() => Err(EtlError::from_status(SOURCE_NAME, status)),
                _ => response
                    .json()
                    .await
                    .map_err(|e| EtlError::parse(SOURCE_NAME, e.to_string())),
            }
        })
        .await?;

        Ok(response.artists.items.into_iter().next())
    }
}

#[async_trait]
impl ImageLookup for SpotifyClient {
    async fn image_url(&self, name: &str) -> EtlResult<Option<String>> {
        Ok(first_image(self.search_artist(name).await?))
    }
}
