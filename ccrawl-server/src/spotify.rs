//! Spotify Web API client
//!
//! Client-credentials flow: an app token is requested from the accounts
//! service and reused until shortly before it expires. All API calls go
//! through a shared rate limiter.
//!
//! API Documentation: https://developer.spotify.com/documentation/web-api

use async_trait::async_trait;
use ccrawl_common::config::{Credentials, SpotifyConfig};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::catalog::{Artist, CatalogError, CatalogSource};
use crate::classify::RawItem;

const USER_AGENT: &str = concat!("ConcertCrawler/", env!("CARGO_PKG_VERSION"));

/// Tokens are refreshed this long before Spotify says they expire
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds
    expires_in: u64,
}

/// `/search?type=artist` response
#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    artists: Paging<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    id: String,
    name: String,
}

/// Simplified album object from `/artists/{id}/albums`
#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: String,
    #[serde(default)]
    external_urls: ExternalUrls,
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

impl From<SpotifyAlbum> for RawItem {
    fn from(album: SpotifyAlbum) -> Self {
        RawItem {
            title: album.name,
            link: album.external_urls.spotify.unwrap_or_default(),
            images: album.images.into_iter().map(|image| image.url).collect(),
        }
    }
}

impl From<SpotifyArtist> for Artist {
    fn from(artist: SpotifyArtist) -> Self {
        Artist {
            id: artist.id,
            name: artist.name,
        }
    }
}

/// Cached app access token
#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn new(value: String, expires_in: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + expires_in,
        }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Spotify catalog client
pub struct SpotifyClient {
    http_client: Client,
    credentials: Option<Credentials>,
    api_base_url: String,
    accounts_url: String,
    token: Mutex<Option<AccessToken>>,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl SpotifyClient {
    /// Create a client; without credentials every call fails with `Unauthorized`
    pub fn new(
        config: &SpotifyConfig,
        credentials: Option<Credentials>,
    ) -> Result<Self, CatalogError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            credentials,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Request a new app token from the accounts service
    async fn request_token(&self) -> Result<AccessToken, CatalogError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            CatalogError::Unauthorized("Spotify credentials not configured".to_string())
        })?;

        let url = format!("{}/api/token", self.accounts_url);
        tracing::debug!(url = %url, "Requesting Spotify access token");

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unauthorized(error_text));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        tracing::info!(expires_in = token.expires_in, "Obtained Spotify access token");

        Ok(AccessToken::new(
            token.access_token,
            Duration::from_secs(token.expires_in),
        ))
    }

    /// Current token, refreshed when stale
    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Authorized, rate-limited GET decoded as JSON
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let token = self.access_token().await?;
        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %url, "Querying Spotify API");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Revoked or expired early; force a new token on the next call
            *self.token.lock().await = None;
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unauthorized(error_text));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for SpotifyClient {
    async fn authorize(&self) -> Result<(), CatalogError> {
        let token = self.request_token().await?;
        *self.token.lock().await = Some(token);
        Ok(())
    }

    async fn find_artist(&self, query: &str) -> Result<Option<Artist>, CatalogError> {
        let url = format!("{}/search", self.api_base_url);
        let params = [
            ("q", query.to_string()),
            ("type", "artist".to_string()),
            ("limit", "1".to_string()),
        ];

        let response: ArtistSearchResponse = self.get_json(&url, &params).await?;
        let artist = response.artists.items.into_iter().next().map(Artist::from);

        match &artist {
            Some(artist) => tracing::info!(
                query = %query,
                artist_id = %artist.id,
                artist_name = %artist.name,
                "Resolved artist"
            ),
            None => tracing::info!(query = %query, "No artist found for query"),
        }

        Ok(artist)
    }

    async fn artist_albums_page(
        &self,
        artist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawItem>, CatalogError> {
        let url = format!("{}/artists/{}/albums", self.api_base_url, artist_id);
        let params = [
            ("include_groups", "album".to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];

        let page: Paging<SpotifyAlbum> = self.get_json(&url, &params).await?;
        Ok(page.items.into_iter().map(RawItem::from).collect())
    }
}
