//! Live album search service
//!
//! Resolves an artist query, fetches the artist's catalog and classifies it.
//! Both the query → artist mapping and the artist → response mapping are
//! cached.

use ccrawl_common::config::CacheConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::catalog::{fetch_all_albums, Artist, CatalogError, CatalogSource};
use crate::classify::{self, FailureReason, LiveAlbumsResponse};
use crate::error::{ApiError, ApiResult};

/// Search orchestration over a catalog source
pub struct LiveAlbumService {
    catalog: Arc<dyn CatalogSource>,
    page_size: u32,
    authorized: AtomicBool,
    /// Raw query → artist (`None` caches "no artist found")
    artist_cache: Mutex<TtlCache<String, Option<Artist>>>,
    /// Artist id → response
    response_cache: Mutex<TtlCache<String, LiveAlbumsResponse>>,
}

impl LiveAlbumService {
    pub fn new(catalog: Arc<dyn CatalogSource>, page_size: u32, cache: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(cache.ttl_secs);
        Self {
            catalog,
            page_size,
            authorized: AtomicBool::new(false),
            artist_cache: Mutex::new(TtlCache::new(cache.capacity, ttl)),
            response_cache: Mutex::new(TtlCache::new(cache.capacity, ttl)),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    /// (Re)authorize with the catalog, recording the outcome
    pub async fn authorize(&self) -> bool {
        match self.catalog.authorize().await {
            Ok(()) => {
                info!("Catalog authorization succeeded");
                self.authorized.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                warn!("Catalog authorization failed: {}", e);
                self.authorized.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Live albums for a dash-separated artist query
    pub async fn search(&self, query: &str) -> ApiResult<LiveAlbumsResponse> {
        if query.trim().is_empty() {
            return Ok(LiveAlbumsResponse::failure(FailureReason::EmptyQuery));
        }

        if !self.is_authorized() && !self.authorize().await {
            return Ok(LiveAlbumsResponse::failure(FailureReason::AuthError));
        }

        match self.search_authorized(query).await {
            Err(ApiError::Catalog(CatalogError::Unauthorized(reason))) => {
                warn!(query = %query, "Catalog rejected credentials: {}", reason);
                self.authorized.store(false, Ordering::SeqCst);
                Ok(LiveAlbumsResponse::failure(FailureReason::AuthError))
            }
            other => other,
        }
    }

    async fn search_authorized(&self, query: &str) -> ApiResult<LiveAlbumsResponse> {
        let Some(artist) = self.resolve_artist(query).await? else {
            debug!(query = %query, "No artists found for query");
            return Ok(LiveAlbumsResponse::failure(FailureReason::NoArtistFound));
        };

        if let Some(cached) = self.response_cache.lock().await.get(&artist.id) {
            debug!(artist_id = %artist.id, "Response cache hit");
            return Ok(cached);
        }

        let response = self.live_albums_for_artist(&artist).await?;
        self.response_cache
            .lock()
            .await
            .insert(artist.id.clone(), response.clone());

        Ok(response)
    }

    /// Query → artist, through the cache
    async fn resolve_artist(&self, query: &str) -> ApiResult<Option<Artist>> {
        if let Some(cached) = self.artist_cache.lock().await.get(&query.to_string()) {
            debug!(query = %query, "Artist cache hit");
            return Ok(cached);
        }

        let search_text = query.split('-').collect::<Vec<_>>().join(" ");
        let artist = self.catalog.find_artist(&search_text).await?;

        self.artist_cache
            .lock()
            .await
            .insert(query.to_string(), artist.clone());

        Ok(artist)
    }

    /// Fetch and classify an artist's full catalog (uncached)
    pub async fn live_albums_for_artist(&self, artist: &Artist) -> ApiResult<LiveAlbumsResponse> {
        let albums = fetch_all_albums(self.catalog.as_ref(), &artist.id, self.page_size).await?;
        info!(
            artist_id = %artist.id,
            album_count = albums.len(),
            "Fetched artist catalog"
        );

        let result = tokio::task::spawn_blocking(move || classify::classify(albums))
            .await
            .map_err(|e| ApiError::Internal(format!("Classification task failed: {}", e)))?;

        if let Some(reason) = result.failure() {
            debug!(artist_id = %artist.id, reason = reason.as_str(), "No live albums found for artist");
        }

        Ok(LiveAlbumsResponse::for_artist(
            artist.id.clone(),
            artist.name.clone(),
            result,
        ))
    }
}
