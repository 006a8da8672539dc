//! In-memory catalog source

use async_trait::async_trait;
use ccrawl_common::config::CacheConfig;
use ccrawl_server::catalog::{Artist, CatalogError, CatalogSource};
use ccrawl_server::classify::RawItem;
use ccrawl_server::service::LiveAlbumService;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Page size used by `test_service`, small enough to force several pages
pub const TEST_PAGE_SIZE: u32 = 2;

/// Album with a link and one image derived from the title
pub fn album(title: &str) -> RawItem {
    let slug: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    RawItem {
        title: title.to_string(),
        link: format!("https://open.spotify.com/album/{}", slug),
        images: vec![format!("https://i.scdn.co/image/{}", slug)],
    }
}

/// Catalog serving fixed artists and albums, counting calls
#[derive(Default)]
pub struct FakeCatalog {
    /// Search text → artist
    artists: HashMap<String, Artist>,
    /// Artist id → albums
    albums: HashMap<String, Vec<RawItem>>,
    reject_credentials: AtomicBool,
    fail_pages: AtomicBool,
    pub authorize_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(mut self, search_text: &str, id: &str, name: &str, titles: &[&str]) -> Self {
        self.artists.insert(
            search_text.to_string(),
            Artist {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self.albums
            .insert(id.to_string(), titles.iter().map(|t| album(t)).collect());
        self
    }

    pub fn set_reject_credentials(&self, reject: bool) {
        self.reject_credentials.store(reject, Ordering::SeqCst);
    }

    pub fn set_fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, Ordering::SeqCst);
    }

    fn check_credentials(&self) -> Result<(), CatalogError> {
        if self.reject_credentials.load(Ordering::SeqCst) {
            Err(CatalogError::Unauthorized("invalid_client".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn authorize(&self) -> Result<(), CatalogError> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        self.check_credentials()
    }

    async fn find_artist(&self, query: &str) -> Result<Option<Artist>, CatalogError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_credentials()?;
        Ok(self.artists.get(query).cloned())
    }

    async fn artist_albums_page(
        &self,
        artist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawItem>, CatalogError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.check_credentials()?;
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(CatalogError::ApiError(500, "upstream down".to_string()));
        }

        let albums = self.albums.get(artist_id).cloned().unwrap_or_default();
        Ok(albums
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

/// Service over `catalog` with default cache settings
pub fn test_service(catalog: Arc<FakeCatalog>) -> LiveAlbumService {
    LiveAlbumService::new(catalog, TEST_PAGE_SIZE, &CacheConfig::default())
}
