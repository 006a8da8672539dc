//! Catalog source abstraction
//!
//! The classification core never talks to a catalog directly. Anything that
//! can resolve an artist and page through their albums implements
//! [`CatalogSource`]; the Spotify client is the production implementation.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::classify::RawItem;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Credentials missing, rejected or expired
    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Artist identity resolved from a free-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// Upstream music catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Obtain or refresh credentials
    async fn authorize(&self) -> Result<(), CatalogError>;

    /// Best match for a free-text artist query, `None` when nothing matches
    async fn find_artist(&self, query: &str) -> Result<Option<Artist>, CatalogError>;

    /// One page of the artist's albums
    async fn artist_albums_page(
        &self,
        artist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawItem>, CatalogError>;
}

/// Fetch every album for an artist
///
/// Pages are requested until one comes back shorter than `page_size`.
pub async fn fetch_all_albums(
    source: &dyn CatalogSource,
    artist_id: &str,
    page_size: u32,
) -> Result<Vec<RawItem>, CatalogError> {
    let page_size = page_size.max(1);
    let mut albums = Vec::new();
    let mut offset = 0;

    loop {
        let page = source
            .artist_albums_page(artist_id, page_size, offset)
            .await?;
        let page_len = page.len();
        albums.extend(page);
        offset += page_size;

        debug!(artist_id = %artist_id, offset, page_len, "Fetched album page");

        if page_len != page_size as usize {
            break;
        }
    }

    Ok(albums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves `total` albums and records every requested offset
    struct PagedCatalog {
        total: u32,
        offsets: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl CatalogSource for PagedCatalog {
        async fn authorize(&self) -> Result<(), CatalogError> {
            Ok(())
        }

        async fn find_artist(&self, _query: &str) -> Result<Option<Artist>, CatalogError> {
            Ok(None)
        }

        async fn artist_albums_page(
            &self,
            _artist_id: &str,
            limit: u32,
            offset: u32,
        ) -> Result<Vec<RawItem>, CatalogError> {
            self.offsets.lock().unwrap().push(offset);
            let end = (offset + limit).min(self.total);
            Ok((offset..end)
                .map(|i| RawItem {
                    title: format!("Album {}", i),
                    link: format!("https://example.com/{}", i),
                    images: Vec::new(),
                })
                .collect())
        }
    }

    fn catalog(total: u32) -> PagedCatalog {
        PagedCatalog {
            total,
            offsets: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let source = catalog(120);
        let albums = fetch_all_albums(&source, "a", 50).await.unwrap();

        assert_eq!(albums.len(), 120);
        assert_eq!(*source.offsets.lock().unwrap(), vec![0, 50, 100]);
        assert_eq!(albums[0].title, "Album 0");
        assert_eq!(albums[119].title, "Album 119");
    }

    #[tokio::test]
    async fn test_exact_multiple_fetches_trailing_empty_page() {
        let source = catalog(100);
        let albums = fetch_all_albums(&source, "a", 50).await.unwrap();

        assert_eq!(albums.len(), 100);
        assert_eq!(*source.offsets.lock().unwrap(), vec![0, 50, 100]);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let source = catalog(0);
        let albums = fetch_all_albums(&source, "a", 50).await.unwrap();

        assert!(albums.is_empty());
        assert_eq!(*source.offsets.lock().unwrap(), vec![0]);
    }
}
