//! LiveAlbumService tests against an in-memory catalog

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use ccrawl_server::catalog::CatalogError;
use ccrawl_server::classify::FailureReason;
use ccrawl_server::ApiError;
use helpers::{test_service, FakeCatalog};

const DEAD_TITLES: &[&str] = &[
    "American Beauty",
    "Cornell 5/8/77",
    "Live at Red Rocks - July 8, 1978",
    "Europe '72",
    "Winterland - December 31, 1978",
    "Fillmore West - February 27, 1969",
];

fn dead_catalog() -> Arc<FakeCatalog> {
    Arc::new(
        FakeCatalog::new()
            .with_artist("grateful dead", "4TMHGUX5WI7OOm53PqSDAT", "Grateful Dead", DEAD_TITLES)
            .with_artist("steely dan", "6P7H3ai06vU1sGvdpBwDmE", "Steely Dan", &["Aja", "Gaucho"]),
    )
}

#[tokio::test]
async fn test_search_groups_live_albums_by_year() {
    let catalog = dead_catalog();
    let service = test_service(catalog.clone());

    let response = service.search("grateful-dead").await.unwrap();

    assert!(response.success);
    assert_eq!(response.error, None);
    assert_eq!(response.artist_id.as_deref(), Some("4TMHGUX5WI7OOm53PqSDAT"));
    assert_eq!(response.artist_name.as_deref(), Some("Grateful Dead"));

    let buckets = response.albums_by_year.unwrap();
    let years: Vec<(&str, usize)> = buckets.iter().map(|b| (b.year(), b.count())).collect();
    assert_eq!(years, vec![("1969", 1), ("1977", 1), ("1978", 2)]);

    let names: Vec<&str> = buckets[2].albums().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Live at Red Rocks - July 8, 1978", "Winterland - December 31, 1978"]
    );
}

#[tokio::test]
async fn test_search_pages_through_catalog() {
    let catalog = dead_catalog();
    let service = test_service(catalog.clone());

    service.search("grateful-dead").await.unwrap();

    // 6 albums at page size 2: three full pages and a trailing empty one
    assert_eq!(catalog.page_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_empty_query() {
    let catalog = dead_catalog();
    let service = test_service(catalog.clone());

    for query in ["", "   "] {
        let response = service.search(query).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error, Some(FailureReason::EmptyQuery));
    }
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_artist() {
    let service = test_service(dead_catalog());

    let response = service.search("nobody-at-all").await.unwrap();
    assert!(!response.success);
    assert_eq!(response.error, Some(FailureReason::NoArtistFound));
    assert_eq!(response.artist_id, None);
}

#[tokio::test]
async fn test_artist_without_live_albums() {
    let service = test_service(dead_catalog());

    let response = service.search("steely-dan").await.unwrap();
    assert!(!response.success);
    assert_eq!(response.error, Some(FailureReason::NoLiveAlbums));
    assert_eq!(response.albums_by_year, None);
}

#[tokio::test]
async fn test_rejected_credentials_report_auth_error() {
    let catalog = dead_catalog();
    catalog.set_reject_credentials(true);
    let service = test_service(catalog.clone());

    let response = service.search("grateful-dead").await.unwrap();
    assert_eq!(response.error, Some(FailureReason::AuthError));
    assert!(!service.is_authorized());
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_revoked_credentials_clear_authorization() {
    let catalog = dead_catalog();
    let service = test_service(catalog.clone());
    assert!(service.authorize().await);

    catalog.set_reject_credentials(true);
    let response = service.search("grateful-dead").await.unwrap();
    assert_eq!(response.error, Some(FailureReason::AuthError));
    assert!(!service.is_authorized());

    // Next search re-authorizes before querying
    catalog.set_reject_credentials(false);
    let response = service.search("grateful-dead").await.unwrap();
    assert!(response.success);
    assert!(service.is_authorized());
    assert_eq!(catalog.authorize_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_repeat_search_is_served_from_cache() {
    let catalog = dead_catalog();
    let service = test_service(catalog.clone());

    let first = service.search("grateful-dead").await.unwrap();
    let searches = catalog.search_calls.load(Ordering::SeqCst);
    let pages = catalog.page_calls.load(Ordering::SeqCst);

    let second = service.search("grateful-dead").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), searches);
    assert_eq!(catalog.page_calls.load(Ordering::SeqCst), pages);
}

#[tokio::test]
async fn test_unknown_artist_is_cached() {
    let catalog = dead_catalog();
    let service = test_service(catalog.clone());

    service.search("nobody").await.unwrap();
    service.search("nobody").await.unwrap();
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_not_cached() {
    let catalog = dead_catalog();
    catalog.set_fail_pages(true);
    let service = test_service(catalog.clone());

    let result = service.search("grateful-dead").await;
    assert!(matches!(
        result,
        Err(ApiError::Catalog(CatalogError::ApiError(500, _)))
    ));

    catalog.set_fail_pages(false);
    let response = service.search("grateful-dead").await.unwrap();
    assert!(response.success);
}
