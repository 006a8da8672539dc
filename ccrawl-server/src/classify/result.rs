//! Classification outcomes and the JSON response shape

use serde::Serialize;

use super::RawItem;

/// Why a search produced no live albums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// Artist query resolved to nothing upstream
    NoArtistFound,
    /// Catalog had no title with a recognizable single date
    NoLiveAlbums,
    /// Search issued without a query
    EmptyQuery,
    /// Catalog credentials missing or rejected
    AuthError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NoArtistFound => "no-artist-found",
            FailureReason::NoLiveAlbums => "no-live-albums",
            FailureReason::EmptyQuery => "empty-query",
            FailureReason::AuthError => "auth-error",
        }
    }
}

/// Album entry as rendered in a year bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumSummary {
    pub url: String,
    pub name: String,
    /// First catalog image, `null` when the album has none
    pub img_url: Option<String>,
}

impl From<&RawItem> for AlbumSummary {
    fn from(item: &RawItem) -> Self {
        Self {
            url: item.link.clone(),
            name: item.title.clone(),
            img_url: item.primary_image().map(str::to_string),
        }
    }
}

/// Albums sharing one year, in ascending date order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearBucket {
    year: String,
    count: usize,
    albums: Vec<AlbumSummary>,
}

impl YearBucket {
    pub fn new(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            count: 0,
            albums: Vec::new(),
        }
    }

    /// Append an album, keeping `count` equal to the album total
    pub fn push(&mut self, album: AlbumSummary) {
        self.albums.push(album);
        self.count = self.albums.len();
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn albums(&self) -> &[AlbumSummary] {
        &self.albums
    }
}

/// Result of one classification pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    /// Buckets ascending by year, never empty
    Success(Vec<YearBucket>),
    Failure(FailureReason),
}

impl ClassificationResult {
    /// Wrap emitted buckets; an empty list is a `no-live-albums` failure
    pub fn from_buckets(buckets: Vec<YearBucket>) -> Self {
        if buckets.is_empty() {
            ClassificationResult::Failure(FailureReason::NoLiveAlbums)
        } else {
            ClassificationResult::Success(buckets)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ClassificationResult::Success(_))
    }

    pub fn buckets(&self) -> Option<&[YearBucket]> {
        match self {
            ClassificationResult::Success(buckets) => Some(buckets),
            ClassificationResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            ClassificationResult::Success(_) => None,
            ClassificationResult::Failure(reason) => Some(*reason),
        }
    }
}

/// Search response body
///
/// `{"success":false,"error":"..."}` or
/// `{"success":true,"artist_id":..,"artist_name":..,"albums_by_year":[..]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveAlbumsResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureReason>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums_by_year: Option<Vec<YearBucket>>,
}

impl LiveAlbumsResponse {
    pub fn failure(reason: FailureReason) -> Self {
        Self {
            success: false,
            error: Some(reason),
            artist_id: None,
            artist_name: None,
            albums_by_year: None,
        }
    }

    /// Attach artist identity to a classification result
    pub fn for_artist(
        artist_id: impl Into<String>,
        artist_name: impl Into<String>,
        result: ClassificationResult,
    ) -> Self {
        match result {
            ClassificationResult::Failure(reason) => Self::failure(reason),
            ClassificationResult::Success(buckets) => Self {
                success: true,
                error: None,
                artist_id: Some(artist_id.into()),
                artist_name: Some(artist_name.into()),
                albums_by_year: Some(buckets),
            },
        }
    }
}
