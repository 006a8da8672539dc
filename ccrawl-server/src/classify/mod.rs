//! Live album classification
//!
//! Turns an artist's album list into year buckets of single-date live
//! recordings:
//!
//! 1. [`parser`]: pull a raw date out of each title
//! 2. [`normalize`]: turn it into a `YYYYMMDD` sort key
//! 3. [`aggregate`]: order by `(key, arrival)` and group by year
//! 4. [`result`]: success/failure wrapping and the response shape
//!
//! Titles without a recognizable date are dropped silently; they are
//! compilations or studio albums, not errors.

pub mod aggregate;
pub mod normalize;
pub mod parser;
pub mod result;

pub use aggregate::{aggregate, ChronologicalAggregator, ClassifiedItem, UNSORTED_YEAR};
pub use normalize::{normalize, SortKey, CENTURY_PIVOT};
pub use parser::{parse, DateCandidate, DateSource};
pub use result::{AlbumSummary, ClassificationResult, FailureReason, LiveAlbumsResponse, YearBucket};

use rayon::prelude::*;
use tracing::{debug, info};

/// Catalog item as supplied by the catalog source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// Album title
    pub title: String,
    /// External link to the album
    pub link: String,
    /// Cover image URLs, largest first
    pub images: Vec<String>,
}

impl RawItem {
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Sort key for a single title, if it carries a date
pub fn classify_title(title: &str) -> Option<SortKey> {
    let candidate = parse(title)?;
    let key = normalize(&candidate);
    debug!(
        title = %title,
        key = %key,
        source = candidate.source().as_str(),
        "Detected live date"
    );
    Some(key)
}

/// Classify a full catalog
///
/// Titles are parsed in parallel; the order-preserving collect keeps
/// arrival order, so equal dates still sort deterministically.
pub fn classify(items: Vec<RawItem>) -> ClassificationResult {
    let total = items.len();

    let keys: Vec<Option<SortKey>> = items
        .par_iter()
        .map(|item| classify_title(&item.title))
        .collect();

    let mut aggregator = ChronologicalAggregator::new();
    aggregator.extend(
        keys.into_iter()
            .zip(items)
            .filter_map(|(key, item)| key.map(|key| (key, item))),
    );

    info!(total, live = aggregator.len(), "Classified catalog items");

    aggregator.finish()
}
