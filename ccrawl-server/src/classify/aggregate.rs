//! Chronological ordering and year bucketing
//!
//! Items are ordered by `(SortKey, arrival sequence)`. The sequence number
//! only separates items with identical dates; item payloads never take part
//! in comparisons.

use tracing::debug;

use super::normalize::SortKey;
use super::result::{AlbumSummary, ClassificationResult, YearBucket};
use super::RawItem;

/// Year prefix that stops bucket emission
///
/// Neither parsing strategy produces it; a key with this year marks the
/// start of entries that could not be dated and are dropped.
pub const UNSORTED_YEAR: &str = "9999";

/// A dated item with its arrival position
#[derive(Debug, Clone)]
pub struct ClassifiedItem {
    key: SortKey,
    item: RawItem,
    sequence: u64,
}

impl ClassifiedItem {
    pub fn key(&self) -> &SortKey {
        &self.key
    }

    pub fn item(&self) -> &RawItem {
        &self.item
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    fn order_key(&self) -> (&SortKey, u64) {
        (&self.key, self.sequence)
    }
}

/// Collects dated items, then emits them as ordered year buckets
#[derive(Debug, Default)]
pub struct ChronologicalAggregator {
    entries: Vec<ClassifiedItem>,
    next_sequence: u64,
}

impl ChronologicalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item; arrival order breaks ties between equal keys
    pub fn push(&mut self, key: SortKey, item: RawItem) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(ClassifiedItem {
            key,
            item,
            sequence,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All collected items in ascending `(key, sequence)` order
    pub fn into_sorted(mut self) -> Vec<ClassifiedItem> {
        self.entries.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        self.entries
    }

    /// Sort and partition into year buckets
    pub fn finish(self) -> ClassificationResult {
        let mut buckets: Vec<YearBucket> = Vec::new();

        for entry in self.into_sorted() {
            let year = entry.key.year();
            if year == UNSORTED_YEAR {
                debug!(key = %entry.key, "Reached unsorted entries, stopping bucket emission");
                break;
            }

            if buckets.last().map(YearBucket::year) != Some(year) {
                buckets.push(YearBucket::new(year));
            }
            if let Some(bucket) = buckets.last_mut() {
                bucket.push(AlbumSummary::from(&entry.item));
            }
        }

        ClassificationResult::from_buckets(buckets)
    }
}

impl Extend<(SortKey, RawItem)> for ChronologicalAggregator {
    fn extend<I: IntoIterator<Item = (SortKey, RawItem)>>(&mut self, pairs: I) {
        for (key, item) in pairs {
            self.push(key, item);
        }
    }
}

/// Order dated items and group them by year
pub fn aggregate<I>(pairs: I) -> ClassificationResult
where
    I: IntoIterator<Item = (SortKey, RawItem)>,
{
    let mut aggregator = ChronologicalAggregator::new();
    aggregator.extend(pairs);
    aggregator.finish()
}
