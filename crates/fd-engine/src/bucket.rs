//! Length-stratified buckets.
//!
//! SimHash distance grows with document length for the same amount of
//! editing, so each length band gets its own Hamming threshold. The bands
//! overlap (80..100 and 150..200) and an entry lives in every band it fits.
//!
//! The bands are measured in normalized characters. Older notes described
//! them as word counts; the character behaviour is the one indexes were
//! built with and is kept.

use std::fmt;
use std::sync::Arc;

use fd_core::BucketThresholds;

use crate::fingerprint::{hamming_distance, Fingerprint};
use crate::similarity::similarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    /// `len < 100`
    Short,
    /// `80 < len < 200`
    Medium,
    /// `len > 150`
    Long,
}

impl BucketKind {
    /// Scan order. Ties between equally similar candidates go to the
    /// earlier bucket in this list.
    pub const ALL: [BucketKind; 3] = [BucketKind::Short, BucketKind::Medium, BucketKind::Long];

    pub fn accepts(&self, normalized_len: usize) -> bool {
        match self {
            Self::Short => normalized_len < 100,
            Self::Medium => normalized_len > 80 && normalized_len < 200,
            Self::Long => normalized_len > 150,
        }
    }

    pub fn threshold(&self, thresholds: &BucketThresholds) -> u32 {
        match self {
            Self::Short => thresholds.short,
            Self::Medium => thresholds.medium,
            Self::Long => thresholds.long,
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Medium => write!(f, "medium"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// Buckets a text of this normalized length belongs to, in scan order.
pub fn buckets_for(normalized_len: usize) -> Vec<BucketKind> {
    BucketKind::ALL
        .into_iter()
        .filter(|kind| kind.accepts(normalized_len))
        .collect()
}

/// One indexed document. Never mutated after insertion.
#[derive(Debug)]
pub struct Entry<P> {
    pub raw_text: String,
    pub normalized_text: String,
    pub fingerprint: Fingerprint,
    pub payload: P,
}

/// An entry that passed both the fingerprint and the similarity filter.
#[derive(Debug, Clone)]
pub struct ScoredEntry<P> {
    pub entry: Arc<Entry<P>>,
    pub similarity: f64,
    pub bucket: BucketKind,
}

#[derive(Debug)]
pub struct Bucket<P> {
    kind: BucketKind,
    threshold: u32,
    entries: Vec<Arc<Entry<P>>>,
}

impl<P> Bucket<P> {
    pub fn new(kind: BucketKind, threshold: u32) -> Self {
        Self { kind, threshold, entries: Vec::new() }
    }

    pub fn kind(&self) -> BucketKind {
        self.kind
    }

    /// Maximum Hamming distance (bits) for a candidate in this bucket.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Arc<Entry<P>>] {
        &self.entries
    }

    pub(crate) fn push(&mut self, entry: Arc<Entry<P>>) {
        self.entries.push(entry);
    }

    /// Entries within `threshold` bits of `fingerprint` whose similarity to
    /// `normalized` is strictly above `min_similarity`, in insertion order.
    pub fn scan(
        &self,
        fingerprint: Fingerprint,
        normalized: &str,
        min_similarity: f64,
    ) -> Vec<ScoredEntry<P>> {
        let candidates: Vec<&Arc<Entry<P>>> = self
            .entries
            .iter()
            .filter(|e| hamming_distance(e.fingerprint, fingerprint, self.threshold) <= self.threshold)
            .collect();

        tracing::debug!(
            bucket = %self.kind,
            candidates = candidates.len(),
            entries = self.entries.len(),
            "fingerprint prune"
        );

        candidates
            .into_iter()
            .map(|entry| ScoredEntry {
                entry: Arc::clone(entry),
                similarity: similarity(normalized, &entry.normalized_text),
                bucket: self.kind,
            })
            .filter(|scored| scored.similarity > min_similarity)
            .collect()
    }
}
