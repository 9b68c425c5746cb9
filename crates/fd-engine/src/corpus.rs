//! The indexed corpus: three overlapping length buckets plus every payload added.

use std::sync::Arc;

use fd_core::BucketThresholds;
use serde::Serialize;

use crate::bucket::{buckets_for, Bucket, BucketKind, Entry, ScoredEntry};
use crate::fingerprint::fingerprint;
use crate::normalize::{normalize, normalized_len};

/// Bucket sizes, for logging and the CLI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub documents: usize,
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

#[derive(Debug)]
pub struct Corpus<P> {
    short: Bucket<P>,
    medium: Bucket<P>,
    long: Bucket<P>,
    payloads: Vec<P>,
}

impl<P: Clone> Corpus<P> {
    pub fn new(thresholds: &BucketThresholds) -> Self {
        let bucket = |kind: BucketKind| Bucket::new(kind, kind.threshold(thresholds));
        Self {
            short: bucket(BucketKind::Short),
            medium: bucket(BucketKind::Medium),
            long: bucket(BucketKind::Long),
            payloads: Vec::new(),
        }
    }

    /// Index `raw_text` under `payload`. Identical texts may be added more
    /// than once. Returns the buckets the entry went into, possibly none.
    pub fn add(&mut self, raw_text: impl Into<String>, payload: P) -> Vec<BucketKind> {
        let raw_text = raw_text.into();
        let normalized_text = normalize(&raw_text);
        let kinds = buckets_for(normalized_len(&normalized_text));

        let entry = Arc::new(Entry {
            fingerprint: fingerprint(&normalized_text),
            raw_text,
            normalized_text,
            payload: payload.clone(),
        });
        for kind in &kinds {
            self.bucket_mut(*kind).push(Arc::clone(&entry));
        }
        self.payloads.push(payload);
        kinds
    }

    /// Most similar indexed entry above `min_similarity`, without escalation.
    ///
    /// Buckets are scanned short, medium, long and only a strictly higher
    /// similarity replaces the current best, so ties keep the first hit.
    pub fn best_match(&self, raw_text: &str, min_similarity: f64) -> Option<ScoredEntry<P>> {
        let normalized = normalize(raw_text);
        let query = fingerprint(&normalized);
        let mut best: Option<ScoredEntry<P>> = None;

        for kind in buckets_for(normalized_len(&normalized)) {
            for scored in self.bucket(kind).scan(query, &normalized, min_similarity) {
                let better = best
                    .as_ref()
                    .map_or(true, |current| scored.similarity > current.similarity);
                if better {
                    best = Some(scored);
                }
            }
        }
        best
    }
}

impl<P> Corpus<P> {
    pub fn bucket(&self, kind: BucketKind) -> &Bucket<P> {
        match kind {
            BucketKind::Short => &self.short,
            BucketKind::Medium => &self.medium,
            BucketKind::Long => &self.long,
        }
    }

    fn bucket_mut(&mut self, kind: BucketKind) -> &mut Bucket<P> {
        match kind {
            BucketKind::Short => &mut self.short,
            BucketKind::Medium => &mut self.medium,
            BucketKind::Long => &mut self.long,
        }
    }

    /// Every payload ever added, in insertion order.
    pub fn payloads(&self) -> &[P] {
        &self.payloads
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            documents: self.payloads.len(),
            short: self.short.len(),
            medium: self.medium.len(),
            long: self.long.len(),
        }
    }
}

impl<P: Clone> Default for Corpus<P> {
    fn default() -> Self {
        Self::new(&BucketThresholds::default())
    }
}
