//! Duplicate lookup: fingerprint prune, similarity ranking, then accept,
//! reject or escalate the best candidate.

use fd_core::{DedupConfig, Result, SimilarityConfig};

use crate::bucket::{BucketKind, ScoredEntry};
use crate::corpus::Corpus;
use crate::decision_cache::DecisionCache;
use crate::escalator::{Escalator, Reviewer};

/// How a lookup ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<P> {
    /// No candidate above the similarity floor.
    Unique,
    /// Best candidate above the safe threshold.
    Accepted { payload: P, similarity: f64, bucket: BucketKind },
    /// Ambiguous candidate the reviewer (or cache) called the same.
    Confirmed { payload: P, similarity: f64, bucket: BucketKind },
    /// Ambiguous candidate the reviewer (or cache) called different.
    Rejected { similarity: f64, bucket: BucketKind },
}

impl<P> Verdict<P> {
    pub fn into_payload(self) -> Option<P> {
        match self {
            Self::Accepted { payload, .. } | Self::Confirmed { payload, .. } => Some(payload),
            Self::Unique | Self::Rejected { .. } => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Accepted { .. } | Self::Confirmed { .. })
    }
}

pub struct DuplicateDetector<R> {
    similarity: SimilarityConfig,
    escalator: Escalator<R>,
}

impl<R: Reviewer> DuplicateDetector<R> {
    pub fn new(similarity: SimilarityConfig, escalator: Escalator<R>) -> Self {
        Self { similarity, escalator }
    }

    /// Validate `config` and open the decision cache it points at.
    pub fn from_config(config: &DedupConfig, reviewer: R) -> Result<Self> {
        config.validate()?;
        let cache = DecisionCache::from_config(&config.cache);
        Ok(Self::new(config.similarity.clone(), Escalator::new(cache, reviewer)))
    }

    /// Payload of the document `raw_text` duplicates, if any.
    pub async fn find_duplicate<P: Clone>(
        &mut self,
        corpus: &Corpus<P>,
        raw_text: &str,
    ) -> Result<Option<P>> {
        Ok(self.check(corpus, raw_text).await?.into_payload())
    }

    /// Like [`find_duplicate`](Self::find_duplicate), keeping the score and
    /// how the decision was reached.
    pub async fn check<P: Clone>(&mut self, corpus: &Corpus<P>, raw_text: &str) -> Result<Verdict<P>> {
        let Some(best) = self.best_match(corpus, raw_text) else {
            return Ok(Verdict::Unique);
        };
        let ScoredEntry { entry, similarity, bucket } = best;

        if similarity > self.similarity.safe {
            tracing::debug!(similarity, %bucket, "duplicate accepted");
            return Ok(Verdict::Accepted { payload: entry.payload.clone(), similarity, bucket });
        }

        // indexed text first, incoming text second
        if self.escalator.resolve(&entry.raw_text, raw_text, similarity).await? {
            Ok(Verdict::Confirmed { payload: entry.payload.clone(), similarity, bucket })
        } else {
            Ok(Verdict::Rejected { similarity, bucket })
        }
    }

    /// Best candidate above the similarity floor, never escalated.
    pub fn best_match<P: Clone>(&self, corpus: &Corpus<P>, raw_text: &str) -> Option<ScoredEntry<P>> {
        corpus.best_match(raw_text, self.similarity.min)
    }

    pub fn similarity(&self) -> &SimilarityConfig {
        &self.similarity
    }

    pub fn escalator(&self) -> &Escalator<R> {
        &self.escalator
    }
}
