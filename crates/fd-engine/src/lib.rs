//! Near-duplicate detection for short user-submitted texts.
//!
//! Pipeline:
//! 1. Normalize — fold URLs into hash tokens, strip punctuation and whitespace
//! 2. Fingerprint — 64-bit SimHash over character bigrams
//! 3. Prune — per-bucket Hamming threshold, buckets chosen by length
//! 4. Rank — bigram Dice similarity on the survivors
//! 5. Decide — accept, drop, or ask a reviewer (answers are cached on disk)

pub mod bucket;
pub mod corpus;
pub mod decision_cache;
pub mod detector;
pub mod escalator;
pub mod file_store;
pub mod fingerprint;
pub mod hash;
pub mod normalize;
pub mod similarity;

pub use bucket::{buckets_for, BucketKind, Entry, ScoredEntry};
pub use corpus::{Corpus, CorpusStats};
pub use decision_cache::{Decision, DecisionCache};
pub use detector::{DuplicateDetector, Verdict};
pub use escalator::{AutoReviewer, ConsoleReviewer, Escalator, ReviewRequest, Reviewer, ScriptedReviewer};
pub use fingerprint::{fingerprint, hamming_distance, Fingerprint};
pub use normalize::normalize;
pub use similarity::similarity;
