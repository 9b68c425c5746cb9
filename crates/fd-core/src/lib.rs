pub mod config;
pub mod error;
pub mod record;

pub use config::{BucketThresholds, CacheConfig, DedupConfig, SimilarityConfig};
pub use error::{FdError, Result};
pub use record::FeedbackRecord;
