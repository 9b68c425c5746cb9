use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FdError, Result};

const CACHE_FILE_NAME: &str = "resolveSimilarity.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub similarity: SimilarityConfig,
    pub buckets: BucketThresholds,
    pub cache: CacheConfig,
}

/// Two-tier similarity thresholds. Matches above `safe` are accepted
/// outright; matches in `(min, safe]` go to a reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub safe: f64,
    pub min: f64,
}

/// Hamming distance thresholds (bits) for the three length buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub short: u32,
    pub medium: u32,
    pub long: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
    /// Sort the two content hashes before building a cache key, so a pair
    /// hits the cache regardless of argument order. Off by default: the
    /// historical key is order-sensitive and existing cache files rely on it.
    pub symmetric_keys: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { safe: 0.9, min: 0.6 }
    }
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            short: 12,
            medium: 8,
            long: 4,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            symmetric_keys: false,
        }
    }
}

/// `<data_dir>/feedback-dedup/resolveSimilarity.json`, or the bare file name
/// (relative to the working directory) when no data dir is known.
pub fn default_cache_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("feedback-dedup").join(CACHE_FILE_NAME),
        None => PathBuf::from(CACHE_FILE_NAME),
    }
}

impl DedupConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let SimilarityConfig { safe, min } = self.similarity;
        for (name, value) in [("similarity.safe", safe), ("similarity.min", min)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FdError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if min >= safe {
            return Err(FdError::InvalidConfig(format!(
                "similarity.min ({min}) must be below similarity.safe ({safe})"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DedupConfig::default();
        assert_eq!(config.similarity.safe, 0.9);
        assert_eq!(config.similarity.min, 0.6);
        assert_eq!(config.buckets.short, 12);
        assert_eq!(config.buckets.medium, 8);
        assert_eq!(config.buckets.long, 4);
        assert!(!config.cache.symmetric_keys);
        assert!(config.cache.path.ends_with(CACHE_FILE_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DedupConfig =
            serde_json::from_str(r#"{"similarity": {"safe": 0.95}, "buckets": {"long": 3}}"#).unwrap();
        assert_eq!(config.similarity.safe, 0.95);
        assert_eq!(config.similarity.min, 0.6);
        assert_eq!(config.buckets.short, 12);
        assert_eq!(config.buckets.long, 3);
    }

    #[test]
    fn test_min_not_below_safe_rejected() {
        let mut config = DedupConfig::default();
        config.similarity.min = 0.9;
        assert!(matches!(config.validate(), Err(FdError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut config = DedupConfig::default();
        config.similarity.safe = 1.5;
        assert!(matches!(config.validate(), Err(FdError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"cache": {{"path": "/tmp/decisions.json", "symmetric_keys": true}}}}"#
        )
        .unwrap();
        let config = DedupConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cache.path, PathBuf::from("/tmp/decisions.json"));
        assert!(config.cache.symmetric_keys);
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DedupConfig::from_file(file.path()),
            Err(FdError::Serialization(_))
        ));
    }
}
