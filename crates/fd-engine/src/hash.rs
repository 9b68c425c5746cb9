//! Content hashes shared by the normalizer, the fingerprint and the decision cache.

use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-1 of `text`. Decision keys and URL tokens use this so
/// files written by earlier tooling keep matching.
pub fn sha1_hex(text: &str) -> String {
    format!("{:x}", Sha1::digest(text.as_bytes()))
}

/// First 8 bytes of the SHA-256 of `text`, big-endian.
pub fn sha256_u64(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}
