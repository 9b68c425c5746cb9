//! SimHash fingerprints over character bigrams, and bounded Hamming distance.
//!
//! Similar bigram multisets produce fingerprints a few bits apart; unrelated
//! ones land around half the width (32 bits) apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::sha256_u64;

pub const FINGERPRINT_BITS: u32 = 64;

/// A 64-bit SimHash fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Exact Hamming distance (XOR + popcount).
    pub fn distance(&self, other: &Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Overlapping character bigrams, stride 1. Fewer than two chars yields none.
pub fn bigrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|w| w.iter().collect()).collect()
}

/// Fingerprint of an already normalized text.
///
/// Every bigram occurrence votes +1 on the bits set in its hash and -1 on
/// the others; a bit is set when its vote sum is non-negative. No bigrams
/// gives the all-zero fingerprint.
pub fn fingerprint(normalized: &str) -> Fingerprint {
    let grams = bigrams(normalized);
    if grams.is_empty() {
        return Fingerprint::default();
    }

    let mut votes = [0i64; FINGERPRINT_BITS as usize];
    for gram in &grams {
        let h = sha256_u64(gram);
        for (i, vote) in votes.iter_mut().enumerate() {
            if (h >> i) & 1 == 1 {
                *vote += 1;
            } else {
                *vote -= 1;
            }
        }
    }

    let mut out = 0u64;
    for (i, vote) in votes.iter().enumerate() {
        if *vote >= 0 {
            out |= 1u64 << i;
        }
    }
    Fingerprint(out)
}

/// Hamming distance that stops counting once it exceeds `max_dist`.
///
/// A result above `max_dist` only says "too far"; it is not the exact distance.
#[inline]
pub fn hamming_distance(a: Fingerprint, b: Fingerprint, max_dist: u32) -> u32 {
    let mut diff = a.0 ^ b.0;
    let mut dist = 0;
    while diff != 0 {
        dist += 1;
        if dist > max_dist {
            break;
        }
        // clear lowest differing bit
        diff &= diff - 1;
    }
    dist
}
