use std::io::Write;

use anyhow::Context;
use fd_core::{DedupConfig, FeedbackRecord};
use fd_engine::normalize::normalized_len;
use fd_engine::{buckets_for, fingerprint, normalize, Corpus, CorpusStats, DuplicateDetector, Reviewer, Verdict};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub records: usize,
    pub duplicates: usize,
    /// Lookups that needed a reviewer or a cached decision.
    pub reviewed: usize,
    pub corpus: CorpusStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DuplicateReport<'a> {
    id: &'a str,
    duplicate_of: &'a str,
    similarity: f64,
    decision: &'static str,
    comment: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidateReport<'a> {
    id: &'a str,
    candidate: &'a str,
    similarity: f64,
    bucket: String,
    would_review: bool,
}

#[derive(Debug, Serialize)]
pub struct FingerprintReport {
    pub normalized: String,
    pub length: usize,
    pub buckets: Vec<String>,
    pub fingerprint: String,
}

fn emit<W: Write, T: Serialize>(out: &mut W, report: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Run every record of a JSONL export through the detector in file order.
///
/// Duplicates are reported and left out of the corpus; everything else is
/// indexed under its record id.
pub async fn scan_records<R: Reviewer, W: Write>(
    config: &DedupConfig,
    content: &str,
    reviewer: R,
    dry_run: bool,
    out: &mut W,
) -> anyhow::Result<ScanSummary> {
    let mut detector = DuplicateDetector::from_config(config, reviewer)?;
    let mut corpus: Corpus<String> = Corpus::new(&config.buckets);
    let mut records = 0;
    let mut duplicates = 0;
    let mut reviewed = 0;

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = FeedbackRecord::parse(line).with_context(|| format!("line {}", idx + 1))?;
        records += 1;

        if dry_run {
            let mut accepted = false;
            if let Some(best) = detector.best_match(&corpus, &record.comment) {
                accepted = best.similarity > config.similarity.safe;
                emit(out, &CandidateReport {
                    id: &record.id,
                    candidate: &best.entry.payload,
                    similarity: best.similarity,
                    bucket: best.bucket.to_string(),
                    would_review: !accepted,
                })?;
            }
            if !accepted {
                corpus.add(record.comment, record.id);
            }
            continue;
        }

        let verdict = detector.check(&corpus, &record.comment).await?;
        let (payload, similarity, decision) = match verdict {
            Verdict::Accepted { payload, similarity, .. } => (payload, similarity, "auto"),
            Verdict::Confirmed { payload, similarity, .. } => {
                reviewed += 1;
                (payload, similarity, "reviewed")
            }
            Verdict::Rejected { .. } => {
                reviewed += 1;
                corpus.add(record.comment, record.id);
                continue;
            }
            Verdict::Unique => {
                corpus.add(record.comment, record.id);
                continue;
            }
        };

        duplicates += 1;
        emit(out, &DuplicateReport {
            id: &record.id,
            duplicate_of: &payload,
            similarity,
            decision,
            comment: &record.comment,
        })?;
    }

    Ok(ScanSummary { records, duplicates, reviewed, corpus: corpus.stats() })
}

pub fn inspect(text: &str) -> FingerprintReport {
    let normalized = normalize(text);
    let length = normalized_len(&normalized);
    FingerprintReport {
        buckets: buckets_for(length).iter().map(|b| b.to_string()).collect(),
        fingerprint: fingerprint(&normalized).to_string(),
        normalized,
        length,
    }
}
