//! Escalation of ambiguous matches to a reviewer, memoized in a [`DecisionCache`].

use std::collections::VecDeque;

use async_trait::async_trait;
use fd_core::{FdError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin};

use crate::decision_cache::DecisionCache;

const SEPARATOR: &str = "======================================";

/// A pair waiting for a same/different answer.
#[derive(Debug, Clone, Copy)]
pub struct ReviewRequest<'a> {
    /// The indexed document.
    pub doc1: &'a str,
    /// The incoming document.
    pub doc2: &'a str,
    pub similarity: f64,
}

/// Source of same/different answers for ambiguous pairs.
#[async_trait]
pub trait Reviewer: Send {
    /// `true` when both documents are the same.
    async fn review(&mut self, request: &ReviewRequest<'_>) -> Result<bool>;
}

/// Asks on a line-oriented text channel; only `y` counts as "same".
pub struct ConsoleReviewer<R, W> {
    input: R,
    output: W,
}

impl ConsoleReviewer<BufReader<Stdin>, Stderr> {
    /// Prompt on stderr, read answers from stdin. Stdout stays free for reports.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> ConsoleReviewer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// The prompt shown for one pair, question line included.
pub fn format_prompt(request: &ReviewRequest<'_>) -> String {
    format!(
        "\n{SEPARATOR}\n\n{}\n\n ^^^^^^^^ Similarity = {:.4} vvvvvvvv\n\n{}\n\n{SEPARATOR}\n\nAre these 2 documents the same? (y/N) ",
        request.doc1, request.similarity, request.doc2
    )
}

#[async_trait]
impl<R, W> Reviewer for ConsoleReviewer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn review(&mut self, request: &ReviewRequest<'_>) -> Result<bool> {
        self.output.write_all(format_prompt(request).as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(FdError::ReviewerClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']) == "y")
    }
}

/// Answers every pair with a fixed value, for unattended runs.
#[derive(Debug, Clone, Copy)]
pub struct AutoReviewer {
    answer: bool,
}

impl AutoReviewer {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl Reviewer for AutoReviewer {
    async fn review(&mut self, request: &ReviewRequest<'_>) -> Result<bool> {
        tracing::info!(
            similarity = request.similarity,
            answer = self.answer,
            "ambiguous pair answered without review"
        );
        Ok(self.answer)
    }
}

/// Replays a fixed list of answers and records what it was asked.
/// Running out of answers behaves like a closed console.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReviewer {
    answers: VecDeque<bool>,
    asked: Vec<(String, String, f64)>,
}

impl ScriptedReviewer {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self { answers: answers.into_iter().collect(), asked: Vec::new() }
    }

    /// `(doc1, doc2, similarity)` for every review so far.
    pub fn asked(&self) -> &[(String, String, f64)] {
        &self.asked
    }
}

#[async_trait]
impl Reviewer for ScriptedReviewer {
    async fn review(&mut self, request: &ReviewRequest<'_>) -> Result<bool> {
        self.asked.push((request.doc1.to_string(), request.doc2.to_string(), request.similarity));
        self.answers.pop_front().ok_or(FdError::ReviewerClosed)
    }
}

/// Resolves ambiguous pairs from the cache, falling back to the reviewer.
pub struct Escalator<R> {
    cache: DecisionCache,
    reviewer: R,
}

impl<R: Reviewer> Escalator<R> {
    pub fn new(cache: DecisionCache, reviewer: R) -> Self {
        Self { cache, reviewer }
    }

    /// Cached answer for `(doc1, doc2)` if any, otherwise ask and remember.
    ///
    /// Arguments must keep the same order across calls to hit the cache,
    /// unless the cache uses symmetric keys.
    pub async fn resolve(&mut self, doc1: &str, doc2: &str, similarity: f64) -> Result<bool> {
        if let Some(value) = self.cache.get(doc1, doc2) {
            tracing::debug!(similarity, value, "decision cache hit");
            return Ok(value);
        }

        let request = ReviewRequest { doc1, doc2, similarity };
        let value = self.reviewer.review(&request).await?;
        self.cache.record(doc1, doc2, value);
        Ok(value)
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    pub fn reviewer(&self) -> &R {
        &self.reviewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReviewRequest<'static> {
        ReviewRequest { doc1: "first doc", doc2: "second doc", similarity: 0.86363 }
    }

    #[test]
    fn test_prompt_format() {
        let prompt = format_prompt(&request());
        assert!(prompt.contains("first doc"));
        assert!(prompt.contains("second doc"));
        assert!(prompt.contains("Similarity = 0.8636 "));
        assert!(prompt.trim_end().ends_with("(y/N)"));
        assert!(prompt.find("first doc").unwrap() < prompt.find("second doc").unwrap());
    }

    #[tokio::test]
    async fn test_console_yes() {
        let mut reviewer = ConsoleReviewer::new(&b"y\n"[..], Vec::new());
        assert!(reviewer.review(&request()).await.unwrap());
        let shown = String::from_utf8(reviewer.into_output()).unwrap();
        assert!(shown.contains("Are these 2 documents the same?"));
    }

    #[tokio::test]
    async fn test_console_crlf_yes() {
        let mut reviewer = ConsoleReviewer::new(&b"y\r\n"[..], Vec::new());
        assert!(reviewer.review(&request()).await.unwrap());
    }

    #[tokio::test]
    async fn test_console_anything_else_is_no() {
        for answer in [&b"n\n"[..], &b"\n"[..], &b"yes\n"[..], &b"Y\n"[..]] {
            let mut reviewer = ConsoleReviewer::new(answer, Vec::new());
            assert!(!reviewer.review(&request()).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_console_eof_is_error() {
        let mut reviewer = ConsoleReviewer::new(&b""[..], Vec::new());
        assert!(matches!(
            reviewer.review(&request()).await,
            Err(FdError::ReviewerClosed)
        ));
    }

    #[tokio::test]
    async fn test_escalator_caches_answer() {
        let reviewer = ConsoleReviewer::new(&b"y\n"[..], Vec::new());
        let mut escalator = Escalator::new(DecisionCache::in_memory(false), reviewer);
        assert!(escalator.resolve("a", "b", 0.7).await.unwrap());
        // input is exhausted; a second prompt would fail with ReviewerClosed
        assert!(escalator.resolve("a", "b", 0.7).await.unwrap());
        assert_eq!(escalator.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_escalator_does_not_cache_failures() {
        let reviewer = ConsoleReviewer::new(&b""[..], Vec::new());
        let mut escalator = Escalator::new(DecisionCache::in_memory(false), reviewer);
        assert!(escalator.resolve("a", "b", 0.7).await.is_err());
        assert!(escalator.cache().is_empty());
    }

    #[tokio::test]
    async fn test_auto_reviewer() {
        let mut escalator = Escalator::new(DecisionCache::in_memory(false), AutoReviewer::new(false));
        assert!(!escalator.resolve("a", "b", 0.7).await.unwrap());
        assert_eq!(escalator.cache().get("a", "b"), Some(false));
    }
}
