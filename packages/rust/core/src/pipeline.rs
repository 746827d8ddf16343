//! End-to-end plagiarism check pipeline: text → sentences → sources → scores.
//!
//! Four stages, each a synchronization barrier: segment and truncate, look
//! up candidate sources (bounded fan-out), fetch and score (bounded
//! fan-out), aggregate. Per-item network failures are absorbed inside the
//! stage that sees them; a sentence that cannot be resolved simply drops
//! out of the report instead of failing the check.

use std::time::Instant;

use tracing::{info, instrument};

use copyscan_fetch::Fetcher;
use copyscan_search::SearchClient;
use copyscan_shared::{
    AggregateReport, CandidateReference, CheckId, MatchResult, PipelineConfig, Result,
    SentenceUnit,
};
use copyscan_text::{SentenceSegmenter, normalize, similarity};

use crate::pool::WorkerPool;

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting check status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new pipeline stage.
    fn stage(&self, name: &str);
    /// Called once segmentation has settled how many sentences will be checked.
    fn sentences(&self, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &AggregateReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _name: &str) {}
    fn sentences(&self, _total: usize) {}
    fn done(&self, _report: &AggregateReport) {}
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives the four-stage check pipeline and owns its concurrency bounds.
///
/// Holds no per-request state: one orchestrator serves any number of
/// sequential or concurrent checks.
#[derive(Debug, Clone)]
pub struct CheckOrchestrator {
    config: PipelineConfig,
    segmenter: SentenceSegmenter,
    search: SearchClient,
    fetcher: Fetcher,
}

impl CheckOrchestrator {
    /// Create an orchestrator around injected collaborators.
    pub fn new(config: PipelineConfig, search: SearchClient, fetcher: Fetcher) -> Self {
        Self {
            config,
            segmenter: SentenceSegmenter::new(),
            search,
            fetcher,
        }
    }

    /// Run a full plagiarism check over `text`.
    ///
    /// Never fails on behalf of an individual sentence; the only error this
    /// returns is an internal fault outside the per-item boundaries.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn run(
        &self,
        text: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<AggregateReport> {
        let start = Instant::now();
        let check_id = CheckId::new();
        info!(%check_id, "starting plagiarism check");

        // --- Stage 1: Segment & truncate ---
        progress.stage("Segmenting text");
        let sentences = self.prepare_sentences(text);
        let total_sentences = sentences.len();
        progress.sentences(total_sentences);

        if sentences.is_empty() {
            // Nothing to check is a trivial report, not a failure.
            info!(%check_id, "no sentences to check");
            let report = AggregateReport::no_matches(0);
            progress.done(&report);
            return Ok(report);
        }

        // --- Stage 2: Parallel source lookup ---
        progress.stage("Searching for candidate sources");
        let lookup_pool = WorkerPool::new(self.config.lookup_pool_size);
        let search = self.search.clone();
        let urls = lookup_pool
            .map(sentences.clone(), move |unit: SentenceUnit| {
                let search = search.clone();
                async move { search.find_source(&unit.text).await }
            })
            .await?;

        let candidates: Vec<CandidateReference> = sentences
            .iter()
            .zip(urls)
            .map(|(unit, url)| CandidateReference {
                sentence_index: unit.index,
                url,
            })
            .collect();

        let with_source = candidates.iter().filter(|c| c.url.is_some()).count();
        info!(%check_id, with_source, total = total_sentences, "source lookup complete");

        if with_source == 0 {
            let report = AggregateReport::no_matches(total_sentences);
            progress.done(&report);
            info!(%check_id, "no candidate sources found");
            return Ok(report);
        }

        // --- Stage 3: Parallel fetch & score ---
        progress.stage("Fetching and scoring sources");
        let work: Vec<(String, String)> = sentences
            .iter()
            .zip(&candidates)
            .filter_map(|(unit, candidate)| {
                candidate.url.clone().map(|url| (unit.text.clone(), url))
            })
            .collect();

        let score_pool = WorkerPool::new(self.config.fetch_pool_size);
        let fetcher = self.fetcher.clone();
        let scored = score_pool
            .map(work, move |(sentence, url): (String, String)| {
                let fetcher = fetcher.clone();
                async move {
                    let content = fetcher.fetch_content(&url).await;
                    if content.is_empty() {
                        // Unscorable: the page yielded no comparison text.
                        return None;
                    }
                    let score = similarity(&sentence, &content);
                    Some(MatchResult {
                        sentence,
                        url,
                        similarity: score,
                    })
                }
            })
            .await?;

        // --- Stage 4: Aggregate ---
        progress.stage("Aggregating results");
        let results: Vec<MatchResult> = scored.into_iter().flatten().collect();
        let report = AggregateReport::from_matches(results, total_sentences);
        progress.done(&report);

        info!(
            %check_id,
            matched = report.matched_sentences,
            total = report.total_sentences,
            overall = report.overall_similarity,
            elapsed_ms = start.elapsed().as_millis(),
            "plagiarism check complete"
        );

        Ok(report)
    }

    /// Segment raw text, normalize each sentence, and apply the cap.
    ///
    /// Segmentation runs before normalization so the boundary model still
    /// sees the terminators it splits on; sentences that normalize to
    /// nothing are dropped, and indexes are reassigned in document order.
    fn prepare_sentences(&self, text: &str) -> Vec<SentenceUnit> {
        let mut sentences: Vec<SentenceUnit> = self
            .segmenter
            .segment(text)
            .into_iter()
            .filter_map(|unit| {
                let normalized = normalize(&unit.text);
                (!normalized.is_empty()).then_some(normalized)
            })
            .enumerate()
            .map(|(index, text)| SentenceUnit { index, text })
            .collect();

        if sentences.len() > self.config.max_sentences {
            info!(
                total = sentences.len(),
                cap = self.config.max_sentences,
                "truncating sentence list to cap"
            );
            sentences.truncate(self.config.max_sentences);
        }

        sentences
    }
}
