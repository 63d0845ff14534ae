//! `MatchSearcher`: the end-to-end search pipeline.

use dealflow_core::{
    Candidate, CandidateKind, CandidateStore, QueryExpansion, ResultSink, Scorer, SearchError,
    SearchLimits, SearchRecord, SearchRequest, SearchResponse, SearchResult, Searcher,
    TextGenerator,
};

use crate::{expand_query, rank_results, summarise_results};

/// Configuration for [`MatchSearcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSearcherConfig {
    /// Result limits per search mode.
    pub limits: SearchLimits,
    /// Whether to request a summary of the ranked results.
    pub summarise: bool,
}

impl Default for MatchSearcherConfig {
    fn default() -> Self {
        Self {
            limits: SearchLimits::default(),
            summarise: true,
        }
    }
}

/// Search pipeline matching founders' queries against stored investors.
///
/// The searcher is generic over the pipeline boundaries: a read-only
/// candidate store, a text generator used for keyword expansion and
/// summaries, and a scorer. A [`ResultSink`] may be attached with
/// [`MatchSearcher::with_sink`]; without one nothing is persisted.
pub struct MatchSearcher<S, G, C>
where
    S: CandidateStore,
    G: TextGenerator,
    C: Scorer,
{
    store: S,
    generator: G,
    scorer: C,
    config: MatchSearcherConfig,
    sink: Option<Box<dyn ResultSink>>,
}

impl<S, G, C> MatchSearcher<S, G, C>
where
    S: CandidateStore,
    G: TextGenerator,
    C: Scorer,
{
    /// Construct a searcher using default configuration.
    pub fn new(store: S, generator: G, scorer: C) -> Self {
        Self::with_config(store, generator, scorer, MatchSearcherConfig::default())
    }

    /// Construct a searcher with explicit configuration.
    pub const fn with_config(
        store: S,
        generator: G,
        scorer: C,
        config: MatchSearcherConfig,
    ) -> Self {
        Self {
            store,
            generator,
            scorer,
            config,
            sink: None,
        }
    }

    /// Persist ranked results to `sink` after every search.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchSearcherConfig {
        &self.config
    }

    /// Fetch and normalise every candidate of `kind`.
    ///
    /// Read failures yield an empty list; records without a stable
    /// identifier are skipped.
    fn load_candidates(&self, kind: CandidateKind) -> Vec<Candidate> {
        let records = match self.store.fetch_candidates(kind) {
            Ok(records) => records,
            Err(err) => {
                log::error!("failed to fetch {kind} candidates: {err}");
                return Vec::new();
            }
        };
        records
            .into_iter()
            .filter_map(|record| match record.normalise() {
                Ok(candidate) => Some(candidate),
                Err(err) => {
                    log::warn!("skipping candidate: {err}");
                    None
                }
            })
            .collect()
    }

    fn score_candidates(
        &self,
        candidates: Vec<Candidate>,
        request: &SearchRequest,
        keywords: &QueryExpansion,
    ) -> Vec<SearchResult> {
        let scored: Vec<SearchResult> = candidates
            .into_iter()
            .map(|candidate| {
                let breakdown = self.scorer.score(&candidate, keywords);
                SearchResult {
                    candidate,
                    breakdown,
                }
            })
            .collect();
        rank_results(scored, self.config.limits.for_mode(request.mode))
    }

    fn persist(&self, request: &SearchRequest, summary: &str, results: &[SearchResult]) {
        let Some(sink) = self.sink.as_deref() else {
            return;
        };
        let record = SearchRecord {
            user_id: &request.user_id,
            query: &request.query,
            mode: request.mode,
            summary,
            results,
        };
        if let Err(err) = sink.record(&record) {
            log::warn!("failed to persist search results: {err}");
        }
    }
}

impl<S, G, C> Searcher for MatchSearcher<S, G, C>
where
    S: CandidateStore,
    G: TextGenerator,
    C: Scorer,
{
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        request.validate()?;

        let keywords = expand_query(&self.generator, &request.query);
        let candidates = self.load_candidates(request.mode.kind());
        log::debug!(
            "scoring {} {} candidates against {keywords:?}",
            candidates.len(),
            request.mode
        );
        let results = self.score_candidates(candidates, request, &keywords);

        let summary = if self.config.summarise {
            summarise_results(&self.generator, &request.query, request.mode, &results)
        } else {
            String::new()
        };
        self.persist(request, &summary, &results);

        Ok(SearchResponse {
            results,
            keywords,
            summary,
        })
    }
}
