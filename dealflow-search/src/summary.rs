//! Short natural-language summaries of ranked results.

use dealflow_core::{CompletionRequest, SearchMode, SearchResult, TextGenerator};

const SUMMARY_SYSTEM: &str = "You are an analyst helping a startup founder shortlist investors. \
     Be concise and factual.";
const SUMMARY_RESULTS: usize = 5;
const SUMMARY_MAX_TOKENS: u32 = 300;

/// Build the completion request summarising the top results for `query`.
#[must_use]
pub fn summary_request(
    query: &str,
    mode: SearchMode,
    results: &[SearchResult],
) -> CompletionRequest {
    let mut listing = String::new();
    for (rank, result) in results.iter().take(SUMMARY_RESULTS).enumerate() {
        let candidate = &result.candidate;
        listing.push_str(&format!(
            "{}. {} (score {:.2}; {}; location: {})\n",
            rank.saturating_add(1),
            candidate.name,
            result.breakdown.overall,
            result.breakdown.reason,
            candidate.location,
        ));
    }
    let prompt = format!(
        "A founder searched {mode} for: \"{query}\".\n\nTop matches:\n{listing}\n\
         In two or three sentences, summarise why these investors fit the search \
         and which one to contact first."
    );
    CompletionRequest::new(prompt)
        .with_system(SUMMARY_SYSTEM)
        .with_max_tokens(SUMMARY_MAX_TOKENS)
}

/// Summarise `results`, returning an empty string when there is nothing to
/// summarise or the generator fails.
#[must_use]
pub fn summarise_results<G>(
    generator: &G,
    query: &str,
    mode: SearchMode,
    results: &[SearchResult],
) -> String
where
    G: TextGenerator + ?Sized,
{
    if results.is_empty() {
        return String::new();
    }
    match generator.complete(&summary_request(query, mode, results)) {
        Ok(summary) => summary.trim().to_owned(),
        Err(err) => {
            log::warn!("result summary failed: {err}");
            String::new()
        }
    }
}
