//! Expansion of a free-text founder query into keyword sets.
//!
//! The generator is asked for a JSON object with `categories`, `stages` and
//! `locations` arrays. Replies are parsed leniently: prose or markdown fences
//! around the object are ignored. Any failure falls back to
//! [`QueryExpansion::fallback`], so expansion never fails.

use dealflow_core::{CompletionRequest, QueryExpansion, TextGenerator};

const EXPANSION_SYSTEM: &str = "You extract structured search keywords for a startup investor \
     database. Reply with JSON only.";
const EXPANSION_MAX_TOKENS: u32 = 256;
const EXPANSION_TEMPERATURE: f32 = 0.0_f32;

/// Build the completion request used to expand `query`.
///
/// # Examples
/// ```
/// use dealflow_search::expansion_request;
///
/// let request = expansion_request("fintech seed London");
/// assert!(request.prompt.contains("fintech seed London"));
/// assert!(request.system.is_some());
/// ```
#[must_use]
pub fn expansion_request(query: &str) -> CompletionRequest {
    let prompt = format!(
        "Turn the founder's search query into keywords for matching investors.\n\n\
         Query: \"{query}\"\n\n\
         Respond with ONLY a JSON object of the form \
         {{\"categories\": [...], \"stages\": [...], \"locations\": [...]}}. \
         Categories are industries or sectors, including close synonyms. \
         Stages are funding stages such as \"pre-seed\", \"seed\" or \"series a\". \
         Locations are cities, regions or countries. Use lowercase strings and \
         empty arrays for anything the query does not mention."
    );
    CompletionRequest::new(prompt)
        .with_system(EXPANSION_SYSTEM)
        .with_max_tokens(EXPANSION_MAX_TOKENS)
        .with_temperature(EXPANSION_TEMPERATURE)
}

/// Expand `query` into keyword sets using `generator`.
///
/// A blank query expands to the empty set without calling the generator.
/// Generation failures, unparsable replies and replies with no keywords all
/// fall back to the raw query as the single category keyword.
#[must_use]
pub fn expand_query<G>(generator: &G, query: &str) -> QueryExpansion
where
    G: TextGenerator + ?Sized,
{
    if query.trim().is_empty() {
        return QueryExpansion::default();
    }
    let reply = match generator.complete(&expansion_request(query)) {
        Ok(reply) => reply,
        Err(err) => {
            log::warn!("keyword expansion failed, using raw query: {err}");
            return QueryExpansion::fallback(query);
        }
    };
    match parse_expansion(&reply) {
        Some(keywords) if !keywords.is_empty() => keywords,
        Some(_) => {
            log::warn!("keyword expansion returned no keywords, using raw query");
            QueryExpansion::fallback(query)
        }
        None => QueryExpansion::fallback(query),
    }
}

/// Parse a generator reply into keyword sets.
///
/// Returns `None` (after logging) when no JSON object can be decoded.
pub(crate) fn parse_expansion(content: &str) -> Option<QueryExpansion> {
    let json = extract_json_object(content).unwrap_or(content);
    match serde_json::from_str::<QueryExpansion>(json) {
        Ok(keywords) => Some(keywords),
        Err(err) => {
            log::warn!("failed to parse keyword expansion: {err}. Raw: {content}");
            None
        }
    }
}

/// Slice from the first `{` to the last `}`, if both exist in that order.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    content.get(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealflow_core::TextGenerationError;
    use dealflow_core::test_support::ScriptedGenerator;
    use rstest::rstest;

    #[rstest]
    fn parses_clean_object() {
        let keywords = parse_expansion(
            r#"{"categories": ["fintech"], "stages": ["seed"], "locations": ["london"]}"#,
        )
        .unwrap_or_default();
        assert_eq!(keywords.categories(), ["fintech"]);
        assert_eq!(keywords.stages(), ["seed"]);
        assert_eq!(keywords.locations(), ["london"]);
    }

    #[rstest]
    #[case("Here you go:\n{\"categories\": [\"AI\"]}\nGood luck!")]
    #[case("```json\n{\"categories\": [\"ai\"], \"stages\": []}\n```")]
    fn parses_object_embedded_in_text(#[case] reply: &str) {
        let keywords = parse_expansion(reply).unwrap_or_default();
        assert_eq!(keywords.categories(), ["ai"]);
    }

    #[rstest]
    #[case("no json here")]
    #[case("} backwards {")]
    #[case("{\"categories\": \"not a list\"}")]
    fn rejects_unparsable_replies(#[case] reply: &str) {
        assert!(parse_expansion(reply).is_none());
    }

    #[rstest]
    fn generator_failure_falls_back_to_query() {
        let generator = ScriptedGenerator::new([Err(TextGenerationError::EmptyCompletion)]);
        let keywords = expand_query(&generator, "Climate Tech");
        assert_eq!(keywords.categories(), ["climate tech"]);
        assert!(keywords.stages().is_empty());
    }

    #[rstest]
    fn empty_expansion_falls_back_to_query() {
        let generator = ScriptedGenerator::replying([
            r#"{"categories": [], "stages": [], "locations": []}"#,
        ]);
        let keywords = expand_query(&generator, "robotics");
        assert_eq!(keywords.categories(), ["robotics"]);
    }

    #[rstest]
    fn blank_query_skips_the_generator() {
        let generator = ScriptedGenerator::failing();
        let keywords = expand_query(&generator, "   ");
        assert!(keywords.is_empty());
        assert!(generator.requests().is_empty());
    }

    #[rstest]
    fn prompt_embeds_the_query() {
        let generator = ScriptedGenerator::replying([r#"{"categories": ["saas"]}"#]);
        let _keywords = expand_query(&generator, "saas in Berlin");
        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert!(
            requests
                .first()
                .is_some_and(|request| request.prompt.contains("saas in Berlin"))
        );
    }
}
