//! Behavioural tests for `MatchSearcher` using rstest-bdd.
#![expect(
    clippy::expect_used,
    reason = "behaviour tests fail fast when fixtures are malformed"
)]

use std::cell::RefCell;
use std::sync::Arc;

use dealflow_core::test_support::{MemoryStore, RecordingSink, ScriptedGenerator};
use dealflow_core::{
    CandidateKind, CandidateRecord, ResultSink, ResultSinkError, SearchMode, SearchRecord,
    SearchRequest, SearchResponse, Searcher,
};
use dealflow_scorer::KeywordScorer;
use dealflow_search::MatchSearcher;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

const QUERY: &str = "fintech seed London";
const FOUNDER: &str = "founder-1";

/// Shared state for search scenarios.
#[derive(Default)]
struct SearchWorld {
    records: RefCell<Vec<CandidateRecord>>,
    replies: RefCell<Option<Vec<String>>>,
    sink: RefCell<Option<Arc<RecordingSink>>>,
    response: RefCell<Option<SearchResponse>>,
}

impl SearchWorld {
    fn push(&self, kind: CandidateKind, id: &str, fields: serde_json::Value) {
        let record =
            CandidateRecord::from_json(kind, Some(id.to_owned()), fields).expect("valid record");
        self.records.borrow_mut().push(record);
    }

    fn search(&self, mode: SearchMode) {
        let store = MemoryStore::with_records(self.records.borrow().clone());
        let generator = match self.replies.borrow().clone() {
            Some(replies) => ScriptedGenerator::replying(replies),
            None => ScriptedGenerator::failing(),
        };
        let mut searcher = MatchSearcher::new(store, generator, KeywordScorer::new());
        if let Some(sink) = self.sink.borrow().as_ref() {
            searcher = searcher.with_sink(Box::new(SharedSink(Arc::clone(sink))));
        }
        let response = searcher
            .search(&SearchRequest::new(QUERY, mode, FOUNDER))
            .expect("search succeeds");
        self.response.replace(Some(response));
    }

    fn response(&self) -> SearchResponse {
        self.response.borrow().clone().expect("search should have run")
    }
}

/// Shares a recording sink between the world and the searcher.
struct SharedSink(Arc<RecordingSink>);

impl ResultSink for SharedSink {
    fn record(&self, record: &SearchRecord<'_>) -> Result<(), ResultSinkError> {
        self.0.record(record)
    }
}

#[fixture]
fn world() -> SearchWorld {
    SearchWorld::default()
}

#[given("stored angels in fintech, biotech and climate")]
fn given_angels(#[from(world)] world: &SearchWorld) {
    world.push(
        CandidateKind::Angel,
        "a-bio",
        json!({"full_name": "Rosalind", "categories": "biotech", "location": "Boston"}),
    );
    world.push(
        CandidateKind::Angel,
        "a-fin",
        json!({
            "full_name": "Ada",
            "investment_categories": ["fintech", "payments"],
            "investment_stages": "seed",
            "city": "London, UK",
            "reputation": 60
        }),
    );
    world.push(
        CandidateKind::Angel,
        "a-clim",
        json!({"full_name": "Wangari", "sectors": "climate", "stages": "seed"}),
    );
}

#[given("twenty-five stored funds in fintech")]
fn given_funds(#[from(world)] world: &SearchWorld) {
    for index in 0..25 {
        world.push(
            CandidateKind::Fund,
            &format!("f{index:02}"),
            json!({"fund_name": format!("Fund {index}"), "focus_areas": "fintech"}),
        );
    }
}

#[given("a generator that expands the query to fintech, seed and london")]
fn given_expanding_generator(#[from(world)] world: &SearchWorld) {
    world.replies.replace(Some(vec![
        r#"{"categories": ["fintech"], "stages": ["seed"], "locations": ["london"]}"#.to_owned(),
        "Ada is the strongest fit.".to_owned(),
    ]));
}

#[given("a generator that is unavailable")]
fn given_unavailable_generator(#[from(world)] world: &SearchWorld) {
    world.replies.replace(None);
}

#[given("a sink recording searches")]
fn given_sink(#[from(world)] world: &SearchWorld) {
    world.sink.replace(Some(Arc::new(RecordingSink::default())));
}

#[when("the founder searches angels for \"fintech seed London\"")]
fn when_search_angels(#[from(world)] world: &SearchWorld) {
    world.search(SearchMode::Angels);
}

#[when("the founder searches funds for \"fintech seed London\"")]
fn when_search_funds(#[from(world)] world: &SearchWorld) {
    world.search(SearchMode::Funds);
}

#[then("the first result is the fintech angel")]
fn then_fintech_first(#[from(world)] world: &SearchWorld) {
    let response = world.response();
    let first = response.results.first().expect("at least one result");
    assert_eq!(first.candidate.id.as_str(), "a-fin");
    assert_eq!(response.results.len(), 3);
    assert_eq!(response.summary, "Ada is the strongest fit.");
}

#[then("every result carries a match reason")]
fn then_reasons(#[from(world)] world: &SearchWorld) {
    for result in world.response().results {
        assert!(!result.breakdown.reason.is_empty());
    }
}

#[then("the keywords contain only the raw query")]
fn then_raw_query(#[from(world)] world: &SearchWorld) {
    let response = world.response();
    assert_eq!(response.keywords.categories(), ["fintech seed london"]);
    assert!(response.keywords.stages().is_empty());
    assert!(response.keywords.locations().is_empty());
}

#[then("the summary is empty")]
fn then_summary_empty(#[from(world)] world: &SearchWorld) {
    assert!(world.response().summary.is_empty());
}

#[then("the sink holds one search for the founder")]
fn then_sink_recorded(#[from(world)] world: &SearchWorld) {
    let sink = world.sink.borrow().clone().expect("sink should be set");
    let recorded = sink.recorded();
    assert_eq!(recorded.len(), 1);
    let search = recorded.first().expect("one search");
    assert_eq!(search.user_id, FOUNDER);
    assert_eq!(search.query, QUERY);
    assert_eq!(search.mode, SearchMode::Angels);
    assert_eq!(search.candidate_ids.first().map(String::as_str), Some("a-fin"));
}

#[then("twenty results are returned")]
fn then_twenty(#[from(world)] world: &SearchWorld) {
    let response = world.response();
    assert_eq!(response.results.len(), 20);
    let ids: Vec<&str> = response
        .results
        .iter()
        .map(|result| result.candidate.id.as_str())
        .collect();
    assert_eq!(ids.first(), Some(&"f00"));
    assert_eq!(ids.last(), Some(&"f19"));
}

#[scenario(path = "tests/features/searcher.feature", index = 0)]
fn closest_angel_first(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/searcher.feature", index = 1)]
fn unavailable_generator(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/searcher.feature", index = 2)]
fn persisted_search(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/searcher.feature", index = 3)]
fn fund_results_capped(world: SearchWorld) {
    let _ = world;
}
