//! Unit tests for the SQLite adapters.

use camino::Utf8PathBuf;
use dealflow_core::{
    AngelRecord, Candidate, CandidateId, CandidateKind, CandidateRecord, CandidateStore,
    CandidateStoreError, DraftStore, DraftStoreError, FundRecord, MatchBreakdown, MessageDraft,
    ResultSink, SearchMode, SearchRecord, SearchResult,
};
use rstest::{fixture, rstest};
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

use super::*;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

fn db_path(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join("nested/dealflow.db")).expect("utf-8 path")
}

fn angel(id: serde_json::Value, name: &str) -> CandidateRecord {
    CandidateRecord::Angel(AngelRecord {
        id: Some(id),
        name: Some(name.to_owned()),
        categories: Some("fintech".to_owned()),
        ..AngelRecord::default()
    })
}

fn result(id: &str, kind: CandidateKind, overall: f32) -> SearchResult {
    SearchResult {
        candidate: Candidate::new(CandidateId::new(id).expect("valid id"), kind, id),
        breakdown: MatchBreakdown {
            overall,
            reason: format!("category match: {id}"),
            ..MatchBreakdown::zero()
        },
    }
}

fn search(mode: SearchMode, results: &[SearchResult]) -> SearchRecord<'_> {
    SearchRecord {
        user_id: "founder-1",
        query: "fintech seed London",
        mode,
        summary: "Two fintech angels.",
        results,
    }
}

/// Run `sql` through a second connection to the database at `path`.
fn seed(path: &Utf8PathBuf, sql: &str) {
    Connection::open(path.as_std_path())
        .expect("open database")
        .execute_batch(sql)
        .expect("seed database");
}

fn count(connection: &Connection, table: &str) -> i64 {
    connection
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count rows")
}

#[rstest]
fn schema_rejects_newer_versions() {
    let mut connection = Connection::open_in_memory().expect("in-memory database");
    initialise_schema(&mut connection).expect("create schema");
    connection
        .execute("UPDATE dealflow_schema_version SET version = 2", [])
        .expect("bump version");

    let err = initialise_schema(&mut connection).expect_err("version mismatch");

    assert!(matches!(
        err,
        SchemaError::VersionMismatch {
            expected: 1,
            found: 2
        }
    ));
}

#[rstest]
fn import_then_fetch_round_trips_records(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let records = vec![
        angel(json!("a2"), "Grace"),
        angel(json!(1), "Ada"),
        CandidateRecord::Fund(FundRecord {
            id: Some(json!("f1")),
            name: Some("Northwind".to_owned()),
            website: Some("https://northwind.example".to_owned()),
            ..FundRecord::default()
        }),
    ];

    let summary = persist_candidates_to_sqlite(&path, &records).expect("import");
    assert_eq!(summary, ImportSummary {
        imported: 3,
        skipped: 0
    });

    let store = SqliteCandidateStore::open(&path).expect("open store");
    let angels = store
        .fetch_candidates(CandidateKind::Angel)
        .expect("read angels");
    let names: Vec<String> = angels
        .into_iter()
        .map(|record| record.normalise().expect("normalise").name)
        .collect();
    assert_eq!(names, ["Ada", "Grace"]);

    let funds = store
        .fetch_candidates(CandidateKind::Fund)
        .expect("read funds");
    let fund = funds
        .into_iter()
        .next()
        .expect("one fund")
        .normalise()
        .expect("normalise");
    assert_eq!(fund.website.as_deref(), Some("https://northwind.example"));
}

#[rstest]
fn import_skips_records_without_identifier() {
    let mut connection = Connection::open_in_memory().expect("in-memory database");
    let anonymous = CandidateRecord::Angel(AngelRecord {
        name: Some("Nameless".to_owned()),
        profile_url: Some("https://linkedin.example/nameless".to_owned()),
        ..AngelRecord::default()
    });

    let summary =
        persist_candidates(&mut connection, &[anonymous, angel(json!("a1"), "Ada")])
            .expect("import");

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(count(&connection, "angels"), 1);
}

#[rstest]
fn undecodable_rows_are_skipped(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let store = SqliteCandidateStore::open(&path).expect("open store");
    seed(
        &path,
        "INSERT INTO funds (id, fields) VALUES ('f1', 'not json'), ('f2', '{\"fund_name\": \"Spree\"}')",
    );

    let funds = store.fetch_candidates(CandidateKind::Fund).expect("read");

    assert_eq!(funds.len(), 1);
    let fund = funds
        .into_iter()
        .next()
        .expect("one fund")
        .normalise()
        .expect("normalise");
    assert_eq!(fund.id.as_str(), "f2");
    assert_eq!(fund.name, "Spree");
}

#[rstest]
fn missing_table_reports_read_error(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let store = SqliteCandidateStore::open(&path).expect("open store");
    seed(&path, "DROP TABLE angels");

    let err = store
        .fetch_candidates(CandidateKind::Angel)
        .expect_err("table is gone");

    assert!(matches!(
        err,
        CandidateStoreError::Read {
            kind: CandidateKind::Angel,
            ..
        }
    ));
}

#[rstest]
fn parse_rejects_non_arrays() {
    let err = parse_candidate_records(
        camino::Utf8Path::new("angels.json"),
        CandidateKind::Angel,
        r#"{"id": "a1"}"#,
    )
    .expect_err("object is not an array");
    assert!(matches!(err, LoadCandidatesError::NotAnArray { .. }));
}

#[rstest]
fn parse_reports_offending_index() {
    let err = parse_candidate_records(
        camino::Utf8Path::new("angels.json"),
        CandidateKind::Angel,
        r#"[{"id": "a1"}, "not a record"]"#,
    )
    .expect_err("second element is invalid");
    assert!(matches!(err, LoadCandidatesError::InvalidRecord { index: 1, .. }));
}

#[rstest]
fn batches_report_one_summary_per_source(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let angels = [angel(json!("a1"), "Ada"), angel(json!("a2"), "Grace")];
    let funds = [CandidateRecord::Fund(FundRecord {
        id: Some(json!("f1")),
        name: Some("Northwind".to_owned()),
        ..FundRecord::default()
    })];

    let summaries =
        persist_candidate_batches_to_sqlite(&path, &[&angels, &funds]).expect("persist batches");

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].imported, 2);
    assert_eq!(summaries[1].imported, 1);
    let connection = open_database(&path).expect("reopen database");
    assert_eq!(count(&connection, "angels"), 2);
    assert_eq!(count(&connection, "funds"), 1);
}

#[rstest]
fn failing_batch_rolls_back_earlier_batches(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let mut connection = open_database(&path).expect("open database");
    initialise_schema(&mut connection).expect("initialise schema");
    connection
        .execute_batch(
            "CREATE TRIGGER reject_funds BEFORE INSERT ON funds \
             BEGIN SELECT RAISE(ABORT, 'funds are read-only'); END;",
        )
        .expect("install trigger");
    let angels = [angel(json!("a1"), "Ada")];
    let funds = [CandidateRecord::Fund(FundRecord {
        id: Some(json!("f1")),
        ..FundRecord::default()
    })];

    let err = persist_candidate_batches(&mut connection, &[&angels, &funds])
        .expect_err("fund insert is rejected");

    assert!(matches!(err, PersistCandidatesError::Sqlite { .. }));
    assert_eq!(count(&connection, "angels"), 0);
}

#[rstest]
fn parse_accepts_rows_with_mixed_field_spellings() {
    let records = parse_candidate_records(
        camino::Utf8Path::new("angels.json"),
        CandidateKind::Angel,
        r#"[{"id": "a1", "name": "Ada", "full_name": "Ada Lovelace", "score": 50, "reputation_score": 70}]"#,
    )
    .expect("mixed spellings parse");
    let candidate = records
        .into_iter()
        .next()
        .expect("one record")
        .normalise()
        .expect("normalise");
    assert_eq!(candidate.name, "Ada");
    assert_eq!(candidate.reputation, Some(50.0));
}

#[rstest]
fn sink_logs_results_and_upserts_saved_items(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let sink = SqliteResultSink::open(&path).expect("open sink");
    let first = [
        result("a1", CandidateKind::Angel, 0.9),
        result("a2", CandidateKind::Angel, 0.4),
    ];
    let second = [result("a1", CandidateKind::Angel, 0.5)];

    sink.record(&search(SearchMode::Angels, &first))
        .expect("first search");
    sink.record(&search(SearchMode::Angels, &second))
        .expect("second search");

    let connection = Connection::open(path.as_std_path()).expect("reopen");
    assert_eq!(count(&connection, "match_results"), 3);
    assert_eq!(count(&connection, "saved_items"), 2);

    let (status, kind, summary): (String, String, String) = connection
        .query_row(
            "SELECT status, candidate_kind, summary FROM match_results LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .expect("read result row");
    assert_eq!(status, "new");
    assert_eq!(kind, "angel");
    assert_eq!(summary, "Two fintech angels.");

    let (score, notes): (f64, String) = connection
        .query_row(
            "SELECT score, notes FROM saved_items WHERE user_id = 'founder-1' AND item_id = 'a1'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("read saved item");
    assert!((score - 0.5).abs() < 1e-6, "upsert should refresh the score");
    assert_eq!(notes, "category match: a1");
}

#[rstest]
fn sink_failure_leaves_both_tables_untouched(temp_dir: TempDir) {
    let path = db_path(&temp_dir);
    let sink = SqliteResultSink::open(&path).expect("open sink");
    seed(
        &path,
        "CREATE TRIGGER reject_saved BEFORE INSERT ON saved_items
         BEGIN SELECT RAISE(ABORT, 'saved_items offline'); END;",
    );
    let results = [result("f1", CandidateKind::Fund, 0.7)];

    let err = sink
        .record(&search(SearchMode::Funds, &results))
        .expect_err("trigger aborts the write");

    assert!(err.to_string().contains("founder-1"));
    let connection = Connection::open(path.as_std_path()).expect("reopen");
    assert_eq!(count(&connection, "match_results"), 0);
    assert_eq!(count(&connection, "saved_items"), 0);
}

#[rstest]
fn draft_store_assigns_ids_and_timestamps(temp_dir: TempDir) {
    let store = SqliteDraftStore::open(&db_path(&temp_dir)).expect("open store");
    let draft = MessageDraft {
        recipient_id: "a1".to_owned(),
        recipient_kind: CandidateKind::Angel,
        recipient_name: "Ada".to_owned(),
        company_context: "Payments for clinics".to_owned(),
        content: "Hi Ada,".to_owned(),
        user_id: "founder-1".to_owned(),
    };

    let first = store.save_draft(&draft).expect("first draft");
    let second = store.save_draft(&draft).expect("second draft");

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert!(!first.created_at.is_empty());
    assert_eq!(second.draft, draft);
}

#[rstest]
#[case("   ", "founder-1", "content")]
#[case("Hi Ada,", "", "user_id")]
fn draft_store_rejects_blank_fields(
    #[case] content: &str,
    #[case] user_id: &str,
    #[case] expected: &str,
) {
    let store = SqliteDraftStore::from_connection(
        Connection::open_in_memory().expect("in-memory database"),
    )
    .expect("schema");
    let draft = MessageDraft {
        recipient_id: "a1".to_owned(),
        recipient_kind: CandidateKind::Angel,
        recipient_name: "Ada".to_owned(),
        company_context: String::new(),
        content: content.to_owned(),
        user_id: user_id.to_owned(),
    };

    let err = store.save_draft(&draft).expect_err("blank field");

    match err {
        DraftStoreError::BlankField { field } => assert_eq!(field, expected),
        other => panic!("expected blank field error, got {other:?}"),
    }
}
