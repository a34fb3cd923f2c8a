//! Import and export command tests.

mod common;

use common::fixtures::{self, card, sample_cards};
use common::TestContext;
use flashcard_core::Familiarity;
use flashcards_cli::cli::ConflictStrategy;
use flashcards_cli::commands::deck;
use pretty_assertions::assert_eq;

/// Test several files import as one batch and bad files are only counted.
#[tokio::test]
async fn test_import_multiple_files_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let first = fixtures::write_file(dir.path(), "first.json", &fixtures::plain_import("rust", 3));
    let broken = fixtures::write_file(dir.path(), "broken.json", "[{\"question\": ");
    let second = fixtures::write_file(dir.path(), "second.json", &fixtures::plain_import("go", 2));
    let missing = dir.path().join("missing.json");
    let mut t = TestContext::new();

    let summary = deck::import(
        &mut t.ctx,
        &[first, broken.clone(), second, missing.clone()],
        ConflictStrategy::Ask,
    )
    .await
    .unwrap();

    assert_eq!(summary.files, 4);
    assert_eq!(summary.cards, 5);
    assert_eq!(summary.merge.added, 5);
    let mut failed = summary.failed_files.clone();
    failed.sort();
    let mut expected = vec![broken.display().to_string(), missing.display().to_string()];
    expected.sort();
    assert_eq!(failed, expected);

    let ids: Vec<&str> = t.collection().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["rust-1", "rust-2", "rust-3", "go-1", "go-2"]);
    assert_eq!(t.saved().len(), 5);
    assert!(t.output().contains("2 file(s) could not be imported"));
}

/// Test labelled records, tag strings and skipped records.
#[tokio::test]
async fn test_import_labelled_records() {
    let dir = tempfile::tempdir().unwrap();
    let content = r#"[
        {"题目id": 12, "问题": "首都?", "答案": "北京", "标签": "地理，中国,", "熟悉度": "陌生"},
        {"问题": "   ", "答案": "no question"},
        "not a card"
    ]"#;
    let path = fixtures::write_file(dir.path(), "cards.json", content);
    let mut t = TestContext::new();

    let summary = deck::import(&mut t.ctx, &[path], ConflictStrategy::Ask).await.unwrap();

    assert_eq!(summary.cards, 1);
    assert_eq!(summary.skipped, 2);
    let card = &t.collection().cards()[0];
    assert_eq!(card.id, "12");
    assert_eq!(card.tags, vec!["地理", "中国"]);
    assert_eq!(card.familiarity, Familiarity::Unfamiliar);
}

/// Test a normalized question match is a conflict, not an addition.
#[tokio::test]
async fn test_import_conflict_keep_existing() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixtures::write_file(
        dir.path(),
        "dup.json",
        r#"[{"question": "what is 2+2? ", "answer": "four"}, {"question": "New one?", "answer": "yes"}]"#,
    );
    let mut t = TestContext::with_cards(
        vec![card("card-1", "What is 2+2?", "4", &[], Familiarity::Unknown)],
        "",
    );

    let summary = deck::import(&mut t.ctx, &[path], ConflictStrategy::KeepExisting)
        .await
        .unwrap();

    assert_eq!(summary.merge.added, 1);
    assert_eq!(summary.merge.conflicts, 1);
    assert_eq!(t.collection().len(), 2);
    assert_eq!(t.collection().get("card-1").unwrap().answer, "4");
}

/// Test taking the imported answer keeps the existing card's identity.
#[tokio::test]
async fn test_import_conflict_use_incoming() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixtures::write_file(
        dir.path(),
        "dup.json",
        r#"{"id": "other", "question": "CAPITAL OF FRANCE?", "answer": "Paris, France", "tags": ["x"]}"#,
    );
    let mut t = TestContext::with_cards(sample_cards(), "");

    deck::import(&mut t.ctx, &[path], ConflictStrategy::UseIncoming)
        .await
        .unwrap();

    let card = t.saved().get("card-2").cloned().unwrap();
    assert_eq!(card.question, "Capital of France?");
    assert_eq!(card.answer, "Paris, France");
    assert_eq!(card.tags, vec!["geo", "europe"]);
    assert_eq!(card.familiarity, Familiarity::Familiar);
    assert!(t.saved().get("other").is_none());
}

/// Test cancelling resolution keeps clean additions and drops decisions.
#[tokio::test]
async fn test_import_conflict_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixtures::write_file(
        dir.path(),
        "dup.json",
        r#"[
            {"question": "What is 2+2?", "answer": "four"},
            {"question": "Largest ocean?", "answer": "The Pacific"},
            {"question": "Fresh?", "answer": "yes"}
        ]"#,
    );
    let mut t = TestContext::with_cards(sample_cards(), "2\nc\n");

    let summary = deck::import(&mut t.ctx, &[path], ConflictStrategy::Ask).await.unwrap();

    assert_eq!(summary.merge.added, 1);
    assert_eq!(summary.merge.conflicts, 2);
    assert_eq!(summary.merge.discarded, Some(1));
    assert_eq!(t.collection().len(), 5);
    assert_eq!(t.collection().get("card-1").unwrap().answer, "4");
    assert_eq!(t.collection().get("card-3").unwrap().answer, "Pacific");
    assert!(t.output().contains("cancelled"));
}

/// Test exporting an empty collection writes nothing.
#[tokio::test]
async fn test_export_empty_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = TestContext::new();

    let written = deck::export(&mut t.ctx, dir.path()).await.unwrap();

    assert_eq!(written, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Test an export imports back into an empty collection unchanged.
#[tokio::test]
async fn test_export_then_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = TestContext::with_cards(sample_cards(), "");

    let path = deck::export(&mut source.ctx, dir.path()).await.unwrap().unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("flashcards-export-"));
    assert!(name.ends_with(".json"));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"熟悉度\": \"熟悉\""));

    let mut target = TestContext::new();
    let summary = deck::import(&mut target.ctx, &[path], ConflictStrategy::Ask)
        .await
        .unwrap();

    assert_eq!(summary.merge.conflicts, 0);
    assert_eq!(*target.collection(), *source.collection());
}

/// Test JSON output of an import summary.
#[tokio::test]
async fn test_import_summary_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixtures::write_file(dir.path(), "a.json", &fixtures::plain_import("py", 2));
    let mut t = TestContext::new().json();

    deck::import(&mut t.ctx, &[path], ConflictStrategy::Ask).await.unwrap();

    let summary = t.output_json();
    assert_eq!(summary["files"], 1);
    assert_eq!(summary["cards"], 2);
    assert_eq!(summary["added"], 2);
    assert_eq!(summary["failed_files"], serde_json::json!([]));
}

/// Test answering a duplicate prompt in JSON mode leaves the output parseable.
#[tokio::test]
async fn test_import_json_with_asked_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixtures::write_file(
        dir.path(),
        "dup.json",
        r#"[{"question": "What is 2+2?", "answer": "four"}, {"question": "Fresh?", "answer": "yes"}]"#,
    );
    let mut t = TestContext::with_cards(sample_cards(), "2\n").json();

    deck::import(&mut t.ctx, &[path], ConflictStrategy::Ask).await.unwrap();

    let summary = t.output_json();
    assert_eq!(summary["added"], 1);
    assert_eq!(summary["conflicts"], 1);
    assert_eq!(summary["resolved"], 1);
    assert_eq!(t.saved().get("card-1").unwrap().answer, "four");
}
