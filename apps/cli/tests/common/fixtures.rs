//! Test fixtures and factory functions for creating test data.

use flashcard_core::{Familiarity, Flashcard};
use serde_json::json;
use std::path::{Path, PathBuf};

pub fn card(id: &str, question: &str, answer: &str, tags: &[&str], familiarity: Familiarity) -> Flashcard {
    Flashcard {
        id: id.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        familiarity,
    }
}

/// A small mixed collection.
pub fn sample_cards() -> Vec<Flashcard> {
    vec![
        card("card-1", "What is 2+2?", "4", &["math"], Familiarity::Unknown),
        card("card-2", "Capital of France?", "Paris", &["geo", "europe"], Familiarity::Familiar),
        card("card-3", "Largest ocean?", "Pacific", &["geo"], Familiarity::Unfamiliar),
        card("card-4", "Square root of 81?", "9", &["math"], Familiarity::MayForget),
    ]
}

/// Generate an import file with `count` cards using the plain field names.
pub fn plain_import(prefix: &str, count: usize) -> String {
    let records: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            json!({
                "id": format!("{prefix}-{i}"),
                "question": format!("{prefix} question {i}?"),
                "answer": format!("{prefix} answer {i}"),
                "tags": [prefix],
            })
        })
        .collect();
    serde_json::to_string(&records).expect("encode fixture")
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture file");
    path
}
