//! JSON parser for imported card files.
//!
//! # Format
//! A file holds one card object or an array of them. Field names are looked up
//! through a list of aliases, first match wins:
//!
//! ```json
//! [
//!   { "题目id": "card-1", "问题": "What is Rust?", "答案": "A language",
//!     "标签": "lang, systems", "熟悉度": "陌生" },
//!   { "id": 2, "question": "Borrowing?", "answer": "References",
//!     "tags": ["lang"], "familiarity": "familiar" }
//! ]
//! ```
//!
//! Tags may be an array or a string split on `,` or `，`. A missing ID is
//! generated; a missing or unknown familiarity becomes `Unknown`.

use crate::error::ImportError;
use crate::types::{generate_card_id, split_tags, Familiarity, Flashcard};
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["题目id", "id"];
const QUESTION_KEYS: &[&str] = &["问题", "question"];
const ANSWER_KEYS: &[&str] = &["答案", "answer"];
const TAG_KEYS: &[&str] = &["tags", "标签"];
const FAMILIARITY_KEYS: &[&str] = &["熟悉度", "familiarity"];

/// Cards read from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    pub cards: Vec<Flashcard>,
    /// Records that were not objects or had no question.
    pub skipped: usize,
}

/// A file that could not be parsed.
#[derive(Debug)]
pub struct FileFailure {
    pub name: String,
    pub error: ImportError,
}

/// Combined result of importing several files.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Cards from every file that parsed, in file order.
    pub cards: Vec<Flashcard>,
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl ImportReport {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

/// Parse one file's content.
pub fn parse(content: &str) -> Result<ParsedFile, ImportError> {
    let value: Value = serde_json::from_str(content)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => return Err(ImportError::UnexpectedShape),
    };

    let mut parsed = ParsedFile::default();
    for (index, record) in records.iter().enumerate() {
        match record.as_object().and_then(card_from_record) {
            Some(card) => parsed.cards.push(card),
            None => {
                tracing::warn!(index, "skipping record without a question");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Parse several files, isolating failures per file.
pub fn parse_files<I, N, C>(files: I) -> ImportReport
where
    I: IntoIterator<Item = (N, C)>,
    N: Into<String>,
    C: AsRef<str>,
{
    let mut report = ImportReport::default();

    for (name, content) in files {
        let name = name.into();
        match parse(content.as_ref()) {
            Ok(parsed) => {
                tracing::debug!(file = %name, cards = parsed.cards.len(), "parsed import file");
                report.cards.extend(parsed.cards);
                report.skipped += parsed.skipped;
            }
            Err(error) => {
                tracing::error!(file = %name, %error, "failed to parse import file");
                report.failures.push(FileFailure { name, error });
            }
        }
    }

    report
}

fn card_from_record(record: &Map<String, Value>) -> Option<Flashcard> {
    let question = text_field(record, QUESTION_KEYS)?;
    if question.trim().is_empty() {
        return None;
    }

    Some(Flashcard {
        id: text_field(record, ID_KEYS).unwrap_or_else(generate_card_id),
        question,
        answer: text_field(record, ANSWER_KEYS).unwrap_or_default(),
        tags: tags_field(record),
        familiarity: text_field(record, FAMILIARITY_KEYS)
            .and_then(|s| Familiarity::parse(&s))
            .unwrap_or_default(),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find_map(scalar_text)
}

fn tags_field(record: &Map<String, Value>) -> Vec<String> {
    for key in TAG_KEYS {
        match record.get(*key) {
            Some(Value::Array(items)) => {
                return items
                    .iter()
                    .filter_map(scalar_text)
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            Some(Value::String(s)) if !s.trim().is_empty() => return split_tags(s),
            _ => {}
        }
    }
    Vec::new()
}
