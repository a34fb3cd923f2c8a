//! JSON export of the whole collection.
//!
//! Records use the same labelled field names the importer reads first, so an
//! exported file imports back to the same cards.

use crate::collection::Collection;
use crate::types::{join_tags, Flashcard};
use chrono::NaiveDate;
use serde::Serialize;

/// One exported card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    #[serde(rename = "题目id")]
    pub id: String,
    #[serde(rename = "问题")]
    pub question: String,
    #[serde(rename = "答案")]
    pub answer: String,
    #[serde(rename = "标签")]
    pub tags: String,
    #[serde(rename = "熟悉度")]
    pub familiarity: String,
}

impl From<&Flashcard> for ExportRecord {
    fn from(card: &Flashcard) -> Self {
        Self {
            id: card.id.clone(),
            question: card.question.clone(),
            answer: card.answer.clone(),
            tags: join_tags(&card.tags),
            familiarity: card.familiarity.label().to_string(),
        }
    }
}

/// Serialize the collection. Returns `None` for an empty collection.
pub fn export_payload(collection: &Collection) -> serde_json::Result<Option<String>> {
    if collection.is_empty() {
        return Ok(None);
    }
    let records: Vec<ExportRecord> = collection.iter().map(ExportRecord::from).collect();
    serde_json::to_string_pretty(&records).map(Some)
}

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("flashcards-export-{}.json", date.format("%Y-%m-%d"))
}
