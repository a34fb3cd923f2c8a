//! Core types for flashcard application.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// How well the user knows a card.
///
/// Ordered from least to most familiar. Every new card starts as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Familiarity {
    Unknown,
    Unfamiliar,
    MayForget,
    Familiar,
}

impl Default for Familiarity {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Familiarity {
    /// All tiers, least familiar first.
    pub const ALL: [Familiarity; 4] = [
        Self::Unknown,
        Self::Unfamiliar,
        Self::MayForget,
        Self::Familiar,
    ];

    /// Canonical key used in saved state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unfamiliar => "unfamiliar",
            Self::MayForget => "may_forget",
            Self::Familiar => "familiar",
        }
    }

    /// Display label used by exported card files.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "未知",
            Self::Unfamiliar => "陌生",
            Self::MayForget => "可能会忘",
            Self::Familiar => "熟悉",
        }
    }

    /// Parse either the canonical key or the display label.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.label() == s || f.as_str().eq_ignore_ascii_case(s))
    }

    /// Relative chance of being drawn in a review session.
    pub fn review_weight(self) -> u32 {
        match self {
            Self::Unknown => 8,
            Self::Unfamiliar => 5,
            Self::MayForget => 3,
            Self::Familiar => 1,
        }
    }
}

// Unrecognized or malformed tiers load as Unknown instead of failing the
// whole payload.
impl<'de> Deserialize<'de> for Familiarity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Self::parse).unwrap_or_default())
    }
}

/// Rating a user can give while reviewing.
///
/// `Unknown` is only ever an initial state, so it is not offered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Familiar,
    MayForget,
    Unfamiliar,
}

impl Feedback {
    pub fn familiarity(self) -> Familiarity {
        match self {
            Self::Familiar => Familiarity::Familiar,
            Self::MayForget => Familiarity::MayForget,
            Self::Unfamiliar => Familiarity::Unfamiliar,
        }
    }

    pub fn from_familiarity(familiarity: Familiarity) -> Option<Self> {
        match familiarity {
            Familiarity::Familiar => Some(Self::Familiar),
            Familiarity::MayForget => Some(Self::MayForget),
            Familiarity::Unfamiliar => Some(Self::Unfamiliar),
            Familiarity::Unknown => None,
        }
    }
}

/// A question/answer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub familiarity: Familiarity,
}

impl Flashcard {
    /// Create a new `Unknown` card with a freshly generated ID.
    pub fn new(question: impl Into<String>, answer: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: generate_card_id(),
            question: question.into(),
            answer: answer.into(),
            tags,
            familiarity: Familiarity::Unknown,
        }
    }

    /// Key used to detect duplicate questions.
    pub fn question_key(&self) -> String {
        question_key(&self.question)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A row of user input for creating or editing a card.
///
/// Tags are kept as the raw comma-separated string the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub tags: String,
}

impl CardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            tags: tags.into(),
        }
    }

    /// Whether both the question and the answer carry text.
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// Normalize a question for duplicate detection: trimmed and lowercased.
pub fn question_key(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Generate a new card ID.
pub fn generate_card_id() -> String {
    format!("card-{}", Uuid::new_v4().simple())
}

/// Split a tag string on ASCII or full-width commas.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split([',', '，'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags for display and export.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
