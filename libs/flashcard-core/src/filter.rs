//! Card filtering by search text, tags and familiarity.

use crate::collection::Collection;
use crate::types::{Familiarity, Flashcard};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How selected tags combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagLogic {
    /// Card must carry every selected tag.
    All,
    /// Card must carry at least one selected tag.
    Any,
}

impl Default for TagLogic {
    fn default() -> Self {
        Self::Any
    }
}

impl TagLogic {
    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::Any,
            Self::Any => Self::All,
        }
    }
}

/// Filter settings shared by the card list and review sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    pub search: String,
    pub tags: Vec<String>,
    pub tag_logic: TagLogic,
    familiarities: BTreeSet<Familiarity>,
}

impl Default for CardFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            tags: Vec::new(),
            tag_logic: TagLogic::default(),
            familiarities: Familiarity::ALL.into_iter().collect(),
        }
    }
}

impl CardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>, logic: TagLogic) -> Self {
        self.tags = tags;
        self.tag_logic = logic;
        self
    }

    /// Restrict to the given tiers. An empty list keeps every tier.
    pub fn with_familiarities(mut self, tiers: &[Familiarity]) -> Self {
        if !tiers.is_empty() {
            self.familiarities = tiers.iter().copied().collect();
        }
        self
    }

    pub fn familiarities(&self) -> &BTreeSet<Familiarity> {
        &self.familiarities
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }

    /// Toggle a tier. The last selected tier cannot be turned off; returns
    /// whether the selection changed.
    pub fn toggle_familiarity(&mut self, familiarity: Familiarity) -> bool {
        if self.familiarities.contains(&familiarity) {
            if self.familiarities.len() == 1 {
                return false;
            }
            self.familiarities.remove(&familiarity);
        } else {
            self.familiarities.insert(familiarity);
        }
        true
    }

    pub fn matches(&self, card: &Flashcard) -> bool {
        self.matches_search(card) && self.matches_tags(card) && self.familiarities.contains(&card.familiarity)
    }

    fn matches_search(&self, card: &Flashcard) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        card.question.to_lowercase().contains(&needle) || card.answer.to_lowercase().contains(&needle)
    }

    fn matches_tags(&self, card: &Flashcard) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        match self.tag_logic {
            TagLogic::All => self.tags.iter().all(|t| card.has_tag(t)),
            TagLogic::Any => self.tags.iter().any(|t| card.has_tag(t)),
        }
    }

    /// The filtered view, in collection order.
    pub fn apply(&self, collection: &Collection) -> Vec<Flashcard> {
        collection.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}
