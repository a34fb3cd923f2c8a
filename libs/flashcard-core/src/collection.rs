//! The card collection and its edit operations.
//!
//! Every mutation builds the next card list and swaps it in whole, so a
//! failed operation never leaves a half-applied change behind.

use crate::error::{CardError, Result};
use crate::types::{generate_card_id, question_key, split_tags, CardDraft, Familiarity, Flashcard};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Ordered set of cards, unique by normalized question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    cards: Vec<Flashcard>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing card list (e.g. restored from storage) as-is.
    pub fn from_cards(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Flashcard> {
        self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flashcard> {
        self.cards.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Find the card whose question matches after normalization.
    pub fn find_by_question(&self, question: &str) -> Option<&Flashcard> {
        let key = question_key(question);
        self.cards.iter().find(|c| c.question_key() == key)
    }

    /// Distinct tags across all cards, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        self.cards
            .iter()
            .flat_map(|c| c.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn replace(&mut self, next: Vec<Flashcard>) {
        self.cards = next;
    }

    /// Append cards, giving a fresh ID to any card whose ID is already taken.
    pub fn append(&mut self, cards: Vec<Flashcard>) {
        if cards.is_empty() {
            return;
        }

        let mut ids: HashSet<String> = self.cards.iter().map(|c| c.id.clone()).collect();
        let mut next = self.cards.clone();
        next.reserve(cards.len());

        for mut card in cards {
            if card.id.is_empty() || ids.contains(&card.id) {
                let fresh = generate_card_id();
                tracing::debug!(old_id = %card.id, new_id = %fresh, "reassigning colliding card id");
                card.id = fresh;
            }
            ids.insert(card.id.clone());
            next.push(card);
        }

        self.replace(next);
    }

    /// Set a card's familiarity tier.
    pub fn set_familiarity(&mut self, id: &str, familiarity: Familiarity) -> Result<()> {
        if self.get(id).is_none() {
            return Err(CardError::NotFound(id.to_string()));
        }

        let next = self
            .cards
            .iter()
            .map(|c| {
                if c.id == id {
                    Flashcard {
                        familiarity,
                        ..c.clone()
                    }
                } else {
                    c.clone()
                }
            })
            .collect();
        self.replace(next);
        Ok(())
    }

    /// Edit a card's question, answer and tags.
    ///
    /// Question and answer are trimmed and must be non-empty. A question that
    /// collides with a different card is rejected and nothing changes.
    pub fn update_card(&mut self, id: &str, draft: &CardDraft) -> Result<Flashcard> {
        let question = draft.question.trim();
        let answer = draft.answer.trim();
        if question.is_empty() {
            return Err(CardError::EmptyField { field: "question" });
        }
        if answer.is_empty() {
            return Err(CardError::EmptyField { field: "answer" });
        }

        let current = self
            .get(id)
            .ok_or_else(|| CardError::NotFound(id.to_string()))?;

        let key = question_key(question);
        if self.cards.iter().any(|c| c.id != id && c.question_key() == key) {
            return Err(CardError::DuplicateQuestion {
                question: question.to_string(),
            });
        }

        let updated = Flashcard {
            question: question.to_string(),
            answer: answer.to_string(),
            tags: split_tags(&draft.tags),
            ..current.clone()
        };

        let next = self
            .cards
            .iter()
            .map(|c| if c.id == id { updated.clone() } else { c.clone() })
            .collect();
        self.replace(next);
        Ok(updated)
    }

    /// Remove a card, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Flashcard> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| CardError::NotFound(id.to_string()))?;
        let next = self.cards.iter().filter(|c| c.id != id).cloned().collect();
        self.replace(next);
        Ok(removed)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Flashcard;
    type IntoIter = std::slice::Iter<'a, Flashcard>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Turn batch-create rows into new cards.
///
/// Rows missing a question or an answer are dropped. Fails if nothing is left.
pub fn create_cards(rows: &[CardDraft]) -> Result<Vec<Flashcard>> {
    let cards: Vec<Flashcard> = rows
        .iter()
        .filter(|r| r.is_complete())
        .map(|r| Flashcard::new(r.question.trim(), r.answer.trim(), split_tags(&r.tags)))
        .collect();

    if cards.is_empty() {
        return Err(CardError::NoValidRows);
    }
    Ok(cards)
}
