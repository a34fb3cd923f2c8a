//! Duplicate detection and conflict resolution for incoming cards.
//!
//! Incoming cards (from import or batch create) are matched against the
//! collection by normalized question. Clean cards are added right away;
//! collisions are handed back as [`Conflict`]s to be decided one at a time.
//!
//! Duplicates inside one batch are paired against the first card seen with
//! that question only. Chains are not merged transitively.

use crate::collection::Collection;
use crate::types::{generate_card_id, question_key, Flashcard};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An incoming card whose question is already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub existing: Flashcard,
    pub incoming: Flashcard,
}

/// Which answer survives a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "answer")]
pub enum AnswerChoice {
    Existing,
    Incoming,
    Custom(String),
}

impl Conflict {
    pub fn answer_for(&self, choice: &AnswerChoice) -> String {
        match choice {
            AnswerChoice::Existing => self.existing.answer.clone(),
            AnswerChoice::Incoming => self.incoming.answer.clone(),
            AnswerChoice::Custom(text) => text.clone(),
        }
    }

    pub fn resolve(&self, choice: &AnswerChoice) -> Flashcard {
        resolve_one(self, self.answer_for(choice))
    }
}

/// Incoming cards split into clean additions and conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingResolution {
    pub to_add: Vec<Flashcard>,
    pub conflicts: Vec<Conflict>,
}

/// Outcome of merging a batch into a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub conflicts: Vec<Conflict>,
}

/// Partition incoming cards against the existing collection.
///
/// Every incoming card ends up either in `to_add` or as the `incoming` side
/// of exactly one conflict.
pub fn resolve_incoming(existing: &Collection, incoming: Vec<Flashcard>) -> IncomingResolution {
    let mut known: HashMap<String, &Flashcard> = HashMap::with_capacity(existing.len());
    let mut ids: HashSet<&str> = HashSet::with_capacity(existing.len());
    for card in existing {
        known.entry(card.question_key()).or_insert(card);
        ids.insert(card.id.as_str());
    }

    let mut staged: HashMap<String, usize> = HashMap::new();
    let mut staged_ids: HashSet<String> = HashSet::new();
    let mut resolution = IncomingResolution::default();

    for mut card in incoming {
        let key = card.question_key();
        if let Some(found) = known.get(&key) {
            resolution.conflicts.push(Conflict {
                existing: (*found).clone(),
                incoming: card,
            });
        } else if let Some(&idx) = staged.get(&key) {
            resolution.conflicts.push(Conflict {
                existing: resolution.to_add[idx].clone(),
                incoming: card,
            });
        } else {
            // Staged ids are final so batch conflicts point at the stored card.
            if card.id.is_empty() || ids.contains(card.id.as_str()) || staged_ids.contains(&card.id) {
                let fresh = generate_card_id();
                tracing::debug!(old_id = %card.id, new_id = %fresh, "reassigning colliding card id");
                card.id = fresh;
            }
            staged_ids.insert(card.id.clone());
            staged.insert(key, resolution.to_add.len());
            resolution.to_add.push(card);
        }
    }

    resolution
}

/// The surviving card for a conflict: the existing card with its answer replaced.
pub fn resolve_one(conflict: &Conflict, chosen_answer: impl Into<String>) -> Flashcard {
    Flashcard {
        answer: chosen_answer.into(),
        ..conflict.existing.clone()
    }
}

/// Write resolved cards back, in order.
///
/// Each resolution replaces the card with the same normalized question, or is
/// appended if there is none. A replaced card keeps its own id.
pub fn apply_resolutions(collection: &Collection, resolutions: &[Flashcard]) -> Collection {
    let mut next = collection.cards().to_vec();

    for resolved in resolutions {
        let key = resolved.question_key();
        match next.iter().position(|c| c.question_key() == key) {
            Some(idx) => {
                next[idx] = Flashcard {
                    id: std::mem::take(&mut next[idx].id),
                    ..resolved.clone()
                }
            }
            None => next.push(resolved.clone()),
        }
    }

    let mut collection = Collection::new();
    collection.append(next);
    collection
}

impl Collection {
    /// Add the clean part of a batch now and return the conflicts.
    pub fn merge_incoming(&mut self, incoming: Vec<Flashcard>) -> MergeReport {
        if incoming.is_empty() {
            return MergeReport::default();
        }

        let total = incoming.len();
        let IncomingResolution { to_add, conflicts } = resolve_incoming(self, incoming);
        let added = to_add.len();
        self.append(to_add);

        tracing::info!(total, added, conflicts = conflicts.len(), "merged incoming cards");
        MergeReport { added, conflicts }
    }

    pub fn apply_resolutions(&mut self, resolutions: &[Flashcard]) {
        if resolutions.is_empty() {
            return;
        }
        *self = apply_resolutions(self, resolutions);
    }
}

/// Conflicts awaiting a decision, handled strictly in detection order.
///
/// Resolutions are only released once the last conflict is decided; cancelling
/// drops all of them.
#[derive(Debug, Clone, Default)]
pub struct ConflictQueue {
    conflicts: Vec<Conflict>,
    resolutions: Vec<Flashcard>,
    released: bool,
}

impl ConflictQueue {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self {
            resolutions: Vec::with_capacity(conflicts.len()),
            conflicts,
            released: false,
        }
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// 1-based position of the current conflict.
    pub fn position(&self) -> usize {
        (self.resolutions.len() + 1).min(self.conflicts.len())
    }

    pub fn current(&self) -> Option<&Conflict> {
        self.conflicts.get(self.resolutions.len())
    }

    pub fn is_complete(&self) -> bool {
        self.resolutions.len() >= self.conflicts.len()
    }

    /// Decide the current conflict. Returns every resolution once the last
    /// conflict has been decided; the queue then stays complete.
    pub fn decide(&mut self, choice: &AnswerChoice) -> Option<Vec<Flashcard>> {
        let resolved = self.current()?.resolve(choice);
        self.resolutions.push(resolved);

        if self.is_complete() {
            self.released = true;
            Some(self.resolutions.clone())
        } else {
            None
        }
    }

    /// Abandon the queue, returning how many decisions were discarded.
    ///
    /// Nothing is discarded once the resolutions have been released.
    pub fn cancel(self) -> usize {
        if self.released {
            return 0;
        }
        if !self.resolutions.is_empty() {
            tracing::info!(discarded = self.resolutions.len(), "conflict resolution cancelled");
        }
        self.resolutions.len()
    }
}
