//! Weighted random review sessions.
//!
//! A session walks the filtered card set, drawing one card at a time with a
//! roulette-wheel pick weighted by familiarity (see
//! [`Familiarity::review_weight`]). Unseen cards are drawn first so every card
//! is shown once before the session reports completion.
//!
//! The session never owns the cards. Callers pass the current filtered view
//! on every call, so edits and deletions made elsewhere are picked up on the
//! next step.

use crate::collection::Collection;
use crate::types::{Feedback, Flashcard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Duration;

/// Delay between rating a card and drawing the next one.
pub const PACING_DELAY: Duration = Duration::from_millis(200);

/// Pick one card by familiarity weight.
///
/// Draws a uniform value in `[0, total)` and returns the first card whose
/// cumulative weight exceeds it. Among equal weights the walk order decides
/// which boundary is crossed, so ties are positional rather than uniform.
pub fn weighted_pick<'a, R: Rng + ?Sized>(pool: &[&'a Flashcard], rng: &mut R) -> Option<&'a Flashcard> {
    let total: u32 = pool.iter().map(|c| c.familiarity.review_weight()).sum();
    if total == 0 {
        return None;
    }

    let draw = rng.gen_range(0..total);
    let mut running = 0;
    for &card in pool {
        running += card.familiarity.review_weight();
        if running > draw {
            return Some(card);
        }
    }
    pool.last().copied()
}

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No card drawn yet.
    Idle,
    Presenting,
    /// Rated; the next draw is scheduled.
    Pacing,
    /// Every card in the pool has been shown.
    Finished,
    Closed,
}

/// Result of a session step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStep {
    Presenting { card_id: String },
    Finished { total: usize },
    Closed,
    /// Nothing happened (closed session, stale draw, or nothing to react to).
    Unchanged,
}

/// A draw scheduled after feedback.
///
/// Only valid while no other draw has happened and the session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingDraw {
    epoch: u64,
}

/// How far through the pool a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub seen: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.seen as f64 / self.total as f64 * 100.0
        }
    }
}

/// State of one review flow.
#[derive(Debug)]
pub struct ReviewSession<R = StdRng> {
    rng: R,
    current: Option<String>,
    seen: HashSet<String>,
    phase: SessionPhase,
    epoch: u64,
}

impl ReviewSession<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a session with a fixed seed (for testing).
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ReviewSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ReviewSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            current: None,
            seen: HashSet::new(),
            phase: SessionPhase::Idle,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current card, looked up in the caller's view.
    pub fn current_card<'a>(&self, filtered: &'a [Flashcard]) -> Option<&'a Flashcard> {
        let id = self.current.as_deref()?;
        filtered.iter().find(|c| c.id == id)
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn progress(&self, filtered: &[Flashcard]) -> Progress {
        Progress {
            seen: self.seen_in(filtered),
            total: filtered.len(),
        }
    }

    /// Whether every card in `filtered` has been shown since the last restart.
    ///
    /// Once true, the next draw request ends in [`ReviewStep::Finished`].
    pub fn is_complete(&self, filtered: &[Flashcard]) -> bool {
        self.current.is_some() && self.seen_in(filtered) >= filtered.len()
    }

    fn seen_in(&self, filtered: &[Flashcard]) -> usize {
        filtered.iter().filter(|c| self.seen.contains(&c.id)).count()
    }

    /// Begin the session. An empty view closes it without presenting anything.
    pub fn start(&mut self, filtered: &[Flashcard]) -> ReviewStep {
        if self.phase != SessionPhase::Idle {
            return ReviewStep::Unchanged;
        }
        self.draw(filtered)
    }

    /// Draw the next card without rating the current one.
    pub fn skip(&mut self, filtered: &[Flashcard]) -> ReviewStep {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Pacing => self.draw(filtered),
            _ => ReviewStep::Unchanged,
        }
    }

    /// Rate the current card and schedule the next draw.
    ///
    /// The caller waits [`PACING_DELAY`] and then calls
    /// [`complete_draw`](Self::complete_draw) with the returned ticket.
    pub fn feedback(&mut self, collection: &mut Collection, feedback: Feedback) -> Option<PendingDraw> {
        if self.phase != SessionPhase::Presenting {
            return None;
        }
        let id = self.current.as_deref()?;

        if let Err(err) = collection.set_familiarity(id, feedback.familiarity()) {
            tracing::warn!(card_id = id, error = %err, "feedback for a card that is gone");
        }

        self.phase = SessionPhase::Pacing;
        Some(PendingDraw { epoch: self.epoch })
    }

    /// Run a draw scheduled by [`feedback`](Self::feedback).
    ///
    /// A no-op if the session was closed or another draw happened since.
    pub fn complete_draw(&mut self, pending: PendingDraw, filtered: &[Flashcard]) -> ReviewStep {
        if self.phase == SessionPhase::Closed || pending.epoch != self.epoch {
            tracing::debug!(pending = pending.epoch, epoch = self.epoch, "dropping stale draw");
            return ReviewStep::Unchanged;
        }
        self.draw(filtered)
    }

    /// Start over on the same view: forget what was seen and draw again.
    pub fn restart(&mut self, filtered: &[Flashcard]) -> ReviewStep {
        if self.phase == SessionPhase::Closed {
            return ReviewStep::Unchanged;
        }
        self.seen.clear();
        self.current = None;
        self.phase = SessionPhase::Idle;
        self.draw(filtered)
    }

    /// End the session. Pending draws become no-ops.
    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
        self.epoch += 1;
    }

    /// React to a changed view.
    ///
    /// Draws a replacement when the current card has left the view, closes the
    /// session when the view is empty, and draws the first card if none has
    /// been drawn yet.
    pub fn reconcile(&mut self, filtered: &[Flashcard]) -> ReviewStep {
        if self.phase == SessionPhase::Closed {
            return ReviewStep::Unchanged;
        }

        match self.current.as_deref() {
            Some(id) if !filtered.iter().any(|c| c.id == id) => {
                if filtered.is_empty() {
                    self.close();
                    ReviewStep::Closed
                } else {
                    self.draw(filtered)
                }
            }
            None if self.phase == SessionPhase::Idle => self.draw(filtered),
            _ => ReviewStep::Unchanged,
        }
    }

    fn draw(&mut self, filtered: &[Flashcard]) -> ReviewStep {
        if filtered.is_empty() {
            self.close();
            return ReviewStep::Closed;
        }

        self.epoch += 1;

        if self.is_complete(filtered) {
            self.phase = SessionPhase::Finished;
            tracing::debug!(total = filtered.len(), "review pool exhausted");
            return ReviewStep::Finished {
                total: filtered.len(),
            };
        }

        let seen = &self.seen;
        let unseen: Vec<&Flashcard> = filtered.iter().filter(|c| !seen.contains(&c.id)).collect();
        let pool: Vec<&Flashcard> = if unseen.is_empty() {
            filtered.iter().collect()
        } else {
            unseen
        };

        let previous = self.current.as_deref();
        let mut picked = weighted_pick(&pool, &mut self.rng);

        // One retry with the previous card left out avoids a visible repeat.
        if pool.len() > 1 && picked.map(|c| c.id.as_str()) == previous {
            let others: Vec<&Flashcard> = pool
                .iter()
                .copied()
                .filter(|c| Some(c.id.as_str()) != previous)
                .collect();
            picked = weighted_pick(&others, &mut self.rng);
        }

        let Some(card) = picked else {
            return ReviewStep::Unchanged;
        };

        let card_id = card.id.clone();
        self.seen.insert(card_id.clone());
        self.current = Some(card_id.clone());
        self.phase = SessionPhase::Presenting;
        ReviewStep::Presenting { card_id }
    }
}
