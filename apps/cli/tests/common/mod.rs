//! Shared setup for CLI integration tests.
//!
//! Every test gets its own in-memory database and a scripted terminal: input
//! is fed from a string and everything printed is captured.

#![allow(dead_code)]

pub mod fixtures;

use flashcard_core::{load_collection, save_collection, Collection, Flashcard};
use flashcards_cli::commands::Context;
use flashcards_cli::db::SqliteRepository;
use flashcards_cli::prompt::LinePrompt;
use flashcards_cli::state::AppState;
use std::io::Cursor;
use std::time::Duration;

pub type TestCtx = Context<LinePrompt<Cursor<String>, Vec<u8>>>;

pub struct TestContext {
    pub ctx: TestCtx,
}

impl TestContext {
    /// Empty collection, no scripted input.
    pub fn new() -> Self {
        Self::with_cards(Vec::new(), "")
    }

    /// Start from `cards` already saved, answering prompts with `input`.
    pub fn with_cards(cards: Vec<Flashcard>, input: &str) -> Self {
        let repository = SqliteRepository::open_in_memory().expect("open in-memory database");
        if !cards.is_empty() {
            save_collection(&repository, &Collection::from_cards(cards)).expect("seed collection");
        }

        let prompt = LinePrompt::new(Cursor::new(input.to_string()), Vec::new());
        Self {
            ctx: Context::new(AppState::load(repository), prompt, Duration::ZERO, false),
        }
    }

    /// JSON output; prompts go to stderr so the captured output stays parseable.
    pub fn json(self) -> Self {
        let Context { state, prompt, pacing, .. } = self.ctx;
        Self {
            ctx: Context::new(state, prompt.with_prompts_on_stderr(), pacing, true),
        }
    }

    pub fn collection(&self) -> &Collection {
        self.ctx.state.collection()
    }

    /// The collection as saved in the database.
    pub fn saved(&self) -> Collection {
        load_collection(self.ctx.state.repository())
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(self.ctx.prompt.output()).into_owned()
    }

    pub fn output_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.output()).expect("output is JSON")
    }
}
