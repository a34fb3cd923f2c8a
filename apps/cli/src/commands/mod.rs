//! Command handlers.

pub mod conflict;
pub mod deck;
pub mod stats;
pub mod study;

use crate::cli::Command;
use crate::db::DbError;
use crate::prompt::Prompt;
use crate::state::AppState;
use flashcard_core::{CardDraft, CardError, ReviewSession};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a command needs to run.
pub struct Context<P> {
    pub state: AppState,
    pub prompt: P,
    pub pacing: Duration,
    pub json: bool,
}

impl<P: Prompt> Context<P> {
    pub fn new(state: AppState, prompt: P, pacing: Duration, json: bool) -> Self {
        Self {
            state,
            prompt,
            pacing,
            json,
        }
    }

    /// Print a value as JSON when `--json` is set, otherwise run `text`.
    pub(crate) fn emit<T, F>(&mut self, value: &T, text: F) -> Result<(), CommandError>
    where
        T: Serialize,
        F: FnOnce(&mut P) -> std::io::Result<()>,
    {
        if self.json {
            self.prompt.print(&serde_json::to_string_pretty(value)?)?;
        } else {
            text(&mut self.prompt)?;
        }
        Ok(())
    }
}

pub async fn dispatch<P: Prompt>(command: Command, ctx: &mut Context<P>) -> Result<(), CommandError> {
    match command {
        Command::List { filter } => deck::list(ctx, &filter.to_filter()),
        Command::Tags => deck::tags(ctx),
        Command::Add(args) => {
            let rows = match args.question {
                Some(question) => vec![CardDraft::new(
                    question,
                    args.answer.unwrap_or_default(),
                    args.tags,
                )],
                None => deck::read_drafts(&mut ctx.prompt)?,
            };
            deck::add(ctx, &rows).map(drop)
        }
        Command::Edit {
            id,
            question,
            answer,
            tags,
        } => deck::edit(ctx, &id, question, answer, tags).map(drop),
        Command::Delete { id } => deck::delete(ctx, &id).map(drop),
        Command::Rate { id, familiarity } => deck::rate(ctx, &id, familiarity),
        Command::Import { paths, on_conflict } => {
            deck::import(ctx, &paths, on_conflict).await.map(drop)
        }
        Command::Export { out } => deck::export(ctx, &out).await.map(drop),
        Command::Review { filter, seed } => {
            let session = match seed {
                Some(seed) => ReviewSession::with_seed(seed),
                None => ReviewSession::new(),
            };
            study::review(ctx, &filter.to_filter(), session).await.map(drop)
        }
        Command::Stats => stats::show(ctx),
    }
}
