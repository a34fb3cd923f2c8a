//! Card management commands: listing, editing, import and export.

use super::conflict::{self, ConflictOutcome};
use super::{CommandError, Context};
use crate::cli::ConflictStrategy;
use crate::prompt::Prompt;
use chrono::Local;
use flashcard_core::types::join_tags;
use flashcard_core::{
    create_cards, export_file_name, export_payload, parse_files, CardDraft, CardError, CardFilter, Familiarity,
    Flashcard,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

/// What happened when a batch of cards was merged in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub added: usize,
    pub conflicts: usize,
    pub resolved: usize,
    /// Decisions dropped because the user cancelled.
    pub discarded: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub files: usize,
    pub cards: usize,
    pub skipped: usize,
    pub failed_files: Vec<String>,
    #[serde(flatten)]
    pub merge: MergeOutcome,
}

pub fn list<P: Prompt>(ctx: &mut Context<P>, filter: &CardFilter) -> Result<(), CommandError> {
    let cards = filter.apply(ctx.state.collection());
    let total = ctx.state.collection().len();
    ctx.emit(&cards, |prompt| {
        if cards.is_empty() {
            return prompt.say(format!("No cards match ({total} in total)."));
        }
        for card in &cards {
            print_card(prompt, card)?;
        }
        prompt.say(format!("{} of {total} cards.", cards.len()))
    })
}

fn print_card<P: Prompt>(prompt: &mut P, card: &Flashcard) -> std::io::Result<()> {
    prompt.say(format!("[{}] {}", card.id, card.question))?;
    for line in card.answer.lines() {
        prompt.say(format!("    {line}"))?;
    }
    if card.tags.is_empty() {
        prompt.say(format!("    ({})", card.familiarity.label()))
    } else {
        prompt.say(format!("    ({}; {})", card.familiarity.label(), join_tags(&card.tags)))
    }
}

pub fn tags<P: Prompt>(ctx: &mut Context<P>) -> Result<(), CommandError> {
    let tags = ctx.state.collection().all_tags();
    ctx.emit(&tags, |prompt| {
        if tags.is_empty() {
            return prompt.say("No tags yet.");
        }
        tags.iter().try_for_each(|tag| prompt.say(tag))
    })
}

/// Read batch-create rows until a blank question or end of input.
pub fn read_drafts<P: Prompt>(prompt: &mut P) -> std::io::Result<Vec<CardDraft>> {
    prompt.say("Enter cards; leave the question blank to finish.")?;
    let mut rows = Vec::new();
    loop {
        let question = match prompt.ask("Question")? {
            Some(q) if !q.trim().is_empty() => q,
            _ => break,
        };
        let answer = prompt.ask("Answer")?.unwrap_or_default();
        let tags = prompt.ask("Tags (comma-separated)")?.unwrap_or_default();
        rows.push(CardDraft::new(question, answer, tags));
    }
    Ok(rows)
}

/// Create cards from rows and merge them in like an import.
pub fn add<P: Prompt>(ctx: &mut Context<P>, rows: &[CardDraft]) -> Result<MergeOutcome, CommandError> {
    let cards = create_cards(rows)?;
    let dropped = rows.len() - cards.len();
    if dropped > 0 {
        tracing::debug!(dropped, "ignoring incomplete rows");
    }

    let outcome = merge_and_resolve(ctx, cards, ConflictStrategy::Ask)?;
    ctx.emit(&outcome, |prompt| report_merge(prompt, &outcome))?;
    Ok(outcome)
}

pub fn edit<P: Prompt>(
    ctx: &mut Context<P>,
    id: &str,
    question: Option<String>,
    answer: Option<String>,
    tags: Option<String>,
) -> Result<Flashcard, CommandError> {
    let current = ctx
        .state
        .collection()
        .get(id)
        .cloned()
        .ok_or_else(|| CardError::NotFound(id.to_string()))?;

    let draft = CardDraft::new(
        question.unwrap_or(current.question),
        answer.unwrap_or(current.answer),
        tags.unwrap_or_else(|| join_tags(&current.tags)),
    );
    let updated = ctx.state.update(|c| c.update_card(id, &draft))?;

    ctx.emit(&updated, |prompt| {
        prompt.say("Updated:")?;
        print_card(prompt, &updated)
    })?;
    Ok(updated)
}

pub fn delete<P: Prompt>(ctx: &mut Context<P>, id: &str) -> Result<Flashcard, CommandError> {
    let removed = ctx.state.update(|c| c.delete(id))?;
    tracing::info!(card_id = id, "deleted card");
    ctx.emit(&removed, |prompt| prompt.say(format!("Deleted: {}", removed.question)))?;
    Ok(removed)
}

pub fn rate<P: Prompt>(
    ctx: &mut Context<P>,
    id: &str,
    familiarity: Familiarity,
) -> Result<(), CommandError> {
    ctx.state.update(|c| c.set_familiarity(id, familiarity))?;
    let card = ctx.state.collection().get(id).cloned();
    ctx.emit(&card, |prompt| {
        prompt.say(format!("Marked {id} as {}.", familiarity.label()))
    })
}

/// Import JSON files, then merge every card they hold in one batch.
///
/// Files are read concurrently. A file that cannot be read or parsed is
/// counted and the rest still import.
pub async fn import<P: Prompt>(
    ctx: &mut Context<P>,
    paths: &[PathBuf],
    strategy: ConflictStrategy,
) -> Result<ImportSummary, CommandError> {
    let mut reads = JoinSet::new();
    for (index, path) in paths.iter().cloned().enumerate() {
        reads.spawn(async move {
            let content = tokio::fs::read_to_string(&path).await;
            (index, path, content)
        });
    }

    let mut loaded = Vec::with_capacity(paths.len());
    let mut failed_files = Vec::new();
    while let Some(joined) = reads.join_next().await {
        match joined {
            Ok((index, path, Ok(content))) => loaded.push((index, path.display().to_string(), content)),
            Ok((_, path, Err(error))) => {
                tracing::error!(file = %path.display(), %error, "failed to read import file");
                failed_files.push(path.display().to_string());
            }
            Err(error) => {
                tracing::error!(%error, "import read task failed");
                failed_files.push(String::from("<unknown>"));
            }
        }
    }
    loaded.sort_by_key(|(index, ..)| *index);

    let report = parse_files(loaded.into_iter().map(|(_, name, content)| (name, content)));
    failed_files.extend(report.failures.iter().map(|f| f.name.clone()));

    let mut summary = ImportSummary {
        files: paths.len(),
        cards: report.cards.len(),
        skipped: report.skipped,
        failed_files,
        merge: MergeOutcome::default(),
    };
    summary.merge = merge_and_resolve(ctx, report.cards, strategy)?;

    ctx.emit(&summary, |prompt| {
        prompt.say(format!(
            "Read {} card(s) from {} file(s).",
            summary.cards,
            summary.files - summary.failed_files.len()
        ))?;
        if !summary.failed_files.is_empty() {
            prompt.say(format!(
                "{} file(s) could not be imported: {}",
                summary.failed_files.len(),
                summary.failed_files.join(", ")
            ))?;
        }
        if summary.skipped > 0 {
            prompt.say(format!("Skipped {} record(s) without a question.", summary.skipped))?;
        }
        report_merge(prompt, &summary.merge)
    })?;
    Ok(summary)
}

/// Write the collection to `flashcards-export-<date>.json` inside `dir`.
///
/// Returns `None` without writing anything when there are no cards.
pub async fn export<P: Prompt>(ctx: &mut Context<P>, dir: &Path) -> Result<Option<PathBuf>, CommandError> {
    let Some(payload) = export_payload(ctx.state.collection())? else {
        ctx.emit(&Option::<PathBuf>::None, |prompt| prompt.say("Nothing to export."))?;
        return Ok(None);
    };

    let path = dir.join(export_file_name(Local::now().date_naive()));
    tokio::fs::write(&path, payload).await?;
    tracing::info!(path = %path.display(), cards = ctx.state.collection().len(), "exported collection");

    let count = ctx.state.collection().len();
    ctx.emit(&path, |prompt| {
        prompt.say(format!("Exported {count} card(s) to {}.", path.display()))
    })?;
    Ok(Some(path))
}

/// Merge incoming cards, then settle any duplicates with `strategy`.
///
/// Clean cards are saved straight away. Resolutions are only written once
/// every conflict has been decided.
fn merge_and_resolve<P: Prompt>(
    ctx: &mut Context<P>,
    cards: Vec<Flashcard>,
    strategy: ConflictStrategy,
) -> Result<MergeOutcome, CommandError> {
    let report = ctx.state.update(|c| Ok(c.merge_incoming(cards)))?;
    let mut outcome = MergeOutcome {
        added: report.added,
        conflicts: report.conflicts.len(),
        ..MergeOutcome::default()
    };
    if report.conflicts.is_empty() {
        return Ok(outcome);
    }

    match conflict::resolve(&mut ctx.prompt, report.conflicts, strategy)? {
        ConflictOutcome::Resolved(resolutions) => {
            ctx.state.update(|c| {
                c.apply_resolutions(&resolutions);
                Ok(())
            })?;
            outcome.resolved = resolutions.len();
        }
        ConflictOutcome::Cancelled { discarded } => outcome.discarded = Some(discarded),
    }
    Ok(outcome)
}

fn report_merge<P: Prompt>(prompt: &mut P, outcome: &MergeOutcome) -> std::io::Result<()> {
    prompt.say(format!("Added {} new card(s).", outcome.added))?;
    if outcome.conflicts == 0 {
        return Ok(());
    }
    match outcome.discarded {
        Some(discarded) => prompt.say(format!(
            "Duplicate resolution cancelled; {discarded} decision(s) discarded, existing answers kept."
        )),
        None => prompt.say(format!("Resolved {} duplicate question(s).", outcome.resolved)),
    }
}
