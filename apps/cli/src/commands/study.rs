//! Interactive review loop.

use super::{CommandError, Context};
use crate::prompt::Prompt;
use flashcard_core::{CardFilter, Feedback, Flashcard, ReviewSession, ReviewStep};
use rand::Rng;
use serde::Serialize;

const RATING_OPTIONS: [(&str, &str); 6] = [
    ("1", "familiar"),
    ("2", "may forget"),
    ("3", "unfamiliar"),
    ("s", "skip"),
    ("d", "delete"),
    ("q", "quit"),
];

/// Counts for one review run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    /// Cards presented, repeats included.
    pub shown: usize,
    pub rated: usize,
    /// Times the whole pool was worked through.
    pub rounds: usize,
}

/// Review cards matching `filter` until the user quits or nothing is left.
///
/// The filtered view is rebuilt after every change so ratings, deletions
/// and saves are reflected in the next draw.
pub async fn review<P, G>(
    ctx: &mut Context<P>,
    filter: &CardFilter,
    mut session: ReviewSession<G>,
) -> Result<ReviewSummary, CommandError>
where
    P: Prompt,
    G: Rng,
{
    let mut summary = ReviewSummary::default();
    let mut view = filter.apply(ctx.state.collection());
    let mut step = session.start(&view);

    loop {
        step = match step {
            ReviewStep::Presenting { card_id } => {
                summary.shown += 1;
                present(ctx, filter, &mut session, &mut view, &card_id, &mut summary).await?
            }
            ReviewStep::Finished { total } => {
                summary.rounds += 1;
                ctx.prompt.say(format!("\nAll {total} card(s) reviewed."))?;
                match ctx.prompt.confirm("Review them again?")? {
                    Some(true) => {
                        view = filter.apply(ctx.state.collection());
                        session.restart(&view)
                    }
                    _ => {
                        session.close();
                        ReviewStep::Closed
                    }
                }
            }
            ReviewStep::Closed => break,
            ReviewStep::Unchanged => {
                tracing::debug!(phase = ?session.phase(), "review step made no progress");
                session.close();
                break;
            }
        };
    }

    if summary.shown == 0 {
        ctx.prompt.say("No cards to review.")?;
    } else {
        ctx.prompt.say(format!(
            "Session over: {} shown, {} rated.",
            summary.shown, summary.rated
        ))?;
    }
    Ok(summary)
}

async fn present<P, G>(
    ctx: &mut Context<P>,
    filter: &CardFilter,
    session: &mut ReviewSession<G>,
    view: &mut Vec<Flashcard>,
    card_id: &str,
    summary: &mut ReviewSummary,
) -> Result<ReviewStep, CommandError>
where
    P: Prompt,
    G: Rng,
{
    let Some(card) = view.iter().find(|c| c.id == card_id).cloned() else {
        return Ok(session.skip(view));
    };

    let progress = session.progress(view);
    ctx.prompt.say(format!(
        "\n[{}/{} {:.0}%] ({}) {}",
        progress.seen,
        progress.total,
        progress.percent(),
        card.familiarity.label(),
        card.question
    ))?;
    if wants_quit(&ctx.prompt.ask("Press Enter to show the answer, q to quit")?) {
        session.close();
        return Ok(ReviewStep::Closed);
    }
    ctx.prompt.say(&card.answer)?;

    loop {
        let Some(picked) = ctx.prompt.choose("How well did you know it?", &RATING_OPTIONS)? else {
            session.close();
            return Ok(ReviewStep::Closed);
        };

        let feedback = match picked {
            0 => Feedback::Familiar,
            1 => Feedback::MayForget,
            2 => Feedback::Unfamiliar,
            3 => return Ok(session.skip(view)),
            4 => {
                if let Err(err) = ctx.state.update(|c| c.delete(&card.id)) {
                    tracing::error!(card_id = %card.id, error = %err, "delete during review failed");
                    ctx.prompt.say(format!("Could not delete: {err}"))?;
                    continue;
                }
                ctx.prompt.say("Deleted.")?;
                *view = filter.apply(ctx.state.collection());
                return Ok(session.reconcile(view));
            }
            _ => {
                session.close();
                return Ok(ReviewStep::Closed);
            }
        };

        let pending = match ctx.state.update(|c| Ok(session.feedback(c, feedback))) {
            Ok(pending) => pending,
            Err(err) => {
                tracing::error!(card_id = %card.id, error = %err, "saving feedback failed");
                ctx.prompt.say(format!("Could not save: {err}"))?;
                None
            }
        };
        summary.rated += 1;

        tokio::time::sleep(ctx.pacing).await;

        *view = filter.apply(ctx.state.collection());
        let step = session.reconcile(view);
        if step != ReviewStep::Unchanged {
            return Ok(step);
        }
        return Ok(match pending {
            Some(pending) => session.complete_draw(pending, view),
            None => session.skip(view),
        });
    }
}

fn wants_quit(input: &Option<String>) -> bool {
    match input {
        None => true,
        Some(input) => input.trim().eq_ignore_ascii_case("q"),
    }
}
