//! Resolving incoming cards whose question is already taken.

use crate::cli::ConflictStrategy;
use crate::prompt::Prompt;
use flashcard_core::{AnswerChoice, Conflict, ConflictQueue, Flashcard};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictOutcome {
    Resolved(Vec<Flashcard>),
    /// The user gave up; decisions made so far were dropped.
    Cancelled { discarded: usize },
}

/// Decide every conflict, asking the user when the strategy says so.
pub fn resolve<P: Prompt>(
    prompt: &mut P,
    conflicts: Vec<Conflict>,
    strategy: ConflictStrategy,
) -> io::Result<ConflictOutcome> {
    let choice = match strategy {
        ConflictStrategy::Ask => return ask_each(prompt, conflicts),
        ConflictStrategy::KeepExisting => AnswerChoice::Existing,
        ConflictStrategy::UseIncoming => AnswerChoice::Incoming,
    };
    let resolved = conflicts.iter().map(|c| c.resolve(&choice)).collect();
    Ok(ConflictOutcome::Resolved(resolved))
}

fn ask_each<P: Prompt>(
    prompt: &mut P,
    conflicts: Vec<Conflict>,
) -> io::Result<ConflictOutcome> {
    let mut queue = ConflictQueue::new(conflicts);
    let total = queue.len();

    loop {
        let Some(conflict) = queue.current().cloned() else {
            return Ok(ConflictOutcome::Resolved(Vec::new()));
        };

        prompt.say(format!(
            "\nDuplicate question {}/{}: {}",
            queue.position(),
            total,
            conflict.existing.question
        ))?;
        prompt.say(format!("  existing: {}", conflict.existing.answer))?;
        prompt.say(format!("  imported: {}", conflict.incoming.answer))?;

        let picked = prompt.choose(
            "Which answer should the card keep?",
            &[
                ("1", "keep existing"),
                ("2", "use imported"),
                ("3", "write a new answer"),
                ("c", "cancel"),
            ],
        )?;

        let choice = match picked {
            Some(0) => AnswerChoice::Existing,
            Some(1) => AnswerChoice::Incoming,
            Some(2) => match prompt.ask("New answer")? {
                Some(text) if !text.trim().is_empty() => AnswerChoice::Custom(text.trim().to_string()),
                Some(_) => {
                    prompt.say("The answer must not be empty.")?;
                    continue;
                }
                None => return Ok(cancel(queue)),
            },
            _ => return Ok(cancel(queue)),
        };

        if let Some(resolutions) = queue.decide(&choice) {
            return Ok(ConflictOutcome::Resolved(resolutions));
        }
    }
}

fn cancel(queue: ConflictQueue) -> ConflictOutcome {
    ConflictOutcome::Cancelled {
        discarded: queue.cancel(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::LinePrompt;
    use flashcard_core::Familiarity;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn card(id: &str, question: &str, answer: &str) -> Flashcard {
        Flashcard {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            tags: vec!["t".into()],
            familiarity: Familiarity::Familiar,
        }
    }

    fn conflicts() -> Vec<Conflict> {
        vec![
            Conflict {
                existing: card("e1", "a", "old a"),
                incoming: card("i1", "A", "new a"),
            },
            Conflict {
                existing: card("e2", "b", "old b"),
                incoming: card("i2", "b", "new b"),
            },
        ]
    }

    fn run(input: &str, strategy: ConflictStrategy) -> ConflictOutcome {
        let mut prompt = LinePrompt::new(Cursor::new(input.to_string()), Vec::new());
        resolve(&mut prompt, conflicts(), strategy).unwrap()
    }

    fn answers(outcome: ConflictOutcome) -> Vec<String> {
        match outcome {
            ConflictOutcome::Resolved(cards) => cards.into_iter().map(|c| c.answer).collect(),
            other => panic!("expected resolutions, got {other:?}"),
        }
    }

    #[test]
    fn interactive_choices_apply_in_order() {
        let outcome = run("2\n3\n  custom b \n", ConflictStrategy::Ask);
        assert_eq!(answers(outcome), vec!["new a", "custom b"]);
    }

    #[test]
    fn invalid_input_asks_again() {
        let outcome = run("x\n3\n\n1\n1\n", ConflictStrategy::Ask);
        assert_eq!(answers(outcome), vec!["old a", "old b"]);
    }

    #[test]
    fn cancel_discards_decisions() {
        assert_eq!(
            run("1\nc\n", ConflictStrategy::Ask),
            ConflictOutcome::Cancelled { discarded: 1 }
        );
    }

    #[test]
    fn end_of_input_cancels() {
        assert_eq!(run("", ConflictStrategy::Ask), ConflictOutcome::Cancelled { discarded: 0 });
    }

    #[test]
    fn fixed_strategies_do_not_prompt() {
        assert_eq!(answers(run("", ConflictStrategy::KeepExisting)), vec!["old a", "old b"]);
        assert_eq!(answers(run("", ConflictStrategy::UseIncoming)), vec!["new a", "new b"]);
    }

    #[test]
    fn resolutions_keep_existing_identity() {
        let ConflictOutcome::Resolved(cards) = run("2\n2\n", ConflictStrategy::Ask) else {
            panic!("expected resolutions");
        };
        assert_eq!(cards[0].id, "e1");
        assert_eq!(cards[0].question, "a");
    }
}
