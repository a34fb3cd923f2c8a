//! Interactive review loop tests.
//!
//! Sessions use a fixed seed and no pacing delay; input is scripted line by
//! line: Enter reveals the answer, then a rating or command follows.

mod common;

use common::fixtures::card;
use common::TestContext;
use flashcard_core::{CardFilter, Familiarity, Flashcard, ReviewSession};
use flashcards_cli::commands::study::{self, ReviewSummary};
use pretty_assertions::assert_eq;

fn two_unknown() -> Vec<Flashcard> {
    vec![
        card("a", "Question A?", "Answer A", &["x"], Familiarity::Unknown),
        card("b", "Question B?", "Answer B", &["y"], Familiarity::Unknown),
    ]
}

fn tiers(t: &TestContext) -> Vec<Familiarity> {
    let mut tiers: Vec<Familiarity> = t.saved().iter().map(|c| c.familiarity).collect();
    tiers.sort();
    tiers
}

async fn review(t: &mut TestContext, filter: CardFilter) -> ReviewSummary {
    study::review(&mut t.ctx, &filter, ReviewSession::with_seed(7))
        .await
        .unwrap()
}

/// Test rating every card finishes the round and saves each rating.
#[tokio::test]
async fn test_review_rates_each_card_once() {
    let mut t = TestContext::with_cards(two_unknown(), "\n1\n\n3\nq\n");

    let summary = review(&mut t, CardFilter::default()).await;

    assert_eq!(
        summary,
        ReviewSummary {
            shown: 2,
            rated: 2,
            rounds: 1
        }
    );
    assert_eq!(tiers(&t), vec![Familiarity::Unfamiliar, Familiarity::Familiar]);
    let output = t.output();
    assert!(output.contains("[1/2 50%]"));
    assert!(output.contains("[2/2 100%]"));
    assert!(output.contains("All 2 card(s) reviewed."));
}

/// Test restart reuses the same pool.
#[tokio::test]
async fn test_review_restart() {
    let mut t = TestContext::with_cards(two_unknown(), "\n1\n\n1\ny\n\n2\n\n2\nq\n");

    let summary = review(&mut t, CardFilter::default()).await;

    assert_eq!(summary.shown, 4);
    assert_eq!(summary.rounds, 2);
    assert_eq!(tiers(&t), vec![Familiarity::MayForget, Familiarity::MayForget]);
}

/// Test a rated card that leaves the filtered view is replaced, and the
/// session ends once the view is empty.
#[tokio::test]
async fn test_review_filtered_view_shrinks() {
    let mut t = TestContext::with_cards(two_unknown(), "\n1\n\n1\n");
    let filter = CardFilter::new().with_familiarities(&[Familiarity::Unknown]);

    let summary = review(&mut t, filter).await;

    assert_eq!(summary.shown, 2);
    assert_eq!(summary.rated, 2);
    assert_eq!(summary.rounds, 0);
    assert_eq!(tiers(&t), vec![Familiarity::Familiar, Familiarity::Familiar]);
}

/// Test deleting the current card moves on to the other one.
#[tokio::test]
async fn test_review_delete_current_card() {
    let mut t = TestContext::with_cards(two_unknown(), "\nd\n\nq\n");

    let summary = review(&mut t, CardFilter::default()).await;

    assert_eq!(summary.shown, 2);
    assert_eq!(summary.rated, 0);
    assert_eq!(t.saved().len(), 1);
}

/// Test skip draws the unseen card without rating.
#[tokio::test]
async fn test_review_skip() {
    let mut t = TestContext::with_cards(two_unknown(), "\ns\n\nq\n");

    let summary = review(&mut t, CardFilter::default()).await;

    assert_eq!(summary.shown, 2);
    assert_eq!(summary.rated, 0);
    assert_eq!(tiers(&t), vec![Familiarity::Unknown, Familiarity::Unknown]);
}

/// Test quitting before the answer and running out of input.
#[tokio::test]
async fn test_review_quit_and_eof() {
    let mut t = TestContext::with_cards(two_unknown(), "q\n");
    assert_eq!(review(&mut t, CardFilter::default()).await.shown, 1);

    let mut t = TestContext::with_cards(two_unknown(), "\n");
    let summary = review(&mut t, CardFilter::default()).await;
    assert_eq!(summary.shown, 1);
    assert!(t.output().contains("Answer "));
}

/// Test invalid input asks again.
#[tokio::test]
async fn test_review_invalid_choice() {
    let mut t = TestContext::with_cards(two_unknown(), "\n9\n2\nq\n");

    let summary = review(&mut t, CardFilter::default()).await;

    assert_eq!(summary.rated, 1);
    assert!(t.output().contains("Please choose 1, 2, 3, s, d or q."));
}

/// Test an empty view ends the session straight away.
#[tokio::test]
async fn test_review_empty_view() {
    let mut t = TestContext::with_cards(two_unknown(), "");
    let filter = CardFilter::new().with_search("nothing matches this");

    let summary = review(&mut t, filter).await;

    assert_eq!(summary, ReviewSummary::default());
    assert!(t.output().contains("No cards to review."));
}
