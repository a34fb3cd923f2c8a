//! Collection statistics output.

use super::{CommandError, Context};
use crate::prompt::Prompt;
use flashcard_core::collection_stats;

pub fn show<P: Prompt>(ctx: &mut Context<P>) -> Result<(), CommandError> {
    let stats = collection_stats(ctx.state.collection());
    ctx.emit(&stats, |prompt| {
        prompt.say(format!("Cards: {}", stats.total_cards))?;
        for tier in &stats.familiarity {
            prompt.say(format!(
                "  {:<6} {:>5}  {:>5.1}%",
                tier.familiarity.label(),
                tier.count,
                tier.percent
            ))?;
        }
        if !stats.top_tags.is_empty() {
            prompt.say("Top tags:")?;
            for tag in &stats.top_tags {
                prompt.say(format!("  {:<16} {:>5}  {:>5.1}%", tag.tag, tag.count, tag.percent))?;
            }
        }
        Ok(())
    })
}
