//! Collection statistics.

use crate::collection::Collection;
use crate::types::Familiarity;
use serde::Serialize;
use std::collections::HashMap;

/// Number of tags listed in [`CollectionStats::top_tags`].
pub const TOP_TAG_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub familiarity: Familiarity,
    pub count: usize,
    /// Share of all cards, 0-100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
    /// Share of all tag occurrences, 0-100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total_cards: usize,
    pub familiarity: Vec<TierCount>,
    pub top_tags: Vec<TagCount>,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn collection_stats(collection: &Collection) -> CollectionStats {
    let total_cards = collection.len();

    let familiarity = Familiarity::ALL
        .into_iter()
        .map(|tier| {
            let count = collection.iter().filter(|c| c.familiarity == tier).count();
            TierCount {
                familiarity: tier,
                count,
                percent: percent(count, total_cards),
            }
        })
        .collect();

    // Counted in first-seen order so the stable sort keeps ties in that order.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut occurrences = 0;
    for tag in collection.iter().flat_map(|c| c.tags.iter()) {
        occurrences += 1;
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push((tag.as_str(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let top_tags = counts
        .into_iter()
        .take(TOP_TAG_LIMIT)
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
            percent: percent(count, occurrences),
        })
        .collect();

    CollectionStats {
        total_cards,
        familiarity,
        top_tags,
    }
}
