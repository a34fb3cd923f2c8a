//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use flashcard_core::{CardFilter, Familiarity, TagLogic};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "flashcards", version, about = "Review flashcards weighted by how well you know them")]
pub struct Cli {
    /// Database file; overrides FLASHCARDS_DB.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print JSON instead of text where a command has output.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List cards matching a filter.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List every tag in use.
    Tags,
    /// Create cards. Without --question, rows are read interactively.
    Add(AddArgs),
    /// Change a card's question, answer or tags.
    Edit {
        id: String,
        #[arg(long, short)]
        question: Option<String>,
        #[arg(long, short)]
        answer: Option<String>,
        /// Comma-separated; an empty string clears the tags.
        #[arg(long, short)]
        tags: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Set a card's familiarity directly.
    Rate {
        id: String,
        #[arg(value_parser = parse_familiarity)]
        familiarity: Familiarity,
    },
    /// Import cards from JSON files.
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = ConflictStrategy::Ask)]
        on_conflict: ConflictStrategy,
    },
    /// Write every card to a dated JSON file.
    Export {
        /// Directory the file is written to.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Review cards one at a time.
    Review {
        #[command(flatten)]
        filter: FilterArgs,
        /// Fixed seed for the card draw.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Familiarity and tag breakdown.
    Stats,
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            filter: FilterArgs::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Text the question or answer must contain.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Tag to filter on; repeatable.
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Require every --tag instead of any of them.
    #[arg(long)]
    pub all_tags: bool,

    /// Familiarity tier to include; repeatable. Defaults to all.
    #[arg(long = "familiarity", short = 'f', value_parser = parse_familiarity)]
    pub familiarities: Vec<Familiarity>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> CardFilter {
        let logic = if self.all_tags { TagLogic::All } else { TagLogic::Any };
        let mut filter = CardFilter::new()
            .with_tags(self.tags.clone(), logic)
            .with_familiarities(&self.familiarities);
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }
        filter
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct AddArgs {
    #[arg(long, short)]
    pub question: Option<String>,
    #[arg(long, short)]
    pub answer: Option<String>,
    /// Comma-separated tags.
    #[arg(long, short, default_value = "")]
    pub tags: String,
}

/// What to do with an imported card whose question already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConflictStrategy {
    /// Decide each conflict interactively.
    #[default]
    Ask,
    KeepExisting,
    UseIncoming,
}

fn parse_familiarity(s: &str) -> Result<Familiarity, String> {
    Familiarity::parse(s).ok_or_else(|| {
        let keys: Vec<&str> = Familiarity::ALL.iter().map(|f| f.as_str()).collect();
        format!("unknown familiarity {s:?}, expected one of {}", keys.join(", "))
    })
}
