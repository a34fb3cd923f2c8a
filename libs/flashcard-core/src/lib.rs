//! Core flashcard library.
//!
//! Provides:
//! - Card collection with duplicate-safe editing
//! - Merge of incoming cards with per-question conflict resolution
//! - Weighted random review sessions
//! - Filtering by search text, tags and familiarity
//! - JSON import/export and saved-state encoding
//! - Collection statistics

pub mod collection;
pub mod error;
pub mod export;
pub mod filter;
pub mod merge;
pub mod parser;
pub mod review;
pub mod stats;
pub mod storage;
pub mod types;

pub use collection::{create_cards, Collection};
pub use error::{CardError, ImportError, PersistenceError, Result};
pub use export::{export_file_name, export_payload, ExportRecord};
pub use filter::{CardFilter, TagLogic};
pub use merge::{
    apply_resolutions, resolve_incoming, resolve_one, AnswerChoice, Conflict, ConflictQueue,
    IncomingResolution, MergeReport,
};
pub use parser::{parse, parse_files, FileFailure, ImportReport, ParsedFile};
pub use review::{
    weighted_pick, PendingDraw, Progress, ReviewSession, ReviewStep, SessionPhase, PACING_DELAY,
};
pub use stats::{collection_stats, CollectionStats, TagCount, TierCount};
pub use storage::{load_collection, save_collection, BlobStore, STORAGE_KEY};
pub use types::{question_key, split_tags, CardDraft, Familiarity, Feedback, Flashcard};
