//! Saving and restoring the collection as a single key/value blob.

use crate::collection::Collection;
use crate::error::PersistenceError;
use crate::types::Flashcard;

/// Key the collection is stored under.
pub const STORAGE_KEY: &str = "flashcards_data";

/// A key/value store holding text blobs.
pub trait BlobStore {
    type Error: std::error::Error + From<PersistenceError>;

    fn read_blob(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn write_blob(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

pub fn encode_collection(collection: &Collection) -> Result<String, PersistenceError> {
    serde_json::to_string(collection).map_err(PersistenceError::Encode)
}

/// Decode a saved payload. Unrecognized familiarity tiers load as `Unknown`.
pub fn decode_collection(payload: &str) -> Result<Collection, PersistenceError> {
    let cards: Vec<Flashcard> = serde_json::from_str(payload).map_err(PersistenceError::Corrupt)?;
    Ok(Collection::from_cards(cards))
}

/// Restore from an optional payload, falling back to an empty collection.
pub fn restore_collection(payload: Option<&str>) -> Collection {
    let Some(payload) = payload else {
        return Collection::new();
    };

    match decode_collection(payload) {
        Ok(collection) => {
            tracing::debug!(cards = collection.len(), "restored collection");
            collection
        }
        Err(error) => {
            tracing::error!(%error, "could not parse saved cards, starting empty");
            Collection::new()
        }
    }
}

/// Load the collection from a store. Never fails: read errors and corrupt
/// payloads are logged and yield an empty collection.
pub fn load_collection<S: BlobStore>(store: &S) -> Collection {
    match store.read_blob(STORAGE_KEY) {
        Ok(payload) => restore_collection(payload.as_deref()),
        Err(error) => {
            tracing::error!(%error, "could not read saved cards, starting empty");
            Collection::new()
        }
    }
}

pub fn save_collection<S: BlobStore>(store: &S, collection: &Collection) -> Result<(), S::Error> {
    let payload = encode_collection(collection)?;
    store.write_blob(STORAGE_KEY, &payload)
}
