//! Application state.

use crate::commands::CommandError;
use crate::db::{DbError, SqliteRepository};
use flashcard_core::{load_collection, save_collection, CardError, Collection};

/// The loaded collection and the store it is saved to.
pub struct AppState {
    collection: Collection,
    repository: SqliteRepository,
}

impl AppState {
    pub fn load(repository: SqliteRepository) -> Self {
        let collection = load_collection(&repository);
        tracing::debug!(cards = collection.len(), "loaded collection");
        Self {
            collection,
            repository,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn repository(&self) -> &SqliteRepository {
        &self.repository
    }

    /// Apply a change and save the collection if anything changed.
    ///
    /// A failed change leaves the collection as it was. A failed save keeps
    /// the change in memory and reports the error.
    pub fn update<T, F>(&mut self, change: F) -> Result<T, CommandError>
    where
        F: FnOnce(&mut Collection) -> Result<T, CardError>,
    {
        let before = self.collection.clone();
        let value = match change(&mut self.collection) {
            Ok(value) => value,
            Err(err) => {
                self.collection = before;
                return Err(err.into());
            }
        };

        if self.collection != before {
            self.save()?;
        }
        Ok(value)
    }

    pub fn save(&self) -> Result<(), DbError> {
        save_collection(&self.repository, &self.collection)
    }
}
