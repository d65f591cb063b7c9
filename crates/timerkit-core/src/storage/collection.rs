//! Named configuration lists.
//!
//! A storage key holds the whole list as one JSON array. Lookups load the
//! list and search by `id`; writes upsert into the list and store all of it
//! back.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::database::Database;
use crate::error::StorageError;
use crate::interval::Workout;
use crate::steps::Recipe;

/// An entry that can live in a [`Collection`].
pub trait Named: Serialize + DeserializeOwned + Clone {
    const STORAGE_KEY: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn touch(&mut self, at: DateTime<Utc>);
}

impl Named for Workout {
    const STORAGE_KEY: &'static str = "@TimerKit:tabataWorkouts";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl Named for Recipe {
    const STORAGE_KEY: &'static str = "@TimerKit:recipes";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

pub struct Collection<'a, T> {
    db: &'a Database,
    _entry: PhantomData<T>,
}

impl<'a, T: Named> Collection<'a, T> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            _entry: PhantomData,
        }
    }

    /// Load every entry. A missing key is an empty list; so is a value that
    /// no longer decodes, which is logged and later overwritten.
    pub fn load_all(&self) -> Result<Vec<T>, StorageError> {
        let Some(json) = self.db.kv_get(T::STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<T>>(&json) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key = T::STORAGE_KEY, error = %e, "discarding unreadable stored list");
                Ok(Vec::new())
            }
        }
    }

    pub fn save_all(&self, items: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items).map_err(|e| StorageError::Corrupt {
            key: T::STORAGE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.db.kv_set(T::STORAGE_KEY, &json)?;
        tracing::info!(key = T::STORAGE_KEY, count = items.len(), "stored list saved");
        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<T>, StorageError> {
        Ok(self.load_all()?.into_iter().find(|item| item.id() == id))
    }

    /// Like [`find`](Self::find), but a missing entry is an error.
    pub fn get(&self, id: &str) -> Result<T, StorageError> {
        self.find(id)?.ok_or_else(|| StorageError::NotFound {
            key: T::STORAGE_KEY.to_string(),
            id: id.to_string(),
        })
    }

    /// Replace the entry with the same id, or append it. Returns the stored
    /// entry with its `updated_at` stamped.
    pub fn upsert(&self, mut item: T) -> Result<T, StorageError> {
        item.touch(Utc::now());
        let mut items = self.load_all()?;
        match items.iter().position(|existing| existing.id() == item.id()) {
            Some(index) => items[index] = item.clone(),
            None => items.push(item.clone()),
        }
        self.save_all(&items)?;
        Ok(item)
    }

    /// Remove by id. Returns whether an entry was removed.
    pub fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let mut items = self.load_all()?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save_all(&items)?;
        Ok(true)
    }

    /// Load every entry, storing `seed()` as the only entry if there are none.
    pub fn load_or_seed(&self, seed: impl FnOnce() -> T) -> Result<Vec<T>, StorageError> {
        let items = self.load_all()?;
        if !items.is_empty() {
            return Ok(items);
        }
        let seeded = vec![seed()];
        self.save_all(&seeded)?;
        Ok(seeded)
    }
}
