//! Persistence bridge between engine state and a [`KeyValueStore`].
//!
//! Each record is stored as a versioned JSON envelope under its own key.
//! Reads never fail: a missing, unparseable or wrong-version record is
//! reported at `warn` and replaced by the record's default.

use crate::deck::Deck;
use crate::filter::FilterSet;
use crate::history::History;
use crate::prefs::{Favorites, Preferences};
use crate::store::{KeyValueStore, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch for {key}: expected {expected}, found {found}")]
    VersionMismatch {
        key: &'static str,
        expected: u32,
        found: u32,
    },
}

pub const FILTERS_KEY: &str = "dw_filters_v2";
pub const DECK_KEY: &str = "dw_deck_v2";
pub const HISTORY_KEY: &str = "dw_history_v2";
pub const FAVORITES_KEY: &str = "dw_favorites_v1";
pub const PREFS_KEY: &str = "dw_prefs_v1";

/// A piece of state with its own key and schema version.
pub trait Record: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
    const VERSION: u32;
}

impl Record for FilterSet {
    const KEY: &'static str = FILTERS_KEY;
    const VERSION: u32 = 2;
}

impl Record for Deck {
    const KEY: &'static str = DECK_KEY;
    const VERSION: u32 = 2;
}

impl Record for History {
    const KEY: &'static str = HISTORY_KEY;
    const VERSION: u32 = 2;
}

impl Record for Favorites {
    const KEY: &'static str = FAVORITES_KEY;
    const VERSION: u32 = 1;
}

impl Record for Preferences {
    const KEY: &'static str = PREFS_KEY;
    const VERSION: u32 = 1;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Serialize a record into its envelope.
pub fn encode<T: Record>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: T::VERSION,
        data: value,
    })
}

/// Read a record strictly, surfacing every failure.
pub fn try_load<T: Record>(store: &impl KeyValueStore) -> Result<Option<T>, PersistError> {
    let Some(content) = store.get(T::KEY)? else {
        return Ok(None);
    };

    // Check the version before touching `data`, whose shape may have changed.
    #[derive(Deserialize)]
    struct Version {
        version: u32,
    }
    let Version { version } = serde_json::from_str(&content)?;
    if version != T::VERSION {
        return Err(PersistError::VersionMismatch {
            key: T::KEY,
            expected: T::VERSION,
            found: version,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&content)?;
    Ok(Some(envelope.data))
}

/// Read a record, substituting the default when it is absent or unusable.
pub fn load<T: Record>(store: &impl KeyValueStore) -> T {
    match try_load(store) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key = T::KEY, error = %e, "discarding stored record");
            T::default()
        }
    }
}

/// Every persisted record, as read at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedState {
    pub filters: FilterSet,
    pub deck: Deck,
    pub history: History,
    pub favorites: Favorites,
    pub preferences: Preferences,
}

impl SavedState {
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            filters: load(store),
            deck: load(store),
            history: load(store),
            favorites: load(store),
            preferences: load(store),
        }
    }
}

/// A set of records written to the store in one call.
#[derive(Debug, Default)]
pub struct Batch {
    entries: Vec<(&'static str, String)>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the batch.
    pub fn with<T: Record>(mut self, value: &T) -> Result<Self, PersistError> {
        self.entries.push((T::KEY, encode(value)?));
        Ok(self)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Write every record in a single store call.
    pub fn commit(self, store: &mut impl KeyValueStore) -> Result<(), PersistError> {
        store.set_many(&self.entries)?;
        Ok(())
    }
}
