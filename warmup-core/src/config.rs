//! Engine configuration.

use crate::store::{FileStore, StoreError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Where state lives and how the deck is shuffled.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the persisted records.
    pub state_dir: PathBuf,

    /// Catalog document to load. `None` means the caller's bundled catalog.
    pub catalog_path: Option<PathBuf>,

    /// Fixed shuffle seed, for reproducible sessions.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            catalog_path: None,
            seed: None,
        }
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// RNG for the deck: seeded if configured, otherwise from entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn open_store(&self) -> Result<FileStore, StoreError> {
        FileStore::open(&self.state_dir)
    }
}
