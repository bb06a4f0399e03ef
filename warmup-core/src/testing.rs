//! Testing utilities for the deck engine.
//!
//! This module provides tools for engine tests:
//! - `prompt()` builder for catalog entries
//! - `TestHarness` running the engine over an in-memory store with a seeded RNG
//! - Assertion helpers for deck and history invariants

use crate::catalog::{Catalog, PromptEntry, TimeMinutes};
use crate::engine::{Advance, DeckEngine};
use crate::store::MemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// Start building a prompt with the given id.
pub fn prompt(id: &str) -> PromptBuilder {
    PromptBuilder {
        entry: PromptEntry {
            id: id.to_string(),
            title: format!("Prompt {id}"),
            body: format!("Body of {id}"),
            time: TimeMinutes::Exact(5),
            tags: BTreeSet::new(),
            mode: None,
            difficulty: None,
            goal: None,
            how_to: Vec::new(),
        },
    }
}

/// Builder for [`PromptEntry`] values.
pub struct PromptBuilder {
    entry: PromptEntry,
}

impl PromptBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.entry.title = title.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.entry.body = body.into();
        self
    }

    pub fn time(mut self, minutes: u32) -> Self {
        self.entry.time = TimeMinutes::Exact(minutes);
        self
    }

    pub fn range(mut self, min: u32, max: u32) -> Self {
        self.entry.time = TimeMinutes::Range { min, max };
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entry.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.entry.mode = Some(mode.into());
        self
    }

    pub fn difficulty(mut self, level: u8) -> Self {
        self.entry.difficulty = Some(level);
        self
    }

    pub fn build(self) -> PromptEntry {
        self.entry
    }
}

/// Engine over an in-memory store, shuffled by a seeded RNG.
pub type TestEngine = DeckEngine<MemoryStore, StdRng>;

/// Test harness for running deck scenarios.
pub struct TestHarness {
    /// The engine under test.
    pub engine: TestEngine,
    seed: u64,
}

impl TestHarness {
    /// Create a harness with an empty store and a fixed seed.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_store(catalog, MemoryStore::new(), 0)
    }

    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_store(catalog, MemoryStore::new(), seed)
    }

    /// Create a harness over an existing store.
    pub fn with_store(catalog: Catalog, store: MemoryStore, seed: u64) -> Self {
        let engine = DeckEngine::with_rng(catalog, store, StdRng::seed_from_u64(seed));
        Self { engine, seed }
    }

    /// Simulate a page reload: reopen the engine from its own store.
    pub fn reload(self) -> Self {
        let (catalog, store) = self.engine.into_parts();
        Self::with_store(catalog, store, self.seed.wrapping_add(1))
    }

    /// Reload against a different catalog, as after a catalog update.
    pub fn reload_with_catalog(self, catalog: Catalog) -> Self {
        let (_, store) = self.engine.into_parts();
        Self::with_store(catalog, store, self.seed.wrapping_add(1))
    }

    /// Advance and return the shown id, or `None` when nothing matches.
    ///
    /// Panics if the store rejects the write.
    #[track_caller]
    pub fn advance_id(&mut self) -> Option<String> {
        match self.engine.advance() {
            Ok(Advance::Shown { id, .. }) => Some(id),
            Ok(Advance::NoMatches) => None,
            Err(e) => panic!("advance failed: {e}"),
        }
    }

    /// Go back, returning whether anything happened.
    ///
    /// Panics if the store rejects the write.
    #[track_caller]
    pub fn back(&mut self) -> bool {
        match self.engine.back() {
            Ok(moved) => moved,
            Err(e) => panic!("back failed: {e}"),
        }
    }

    pub fn current_id(&self) -> Option<&str> {
        self.engine.current_id()
    }

    pub fn deck_ids(&self) -> Vec<String> {
        self.engine.deck().remaining().map(String::from).collect()
    }

    pub fn history_ids(&self) -> Vec<String> {
        self.engine.history().iter().map(String::from).collect()
    }

    /// Ids of the catalog entries matching the current filters.
    pub fn matching_ids(&self) -> BTreeSet<String> {
        self.engine.matching().map(|e| e.id.clone()).collect()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the current prompt has the given id.
#[track_caller]
pub fn assert_current(harness: &TestHarness, id: &str) {
    assert_eq!(
        harness.current_id(),
        Some(id),
        "Expected current prompt '{id}'"
    );
}

/// Assert the deck holds exactly the matching ids, each once.
#[track_caller]
pub fn assert_deck_is_matching_permutation(harness: &TestHarness) {
    let deck = harness.deck_ids();
    let unique: BTreeSet<String> = deck.iter().cloned().collect();
    assert_eq!(unique.len(), deck.len(), "Deck contains duplicates: {deck:?}");
    assert_eq!(
        unique,
        harness.matching_ids(),
        "Deck is not a permutation of the matching set"
    );
}

/// Assert the history has the given length.
#[track_caller]
pub fn assert_history_len(harness: &TestHarness, len: usize) {
    assert_eq!(
        harness.engine.history().len(),
        len,
        "Expected history of length {len}, got {:?}",
        harness.history_ids()
    );
}
