//! The deck engine.
//!
//! Owns the filter set, the deck and the history, and keeps the three
//! consistent with each other and with the store. Every mutator stages its
//! new state locally, writes it as one batch, and only then replaces the
//! engine's fields, so a failed write leaves the engine unchanged.

use crate::catalog::{Catalog, PromptEntry};
use crate::deck::{Deck, DeckState};
use crate::filter::{FilterAxis, FilterSet};
use crate::history::History;
use crate::persist::{Batch, PersistError, SavedState};
use crate::prefs::{Favorites, Preferences};
use crate::store::KeyValueStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to persist state: {0}")]
    Persist(#[from] PersistError),
}

/// Outcome of [`DeckEngine::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// `id` is now the current prompt.
    Shown {
        id: String,
        /// The deck ran dry (or was never built) and was reshuffled first.
        reshuffled: bool,
    },
    /// No catalog entry matches the current filters.
    NoMatches,
}

impl Advance {
    pub fn id(&self) -> Option<&str> {
        match self {
            Advance::Shown { id, .. } => Some(id.as_str()),
            Advance::NoMatches => None,
        }
    }
}

/// Serves prompts from a catalog without repeats until every match is shown.
pub struct DeckEngine<S, R = StdRng> {
    catalog: Catalog,
    store: S,
    rng: R,
    filters: FilterSet,
    deck: Deck,
    history: History,
    favorites: Favorites,
    preferences: Preferences,
}

impl<S: KeyValueStore> DeckEngine<S, StdRng> {
    /// Restore an engine from `store`, shuffling with an entropy-seeded RNG.
    pub fn open(catalog: Catalog, store: S) -> Self {
        Self::with_rng(catalog, store, StdRng::from_entropy())
    }
}

impl<S: KeyValueStore, R: Rng> DeckEngine<S, R> {
    /// Restore an engine from `store` using the given RNG.
    ///
    /// Stored ids the catalog no longer has are dropped, as are deck ids
    /// that no longer match the stored filters. Repaired state is written
    /// back; a failure to do so is logged and otherwise ignored.
    pub fn with_rng(catalog: Catalog, store: S, rng: R) -> Self {
        let SavedState {
            filters,
            mut deck,
            mut history,
            mut favorites,
            preferences,
        } = SavedState::load(&store);

        let stale_history = history.retain(|id| catalog.contains(id));
        let stale_deck = deck.retain(|id| catalog.get(id).is_some_and(|e| filters.matches(e)));
        let stale_favorites = favorites.retain(|id| catalog.contains(id));

        let mut engine = Self {
            catalog,
            store,
            rng,
            filters,
            deck,
            history,
            favorites,
            preferences,
        };

        if stale_history + stale_deck + stale_favorites > 0 {
            warn!(
                stale_history,
                stale_deck, stale_favorites, "dropped stored ids that no longer resolve"
            );
            if let Err(e) = engine.persist_all() {
                warn!(error = %e, "failed to write back repaired state");
            }
        }

        info!(
            prompts = engine.catalog.len(),
            matching = engine.match_count(),
            remaining = engine.deck.len(),
            history = engine.history.len(),
            "deck engine ready"
        );
        engine
    }

    fn persist_all(&mut self) -> Result<(), PersistError> {
        Batch::new()
            .with(&self.filters)?
            .with(&self.deck)?
            .with(&self.history)?
            .with(&self.favorites)?
            .with(&self.preferences)?
            .commit(&mut self.store)
    }

    fn shuffle(catalog: &Catalog, filters: &FilterSet, rng: &mut R) -> Deck {
        let ids: Vec<String> = filters.matching(catalog).map(|e| e.id.clone()).collect();
        Deck::shuffled(ids, rng)
    }

    fn commit_deck(&mut self, deck: Deck, history: History) -> Result<(), EngineError> {
        Batch::new()
            .with(&deck)?
            .with(&history)?
            .commit(&mut self.store)?;
        self.deck = deck;
        self.history = history;
        Ok(())
    }

    /// Whether `id` still resolves and matches the current filters.
    fn is_live(&self, id: &str) -> bool {
        self.catalog
            .get(id)
            .is_some_and(|entry| self.filters.matches(entry))
    }

    /// Show the next prompt.
    ///
    /// An exhausted or empty deck is reshuffled from the current matching
    /// set first, so this only reports [`Advance::NoMatches`] when nothing
    /// matches at all. Ids that no longer resolve are skipped.
    pub fn advance(&mut self) -> Result<Advance, EngineError> {
        let mut deck = self.deck.clone();
        let mut history = self.history.clone();
        let mut reshuffled = false;

        // At most two passes: the stored deck, then one fresh shuffle.
        loop {
            while let Some(id) = deck.draw() {
                if self.is_live(&id) {
                    history.push(id.clone());
                    self.commit_deck(deck, history)?;
                    debug!(%id, reshuffled, remaining = self.deck.len(), "advanced");
                    return Ok(Advance::Shown { id, reshuffled });
                }
                warn!(%id, "skipping deck entry that no longer matches");
            }

            if reshuffled {
                break;
            }
            deck = Self::shuffle(&self.catalog, &self.filters, &mut self.rng);
            history = History::new();
            reshuffled = true;
        }

        self.commit_deck(deck, history)?;
        debug!(filters = %self.filters.summary(), "no prompts match");
        Ok(Advance::NoMatches)
    }

    /// Return to the previously shown prompt.
    ///
    /// The prompt being left goes back on top of the deck, so the next
    /// [`advance`](Self::advance) shows it again. Returns `false` without
    /// doing anything when there is no earlier prompt.
    pub fn back(&mut self) -> Result<bool, EngineError> {
        if !self.history.can_go_back() {
            return Ok(false);
        }

        let mut deck = self.deck.clone();
        let mut history = self.history.clone();
        if let Some(id) = history.pop_current() {
            deck.put_back(id);
        }
        self.commit_deck(deck, history)?;
        debug!(current = ?self.history.current(), "went back");
        Ok(true)
    }

    /// Discard the deck and history and reshuffle from the current filters.
    pub fn reset_deck(&mut self) -> Result<DeckState, EngineError> {
        let deck = Self::shuffle(&self.catalog, &self.filters, &mut self.rng);
        self.commit_deck(deck, History::new())?;
        debug!(remaining = self.deck.len(), "deck reset");
        Ok(self.deck.state())
    }

    /// Flip `value` on `axis` and rebuild the deck. Returns whether the
    /// value is now selected.
    pub fn toggle_filter(&mut self, axis: FilterAxis, value: &str) -> Result<bool, EngineError> {
        let mut filters = self.filters.clone();
        let selected = filters.toggle(axis, value);
        self.set_filters(filters)?;
        Ok(selected)
    }

    /// Remove every filter and rebuild the deck.
    pub fn clear_filters(&mut self) -> Result<(), EngineError> {
        self.set_filters(FilterSet::new())
    }

    /// Replace the filters wholesale. The deck is rebuilt and the history
    /// emptied, even if `filters` equals the current set.
    pub fn set_filters(&mut self, filters: FilterSet) -> Result<(), EngineError> {
        let deck = Self::shuffle(&self.catalog, &filters, &mut self.rng);
        let history = History::new();
        Batch::new()
            .with(&filters)?
            .with(&deck)?
            .with(&history)?
            .commit(&mut self.store)?;

        debug!(filters = %filters.summary(), matching = deck.len(), "filters changed");
        self.filters = filters;
        self.deck = deck;
        self.history = history;
        Ok(())
    }

    /// Star or unstar a prompt, returning whether it is now starred.
    /// Unknown ids are ignored and yield `None`.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<Option<bool>, EngineError> {
        if !self.catalog.contains(id) {
            return Ok(None);
        }
        let mut favorites = self.favorites.clone();
        let starred = favorites.toggle(id);
        Batch::new().with(&favorites)?.commit(&mut self.store)?;
        self.favorites = favorites;
        Ok(Some(starred))
    }

    /// Star or unstar the current prompt, if there is one.
    pub fn toggle_current_favorite(&mut self) -> Result<Option<bool>, EngineError> {
        match self.history.current().map(str::to_string) {
            Some(id) => self.toggle_favorite(&id),
            None => Ok(None),
        }
    }

    pub fn toggle_presentation(&mut self) -> Result<bool, EngineError> {
        let preferences = Preferences {
            presentation: !self.preferences.presentation,
        };
        Batch::new().with(&preferences)?.commit(&mut self.store)?;
        self.preferences = preferences;
        Ok(self.preferences.presentation)
    }

    // =========================================================================
    // Renderer contract
    // =========================================================================

    /// The prompt shown last, if any.
    pub fn current_prompt(&self) -> Option<&PromptEntry> {
        self.history.current().and_then(|id| self.catalog.get(id))
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_prompt().map(|entry| entry.id.as_str())
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    /// Size of the catalog subset matching the current filters.
    pub fn match_count(&self) -> usize {
        self.filters.matching(&self.catalog).count()
    }

    pub fn matching(&self) -> impl Iterator<Item = &PromptEntry> {
        self.filters.matching(&self.catalog)
    }

    pub fn state(&self) -> DeckState {
        self.deck.state()
    }

    /// Prompts left before the deck is reshuffled.
    pub fn remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a mutable reference to the store.
    ///
    /// Writes made through it bypass the engine and are not reflected in
    /// memory until the engine is reopened.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give up the engine, keeping the catalog and store for a reopen.
    pub fn into_parts(self) -> (Catalog, S) {
        (self.catalog, self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{DECK_KEY, FAVORITES_KEY, HISTORY_KEY};
    use crate::store::MemoryStore;
    use crate::testing::prompt;

    fn engine(entries: Vec<PromptEntry>) -> DeckEngine<MemoryStore, StdRng> {
        let catalog = Catalog::new(entries).unwrap();
        DeckEngine::with_rng(catalog, MemoryStore::new(), StdRng::seed_from_u64(42))
    }

    fn abc() -> Vec<PromptEntry> {
        vec![
            prompt("A").tags(["x"]).build(),
            prompt("B").tags(["y"]).build(),
            prompt("C").tags(["x", "y"]).build(),
        ]
    }

    #[test]
    fn test_fresh_engine_is_empty() {
        let engine = engine(abc());
        assert_eq!(engine.state(), DeckState::Empty);
        assert!(engine.current_prompt().is_none());
        assert!(!engine.can_go_back());
        assert_eq!(engine.match_count(), 3);
    }

    #[test]
    fn test_advance_builds_deck_implicitly() {
        let mut engine = engine(abc());
        let outcome = engine.advance().unwrap();

        assert!(matches!(outcome, Advance::Shown { reshuffled: true, .. }));
        assert_eq!(engine.current_id(), outcome.id());
        assert_eq!(engine.remaining(), 2);
        assert_eq!(engine.state(), DeckState::Active);
    }

    #[test]
    fn test_advance_persists_before_returning() {
        let mut engine = engine(abc());
        engine.advance().unwrap();

        let raw_history = engine.store().raw(HISTORY_KEY).unwrap();
        assert!(raw_history.contains(engine.current_id().unwrap()));
        assert!(engine.store().raw(DECK_KEY).is_some());
    }

    #[test]
    fn test_exhaustion_then_reshuffle() {
        let mut engine = engine(abc());
        for _ in 0..3 {
            engine.advance().unwrap();
        }
        assert_eq!(engine.state(), DeckState::Exhausted);
        assert_eq!(engine.history().len(), 3);

        let outcome = engine.advance().unwrap();
        assert!(matches!(outcome, Advance::Shown { reshuffled: true, .. }));
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.remaining(), 2);
    }

    #[test]
    fn test_single_match_repeats() {
        let mut engine = engine(abc());
        engine.toggle_filter(FilterAxis::Tag, "y").unwrap();
        engine.toggle_filter(FilterAxis::Tag, "x").unwrap();
        assert_eq!(engine.match_count(), 1);

        for _ in 0..4 {
            assert_eq!(engine.advance().unwrap().id(), Some("C"));
            assert_eq!(engine.state(), DeckState::Exhausted);
        }
    }

    #[test]
    fn test_no_matches() {
        let mut engine = engine(abc());
        engine.advance().unwrap();
        engine.toggle_filter(FilterAxis::Tag, "z").unwrap();

        assert_eq!(engine.advance().unwrap(), Advance::NoMatches);
        assert!(engine.current_prompt().is_none());
        assert_eq!(engine.match_count(), 0);
        assert_eq!(engine.state(), DeckState::Empty);
    }

    #[test]
    fn test_back_is_noop_below_two() {
        let mut engine = engine(abc());
        assert!(!engine.back().unwrap());

        engine.advance().unwrap();
        let shown = engine.current_id().map(String::from);
        assert!(!engine.back().unwrap());
        assert_eq!(engine.current_id().map(String::from), shown);
    }

    #[test]
    fn test_back_then_advance_round_trip() {
        let mut engine = engine(abc());
        engine.advance().unwrap();
        let first = engine.current_id().unwrap().to_string();
        engine.advance().unwrap();
        let second = engine.current_id().unwrap().to_string();

        assert!(engine.back().unwrap());
        assert_eq!(engine.current_id(), Some(first.as_str()));
        assert!(!engine.can_go_back());

        assert_eq!(engine.advance().unwrap().id(), Some(second.as_str()));
    }

    #[test]
    fn test_filter_toggle_resets_history() {
        let mut engine = engine(abc());
        engine.advance().unwrap();
        engine.advance().unwrap();

        assert!(engine.toggle_filter(FilterAxis::Tag, "x").unwrap());
        assert!(engine.history().is_empty());
        assert!(engine.current_prompt().is_none());
        assert_eq!(engine.remaining(), 2);

        assert!(!engine.toggle_filter(FilterAxis::Tag, "x").unwrap());
        assert_eq!(engine.remaining(), 3);
    }

    #[test]
    fn test_reset_deck_discards_history() {
        let mut engine = engine(abc());
        engine.advance().unwrap();
        engine.advance().unwrap();

        assert_eq!(engine.reset_deck().unwrap(), DeckState::Active);
        assert!(engine.history().is_empty());
        assert_eq!(engine.remaining(), 3);
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let mut engine = engine(abc());
        engine.advance().unwrap();
        let deck_before = engine.deck().clone();
        let history_before = engine.history().clone();

        engine.store_mut().set_read_only(true);
        assert!(engine.advance().is_err());
        assert!(engine.toggle_filter(FilterAxis::Tag, "x").is_err());

        assert_eq!(engine.deck(), &deck_before);
        assert_eq!(engine.history(), &history_before);
        assert!(engine.filters().is_empty());
    }

    #[test]
    fn test_favorites() {
        let mut engine = engine(abc());
        assert_eq!(engine.toggle_current_favorite().unwrap(), None);

        engine.advance().unwrap();
        let id = engine.current_id().unwrap().to_string();
        assert_eq!(engine.toggle_current_favorite().unwrap(), Some(true));
        assert!(engine.is_favorite(&id));

        assert_eq!(engine.toggle_favorite("missing").unwrap(), None);
        assert_eq!(engine.favorites().len(), 1);
        assert!(!engine.store().raw(FAVORITES_KEY).unwrap().contains("missing"));

        assert_eq!(engine.toggle_favorite(&id).unwrap(), Some(false));
        assert!(!engine.is_favorite(&id));
    }

    #[test]
    fn test_presentation_toggle() {
        let mut engine = engine(abc());
        assert!(engine.toggle_presentation().unwrap());
        assert!(engine.preferences().presentation);
        assert!(!engine.toggle_presentation().unwrap());
    }
}
