//! The shuffled, non-repeating queue of prompt ids.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Lifecycle of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckState {
    /// Nothing built yet, or built from an empty matching set.
    Empty,
    /// At least one id left to deal.
    Active,
    /// Every id has been dealt.
    Exhausted,
}

/// Ids waiting to be shown, consumed from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    remaining: VecDeque<String>,
    /// How many ids have been dealt since the deck was built.
    #[serde(default)]
    dealt: usize,
}

impl Deck {
    /// Build a deck holding a uniformly random permutation of `ids`.
    pub fn shuffled<R: Rng + ?Sized>(mut ids: Vec<String>, rng: &mut R) -> Self {
        // Fisher-Yates: every permutation equally likely.
        ids.shuffle(rng);
        Self::from_order(ids)
    }

    /// Build a deck dealing `ids` in the given order.
    pub fn from_order(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            remaining: ids.into_iter().collect(),
            dealt: 0,
        }
    }

    pub fn state(&self) -> DeckState {
        match (self.remaining.is_empty(), self.dealt) {
            (false, _) => DeckState::Active,
            (true, 0) => DeckState::Empty,
            (true, _) => DeckState::Exhausted,
        }
    }

    /// Take the next id off the front.
    pub fn draw(&mut self) -> Option<String> {
        let id = self.remaining.pop_front()?;
        self.dealt += 1;
        Some(id)
    }

    /// Return an id to the front, undoing a [`draw`](Self::draw).
    pub fn put_back(&mut self, id: String) {
        self.remaining.push_front(id);
        self.dealt = self.dealt.saturating_sub(1);
    }

    pub fn peek(&self) -> Option<&str> {
        self.remaining.front().map(String::as_str)
    }

    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.remaining.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn dealt(&self) -> usize {
        self.dealt
    }

    /// Drop ids failing `keep`, and any duplicates after the first.
    /// Returns how many ids were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.remaining.len();
        let mut seen = HashSet::with_capacity(before);
        self.remaining
            .retain(|id| keep(id.as_str()) && seen.insert(id.clone()));
        before - self.remaining.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_deck_is_empty_state() {
        assert_eq!(Deck::default().state(), DeckState::Empty);
        assert_eq!(Deck::from_order(Vec::new()).state(), DeckState::Empty);
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut deck = Deck::from_order(ids(&["a", "b"]));
        assert_eq!(deck.state(), DeckState::Active);
        assert_eq!(deck.draw().as_deref(), Some("a"));
        assert_eq!(deck.state(), DeckState::Active);
        assert_eq!(deck.draw().as_deref(), Some("b"));
        assert_eq!(deck.state(), DeckState::Exhausted);
        assert_eq!(deck.draw(), None);
        assert_eq!(deck.dealt(), 2);
    }

    #[test]
    fn test_put_back_restores_front() {
        let mut deck = Deck::from_order(ids(&["a", "b"]));
        let first = deck.draw().unwrap();
        deck.put_back(first);
        assert_eq!(deck.peek(), Some("a"));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.dealt(), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let source = ids(&["a", "b", "c", "d", "e"]);
        let deck = Deck::shuffled(source.clone(), &mut rng);

        let mut dealt: Vec<String> = deck.remaining().map(String::from).collect();
        dealt.sort();
        assert_eq!(dealt, source);
    }

    #[test]
    fn test_retain_drops_filtered_and_duplicates() {
        let mut deck = Deck::from_order(ids(&["a", "b", "a", "c"]));
        let removed = deck.retain(|id| id != "c");
        assert_eq!(removed, 2);
        assert_eq!(deck.remaining().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
