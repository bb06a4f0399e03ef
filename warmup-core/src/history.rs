//! Log of shown prompts, used for back-navigation.

use serde::{Deserialize, Serialize};

/// Ids in the order they were shown. The last id is the current prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    shown: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: String) {
        self.shown.push(id);
    }

    /// The most recently shown id.
    pub fn current(&self) -> Option<&str> {
        self.shown.last().map(String::as_str)
    }

    /// Going back needs a current entry plus an earlier one to land on.
    pub fn can_go_back(&self) -> bool {
        self.shown.len() >= 2
    }

    /// Remove and return the current id, leaving the previous one current.
    /// Does nothing when there is no earlier entry to return to.
    pub fn pop_current(&mut self) -> Option<String> {
        if !self.can_go_back() {
            return None;
        }
        self.shown.pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.shown.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn clear(&mut self) {
        self.shown.clear();
    }

    /// Drop ids failing `keep`. Returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.shown.len();
        self.shown.retain(|id| keep(id.as_str()));
        before - self.shown.len()
    }
}

impl FromIterator<String> for History {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            shown: iter.into_iter().collect(),
        }
    }
}
