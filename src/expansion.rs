//! Open/closed state of row expansions, tracked per row key.

use crate::value::RowKey;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashSet<RowKey>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, key: &RowKey) -> bool {
        self.open.contains(key)
    }

    /// Flip one row; returns the new state.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.open.remove(&key) {
            false
        } else {
            self.open.insert(key);
            true
        }
    }

    pub fn set<'a, I>(&mut self, keys: I, open: bool)
    where
        I: IntoIterator<Item = &'a RowKey>,
    {
        for key in keys {
            if open {
                self.open.insert(key.clone());
            } else {
                self.open.remove(key);
            }
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Drop every open key not in `present`.
    pub fn retain_present(&mut self, present: &HashSet<RowKey>) {
        self.open.retain(|key| present.contains(key));
    }
}
