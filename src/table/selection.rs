//! An insertion-ordered set of selected row IDs.

use std::{collections::HashSet, hash::Hash};

/// The IDs of the selected rows, in the order they were selected.
#[derive(Debug, Clone)]
pub struct Selection<Id> {
    order: Vec<Id>,
    members: HashSet<Id>,
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash> Selection<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` after the existing members. Returns `false` if it was already selected.
    pub fn insert(&mut self, id: Id) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }

        self.order.push(id);
        true
    }

    /// Returns `false` if `id` was not selected.
    pub fn remove(&mut self, id: &Id) -> bool {
        if !self.members.remove(id) {
            return false;
        }

        self.order.retain(|member| member != id);
        true
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.members.contains(id)
    }

    /// Keep only the IDs for which `keep` returns `true`. Returns `true` if any ID was removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Id) -> bool) -> bool {
        let before = self.order.len();
        self.order.retain(|id| keep(id));

        if self.order.len() == before {
            return false;
        }

        self.members = self.order.iter().cloned().collect();
        true
    }

    /// Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let was_empty = self.order.is_empty();
        self.order.clear();
        self.members.clear();

        !was_empty
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The selected IDs in the order they were selected.
    pub fn ids(&self) -> &[Id] {
        &self.order
    }
}
