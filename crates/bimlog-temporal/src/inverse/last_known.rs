//! Last-known full state per element during one forward pass.

use std::collections::HashMap;

use bimlog_core::models::{ElementCategory, ElementId, EntryInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct KnownState {
    pub category: ElementCategory,
    pub info: EntryInfo,
}

/// Rebuilt on every inverse computation; never persisted.
#[derive(Debug, Default)]
pub struct LastKnownState {
    states: HashMap<ElementId, KnownState>,
}

impl LastKnownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ElementId) -> Option<&KnownState> {
        self.states.get(id)
    }

    /// Replace the state of `id`, returning the previous one.
    pub fn replace(
        &mut self,
        id: ElementId,
        category: ElementCategory,
        info: EntryInfo,
    ) -> Option<KnownState> {
        self.states.insert(id, KnownState { category, info })
    }

    pub fn clear(&mut self, id: &ElementId) -> Option<KnownState> {
        self.states.remove(id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
