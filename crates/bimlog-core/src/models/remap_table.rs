use std::collections::{HashMap, HashSet};

use super::element::{ElementId, LiveId};

/// Where a historical identity currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Live(LiveId),
    /// Deleted by an earlier replayed entry of this session.
    Retired,
    /// Never seen by this session.
    Unmapped,
}

/// Historical element id → live element id for one replay session.
///
/// Created empty, seeded and mutated only by the replay executor, dropped
/// with the session.
#[derive(Debug, Default, Clone)]
pub struct RemapTable {
    live: HashMap<ElementId, LiveId>,
    retired: HashSet<ElementId>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an id onto itself: the element was never replaced in the live model.
    pub fn seed_identity(&mut self, id: &ElementId) {
        self.register(id.clone(), LiveId::from(id));
    }

    /// Record that `historical` is now represented by `live`.
    pub fn register(&mut self, historical: ElementId, live: LiveId) {
        self.retired.remove(&historical);
        self.live.insert(historical, live);
    }

    /// Record that the element behind `historical` was deleted.
    pub fn retire(&mut self, historical: &ElementId) -> Option<LiveId> {
        self.retired.insert(historical.clone());
        self.live.remove(historical)
    }

    pub fn resolve(&self, historical: &ElementId) -> Resolution {
        if let Some(live) = self.live.get(historical) {
            Resolution::Live(live.clone())
        } else if self.retired.contains(historical) {
            Resolution::Retired
        } else {
            Resolution::Unmapped
        }
    }

    pub fn get(&self, historical: &ElementId) -> Option<&LiveId> {
        self.live.get(historical)
    }

    pub fn contains(&self, historical: &ElementId) -> bool {
        self.live.contains_key(historical)
    }

    pub fn is_retired(&self, historical: &ElementId) -> bool {
        self.retired.contains(historical)
    }

    /// Number of live mappings.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &LiveId)> {
        self.live.iter()
    }
}
