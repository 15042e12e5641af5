use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::element::{ElementId, SlotId};
use crate::errors::PatchError;
use crate::timestamp::parse_timestamp;

/// One entry of a scoped request.
///
/// A bare id covers every slot of that element; `"<id>_<n>"` covers only
/// that slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScopeTarget {
    Element(ElementId),
    Slot(SlotId),
}

impl ScopeTarget {
    pub fn matches(&self, slot: &SlotId) -> bool {
        match self {
            ScopeTarget::Element(id) => &slot.element_id == id,
            ScopeTarget::Slot(s) => s == slot,
        }
    }
}

/// Which historical identities a rollback touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackScope {
    All,
    Elements(BTreeSet<ScopeTarget>),
}

impl RollbackScope {
    /// Scope over whole elements, every slot included.
    pub fn elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        Self::Elements(
            ids.into_iter()
                .map(|id| ScopeTarget::Element(id.into()))
                .collect(),
        )
    }

    pub fn slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = SlotId>,
    {
        Self::Elements(slots.into_iter().map(ScopeTarget::Slot).collect())
    }

    pub fn contains(&self, slot: &SlotId) -> bool {
        match self {
            RollbackScope::All => true,
            RollbackScope::Elements(set) => set.iter().any(|t| t.matches(slot)),
        }
    }
}

/// Roll back everything in `scope` that happened strictly after `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackRequest {
    pub target: DateTime<Utc>,
    pub scope: RollbackScope,
}

impl RollbackRequest {
    pub fn new(target: DateTime<Utc>, scope: RollbackScope) -> Self {
        Self { target, scope }
    }

    /// Parse a request document.
    ///
    /// Accepts `{"target": "...", "elements": [...]}` and the operator form
    /// `{"Time": "dd/MM/yyyy\nHH:mm:ss", "Elements": [...]}`. A missing or
    /// null element list means every element. Ids may be numbers or strings
    /// and may carry a slot suffix.
    pub fn from_json(raw: &str) -> Result<Self, PatchError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PatchError::InvalidRequest(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| PatchError::InvalidRequest("request must be an object".to_string()))?;

        let target_raw = obj
            .get("target")
            .or_else(|| obj.get("Time"))
            .and_then(Value::as_str)
            .ok_or_else(|| PatchError::InvalidRequest("missing target time".to_string()))?;
        let target = parse_timestamp(target_raw).ok_or_else(|| {
            PatchError::InvalidRequest(format!("unrecognized target time: {target_raw}"))
        })?;

        let scope = match obj.get("elements").or_else(|| obj.get("Elements")) {
            None | Some(Value::Null) => RollbackScope::All,
            Some(Value::Array(items)) => {
                let mut ids = BTreeSet::new();
                for item in items {
                    ids.insert(parse_element_ref(item)?);
                }
                RollbackScope::Elements(ids)
            }
            Some(other) => {
                return Err(PatchError::InvalidRequest(format!(
                    "elements must be an array, got {other}"
                )))
            }
        };

        Ok(Self { target, scope })
    }
}

fn parse_element_ref(item: &Value) -> Result<ScopeTarget, PatchError> {
    let raw = match item {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(PatchError::InvalidRequest(format!(
                "element id must be a string or number, got {other}"
            )))
        }
    };
    let slot = SlotId::parse(&raw).map_err(PatchError::InvalidRequest)?;
    if slot.element_id.as_str() == raw.trim() {
        Ok(ScopeTarget::Element(slot.element_id))
    } else {
        Ok(ScopeTarget::Slot(slot))
    }
}
