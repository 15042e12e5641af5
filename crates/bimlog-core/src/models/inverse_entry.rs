use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::element::{ElementCategory, ElementId, SlotId};
use super::log_entry::{CommandType, CommonInfo, EntryInfo, ParameterSection, Section};
use crate::timestamp;

/// One derived undo operation.
///
/// `timestamp` is the forward entry's original timestamp; the selector
/// compares it against the rollback target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseLogEntry {
    #[serde(rename = "ElementId")]
    pub slot: SlotId,
    #[serde(rename = "Category")]
    pub category: ElementCategory,
    #[serde(rename = "Timestamp", with = "timestamp::flexible")]
    pub timestamp: DateTime<Utc>,
    /// Hosted-element change that only followed its host's modification.
    #[serde(rename = "Derivative", default)]
    pub derivative: bool,
    #[serde(rename = "Payload")]
    pub payload: InversePayload,
}

impl InverseLogEntry {
    pub fn element_id(&self) -> &ElementId {
        &self.slot.element_id
    }

    /// The inverse command is fully determined by the payload shape.
    pub fn command_type(&self) -> CommandType {
        match self.payload {
            InversePayload::Recreate { .. } => CommandType::Create,
            InversePayload::Remove => CommandType::Delete,
            InversePayload::Patch(_) => CommandType::Modify,
        }
    }
}

/// What the replay executor applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "CommandType")]
pub enum InversePayload {
    /// Undo of a delete: rebuild from the last known full snapshot.
    #[serde(rename = "C")]
    Recreate {
        #[serde(rename = "Info")]
        info: EntryInfo,
    },
    /// Undo of a create.
    #[serde(rename = "D")]
    Remove,
    /// Undo of a modify: old values of the changed fields only.
    #[serde(rename = "M")]
    Patch(SparsePatch),
}

/// Family/type reverted by a sparse patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifiedCommon {
    #[serde(rename = "ElementFamily", default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(rename = "ElementType", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ModifiedCommon {
    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.type_name.is_none()
    }
}

/// Sparse reversed modification.
///
/// `common` is the previous snapshot's identity section, kept so replay can
/// resolve the element type even when only geometry changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparsePatch {
    #[serde(rename = "Common")]
    pub common: CommonInfo,
    #[serde(rename = "ModifiedCommon", default)]
    pub modified_common: ModifiedCommon,
    #[serde(rename = "ModifiedGeometry", default)]
    pub modified_geometry: Section,
    #[serde(rename = "ModifiedParameter", default)]
    pub modified_parameter: ParameterSection,
    #[serde(rename = "ModifiedProperty", default)]
    pub modified_property: Section,
}

impl SparsePatch {
    pub fn new(common: CommonInfo) -> Self {
        Self {
            common,
            modified_common: ModifiedCommon::default(),
            modified_geometry: Section::new(),
            modified_parameter: ParameterSection::new(),
            modified_property: Section::new(),
        }
    }

    /// True when nothing differs between the two snapshots.
    pub fn is_empty(&self) -> bool {
        self.modified_common.is_empty()
            && self.modified_geometry.is_empty()
            && self.modified_parameter.is_empty()
            && self.modified_property.is_empty()
    }
}
