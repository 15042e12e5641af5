//! Element identities and categories: ElementId, SlotId, LiveId, ElementCategory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Historical element identity assigned by the host model at capture time.
/// Only stable within one forward log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identity currently valid in the live model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveId(pub String);

impl LiveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Elements that were never replayed keep their historical identity.
impl From<&ElementId> for LiveId {
    fn from(id: &ElementId) -> Self {
        Self(id.0.clone())
    }
}

/// One logical version of an element: `"<id>_<n>"`.
///
/// A re-create of the same historical id opens slot `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId {
    pub element_id: ElementId,
    pub version: u32,
}

impl SlotId {
    pub fn new(element_id: ElementId, version: u32) -> Self {
        Self {
            element_id,
            version,
        }
    }

    /// Parse `"<id>_<n>"`. A bare id without a numeric suffix is slot 1.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("empty element id".to_string());
        }
        if let Some((base, suffix)) = raw.rsplit_once('_') {
            if !base.is_empty() && !suffix.is_empty() {
                if let Ok(version) = suffix.parse::<u32>() {
                    return Ok(Self::new(ElementId::new(base), version));
                }
            }
        }
        Ok(Self::new(ElementId::new(raw), 1))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.element_id, self.version)
    }
}

impl FromStr for SlotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlotId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SlotId> for String {
    fn from(slot: SlotId) -> Self {
        slot.to_string()
    }
}

/// Element categories the engine knows about.
///
/// Serialized by the host's display name. Names outside the known set
/// round-trip through `Other` and are replayed as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementCategory {
    Walls,
    CurtainWalls,
    Floors,
    Ceilings,
    Roofs,
    Windows,
    Doors,
    Columns,
    StructuralColumns,
    StructuralFraming,
    Furniture,
    Stairs,
    Railings,
    Other(String),
}

impl ElementCategory {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Walls" => Self::Walls,
            "Curtain Walls" => Self::CurtainWalls,
            "Floors" => Self::Floors,
            "Ceilings" => Self::Ceilings,
            "Roofs" => Self::Roofs,
            "Windows" => Self::Windows,
            "Doors" => Self::Doors,
            "Columns" => Self::Columns,
            "Structural Columns" => Self::StructuralColumns,
            "Structural Framing" => Self::StructuralFraming,
            "Furniture" => Self::Furniture,
            "Stairs" => Self::Stairs,
            "Railings" => Self::Railings,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Walls => "Walls",
            Self::CurtainWalls => "Curtain Walls",
            Self::Floors => "Floors",
            Self::Ceilings => "Ceilings",
            Self::Roofs => "Roofs",
            Self::Windows => "Windows",
            Self::Doors => "Doors",
            Self::Columns => "Columns",
            Self::StructuralColumns => "Structural Columns",
            Self::StructuralFraming => "Structural Framing",
            Self::Furniture => "Furniture",
            Self::Stairs => "Stairs",
            Self::Railings => "Railings",
            Self::Other(name) => name,
        }
    }

    /// Container-panel categories: membership is implied by the host's geometry,
    /// so their entries never reach the inverse log.
    pub fn is_container_panel(&self) -> bool {
        matches!(self, Self::CurtainWalls)
    }

    /// Categories whose modifications drag hosted elements along.
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Walls)
    }

    pub fn is_hosted(&self) -> bool {
        matches!(self, Self::Windows | Self::Doors)
    }

    /// Planar hosts whose geometry cannot be edited in place; replay destroys
    /// and recreates them.
    pub fn recreates_on_geometry_change(&self) -> bool {
        matches!(self, Self::Floors | Self::Ceilings)
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for ElementCategory {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ElementCategory> for String {
    fn from(category: ElementCategory) -> Self {
        category.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_parses_suffix() {
        let slot = SlotId::parse("348211_3").unwrap();
        assert_eq!(slot.element_id.as_str(), "348211");
        assert_eq!(slot.version, 3);
        assert_eq!(slot.to_string(), "348211_3");
    }

    #[test]
    fn bare_id_is_first_slot() {
        let slot = SlotId::parse("348211").unwrap();
        assert_eq!(slot.version, 1);
        assert_eq!(slot.element_id.as_str(), "348211");
    }

    #[test]
    fn non_numeric_suffix_stays_in_id() {
        let slot = SlotId::parse("wall_a").unwrap();
        assert_eq!(slot.element_id.as_str(), "wall_a");
        assert_eq!(slot.version, 1);
    }

    #[test]
    fn empty_slot_rejected() {
        assert!(SlotId::parse("  ").is_err());
    }

    #[test]
    fn category_names_round_trip() {
        for name in ["Walls", "Structural Columns", "Curtain Walls", "Generic Models"] {
            assert_eq!(ElementCategory::from_name(name).name(), name);
        }
        assert_eq!(
            ElementCategory::from_name("Generic Models"),
            ElementCategory::Other("Generic Models".to_string())
        );
    }
}
