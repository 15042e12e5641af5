//! LiveModel: the narrow boundary to the host modeling application.
//!
//! The replay executor only ever talks to the host through this trait.
//! Implementations translate blueprints and patches into native calls.

use crate::codec::LiveValue;
use crate::errors::PatchError;
use crate::models::{Curve, ElementCategory, LiveId, Xyz};

/// Name-based lookups the host resolves to live ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    /// System family type (wall type, floor type, ...).
    ElementType {
        category: ElementCategory,
        name: String,
    },
    /// Loadable family symbol (window, door, column, ...).
    FamilySymbol {
        category: ElementCategory,
        family: String,
        name: String,
    },
    Level {
        name: String,
    },
}

/// Where and how an element sits in the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Curve(Curve),
    Point(Xyz),
    /// Sketch-based element: boundary loops plus optional slope.
    Profile {
        loops: Vec<Vec<Curve>>,
        slope_arrow: Option<Curve>,
        slope: f64,
    },
}

/// Orientation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flip {
    /// Wall orientation (`Flipped`).
    Wall,
    /// `FlipFacing` of hosted instances.
    Facing,
    /// `FlipHand` of hosted instances.
    Hand,
}

impl Flip {
    pub fn property_key(&self) -> &'static str {
        match self {
            Flip::Wall => "Flipped",
            Flip::Facing => "FlipFacing",
            Flip::Hand => "FlipHand",
        }
    }
}

/// Everything needed to create an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBlueprint {
    pub category: ElementCategory,
    pub type_id: Option<LiveId>,
    pub level: Option<LiveId>,
    pub host: Option<LiveId>,
    pub placement: Placement,
    pub structural: bool,
    /// Desired flag state after creation.
    pub flips: Vec<(Flip, bool)>,
    pub parameters: Vec<(String, LiveValue)>,
}

/// In-place modification of an existing element. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub type_id: Option<LiveId>,
    pub placement: Option<Placement>,
    pub level: Option<LiveId>,
    pub flips: Vec<(Flip, bool)>,
    pub parameters: Vec<(String, LiveValue)>,
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        self.type_id.is_none()
            && self.placement.is_none()
            && self.level.is_none()
            && self.flips.is_empty()
            && self.parameters.is_empty()
    }
}

/// Mutation primitives of the live model.
///
/// Failures are reported as `PatchError::ModelRejected` (or
/// `LiveElementNotFound`); the executor records them per entry and moves on.
pub trait LiveModel {
    fn create_element(&mut self, blueprint: &ElementBlueprint) -> Result<LiveId, PatchError>;

    fn apply_patch(&mut self, id: &LiveId, patch: &ElementPatch) -> Result<(), PatchError>;

    fn delete_element(&mut self, id: &LiveId) -> Result<(), PatchError>;

    fn lookup(&self, key: &LookupKey) -> Option<LiveId>;

    fn contains(&self, id: &LiveId) -> bool;

    fn begin_transaction(&mut self, _name: &str) -> Result<(), PatchError> {
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<(), PatchError> {
        Ok(())
    }
}
