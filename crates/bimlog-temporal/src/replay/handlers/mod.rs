//! Per-category apply routines.
//!
//! Each supported category turns a full snapshot into an
//! [`ElementBlueprint`] and a sparse patch into an in-place change. Deletes
//! are uniform and live in the executor.

mod family_instance;
mod planar;
mod wall;

use bimlog_core::models::{ElementCategory, EntryInfo, InverseLogEntry, SparsePatch};
use bimlog_core::traits::{ElementBlueprint, Flip};

use super::outcome::{Applied, SkipReason};
use super::resolve::ApplyContext;

use family_instance::{Anchor, FamilyInstanceHandler};
use planar::PlanarHandler;
use wall::WallHandler;

pub trait CategoryHandler: Sync {
    /// Blueprint for recreating the element from a full snapshot.
    fn blueprint(
        &self,
        ctx: &ApplyContext<'_>,
        category: &ElementCategory,
        info: &EntryInfo,
    ) -> Result<ElementBlueprint, SkipReason>;

    /// Restore the old values carried by `patch`.
    fn modify(
        &self,
        ctx: &mut ApplyContext<'_>,
        entry: &InverseLogEntry,
        patch: &SparsePatch,
    ) -> Result<Applied, SkipReason>;
}

static WALLS: WallHandler = WallHandler;

static PLANAR: PlanarHandler = PlanarHandler;

static OPENINGS: FamilyInstanceHandler = FamilyInstanceHandler {
    anchor: Anchor::Point,
    hosted: true,
    level_keys: &["FAMILY_LEVEL_PARAM"],
    flips: &[Flip::Facing, Flip::Hand],
    structural: false,
};

static COLUMNS: FamilyInstanceHandler = FamilyInstanceHandler {
    anchor: Anchor::Point,
    hosted: false,
    level_keys: &["FAMILY_BASE_LEVEL_PARAM"],
    flips: &[],
    structural: false,
};

static STRUCTURAL_COLUMNS: FamilyInstanceHandler = FamilyInstanceHandler {
    anchor: Anchor::PointOrCurve,
    hosted: false,
    level_keys: &["FAMILY_BASE_LEVEL_PARAM"],
    flips: &[],
    structural: true,
};

static FRAMING: FamilyInstanceHandler = FamilyInstanceHandler {
    anchor: Anchor::Curve,
    hosted: false,
    level_keys: &["INSTANCE_REFERENCE_LEVEL_PARAM", "Level"],
    flips: &[],
    structural: true,
};

static FURNITURE: FamilyInstanceHandler = FamilyInstanceHandler {
    anchor: Anchor::Point,
    hosted: false,
    level_keys: &["FAMILY_LEVEL_PARAM"],
    flips: &[],
    structural: false,
};

/// Apply routine for a category; `None` means replay is a no-op.
pub fn handler_for(category: &ElementCategory) -> Option<&'static dyn CategoryHandler> {
    match category {
        ElementCategory::Walls => Some(&WALLS),
        ElementCategory::Floors | ElementCategory::Ceilings => Some(&PLANAR),
        ElementCategory::Windows | ElementCategory::Doors => Some(&OPENINGS),
        ElementCategory::Columns => Some(&COLUMNS),
        ElementCategory::StructuralColumns => Some(&STRUCTURAL_COLUMNS),
        ElementCategory::StructuralFraming => Some(&FRAMING),
        ElementCategory::Furniture => Some(&FURNITURE),
        ElementCategory::CurtainWalls
        | ElementCategory::Roofs
        | ElementCategory::Stairs
        | ElementCategory::Railings
        | ElementCategory::Other(_) => None,
    }
}

/// Type name a patch should restore, if the type changed.
fn reverted_type(patch: &SparsePatch) -> Option<(&str, &str)> {
    if patch.modified_common.is_empty() {
        return None;
    }
    let family = patch
        .modified_common
        .family
        .as_deref()
        .unwrap_or(&patch.common.family);
    let type_name = patch
        .modified_common
        .type_name
        .as_deref()
        .unwrap_or(&patch.common.type_name);
    Some((family, type_name))
}
