use bimlog_core::codec::locate_curve;
use bimlog_core::models::{ElementCategory, EntryInfo, InverseLogEntry, SparsePatch};
use bimlog_core::traits::{ElementBlueprint, ElementPatch, Flip, Placement};

use super::{reverted_type, CategoryHandler};
use crate::replay::outcome::{Applied, SkipReason};
use crate::replay::resolve::{flips_from, parameter_is_yes, ApplyContext};

const BASE_LEVEL_KEY: &str = "WALL_BASE_CONSTRAINT";
const STRUCTURAL_KEY: &str = "WALL_STRUCTURAL_SIGNIFICANT";

/// Curve-driven walls.
pub struct WallHandler;

impl CategoryHandler for WallHandler {
    fn blueprint(
        &self,
        ctx: &ApplyContext<'_>,
        category: &ElementCategory,
        info: &EntryInfo,
    ) -> Result<ElementBlueprint, SkipReason> {
        let curve = locate_curve(&info.geometry)
            .ok_or_else(|| SkipReason::MissingGeometry("wall location curve".to_string()))?;
        let type_id = ctx.element_type(category, &info.common.type_name)?;
        let level = ctx.level(&info.geometry, &info.parameter, &[BASE_LEVEL_KEY])?;

        Ok(ElementBlueprint {
            category: category.clone(),
            type_id: Some(type_id),
            level,
            host: None,
            placement: Placement::Curve(curve),
            structural: parameter_is_yes(&info.parameter, STRUCTURAL_KEY),
            flips: flips_from(&info.property, &[Flip::Wall]),
            parameters: ctx.parameters(&info.parameter),
        })
    }

    fn modify(
        &self,
        ctx: &mut ApplyContext<'_>,
        entry: &InverseLogEntry,
        patch: &SparsePatch,
    ) -> Result<Applied, SkipReason> {
        let live = ctx.resolve_live(entry.element_id())?;

        let mut change = ElementPatch::default();
        if let Some((_, type_name)) = reverted_type(patch) {
            change.type_id = Some(ctx.element_type(&entry.category, type_name)?);
        }
        if !patch.modified_geometry.is_empty() {
            // Other geometry keys (Level, HostId) do not move the wall.
            if let Some(curve) = locate_curve(&patch.modified_geometry) {
                change.placement = Some(Placement::Curve(curve));
            }
        }
        change.level = ctx.level(&patch.modified_geometry, &patch.modified_parameter, &[BASE_LEVEL_KEY])?;
        change.flips = flips_from(&patch.modified_property, &[Flip::Wall]);
        change.parameters = ctx.parameters(&patch.modified_parameter);

        if !change.is_empty() {
            ctx.model.apply_patch(&live, &change)?;
        }
        Ok(Applied::Patched(live))
    }
}
