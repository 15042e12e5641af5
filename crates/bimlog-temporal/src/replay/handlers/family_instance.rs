use bimlog_core::codec::{decode_point, locate_curve};
use bimlog_core::models::{ElementCategory, EntryInfo, InverseLogEntry, Section, SparsePatch};
use bimlog_core::traits::{ElementBlueprint, ElementPatch, Flip, Placement};

use super::{reverted_type, CategoryHandler};
use crate::replay::outcome::{Applied, SkipReason};
use crate::replay::resolve::{flips_from, ApplyContext};

const LOCATION_KEY: &str = "Location";

/// How a family instance is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Point,
    Curve,
    /// Slanted columns carry a curve location, vertical ones a point.
    PointOrCurve,
}

/// Loadable-family instances: windows, doors, columns, framing, furniture.
pub struct FamilyInstanceHandler {
    pub anchor: Anchor,
    /// Must be placed in a host resolved through the remap table.
    pub hosted: bool,
    pub level_keys: &'static [&'static str],
    pub flips: &'static [Flip],
    pub structural: bool,
}

impl FamilyInstanceHandler {
    fn placement(&self, geometry: &Section) -> Option<Placement> {
        let location = geometry.get(LOCATION_KEY);
        match self.anchor {
            Anchor::Point => location.and_then(decode_point).map(Placement::Point),
            Anchor::Curve => locate_curve(geometry).map(Placement::Curve),
            Anchor::PointOrCurve => match location {
                Some(loc) if loc.get("Type").or_else(|| loc.get("type")).is_some() => {
                    locate_curve(geometry).map(Placement::Curve)
                }
                Some(loc) => decode_point(loc).map(Placement::Point),
                None => None,
            },
        }
    }
}

impl CategoryHandler for FamilyInstanceHandler {
    fn blueprint(
        &self,
        ctx: &ApplyContext<'_>,
        category: &ElementCategory,
        info: &EntryInfo,
    ) -> Result<ElementBlueprint, SkipReason> {
        let placement = self
            .placement(&info.geometry)
            .ok_or_else(|| SkipReason::MissingGeometry(format!("{category} location")))?;
        let type_id = ctx.family_symbol(category, &info.common.family, &info.common.type_name)?;
        let host = if self.hosted {
            ctx.resolve_host(&info.geometry)?
        } else {
            None
        };
        let level = ctx.level(&info.geometry, &info.parameter, self.level_keys)?;

        Ok(ElementBlueprint {
            category: category.clone(),
            type_id: Some(type_id),
            level,
            host,
            placement,
            structural: self.structural,
            flips: flips_from(&info.property, self.flips),
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
        if let Some((family, type_name)) = reverted_type(patch) {
            change.type_id = Some(ctx.family_symbol(&entry.category, family, type_name)?);
        }
        change.placement = self.placement(&patch.modified_geometry);
        change.level = ctx.level(&patch.modified_geometry, &patch.modified_parameter, self.level_keys)?;
        change.flips = flips_from(&patch.modified_property, self.flips);
        change.parameters = ctx.parameters(&patch.modified_parameter);

        if !change.is_empty() {
            ctx.model.apply_patch(&live, &change)?;
        }
        Ok(Applied::Patched(live))
    }
}
