use tracing::debug;

use bimlog_core::codec::{decode_profile, decode_slope_arrow};
use bimlog_core::models::{CommonInfo, ElementCategory, EntryInfo, InverseLogEntry, Section, SparsePatch};
use bimlog_core::traits::{ElementBlueprint, ElementPatch, Placement};

use super::{reverted_type, CategoryHandler};
use crate::replay::outcome::{Applied, SkipReason};
use crate::replay::resolve::{parameter_is_yes, ApplyContext};

const PROFILE_KEYS: [&str; 2] = ["Profile", "CurveLoops"];
const SLOPE_ARROW_KEY: &str = "SlopeArrow";
const SLOPE_ANGLE_KEY: &str = "SlopeAngle";
const LEVEL_KEY: &str = "LEVEL_PARAM";
const STRUCTURAL_KEY: &str = "FLOOR_PARAM_IS_STRUCTURAL";

/// Sketch-based floors and ceilings.
///
/// The host cannot edit their boundary in place, so a geometry revert
/// destroys the element and builds a new one from the patch.
pub struct PlanarHandler;

fn profile_placement(geometry: &Section) -> Option<Placement> {
    let loops = PROFILE_KEYS
        .iter()
        .filter_map(|k| geometry.get(*k))
        .find_map(decode_profile)?;
    Some(Placement::Profile {
        loops,
        slope_arrow: geometry.get(SLOPE_ARROW_KEY).and_then(decode_slope_arrow),
        slope: geometry
            .get(SLOPE_ANGLE_KEY)
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
    })
}

impl CategoryHandler for PlanarHandler {
    fn blueprint(
        &self,
        ctx: &ApplyContext<'_>,
        category: &ElementCategory,
        info: &EntryInfo,
    ) -> Result<ElementBlueprint, SkipReason> {
        let placement = profile_placement(&info.geometry)
            .ok_or_else(|| SkipReason::MissingGeometry(format!("{category} boundary profile")))?;
        let type_id = ctx.element_type(category, &info.common.type_name)?;
        let level = ctx.level(&info.geometry, &info.parameter, &[LEVEL_KEY])?;

        Ok(ElementBlueprint {
            category: category.clone(),
            type_id: Some(type_id),
            level,
            host: None,
            placement,
            structural: parameter_is_yes(&info.parameter, STRUCTURAL_KEY),
            flips: Vec::new(),
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

        if profile_placement(&patch.modified_geometry).is_some() {
            // Everything is resolved before the old element goes away.
            let info = recreate_info(patch);
            let blueprint = self.blueprint(ctx, &entry.category, &info)?;
            ctx.model.delete_element(&live)?;
            return match ctx.model.create_element(&blueprint) {
                Ok(new_live) => {
                    debug!(
                        element_id = %entry.element_id(),
                        previous = %live,
                        live = %new_live,
                        "recreated planar element"
                    );
                    ctx.remap.register(entry.element_id().clone(), new_live.clone());
                    Ok(Applied::Recreated {
                        previous: live,
                        live: new_live,
                    })
                }
                Err(e) => {
                    ctx.remap.retire(entry.element_id());
                    Err(e.into())
                }
            };
        }

        let mut change = ElementPatch::default();
        if let Some((_, type_name)) = reverted_type(patch) {
            change.type_id = Some(ctx.element_type(&entry.category, type_name)?);
        }
        change.level = ctx.level(&patch.modified_geometry, &patch.modified_parameter, &[LEVEL_KEY])?;
        change.parameters = ctx.parameters(&patch.modified_parameter);

        if !change.is_empty() {
            ctx.model.apply_patch(&live, &change)?;
        }
        Ok(Applied::Patched(live))
    }
}

/// Snapshot to rebuild from: the patch's old values over the old identity.
fn recreate_info(patch: &SparsePatch) -> EntryInfo {
    let mut common: CommonInfo = patch.common.clone();
    if let Some((family, type_name)) = reverted_type(patch) {
        common.family = family.to_string();
        common.type_name = type_name.to_string();
    }
    let mut info = EntryInfo::new(common);
    info.geometry = patch.modified_geometry.clone();
    info.parameter = patch.modified_parameter.clone();
    info.property = patch.modified_property.clone();
    info
}
