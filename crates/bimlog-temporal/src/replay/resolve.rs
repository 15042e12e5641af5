//! Shared resolution helpers for apply routines.

use serde_json::Value;
use tracing::debug;

use bimlog_core::codec::{decode_attribute, LiveValue};
use bimlog_core::config::PatchConfig;
use bimlog_core::models::{
    ElementCategory, ElementId, LiveId, ParameterSection, RemapTable, Resolution, Section,
};
use bimlog_core::traits::{Flip, LiveModel, LookupKey};

use super::outcome::SkipReason;
use crate::inverse::host_tracker::{host_id_from_value, HOST_ID_KEY};

/// Geometry key some captures use for the level name.
const LEVEL_KEY: &str = "Level";

/// Everything an apply routine may touch for one entry.
pub struct ApplyContext<'a> {
    pub model: &'a mut dyn LiveModel,
    pub remap: &'a mut RemapTable,
    pub config: &'a PatchConfig,
}

impl ApplyContext<'_> {
    /// Live element behind a historical id, for modify and delete.
    pub fn resolve_live(&self, id: &ElementId) -> Result<LiveId, SkipReason> {
        match self.remap.resolve(id) {
            Resolution::Live(live) if self.model.contains(&live) => Ok(live),
            _ => Err(SkipReason::StaleReference(id.clone())),
        }
    }

    /// Host named by the geometry's `HostId`, if any.
    ///
    /// A host this session never touched is used under its historical id
    /// when the live model still has it.
    pub fn resolve_host(&self, geometry: &Section) -> Result<Option<LiveId>, SkipReason> {
        let Some(raw) = geometry.get(HOST_ID_KEY) else {
            return Ok(None);
        };
        let Some(host) = host_id_from_value(raw) else {
            return Ok(None);
        };
        let live = match self.remap.resolve(&host) {
            Resolution::Live(live) => Some(live),
            Resolution::Unmapped => Some(LiveId::from(&host)),
            Resolution::Retired => None,
        };
        match live {
            Some(live) if self.model.contains(&live) => Ok(Some(live)),
            _ => Err(SkipReason::UnresolvedHost(host)),
        }
    }

    pub fn lookup(&self, key: LookupKey) -> Result<LiveId, SkipReason> {
        self.model
            .lookup(&key)
            .ok_or_else(|| SkipReason::UnresolvedLookup(format!("{key:?}")))
    }

    /// System family type by name (walls, floors, ceilings).
    pub fn element_type(&self, category: &ElementCategory, name: &str) -> Result<LiveId, SkipReason> {
        self.lookup(LookupKey::ElementType {
            category: category.clone(),
            name: name.to_string(),
        })
    }

    /// Loadable family symbol by family and type name.
    pub fn family_symbol(
        &self,
        category: &ElementCategory,
        family: &str,
        name: &str,
    ) -> Result<LiveId, SkipReason> {
        self.lookup(LookupKey::FamilySymbol {
            category: category.clone(),
            family: family.to_string(),
            name: name.to_string(),
        })
    }

    /// Level named by the snapshot. `Ok(None)` when the snapshot names none.
    pub fn level(
        &self,
        geometry: &Section,
        parameters: &ParameterSection,
        keys: &[&str],
    ) -> Result<Option<LiveId>, SkipReason> {
        match level_name(geometry, parameters, keys) {
            Some(name) => self.lookup(LookupKey::Level { name }).map(Some),
            None => Ok(None),
        }
    }

    /// Writable parameters, references remapped. Skipped keys and references
    /// to retired elements are left out.
    pub fn parameters(&self, section: &ParameterSection) -> Vec<(String, LiveValue)> {
        section
            .iter()
            .filter(|(key, _)| !self.config.is_parameter_skipped(key))
            .filter_map(|(key, param)| match decode_attribute(param, self.remap) {
                Some(value) => Some((key.clone(), value)),
                None => {
                    debug!(key = %key, "parameter references a retired element, skipping");
                    None
                }
            })
            .collect()
    }
}

/// Level name from geometry `Level`, else the display string of the first
/// matching parameter key.
pub fn level_name(geometry: &Section, parameters: &ParameterSection, keys: &[&str]) -> Option<String> {
    if let Some(Value::String(name)) = geometry.get(LEVEL_KEY) {
        if !name.is_empty() {
            return Some(name.clone());
        }
    }
    keys.iter()
        .filter_map(|k| parameters.get(*k))
        .find_map(|p| p.display.clone().filter(|d| !d.is_empty()))
}

/// Flag states recorded in a property section. Accepts booleans and the
/// host's `"Yes"`/`"No"` strings.
pub fn flips_from(property: &Section, flags: &[Flip]) -> Vec<(Flip, bool)> {
    flags
        .iter()
        .filter_map(|flag| {
            let on = match property.get(flag.property_key())? {
                Value::Bool(b) => *b,
                Value::String(s) if s.eq_ignore_ascii_case("yes") => true,
                Value::String(s) if s.eq_ignore_ascii_case("no") => false,
                _ => return None,
            };
            Some((*flag, on))
        })
        .collect()
}

/// Whether a yes/no parameter is set.
pub fn parameter_is_yes(parameters: &ParameterSection, key: &str) -> bool {
    parameters.get(key).is_some_and(|p| p.is_yes())
}
