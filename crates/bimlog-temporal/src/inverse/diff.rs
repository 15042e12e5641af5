//! Sparse reversed diff between two full snapshots.
//!
//! Every field recorded in the patch holds the OLD value, so applying the
//! patch to the new state restores the old one.

use std::collections::BTreeMap;

use bimlog_core::models::{ElementCategory, EntryInfo, ModifiedCommon, SparsePatch};

/// Diff `old` → `new`, returning what must be written back to restore `old`.
///
/// - Family/type are recorded together when either differs.
/// - Parameters and properties: keys present in both snapshots whose values
///   differ record the old value.
/// - Geometry: a key that differs, was removed, or was added copies the
///   whole old geometry section.
/// - Recreate-on-geometry-change categories additionally get family/type and
///   the entire old parameter section whenever geometry changed, since replay
///   rebuilds those elements from scratch.
/// - Layers are never compared.
pub fn sparse_diff(old: &EntryInfo, new: &EntryInfo, category: &ElementCategory) -> SparsePatch {
    let mut patch = SparsePatch::new(old.common.clone());

    if old.common.family != new.common.family || old.common.type_name != new.common.type_name {
        patch.modified_common = full_common(old);
    }

    patch.modified_parameter = changed_values(&old.parameter, &new.parameter);
    patch.modified_property = changed_values(&old.property, &new.property);

    let geometry_changed = old
        .geometry
        .iter()
        .any(|(key, value)| new.geometry.get(key) != Some(value))
        || new.geometry.keys().any(|key| !old.geometry.contains_key(key));
    if geometry_changed {
        patch.modified_geometry = old.geometry.clone();

        if category.recreates_on_geometry_change() {
            patch.modified_common = full_common(old);
            patch.modified_parameter = old.parameter.clone();
        }
    }

    patch
}

fn full_common(info: &EntryInfo) -> ModifiedCommon {
    ModifiedCommon {
        family: Some(info.common.family.clone()),
        type_name: Some(info.common.type_name.clone()),
    }
}

fn changed_values<V: Clone + PartialEq>(
    old: &BTreeMap<String, V>,
    new: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    old.iter()
        .filter(|(key, value)| new.get(*key).is_some_and(|n| n != *value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
