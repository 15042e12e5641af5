//! Shared fixtures: an in-memory live model and snapshot builders.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use bimlog_core::codec::LiveValue;
use bimlog_core::errors::PatchError;
use bimlog_core::models::{
    AttributeValue, CommandType, CommonInfo, Curve, ElementCategory, ElementId, EntryInfo,
    LiveId, ParameterValue, Xyz,
};
use bimlog_core::traits::{ElementBlueprint, ElementPatch, Flip, LiveModel, LookupKey, Placement};
use bimlog_temporal::event_store::CaptureEvent;

pub const WALL_200: &str = "Generic - 200mm";
pub const WALL_300: &str = "Generic - 300mm";
pub const FLOOR_150: &str = "Generic 150";
pub const WINDOW_FAMILY: &str = "Fixed";
pub const WINDOW_TYPE: &str = "0915 x 1220mm";

pub fn at(min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 14, min, 0).unwrap()
}

pub fn at_secs(min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 14, min, sec).unwrap()
}

// ── Live model fake ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct FakeElement {
    pub category: ElementCategory,
    pub type_id: Option<LiveId>,
    pub level: Option<LiveId>,
    pub host: Option<LiveId>,
    pub placement: Placement,
    pub structural: bool,
    pub flips: BTreeMap<Flip, bool>,
    pub parameters: BTreeMap<String, LiveValue>,
}

impl FakeElement {
    pub fn from_blueprint(bp: &ElementBlueprint) -> Self {
        Self {
            category: bp.category.clone(),
            type_id: bp.type_id.clone(),
            level: bp.level.clone(),
            host: bp.host.clone(),
            placement: bp.placement.clone(),
            structural: bp.structural,
            flips: bp.flips.iter().copied().collect(),
            parameters: bp.parameters.iter().cloned().collect(),
        }
    }

    pub fn curve(&self) -> Option<&Curve> {
        match &self.placement {
            Placement::Curve(c) => Some(c),
            _ => None,
        }
    }
}

/// In-memory stand-in for the host application.
#[derive(Debug, Default)]
pub struct FakeModel {
    pub elements: BTreeMap<LiveId, FakeElement>,
    pub lookups: HashMap<LookupKey, LiveId>,
    /// Live ids whose patch or delete the host refuses.
    pub rejecting: HashSet<LiveId>,
    pub reject_creates: bool,
    pub transactions: Vec<String>,
    pub commits: usize,
    next_id: u64,
}

impl FakeModel {
    /// A model that knows the standard wall, floor and window types and
    /// `Level 1`.
    pub fn new() -> Self {
        let mut model = Self::default();
        model.add_lookup(
            LookupKey::ElementType {
                category: ElementCategory::Walls,
                name: WALL_200.to_string(),
            },
            "wt-200",
        );
        model.add_lookup(
            LookupKey::ElementType {
                category: ElementCategory::Walls,
                name: WALL_300.to_string(),
            },
            "wt-300",
        );
        model.add_lookup(
            LookupKey::ElementType {
                category: ElementCategory::Floors,
                name: FLOOR_150.to_string(),
            },
            "ft-150",
        );
        model.add_lookup(
            LookupKey::FamilySymbol {
                category: ElementCategory::Windows,
                family: WINDOW_FAMILY.to_string(),
                name: WINDOW_TYPE.to_string(),
            },
            "ws-0915",
        );
        model.add_lookup(
            LookupKey::Level {
                name: "Level 1".to_string(),
            },
            "L1",
        );
        model
    }

    pub fn add_lookup(&mut self, key: LookupKey, id: &str) {
        self.lookups.insert(key, LiveId::new(id));
    }

    /// Put an element into the model under its historical id, as if it had
    /// been there since capture.
    pub fn insert(&mut self, id: &str, element: FakeElement) {
        self.elements.insert(LiveId::new(id), element);
    }

    pub fn get(&self, id: &str) -> Option<&FakeElement> {
        self.elements.get(&LiveId::new(id))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

impl LiveModel for FakeModel {
    fn create_element(&mut self, blueprint: &ElementBlueprint) -> Result<LiveId, PatchError> {
        if self.reject_creates {
            return Err(PatchError::ModelRejected("creation disabled".to_string()));
        }
        self.next_id += 1;
        let id = LiveId::new(format!("live-{}", self.next_id));
        self.elements
            .insert(id.clone(), FakeElement::from_blueprint(blueprint));
        Ok(id)
    }

    fn apply_patch(&mut self, id: &LiveId, patch: &ElementPatch) -> Result<(), PatchError> {
        if self.rejecting.contains(id) {
            return Err(PatchError::ModelRejected(format!("{id} is locked")));
        }
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| PatchError::LiveElementNotFound(id.to_string()))?;
        if let Some(type_id) = &patch.type_id {
            element.type_id = Some(type_id.clone());
        }
        if let Some(placement) = &patch.placement {
            element.placement = placement.clone();
        }
        if let Some(level) = &patch.level {
            element.level = Some(level.clone());
        }
        for (flip, on) in &patch.flips {
            element.flips.insert(*flip, *on);
        }
        for (key, value) in &patch.parameters {
            element.parameters.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn delete_element(&mut self, id: &LiveId) -> Result<(), PatchError> {
        if self.rejecting.contains(id) {
            return Err(PatchError::ModelRejected(format!("{id} is locked")));
        }
        self.elements
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PatchError::LiveElementNotFound(id.to_string()))
    }

    fn lookup(&self, key: &LookupKey) -> Option<LiveId> {
        self.lookups.get(key).cloned()
    }

    fn contains(&self, id: &LiveId) -> bool {
        self.elements.contains_key(id)
    }

    fn begin_transaction(&mut self, name: &str) -> Result<(), PatchError> {
        self.transactions.push(name.to_string());
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<(), PatchError> {
        self.commits += 1;
        Ok(())
    }
}

// ── Snapshot builders ────────────────────────────────────────────────────

pub fn line_json(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!({"Type": "Line", "endPoints": [
        {"X": x0, "Y": y0, "Z": 0.0},
        {"X": x1, "Y": y1, "Z": 0.0}
    ]})
}

pub fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Curve {
    Curve::Line {
        start: Xyz::new(x0, y0, 0.0),
        end: Xyz::new(x1, y1, 0.0),
    }
}

fn common(family: &str, type_name: &str, min: u32) -> CommonInfo {
    CommonInfo {
        family: family.to_string(),
        type_name: type_name.to_string(),
        timestamp: at(min),
    }
}

fn level_param() -> ParameterValue {
    ParameterValue::new(AttributeValue::Ref(ElementId::new("311"))).with_display("Level 1")
}

/// Wall from (0,0) to (`x_end`,0).
pub fn wall_snapshot(min: u32, type_name: &str, x_end: f64) -> EntryInfo {
    let mut info = EntryInfo::new(common("Basic Wall", type_name, min));
    info.geometry
        .insert("Curve".to_string(), line_json(0.0, 0.0, x_end, 0.0));
    info.parameter
        .insert("WALL_BASE_CONSTRAINT".to_string(), level_param());
    info.parameter.insert(
        "WALL_USER_HEIGHT_PARAM".to_string(),
        ParameterValue::new(AttributeValue::Num(3000.0)).with_display("3000"),
    );
    info.parameter.insert(
        "ALL_MODEL_MARK".to_string(),
        ParameterValue::new(AttributeValue::Str("W-01".to_string())),
    );
    info.property.insert("Flipped".to_string(), json!(false));
    info.layers = Some(json!([{"Material": "Concrete", "Width": 200.0}]));
    info
}

/// Rectangular floor of `size` × `size`.
pub fn floor_snapshot(min: u32, size: f64) -> EntryInfo {
    let mut info = EntryInfo::new(common("Floor", FLOOR_150, min));
    info.geometry.insert(
        "Profile".to_string(),
        json!({"profile_1": [
            line_json(0.0, 0.0, size, 0.0),
            line_json(size, 0.0, size, size),
            line_json(size, size, 0.0, size),
            line_json(0.0, size, 0.0, 0.0)
        ]}),
    );
    info.geometry
        .insert("SlopeArrow".to_string(), json!("None"));
    info.geometry.insert("SlopeAngle".to_string(), json!(0.0));
    info.parameter.insert("LEVEL_PARAM".to_string(), level_param());
    info.parameter.insert(
        "FLOOR_PARAM_IS_STRUCTURAL".to_string(),
        ParameterValue::new(AttributeValue::Int(0)).with_display("No"),
    );
    info
}

/// Window hosted in `host` at (`x`, 0).
pub fn window_snapshot(min: u32, host: &str, x: f64) -> EntryInfo {
    let mut info = EntryInfo::new(common(WINDOW_FAMILY, WINDOW_TYPE, min));
    info.geometry
        .insert("Location".to_string(), json!({"X": x, "Y": 0.0, "Z": 900.0}));
    info.geometry.insert("HostId".to_string(), json!(host));
    info.parameter.insert("FAMILY_LEVEL_PARAM".to_string(), level_param());
    info.property.insert("FlipFacing".to_string(), json!(false));
    info.property.insert("FlipHand".to_string(), json!(false));
    info
}

pub fn event(
    id: &str,
    category: ElementCategory,
    command: CommandType,
    min: u32,
    snapshot: Option<EntryInfo>,
) -> CaptureEvent {
    CaptureEvent {
        element_id: ElementId::new(id),
        category,
        command,
        timestamp: at(min),
        snapshot,
    }
}

/// A live wall as the fake model would hold it.
pub fn live_wall(x_end: f64) -> FakeElement {
    FakeElement {
        category: ElementCategory::Walls,
        type_id: Some(LiveId::new("wt-200")),
        level: Some(LiveId::new("L1")),
        host: None,
        placement: Placement::Curve(line(0.0, 0.0, x_end, 0.0)),
        structural: false,
        flips: BTreeMap::new(),
        parameters: BTreeMap::new(),
    }
}
