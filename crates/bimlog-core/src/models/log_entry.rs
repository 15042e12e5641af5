//! Forward-log record types: LogEntry, CommandType, EntryInfo, CommonInfo,
//! ParameterValue, AttributeValue, StorageKind.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::element::{ElementCategory, ElementId, SlotId};
use crate::errors::PatchError;
use crate::timestamp;

/// Category-specific free-form section (geometry, property flags).
pub type Section = BTreeMap<String, Value>;

/// Built-in attribute key → captured value.
pub type ParameterSection = BTreeMap<String, ParameterValue>;

/// What happened to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "C")]
    Create,
    #[serde(rename = "M")]
    Modify,
    #[serde(rename = "D")]
    Delete,
}

impl CommandType {
    pub fn code(&self) -> &'static str {
        match self {
            CommandType::Create => "C",
            CommandType::Modify => "M",
            CommandType::Delete => "D",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(CommandType::Create),
            "M" => Some(CommandType::Modify),
            "D" => Some(CommandType::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How the host stores an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    String,
    Double,
    Integer,
    ElementId,
}

/// A captured attribute value; the variant is the storage kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Num(f64),
    Int(i64),
    Ref(ElementId),
}

impl AttributeValue {
    pub fn storage_kind(&self) -> StorageKind {
        match self {
            AttributeValue::Str(_) => StorageKind::String,
            AttributeValue::Num(_) => StorageKind::Double,
            AttributeValue::Int(_) => StorageKind::Integer,
            AttributeValue::Ref(_) => StorageKind::ElementId,
        }
    }
}

/// One entry of the Parameter section: `{StorageType, Value, ValueString}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameter", into = "RawParameter")]
pub struct ParameterValue {
    pub value: AttributeValue,
    /// Host-formatted display string ("Level 1", "Yes", "3000 mm").
    pub display: Option<String>,
}

impl ParameterValue {
    pub fn new(value: AttributeValue) -> Self {
        Self {
            value,
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.value.storage_kind()
    }

    /// Boolean reading of yes/no parameters (`"Yes"` display or integer 1).
    pub fn is_yes(&self) -> bool {
        match (&self.display, &self.value) {
            (Some(d), _) if d.eq_ignore_ascii_case("yes") => true,
            (_, AttributeValue::Int(i)) => *i == 1,
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawParameter {
    #[serde(rename = "StorageType")]
    storage_type: String,
    #[serde(rename = "Value", default)]
    value: Value,
    #[serde(rename = "ValueString", default, skip_serializing_if = "Option::is_none")]
    value_string: Option<String>,
}

impl TryFrom<RawParameter> for ParameterValue {
    type Error = String;

    fn try_from(raw: RawParameter) -> Result<Self, Self::Error> {
        let value = match raw.storage_type.as_str() {
            "Double" => raw
                .value
                .as_f64()
                .map(AttributeValue::Num)
                .ok_or_else(|| format!("Double parameter holds {}", raw.value))?,
            "Integer" => json_as_i64(&raw.value)
                .map(AttributeValue::Int)
                .ok_or_else(|| format!("Integer parameter holds {}", raw.value))?,
            "ElementId" => json_as_id(&raw.value)
                .map(|id| AttributeValue::Ref(ElementId(id)))
                .ok_or_else(|| format!("ElementId parameter holds {}", raw.value))?,
            // "String" and kinds the codec does not model degrade to text.
            _ => AttributeValue::Str(match &raw.value {
                Value::String(s) => s.clone(),
                Value::Null => raw.value_string.clone().unwrap_or_default(),
                other => other.to_string(),
            }),
        };
        Ok(Self {
            value,
            display: raw.value_string,
        })
    }
}

impl From<ParameterValue> for RawParameter {
    fn from(p: ParameterValue) -> Self {
        let (storage_type, value) = match p.value {
            AttributeValue::Str(s) => ("String", Value::String(s)),
            AttributeValue::Num(n) => ("Double", serde_json::json!(n)),
            AttributeValue::Int(i) => ("Integer", Value::from(i)),
            AttributeValue::Ref(id) => ("ElementId", Value::String(id.0)),
        };
        RawParameter {
            storage_type: storage_type.to_string(),
            value,
            value_string: p.display,
        }
    }
}

fn json_as_i64(v: &Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn json_as_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Identity section shared by every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonInfo {
    #[serde(rename = "ElementFamily", default)]
    pub family: String,
    #[serde(rename = "ElementType", default)]
    pub type_name: String,
    #[serde(rename = "Timestamp", with = "timestamp::flexible")]
    pub timestamp: DateTime<Utc>,
}

/// Full snapshot of an element at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryInfo {
    #[serde(rename = "Common")]
    pub common: CommonInfo,
    #[serde(rename = "Geometry", default)]
    pub geometry: Section,
    #[serde(rename = "Parameter", default, deserialize_with = "lenient_parameters")]
    pub parameter: ParameterSection,
    #[serde(rename = "Property", default)]
    pub property: Section,
    /// Layer/material composition. Derived by the host; never diffed or replayed.
    #[serde(rename = "Layers", default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Value>,
}

impl EntryInfo {
    pub fn new(common: CommonInfo) -> Self {
        Self {
            common,
            geometry: Section::new(),
            parameter: ParameterSection::new(),
            property: Section::new(),
            layers: None,
        }
    }
}

/// Parameter sections may nest built-ins under `"Built-In"`; that level is
/// flattened. Entries that do not decode are dropped rather than failing
/// the whole snapshot.
fn lenient_parameters<'de, D>(d: D) -> Result<ParameterSection, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Map<String, Value>>::deserialize(d)?.unwrap_or_default();
    let mut section = ParameterSection::new();
    let mut insert = |key: String, value: Value| match serde_json::from_value(value) {
        Ok(p) => {
            section.insert(key, p);
        }
        Err(e) => tracing::debug!(key = %key, error = %e, "dropping undecodable parameter"),
    };
    for (key, value) in raw {
        match (key.as_str(), value) {
            ("Built-In", Value::Object(nested)) => {
                for (k, v) in nested {
                    insert(k, v);
                }
            }
            (_, value) => insert(key, value),
        }
    }
    Ok(section)
}

/// One captured event of the forward log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "ElementId")]
    pub slot: SlotId,
    #[serde(rename = "CommandType")]
    pub command_type: CommandType,
    #[serde(rename = "Timestamp", with = "timestamp::flexible")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Category")]
    pub category: ElementCategory,
    /// Full snapshot; absent for deletes.
    #[serde(rename = "Info", default, skip_serializing_if = "Option::is_none")]
    pub info: Option<EntryInfo>,
}

impl LogEntry {
    pub fn element_id(&self) -> &ElementId {
        &self.slot.element_id
    }

    /// Lenient reader for one persisted record.
    ///
    /// Accepts the capture-side layout where the timestamp and category live
    /// under `Info.Common` (`Timestamp`, `ElementCategory`), numeric element
    /// ids, and delete records that still carry a snapshot.
    pub fn from_value(mut value: Value) -> Result<Self, PatchError> {
        let element_id = value
            .get("ElementId")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();

        if let Some(obj) = value.as_object_mut() {
            if let Some(Value::Number(n)) = obj.get("ElementId") {
                let id = n.to_string();
                obj.insert("ElementId".to_string(), Value::String(id));
            }

            let common = obj
                .get("Info")
                .and_then(|info| info.get("Common"))
                .cloned()
                .unwrap_or(Value::Null);
            if !obj.contains_key("Timestamp") {
                if let Some(ts) = common.get("Timestamp") {
                    obj.insert("Timestamp".to_string(), ts.clone());
                }
            }
            if !obj.contains_key("Category") {
                if let Some(cat) = common.get("ElementCategory") {
                    obj.insert("Category".to_string(), cat.clone());
                }
            }

            if obj.get("CommandType").and_then(|c| c.as_str()) == Some("D") {
                obj.remove("Info");
            }
        }

        serde_json::from_value(value).map_err(|e| PatchError::MalformedEntry {
            element_id,
            reason: e.to_string(),
        })
    }
}
