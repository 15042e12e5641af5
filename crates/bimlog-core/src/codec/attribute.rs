use crate::models::{AttributeValue, LiveId, ParameterValue, RemapTable, Resolution};

/// An attribute value ready to be written to the live model.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveValue {
    Str(String),
    Num(f64),
    Int(i64),
    Ref(LiveId),
}

/// Translate a captured attribute for the live model.
///
/// `ElementId` values go through the remap table: a replayed id becomes its
/// live id, a retired id yields `None` (the parameter is skipped), and an id
/// this session never touched is written literally.
pub fn decode_attribute(param: &ParameterValue, remap: &RemapTable) -> Option<LiveValue> {
    match &param.value {
        AttributeValue::Str(s) => Some(LiveValue::Str(s.clone())),
        AttributeValue::Num(n) => Some(LiveValue::Num(*n)),
        AttributeValue::Int(i) => Some(LiveValue::Int(*i)),
        AttributeValue::Ref(id) => match remap.resolve(id) {
            Resolution::Live(live) => Some(LiveValue::Ref(live)),
            Resolution::Retired => None,
            Resolution::Unmapped => Some(LiveValue::Ref(LiveId::from(id))),
        },
    }
}
