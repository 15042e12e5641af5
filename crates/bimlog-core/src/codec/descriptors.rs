//! Point, plane and profile descriptors.

use serde_json::{json, Map, Value};

use super::curve::{curve_from_value, curve_to_value};
use crate::models::{Curve, Plane, Xyz};

const PROFILE_PREFIX: &str = "profile_";

pub fn encode_point(p: &Xyz) -> Value {
    json!({"X": p.x, "Y": p.y, "Z": p.z})
}

pub fn decode_point(value: &Value) -> Option<Xyz> {
    Some(Xyz {
        x: value.get("X")?.as_f64()?,
        y: value.get("Y")?.as_f64()?,
        z: value.get("Z")?.as_f64()?,
    })
}

pub fn encode_plane(plane: &Plane) -> Value {
    json!({
        "planeOrigin": encode_point(&plane.origin),
        "planeXVec": encode_point(&plane.x_vec),
        "planeYVec": encode_point(&plane.y_vec),
    })
}

pub fn decode_plane(value: &Value) -> Option<Plane> {
    Some(Plane {
        origin: decode_point(value.get("planeOrigin")?)?,
        x_vec: decode_point(value.get("planeXVec")?)?,
        y_vec: decode_point(value.get("planeYVec")?)?,
    })
}

/// Encode sketch loops as `{"profile_1": [...], "profile_2": [...]}`.
pub fn encode_profile(loops: &[Vec<Curve>]) -> Value {
    let mut obj = Map::new();
    for (i, curves) in loops.iter().enumerate() {
        obj.insert(
            format!("{PROFILE_PREFIX}{}", i + 1),
            Value::Array(curves.iter().map(curve_to_value).collect()),
        );
    }
    Value::Object(obj)
}

/// Decode profile loops ordered by their numeric suffix.
///
/// A loop with any curve that fails to decode is dropped; a profile with no
/// usable loop decodes to `None`.
pub fn decode_profile(value: &Value) -> Option<Vec<Vec<Curve>>> {
    let obj = value.as_object()?;
    let mut numbered: Vec<(u32, &Vec<Value>)> = obj
        .iter()
        .filter_map(|(key, loop_value)| {
            let n = key.strip_prefix(PROFILE_PREFIX)?.parse::<u32>().ok()?;
            Some((n, loop_value.as_array()?))
        })
        .collect();
    numbered.sort_by_key(|(n, _)| *n);

    let loops: Vec<Vec<Curve>> = numbered
        .into_iter()
        .filter_map(|(_, curves)| {
            let decoded: Option<Vec<Curve>> = curves.iter().map(curve_from_value).collect();
            decoded.filter(|c| !c.is_empty())
        })
        .collect();

    if loops.is_empty() {
        None
    } else {
        Some(loops)
    }
}

/// Slope arrows are stored either as a curve or as the string `"None"`.
pub fn decode_slope_arrow(value: &Value) -> Option<Curve> {
    match value {
        Value::String(_) | Value::Null => None,
        other => curve_from_value(other),
    }
}
