//! Curve ↔ structured description.
//!
//! Supported: Line, Arc, Ellipse. Anything else encodes to `Unknown` and
//! decodes to `None`; callers treat that as missing geometry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Curve, Section, Xyz};

/// Section keys that may hold an element's location curve, in lookup order.
pub const CURVE_KEYS: [&str; 3] = ["Curve", "Location", "LocationCurve"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum CurveDescription {
    Line {
        #[serde(rename = "endPoints")]
        end_points: [Xyz; 2],
    },
    Arc {
        center: Xyz,
        radius: f64,
        #[serde(rename = "startAngle")]
        start_angle: f64,
        #[serde(rename = "endAngle")]
        end_angle: f64,
        #[serde(rename = "xAxis")]
        x_axis: Xyz,
        #[serde(rename = "yAxis")]
        y_axis: Xyz,
    },
    Ellipse {
        center: Xyz,
        #[serde(rename = "radiusX")]
        radius_x: f64,
        #[serde(rename = "radiusY")]
        radius_y: f64,
        #[serde(rename = "xDirection")]
        x_direction: Xyz,
        #[serde(rename = "yDirection")]
        y_direction: Xyz,
        #[serde(rename = "startParameter")]
        start_parameter: f64,
        #[serde(rename = "endParameter")]
        end_parameter: f64,
    },
    #[serde(other)]
    Unknown,
}

/// Arcs are always described with `start_angle <= end_angle`.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

pub fn encode_curve(curve: &Curve) -> CurveDescription {
    match curve {
        Curve::Line { start, end } => CurveDescription::Line {
            end_points: [*start, *end],
        },
        Curve::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            x_axis,
            y_axis,
        } => {
            let (start_angle, end_angle) = ordered(*start_angle, *end_angle);
            CurveDescription::Arc {
                center: *center,
                radius: *radius,
                start_angle,
                end_angle,
                x_axis: *x_axis,
                y_axis: *y_axis,
            }
        }
        Curve::Ellipse {
            center,
            radius_x,
            radius_y,
            x_direction,
            y_direction,
            start_parameter,
            end_parameter,
        } => CurveDescription::Ellipse {
            center: *center,
            radius_x: *radius_x,
            radius_y: *radius_y,
            x_direction: *x_direction,
            y_direction: *y_direction,
            start_parameter: *start_parameter,
            end_parameter: *end_parameter,
        },
        Curve::Unsupported { .. } => CurveDescription::Unknown,
    }
}

/// Legacy descriptions with reversed arc angles are normalized here too.
pub fn decode_curve(desc: &CurveDescription) -> Option<Curve> {
    match desc {
        CurveDescription::Line { end_points } => Some(Curve::Line {
            start: end_points[0],
            end: end_points[1],
        }),
        CurveDescription::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            x_axis,
            y_axis,
        } => {
            let (start_angle, end_angle) = ordered(*start_angle, *end_angle);
            Some(Curve::Arc {
                center: *center,
                radius: *radius,
                start_angle,
                end_angle,
                x_axis: *x_axis,
                y_axis: *y_axis,
            })
        }
        CurveDescription::Ellipse {
            center,
            radius_x,
            radius_y,
            x_direction,
            y_direction,
            start_parameter,
            end_parameter,
        } => Some(Curve::Ellipse {
            center: *center,
            radius_x: *radius_x,
            radius_y: *radius_y,
            x_direction: *x_direction,
            y_direction: *y_direction,
            start_parameter: *start_parameter,
            end_parameter: *end_parameter,
        }),
        CurveDescription::Unknown => None,
    }
}

pub fn curve_to_value(curve: &Curve) -> Value {
    serde_json::to_value(encode_curve(curve)).unwrap_or(Value::Null)
}

/// Decode a JSON curve description. Some capture builds wrote the tag as
/// lowercase `type`; both spellings are accepted.
pub fn curve_from_value(value: &Value) -> Option<Curve> {
    let obj = value.as_object()?;
    let desc = if obj.contains_key("Type") {
        serde_json::from_value::<CurveDescription>(value.clone()).ok()?
    } else {
        let tag = obj.get("type")?.clone();
        let mut fixed = obj.clone();
        fixed.remove("type");
        fixed.insert("Type".to_string(), tag);
        serde_json::from_value::<CurveDescription>(Value::Object(fixed)).ok()?
    };
    decode_curve(&desc)
}

/// Find and decode the location curve of a geometry section.
///
/// Looks under `Curve`, `Location`, `LocationCurve`; if none is present the
/// section itself is taken as the description.
pub fn locate_curve(section: &Section) -> Option<Curve> {
    for key in CURVE_KEYS {
        if let Some(value) = section.get(key) {
            return curve_from_value(value);
        }
    }
    let whole: serde_json::Map<String, Value> =
        section.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    curve_from_value(&Value::Object(whole))
}
