//! Geometry/attribute codec between log sections and native values.

mod attribute;
mod curve;
mod descriptors;

pub use attribute::{decode_attribute, LiveValue};
pub use curve::{
    curve_from_value, curve_to_value, decode_curve, encode_curve, locate_curve,
    CurveDescription, CURVE_KEYS,
};
pub use descriptors::{
    decode_plane, decode_point, decode_profile, decode_slope_arrow, encode_plane, encode_point,
    encode_profile,
};
