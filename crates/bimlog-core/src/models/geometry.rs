//! Native geometry exchanged with the live model: Xyz, Plane, Curve.

use serde::{Deserialize, Serialize};

/// Absolute tolerance used when comparing reconstructed geometry.
pub const GEOMETRY_TOLERANCE: f64 = 1e-9;

/// A point or vector in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn approx_eq(&self, other: &Xyz, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && (self.z - other.z).abs() <= tol
    }
}

/// Work plane: origin plus in-plane axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Xyz,
    pub x_vec: Xyz,
    pub y_vec: Xyz,
}

/// The curve algebra the codec supports, plus a catch-all for host curve
/// kinds it does not model (splines, cylindrical helices, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line {
        start: Xyz,
        end: Xyz,
    },
    Arc {
        center: Xyz,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        x_axis: Xyz,
        y_axis: Xyz,
    },
    Ellipse {
        center: Xyz,
        radius_x: f64,
        radius_y: f64,
        x_direction: Xyz,
        y_direction: Xyz,
        start_parameter: f64,
        end_parameter: f64,
    },
    Unsupported {
        kind: String,
    },
}

impl Curve {
    pub fn kind(&self) -> &str {
        match self {
            Curve::Line { .. } => "Line",
            Curve::Arc { .. } => "Arc",
            Curve::Ellipse { .. } => "Ellipse",
            Curve::Unsupported { kind } => kind,
        }
    }

    /// Numeric equivalence within `tol`. Unsupported curves never compare equal.
    pub fn approx_eq(&self, other: &Curve, tol: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= tol;
        match (self, other) {
            (Curve::Line { start: s1, end: e1 }, Curve::Line { start: s2, end: e2 }) => {
                s1.approx_eq(s2, tol) && e1.approx_eq(e2, tol)
            }
            (
                Curve::Arc {
                    center: c1,
                    radius: r1,
                    start_angle: a1,
                    end_angle: b1,
                    x_axis: x1,
                    y_axis: y1,
                },
                Curve::Arc {
                    center: c2,
                    radius: r2,
                    start_angle: a2,
                    end_angle: b2,
                    x_axis: x2,
                    y_axis: y2,
                },
            ) => {
                c1.approx_eq(c2, tol)
                    && close(*r1, *r2)
                    && close(*a1, *a2)
                    && close(*b1, *b2)
                    && x1.approx_eq(x2, tol)
                    && y1.approx_eq(y2, tol)
            }
            (
                Curve::Ellipse {
                    center: c1,
                    radius_x: rx1,
                    radius_y: ry1,
                    x_direction: x1,
                    y_direction: y1,
                    start_parameter: s1,
                    end_parameter: e1,
                },
                Curve::Ellipse {
                    center: c2,
                    radius_x: rx2,
                    radius_y: ry2,
                    x_direction: x2,
                    y_direction: y2,
                    start_parameter: s2,
                    end_parameter: e2,
                },
            ) => {
                c1.approx_eq(c2, tol)
                    && close(*rx1, *rx2)
                    && close(*ry1, *ry2)
                    && x1.approx_eq(x2, tol)
                    && y1.approx_eq(y2, tol)
                    && close(*s1, *s2)
                    && close(*e1, *e2)
            }
            _ => false,
        }
    }
}
