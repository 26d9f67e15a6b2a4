pub mod curve;
pub mod surface;

pub use curve::{Arc, Curve, CurveDomain, InterpolatedCurve, Line, Pcurve};
pub use surface::{
    adjust_periodic, unwrap_periodic, Cylinder, Plane, Sphere, Surface, SurfaceDomain, Torus,
};
