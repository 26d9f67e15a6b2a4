mod arc;
mod interpolated;
mod line;
mod pcurve;

pub use arc::Arc;
pub use interpolated::InterpolatedCurve;
pub use line::Line;
pub use pcurve::Pcurve;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// Trait for parametric curves in 3D space.
///
/// `evaluate` and `tangent` accept parameters outside [`Curve::domain`]:
/// lines are infinite, arcs continue around their full circle and polylines
/// extrapolate their end segments. Intersection code relies on this to find
/// points slightly beyond an edge's current trim.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the natural parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Parameter of the curve point closest to `point`.
    ///
    /// Periodic curves return the representative nearest to `near`.
    fn project(&self, point: &Point3, near: f64) -> f64;
}
