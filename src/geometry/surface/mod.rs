mod cylinder;
mod plane;
mod sphere;
mod torus;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;
pub use torus::Torus;

use crate::error::Result;
use crate::math::{Point2, Point3, Vector3};

/// Parameter domain for a surface or a face on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDomain {
    /// Start of the U parameter range.
    pub u_min: f64,
    /// End of the U parameter range.
    pub u_max: f64,
    /// Start of the V parameter range.
    pub v_min: f64,
    /// End of the V parameter range.
    pub v_max: f64,
}

impl SurfaceDomain {
    /// Creates a new surface domain.
    #[must_use]
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    /// Smallest domain containing all `points`, or `None` for an empty slice.
    #[must_use]
    pub fn bounding(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut d = Self::new(first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            d.u_min = d.u_min.min(p.x);
            d.u_max = d.u_max.max(p.x);
            d.v_min = d.v_min.min(p.y);
            d.v_max = d.v_max.max(p.y);
        }
        Some(d)
    }

    /// Midpoint of the domain. Unbounded directions report `0.0`.
    #[must_use]
    pub fn center(&self) -> Point2 {
        let mid = |lo: f64, hi: f64| {
            if lo.is_finite() && hi.is_finite() {
                0.5 * (lo + hi)
            } else {
                0.0
            }
        };
        Point2::new(mid(self.u_min, self.u_max), mid(self.v_min, self.v_max))
    }
}

/// Trait for parametric surfaces in 3D space.
///
/// Besides the parametric form every surface also exposes an implicit form
/// (`signed_distance` / `gradient`), which the Newton-based intersection
/// solvers work on directly in 3D.
pub trait Surface {
    /// Evaluates the surface at parameters `(u, v)`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range or evaluation fails.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Computes the surface normal at parameters `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range or the normal is degenerate.
    fn normal(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the surface.
    fn domain(&self) -> SurfaceDomain;

    /// Parameters of the orthogonal projection of `point` onto the surface.
    fn inverse(&self, point: &Point3) -> (f64, f64);

    /// Periods of the U and V parameters, `None` for non-periodic directions.
    fn periods(&self) -> (Option<f64>, Option<f64>) {
        (None, None)
    }

    /// Signed distance of `point` from the surface (positive on the outer side).
    fn signed_distance(&self, point: &Point3) -> f64;

    /// Unit gradient of [`Surface::signed_distance`] at `point`.
    fn gradient(&self, point: &Point3) -> Vector3;

    /// Area element `|Su x Sv|` at latitude-like parameter `v`.
    ///
    /// For all supported surfaces the area element does not depend on `u`.
    fn area_element(&self, v: f64) -> f64;
}

/// Shifts the periodic coordinates of `uv` by whole periods so they lie as
/// close as possible to the centre of `domain`.
#[must_use]
pub fn adjust_periodic<S: Surface + ?Sized>(
    surface: &S,
    domain: &SurfaceDomain,
    uv: Point2,
) -> Point2 {
    let (pu, pv) = surface.periods();
    let c = domain.center();
    let shift = |x: f64, center: f64, period: Option<f64>| match period {
        Some(p) => x + p * ((center - x) / p).round(),
        None => x,
    };
    Point2::new(shift(uv.x, c.x, pu), shift(uv.y, c.y, pv))
}

/// Shifts `uv` by whole periods to the representative closest to `reference`.
///
/// Used to unwrap consecutive samples of a curve so that a parameter-space
/// polyline stays continuous across the seam.
#[must_use]
pub fn unwrap_periodic<S: Surface + ?Sized>(surface: &S, reference: &Point2, uv: Point2) -> Point2 {
    let (pu, pv) = surface.periods();
    let shift = |x: f64, r: f64, period: Option<f64>| match period {
        Some(p) => x + p * ((r - x) / p).round(),
        None => x,
    };
    Point2::new(shift(uv.x, reference.x, pu), shift(uv.y, reference.y, pv))
}
