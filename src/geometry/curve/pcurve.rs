use crate::error::{GeometryError, Result};
use crate::geometry::surface::{adjust_periodic, unwrap_periodic, Surface, SurfaceDomain};
use crate::math::{Point2, Point3, Vector2};

/// A curve in the `(u, v)` parameter space of a face, stored as a polyline.
///
/// Consecutive points are kept continuous across periodic seams, so a
/// pcurve may leave the surface's canonical parameter range.
#[derive(Debug, Clone, PartialEq)]
pub struct Pcurve {
    points: Vec<Point2>,
}

impl Pcurve {
    /// Creates a pcurve from at least two parameter points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(
                GeometryError::Degenerate("pcurve needs at least two points".into()).into(),
            );
        }
        Ok(Self { points })
    }

    /// Projects 3D `samples` onto `surface`, unwrapping periodic parameters
    /// so the result is continuous.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two samples are given.
    pub fn project<S: Surface + ?Sized>(surface: &S, samples: &[Point3]) -> Result<Self> {
        let mut points: Vec<Point2> = Vec::with_capacity(samples.len());
        for p in samples {
            let (u, v) = surface.inverse(p);
            let uv = match points.last() {
                Some(prev) => unwrap_periodic(surface, prev, Point2::new(u, v)),
                None => Point2::new(u, v),
            };
            points.push(uv);
        }
        Self::new(points)
    }

    /// Returns the parameter points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// First parameter point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    /// Last parameter point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// The same pcurve traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Shifts the whole pcurve by whole periods so its midpoint is the
    /// representative nearest to the centre of `domain`.
    #[must_use]
    pub fn adjust_periodic<S: Surface + ?Sized>(
        &self,
        surface: &S,
        domain: &SurfaceDomain,
    ) -> Self {
        let mid = self.midpoint();
        let target = adjust_periodic(surface, domain, mid);
        self.shifted(target - mid)
    }

    /// Shifts the whole pcurve by whole periods so it starts at the
    /// representative nearest to `reference`.
    #[must_use]
    pub fn unwrapped_near<S: Surface + ?Sized>(&self, surface: &S, reference: &Point2) -> Self {
        let start = self.start();
        let target = unwrap_periodic(surface, reference, start);
        self.shifted(target - start)
    }

    fn midpoint(&self) -> Point2 {
        let a = self.start();
        let b = self.end();
        Point2::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y))
    }

    fn shifted(&self, delta: Vector2) -> Self {
        Self {
            points: self.points.iter().map(|p| p + delta).collect(),
        }
    }

    /// Maps every parameter point through `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if surface evaluation fails.
    pub fn map_to_3d<S: Surface + ?Sized>(&self, surface: &S) -> Result<Vec<Point3>> {
        self.points
            .iter()
            .map(|uv| surface.evaluate(uv.x, uv.y))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Cylinder, Plane};
    use crate::math::Vector3;
    use std::f64::consts::{PI, TAU};

    fn z_cylinder() -> Cylinder {
        Cylinder::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn project_is_continuous_across_seam() {
        let cyl = z_cylinder();
        let samples: Vec<Point3> = (0..=4)
            .map(|i| {
                let a = PI * 0.75 + f64::from(i) * PI * 0.125;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        let pc = Pcurve::project(&cyl, &samples).unwrap();
        for w in pc.points().windows(2) {
            assert!((w[1].x - w[0].x).abs() < 1.0, "jump across the seam");
        }
        assert!((pc.end().x - pc.start().x - PI * 0.5).abs() < 1e-9);
    }

    #[test]
    fn adjust_moves_into_face_domain() {
        let cyl = z_cylinder();
        let pc = Pcurve::new(vec![Point2::new(-0.5, 0.0), Point2::new(-0.5, 1.0)]).unwrap();
        let domain = SurfaceDomain::new(PI, TAU, 0.0, 1.0);
        let adjusted = pc.adjust_periodic(&cyl, &domain);
        assert!((adjusted.start().x - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn map_back_to_surface() {
        let plane = Plane::from_normal(Point3::new(0.0, 0.0, 2.0), Vector3::z()).unwrap();
        let samples = [Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 1.0, 2.0)];
        let pc = Pcurve::project(&plane, &samples).unwrap();
        let back = pc.reversed().map_to_3d(&plane).unwrap();
        assert!((back[0] - samples[1]).norm() < 1e-12);
        assert!((back[1] - samples[0]).norm() < 1e-12);
    }
}
