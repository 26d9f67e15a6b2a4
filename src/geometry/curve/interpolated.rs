use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A 3D polyline through a dense sequence of points.
///
/// The parameter is the (fractional) point index: `t = i` evaluates to
/// `points[i]`, the domain is `[0, n - 1]`. Outside the domain the first and
/// last segments are extended linearly.
#[derive(Debug, Clone)]
pub struct InterpolatedCurve {
    points: Vec<Point3>,
}

impl InterpolatedCurve {
    /// Creates a polyline from at least two points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::Degenerate(
                "interpolated curve needs at least two points".into(),
            )
            .into());
        }
        Ok(Self { points })
    }

    /// Returns the points of the polyline.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    /// Index of the segment used to evaluate parameter `t`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn segment(&self, t: f64) -> usize {
        let last = self.last_index();
        if t <= 0.0 {
            0
        } else {
            (t.floor() as usize).min(last - 1)
        }
    }

    /// Total chord length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Returns the polyline moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
        }
    }

    /// The polyline traversed backwards: parameter `t` maps to `n - 1 - t`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// The polyline restricted to `[t_start, t_end]` (with `t_start < t_end`),
    /// with its end points replaced by `start` and `end`.
    ///
    /// Interior sample points strictly inside the range are kept.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn trimmed(&self, t_start: f64, t_end: f64, start: Point3, end: Point3) -> Self {
        let mut points = vec![start];
        for (i, p) in self.points.iter().enumerate() {
            let t = i as f64;
            if t > t_start + 1e-9 && t < t_end - 1e-9 {
                points.push(*p);
            }
        }
        points.push(end);
        Self { points }
    }
}

impl Curve for InterpolatedCurve {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let i = self.segment(t);
        let (a, b) = (self.points[i], self.points[i + 1]);
        let s = t - i as f64;
        Ok(a + (b - a) * s)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let i = self.segment(t);
        let d = self.points[i + 1] - self.points[i];
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    #[allow(clippy::cast_precision_loss)]
    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.last_index() as f64)
    }

    fn is_closed(&self) -> bool {
        let last = self.last_index();
        (self.points[0] - self.points[last]).norm() < TOLERANCE
    }

    #[allow(clippy::cast_precision_loss)]
    fn project(&self, point: &Point3, _near: f64) -> f64 {
        let mut best = (f64::INFINITY, 0.0);
        for (i, w) in self.points.windows(2).enumerate() {
            let d = w[1] - w[0];
            let len2 = d.norm_squared();
            let s = if len2 < TOLERANCE * TOLERANCE {
                0.0
            } else {
                ((point - w[0]).dot(&d) / len2).clamp(0.0, 1.0)
            };
            let dist = (w[0] + d * s - point).norm();
            if dist < best.0 {
                best = (dist, i as f64 + s);
            }
        }
        best.1
    }
}
