use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{distance_to_line, is_parallel, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A cylindrical surface in 3D space.
///
/// `P(u, v) = center + radius * cos(u) * ref_dir + radius * sin(u) * binormal + v * axis`
/// where `binormal = axis x ref_dir`.
///
/// The outward normal is `cos(u) * ref_dir + sin(u) * binormal`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Arguments
    ///
    /// * `center` - A point on the cylinder axis
    /// * `radius` - Radius (must be positive)
    /// * `axis` - Axis direction (will be normalized)
    /// * `ref_dir` - Reference direction for u=0 (must be perpendicular to axis)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, axis is zero-length,
    /// or the reference direction is not perpendicular to the axis.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }

        let axis_len = axis.norm();
        let ref_len = ref_dir.norm();
        if axis_len < TOLERANCE || ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;
        let ref_dir = ref_dir / ref_len;

        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
        })
    }

    /// Returns the center point on the axis.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the reference direction (u=0).
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Returns the cylinder moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            center: self.center + offset,
            ..self.clone()
        }
    }

    /// Same axis, frame and orientation with a different radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn with_radius(&self, radius: f64) -> Result<Self> {
        Self::new(self.center, radius, self.axis, self.ref_dir)
    }

    /// A cylinder is invariant under translation along its axis.
    #[must_use]
    pub fn is_extruded(&self, direction: &Vector3, tol: f64) -> bool {
        let len = direction.norm();
        len > TOLERANCE && is_parallel(&self.axis, &(direction / len), tol)
    }

    /// Same radius and same axis line (the parametrization frame may differ).
    #[must_use]
    pub fn same_geometry(&self, other: &Cylinder, tol: f64) -> bool {
        (self.radius - other.radius).abs() <= tol
            && is_parallel(&self.axis, &other.axis, tol)
            && distance_to_line(&other.center, &self.center, &self.axis) <= tol
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let binormal = self.binormal();
        let x = self.radius * u.cos();
        let y = self.radius * u.sin();
        Ok(self.center + self.ref_dir * x + binormal * y + self.axis * v)
    }

    fn normal(&self, u: f64, _v: f64) -> Result<Vector3> {
        let n = self.ref_dir * u.cos() + self.binormal() * u.sin();
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(n / len)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// `u` is the atan2 angle in `(-pi, pi]`, `v` the signed height along the axis.
    fn inverse(&self, point: &Point3) -> (f64, f64) {
        let dp = point - self.center;
        let v = dp.dot(&self.axis);
        let u = dp.dot(&self.binormal()).atan2(dp.dot(&self.ref_dir));
        (u, v)
    }

    fn periods(&self) -> (Option<f64>, Option<f64>) {
        (Some(TAU), None)
    }

    fn signed_distance(&self, point: &Point3) -> f64 {
        distance_to_line(point, &self.center, &self.axis) - self.radius
    }

    fn gradient(&self, point: &Point3) -> Vector3 {
        let dp = point - self.center;
        let radial = dp - self.axis * dp.dot(&self.axis);
        let len = radial.norm();
        if len < TOLERANCE {
            self.ref_dir
        } else {
            radial / len
        }
    }

    fn area_element(&self, _v: f64) -> f64 {
        self.radius
    }
}
