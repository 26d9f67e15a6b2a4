use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A spherical surface in 3D space.
///
/// `P(u, v) = center + r * cos(v) * cos(u) * ref_dir + r * cos(v) * sin(u) * binormal + r * sin(v) * axis`
/// where `binormal = axis x ref_dir`.
///
/// Parameters: `u` = longitude, `v` = latitude `[-pi/2, pi/2]`.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, axis is zero-length,
    /// or the reference direction is not perpendicular to the axis.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("sphere radius must be positive".into()).into(),
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

    /// Returns the center of the sphere.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the axis direction (north pole, unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the reference direction (u=0 on equator).
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Returns the sphere moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            center: self.center + offset,
            ..self.clone()
        }
    }

    /// Same center and frame with a different radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn with_radius(&self, radius: f64) -> Result<Self> {
        Self::new(self.center, radius, self.axis, self.ref_dir)
    }

    /// Same center and radius.
    #[must_use]
    pub fn same_geometry(&self, other: &Sphere, tol: f64) -> bool {
        (self.radius - other.radius).abs() <= tol && (self.center - other.center).norm() <= tol
    }
}

impl Surface for Sphere {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let (cv, sv) = (v.cos(), v.sin());
        let (cu, su) = (u.cos(), u.sin());
        Ok(self.center
            + self.ref_dir * (self.radius * cv * cu)
            + self.binormal() * (self.radius * cv * su)
            + self.axis * (self.radius * sv))
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let (cv, sv) = (v.cos(), v.sin());
        let n = self.ref_dir * (cv * u.cos()) + self.binormal() * (cv * u.sin()) + self.axis * sv;
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(n / len)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, -FRAC_PI_2, FRAC_PI_2)
    }

    fn inverse(&self, point: &Point3) -> (f64, f64) {
        let dp = (point - self.center) / self.radius;
        let v = dp.dot(&self.axis).clamp(-1.0, 1.0).asin();
        let u = dp.dot(&self.binormal()).atan2(dp.dot(&self.ref_dir));
        (u, v)
    }

    fn periods(&self) -> (Option<f64>, Option<f64>) {
        (Some(TAU), None)
    }

    fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.center).norm() - self.radius
    }

    fn gradient(&self, point: &Point3) -> Vector3 {
        let dp = point - self.center;
        let len = dp.norm();
        if len < TOLERANCE {
            self.ref_dir
        } else {
            dp / len
        }
    }

    fn area_element(&self, v: f64) -> f64 {
        self.radius * self.radius * v.cos()
    }
}
