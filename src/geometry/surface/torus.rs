use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{is_parallel, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A toroidal surface in 3D space.
///
/// Defined by a center, major radius (center to tube center), minor radius
/// (tube radius), axis of symmetry, and a reference direction for u=0.
///
/// `P(u, v) = center + (R + r*cos(v)) * (cos(u)*ref_dir + sin(u)*binormal) + r*sin(v)*axis`
/// where `binormal = axis x ref_dir`.
#[derive(Debug, Clone)]
pub struct Torus {
    center: Point3,
    major_radius: f64,
    minor_radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Torus {
    /// Creates a new torus.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive, minor >= major,
    /// axis is zero-length, or the reference direction is not perpendicular to the axis.
    pub fn new(
        center: Point3,
        major_radius: f64,
        minor_radius: f64,
        axis: Vector3,
        ref_dir: Vector3,
    ) -> Result<Self> {
        if major_radius < TOLERANCE || minor_radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("torus radii must be positive".into()).into(),
            );
        }
        if minor_radius >= major_radius {
            return Err(GeometryError::Degenerate(
                "torus minor radius must be less than major radius".into(),
            )
            .into());
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
            major_radius,
            minor_radius,
            axis,
            ref_dir,
        })
    }

    /// Returns the center of the torus.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the major radius (center to tube center).
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Returns the minor radius (tube radius).
    #[must_use]
    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
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

    /// Unit radial direction towards the tube circle point nearest to `point`.
    fn radial_of(&self, point: &Point3) -> Vector3 {
        let dp = point - self.center;
        let planar = dp - self.axis * dp.dot(&self.axis);
        let len = planar.norm();
        if len < TOLERANCE {
            self.ref_dir
        } else {
            planar / len
        }
    }

    /// Returns the torus moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            center: self.center + offset,
            ..self.clone()
        }
    }

    /// Same frame and major radius with a new minor (tube) radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `minor_radius` is not positive or reaches the major radius.
    pub fn with_minor_radius(&self, minor_radius: f64) -> Result<Self> {
        Self::new(self.center, self.major_radius, minor_radius, self.axis, self.ref_dir)
    }

    /// Same center, axis line and both radii.
    #[must_use]
    pub fn same_geometry(&self, other: &Torus, tol: f64) -> bool {
        (self.major_radius - other.major_radius).abs() <= tol
            && (self.minor_radius - other.minor_radius).abs() <= tol
            && is_parallel(&self.axis, &other.axis, tol)
            && (self.center - other.center).norm() <= tol
    }
}

impl Surface for Torus {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let radial = self.ref_dir * u.cos() + self.binormal() * u.sin();
        let r = self.major_radius + self.minor_radius * v.cos();
        Ok(self.center + radial * r + self.axis * (self.minor_radius * v.sin()))
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let radial = self.ref_dir * u.cos() + self.binormal() * u.sin();
        let n = radial * v.cos() + self.axis * v.sin();
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(n / len)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, TAU, 0.0, TAU)
    }

    fn inverse(&self, point: &Point3) -> (f64, f64) {
        let dp = point - self.center;
        let u = dp.dot(&self.binormal()).atan2(dp.dot(&self.ref_dir));
        let radial = self.ref_dir * u.cos() + self.binormal() * u.sin();
        let to_tube = point - (self.center + radial * self.major_radius);
        let v = to_tube.dot(&self.axis).atan2(to_tube.dot(&radial));
        (u, v)
    }

    fn periods(&self) -> (Option<f64>, Option<f64>) {
        (Some(TAU), Some(TAU))
    }

    fn signed_distance(&self, point: &Point3) -> f64 {
        let tube_center = self.center + self.radial_of(point) * self.major_radius;
        (point - tube_center).norm() - self.minor_radius
    }

    fn gradient(&self, point: &Point3) -> Vector3 {
        let radial = self.radial_of(point);
        let d = point - (self.center + radial * self.major_radius);
        let len = d.norm();
        if len < TOLERANCE {
            radial
        } else {
            d / len
        }
    }

    fn area_element(&self, v: f64) -> f64 {
        self.minor_radius * (self.major_radius + self.minor_radius * v.cos())
    }
}
