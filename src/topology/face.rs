use crate::error::Result;
use crate::geometry::surface::{Cylinder, Plane, Sphere, Surface, SurfaceDomain, Torus};
use crate::math::{Point3, Vector3};

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// The geometric surface associated with a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    /// A planar surface.
    Plane(Plane),
    /// A cylindrical surface.
    Cylinder(Cylinder),
    /// A spherical surface.
    Sphere(Sphere),
    /// A toroidal surface.
    Torus(Torus),
}

impl FaceSurface {
    /// Short name of the surface kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plane(_) => "plane",
            Self::Cylinder(_) => "cylinder",
            Self::Sphere(_) => "sphere",
            Self::Torus(_) => "torus",
        }
    }

    /// Returns the surface rigidly moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        match self {
            Self::Plane(s) => Self::Plane(s.translated(offset)),
            Self::Cylinder(s) => Self::Cylinder(s.translated(offset)),
            Self::Sphere(s) => Self::Sphere(s.translated(offset)),
            Self::Torus(s) => Self::Torus(s.translated(offset)),
        }
    }

    /// The radius an edit would change: cylinder and sphere radius, torus
    /// minor radius. `None` for planes.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match self {
            Self::Plane(_) => None,
            Self::Cylinder(s) => Some(s.radius()),
            Self::Sphere(s) => Some(s.radius()),
            Self::Torus(s) => Some(s.minor_radius()),
        }
    }

    /// Same kind and frame with [`FaceSurface::radius`] replaced.
    ///
    /// Returns `None` when the surface has no editable radius.
    #[must_use]
    pub fn with_radius(&self, radius: f64) -> Option<Result<Self>> {
        match self {
            Self::Plane(_) => None,
            Self::Cylinder(s) => Some(s.with_radius(radius).map(Self::Cylinder)),
            Self::Sphere(s) => Some(s.with_radius(radius).map(Self::Sphere)),
            Self::Torus(s) => Some(s.with_minor_radius(radius).map(Self::Torus)),
        }
    }

    /// Whether translating along `direction` maps the surface onto itself.
    #[must_use]
    pub fn is_extruded(&self, direction: &Vector3, tol: f64) -> bool {
        match self {
            Self::Plane(s) => s.is_extruded(direction, tol),
            Self::Cylinder(s) => s.is_extruded(direction, tol),
            Self::Sphere(_) | Self::Torus(_) => false,
        }
    }

    /// Whether both describe the same analytic surface, regardless of frame.
    #[must_use]
    pub fn same_geometry(&self, other: &FaceSurface, tol: f64) -> bool {
        match (self, other) {
            (Self::Plane(a), Self::Plane(b)) => a.same_geometry(b, tol),
            (Self::Cylinder(a), Self::Cylinder(b)) => a.same_geometry(b, tol),
            (Self::Sphere(a), Self::Sphere(b)) => a.same_geometry(b, tol),
            (Self::Torus(a), Self::Torus(b)) => a.same_geometry(b, tol),
            _ => false,
        }
    }

    fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Plane(s) => s,
            Self::Cylinder(s) => s,
            Self::Sphere(s) => s,
            Self::Torus(s) => s,
        }
    }
}

impl Surface for FaceSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        self.as_surface().evaluate(u, v)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        self.as_surface().normal(u, v)
    }

    fn domain(&self) -> SurfaceDomain {
        self.as_surface().domain()
    }

    fn inverse(&self, point: &Point3) -> (f64, f64) {
        self.as_surface().inverse(point)
    }

    fn periods(&self) -> (Option<f64>, Option<f64>) {
        self.as_surface().periods()
    }

    fn signed_distance(&self, point: &Point3) -> f64 {
        self.as_surface().signed_distance(point)
    }

    fn gradient(&self, point: &Point3) -> Vector3 {
        self.as_surface().gradient(point)
    }

    fn area_element(&self, v: f64) -> f64 {
        self.as_surface().area_element(v)
    }
}

/// Data associated with a topological face.
///
/// A face is a bounded region on a surface, defined by an outer wire
/// and optionally inner wires (holes).
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// The outer boundary wire.
    pub outer_wire: WireId,
    /// Inner boundary wires (holes).
    pub inner_wires: Vec<WireId>,
    /// If `true`, the face normal agrees with the surface normal.
    pub same_sense: bool,
    /// Bounding box of the face's trimming loop in parameter space.
    pub uv_domain: Option<SurfaceDomain>,
    /// Area computed by the last area query, cleared on recalculation.
    pub cached_area: Option<f64>,
}

impl FaceData {
    /// A face without holes whose derived data is not yet computed.
    #[must_use]
    pub fn new(surface: FaceSurface, outer_wire: WireId, same_sense: bool) -> Self {
        Self {
            surface,
            outer_wire,
            inner_wires: Vec::new(),
            same_sense,
            uv_domain: None,
            cached_area: None,
        }
    }

    /// All boundary wires, outer first.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        std::iter::once(self.outer_wire).chain(self.inner_wires.iter().copied())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cylinder(radius: f64) -> FaceSurface {
        FaceSurface::Cylinder(
            Cylinder::new(Point3::origin(), radius, Vector3::z(), Vector3::x()).unwrap(),
        )
    }

    #[test]
    fn radius_only_for_round_surfaces() {
        let plane = FaceSurface::Plane(Plane::from_normal(Point3::origin(), Vector3::z()).unwrap());
        assert!(plane.radius().is_none());
        assert!(plane.with_radius(2.0).is_none());

        let cyl = cylinder(1.0).with_radius(2.5).unwrap().unwrap();
        assert_eq!(cyl.radius(), Some(2.5));
        assert_eq!(cyl.kind(), "cylinder");
    }

    #[test]
    fn delegates_implicit_form() {
        let cyl = cylinder(2.0);
        assert!((cyl.signed_distance(&Point3::new(3.0, 0.0, 1.0)) - 1.0).abs() < 1e-12);
        assert!((cyl.area_element(0.3) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn same_geometry_requires_same_kind() {
        let a = cylinder(1.0);
        let s = FaceSurface::Sphere(
            Sphere::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x()).unwrap(),
        );
        assert!(a.same_geometry(&cylinder(1.0), 1e-9));
        assert!(!a.same_geometry(&s, 1e-9));
        assert!(!a.same_geometry(&a.translated(&Vector3::x()), 1e-9));
        assert!(a.same_geometry(&a.translated(&Vector3::z()), 1e-9));
    }
}
