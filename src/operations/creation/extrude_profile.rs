use std::f64::consts::TAU;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::curve::Arc;
use crate::geometry::surface::{Cylinder, Plane};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Point3, Vector2, Vector3, TOLERANCE};
use crate::topology::{
    EdgeCurve, EdgeId, FaceSurface, OrientedEdge, SolidData, SolidId, TopologyStore, TrimmedCurve,
    VertexId,
};

use super::ShellBuilder;

/// One piece of a planar profile, running from the previous point to `to`.
#[derive(Debug, Clone, Copy)]
pub enum ProfileSegment {
    /// A straight segment.
    Line {
        /// End point.
        to: Point2,
    },
    /// A circular arc around `center`.
    Arc {
        /// Circle center.
        center: Point2,
        /// End point, at the same distance from `center` as the start.
        to: Point2,
        /// Counter-clockwise sweep when `true`.
        ccw: bool,
    },
}

impl ProfileSegment {
    fn end(&self) -> Point2 {
        match *self {
            Self::Line { to } | Self::Arc { to, .. } => to,
        }
    }
}

/// Extrudes a closed profile in the XY plane along +Z into a solid.
///
/// The profile must run counter-clockwise. Line segments produce planar
/// side faces, arcs produce cylindrical side faces (convex for
/// counter-clockwise arcs, concave otherwise); the solid is closed by a
/// floor at `z_min` and a roof at `z_max`.
pub struct ExtrudeProfile {
    start: Point2,
    segments: Vec<ProfileSegment>,
    z_min: f64,
    z_max: f64,
}

/// Geometry of a profile arc at a given height.
struct ArcGeometry {
    center: Point2,
    radius: f64,
    ref_dir: Vector3,
    normal: Vector3,
    sweep: f64,
}

impl ExtrudeProfile {
    /// Creates a new `ExtrudeProfile` operation extruding from `z = 0` to `height`.
    #[must_use]
    pub fn new(start: Point2, segments: Vec<ProfileSegment>, height: f64) -> Self {
        Self {
            start,
            segments,
            z_min: 0.0,
            z_max: height,
        }
    }

    /// Extrudes between the two heights instead.
    #[must_use]
    pub fn between(mut self, z_min: f64, z_max: f64) -> Self {
        self.z_min = z_min;
        self.z_max = z_max;
        self
    }

    fn points(&self) -> Vec<Point2> {
        std::iter::once(self.start)
            .chain(self.segments.iter().map(ProfileSegment::end))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.z_max - self.z_min < TOLERANCE {
            return Err(
                OperationError::InvalidInput("extrusion height must be positive".into()).into(),
            );
        }
        if self.segments.len() < 2 {
            return Err(OperationError::InvalidInput(
                "profile needs at least two segments".into(),
            )
            .into());
        }
        let pts = self.points();
        if (pts[pts.len() - 1] - pts[0]).norm() > TOLERANCE {
            return Err(OperationError::InvalidInput("profile is not closed".into()).into());
        }

        // Shoelace over the corners plus arc midpoints.
        let mut outline = Vec::new();
        for (i, seg) in self.segments.iter().enumerate() {
            outline.push(pts[i]);
            if let ProfileSegment::Arc { .. } = seg {
                let g = arc_geometry(pts[i], seg)?;
                let mid = g.sweep * 0.5;
                let binormal = g.normal.cross(&g.ref_dir);
                let d = g.ref_dir * mid.cos() + binormal * mid.sin();
                outline.push(g.center + Vector2::new(d.x, d.y) * g.radius);
            }
        }
        if signed_area_2d(&outline) <= TOLERANCE {
            return Err(OperationError::InvalidInput(
                "profile must run counter-clockwise".into(),
            )
            .into());
        }
        Ok(())
    }

    /// Executes the operation, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is open, clockwise, has mismatched arc
    /// radii, or the height is not positive.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        self.validate()?;
        let pts = self.points();
        let n = self.segments.len();
        let (z0, z1) = (self.z_min, self.z_max);
        let at = |p: Point2, z: f64| Point3::new(p.x, p.y, z);

        let mut builder = ShellBuilder::new(store);
        let bottom: Vec<VertexId> = (0..n).map(|i| builder.add_vertex(at(pts[i], z0))).collect();
        let top: Vec<VertexId> = (0..n).map(|i| builder.add_vertex(at(pts[i], z1))).collect();

        let mut vertical: Vec<EdgeId> = Vec::with_capacity(n);
        for i in 0..n {
            let curve = TrimmedCurve::segment(at(pts[i], z0), at(pts[i], z1))?;
            vertical.push(builder.add_edge(bottom[i], top[i], curve)?);
        }

        let mut lower: Vec<EdgeId> = Vec::with_capacity(n);
        let mut upper: Vec<EdgeId> = Vec::with_capacity(n);
        let mut sides: Vec<(FaceSurface, bool)> = Vec::with_capacity(n);
        for (i, seg) in self.segments.iter().enumerate() {
            let j = (i + 1) % n;
            let (a, b) = (pts[i], pts[j]);
            match seg {
                ProfileSegment::Line { .. } => {
                    let floor_side = TrimmedCurve::segment(at(a, z0), at(b, z0))?;
                    let roof_side = TrimmedCurve::segment(at(a, z1), at(b, z1))?;
                    lower.push(builder.add_edge(bottom[i], bottom[j], floor_side)?);
                    upper.push(builder.add_edge(top[i], top[j], roof_side)?);
                    let d = b - a;
                    let plane = Plane::new(at(a, z0), Vector3::new(d.x, d.y, 0.0), Vector3::z())?;
                    sides.push((FaceSurface::Plane(plane), true));
                }
                ProfileSegment::Arc { ccw, .. } => {
                    let g = arc_geometry(a, seg)?;
                    for (z, from, to, out) in [
                        (z0, bottom[i], bottom[j], &mut lower),
                        (z1, top[i], top[j], &mut upper),
                    ] {
                        let center = at(g.center, z);
                        let arc = Arc::new(center, g.radius, g.normal, g.ref_dir, 0.0, g.sweep)?;
                        let curve = TrimmedCurve::new(EdgeCurve::Arc(arc), 0.0, g.sweep);
                        out.push(builder.add_edge(from, to, curve)?);
                    }
                    let cyl = Cylinder::new(at(g.center, z0), g.radius, Vector3::z(), g.ref_dir)?;
                    sides.push((FaceSurface::Cylinder(cyl), *ccw));
                }
            }
        }

        for (i, (surface, same_sense)) in sides.into_iter().enumerate() {
            let j = (i + 1) % n;
            builder.add_face(
                surface,
                same_sense,
                vec![
                    OrientedEdge::new(lower[i], true),
                    OrientedEdge::new(vertical[j], true),
                    OrientedEdge::new(upper[i], false),
                    OrientedEdge::new(vertical[i], false),
                ],
            )?;
        }

        let floor = Plane::from_normal(at(pts[0], z0), -Vector3::z())?;
        builder.add_face(
            FaceSurface::Plane(floor),
            true,
            lower.iter().rev().map(|&e| OrientedEdge::new(e, false)).collect(),
        )?;
        let roof = Plane::from_normal(at(pts[0], z1), Vector3::z())?;
        builder.add_face(
            FaceSurface::Plane(roof),
            true,
            upper.iter().map(|&e| OrientedEdge::new(e, true)).collect(),
        )?;

        let shell = builder.build(true)?;
        debug!(faces = n + 2, "extruded profile");
        Ok(store.add_solid(SolidData::new(shell)))
    }
}

fn arc_geometry(start: Point2, seg: &ProfileSegment) -> Result<ArcGeometry> {
    let ProfileSegment::Arc { center, to, ccw } = *seg else {
        return Err(OperationError::InvalidInput("not an arc segment".into()).into());
    };
    let r0 = (start - center).norm();
    let r1 = (to - center).norm();
    if r0 < TOLERANCE || (r0 - r1).abs() > 1e-9 * r0.max(1.0) {
        return Err(OperationError::InvalidInput(
            "arc end points must lie on one circle".into(),
        )
        .into());
    }
    let s = (start - center) / r0;
    let e = (to - center) / r1;
    let ref_dir = Vector3::new(s.x, s.y, 0.0);
    let normal = if ccw { Vector3::z() } else { -Vector3::z() };
    let binormal = normal.cross(&ref_dir);
    let end_dir = Vector3::new(e.x, e.y, 0.0);
    let sweep = end_dir.dot(&binormal).atan2(end_dir.dot(&ref_dir)).rem_euclid(TAU);
    if sweep < TOLERANCE {
        return Err(OperationError::InvalidInput("arc segment has no sweep".into()).into());
    }
    Ok(ArcGeometry {
        center,
        radius: r0,
        ref_dir,
        normal,
        sweep,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{is_tangential_edge, ShellAdjacency};

    fn d_profile() -> ExtrudeProfile {
        ExtrudeProfile::new(
            Point2::new(0.0, -1.0),
            vec![
                ProfileSegment::Arc {
                    center: Point2::origin(),
                    to: Point2::new(0.0, 1.0),
                    ccw: true,
                },
                ProfileSegment::Line {
                    to: Point2::new(-1.0, 1.0),
                },
                ProfileSegment::Line {
                    to: Point2::new(-1.0, -1.0),
                },
                ProfileSegment::Line {
                    to: Point2::new(0.0, -1.0),
                },
            ],
            2.0,
        )
    }

    #[test]
    fn d_shape_counts() {
        let mut store = TopologyStore::new();
        let solid = d_profile().execute(&mut store).unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        assert_eq!(store.shell(shell).unwrap().faces.len(), 6);
        assert_eq!(store.shell_edges(shell).unwrap().len(), 12);
        assert_eq!(store.shell_vertices(shell).unwrap().len(), 8);

        let adj = ShellAdjacency::build(&store, shell).unwrap();
        for v in store.shell_vertices(shell).unwrap() {
            assert_eq!(adj.all_edges(v).len(), 3);
            assert_eq!(adj.involved_faces(v).len(), 3);
        }
    }

    #[test]
    fn d_shape_tangency() {
        let mut store = TopologyStore::new();
        let solid = d_profile().execute(&mut store).unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        let tangential = store
            .shell_edges(shell)
            .unwrap()
            .into_iter()
            .filter(|&e| is_tangential_edge(&store, e, 1e-6).unwrap())
            .count();
        // The two vertical edges where the flats run into the half cylinder.
        assert_eq!(tangential, 2);
    }

    #[test]
    fn every_edge_has_two_faces_and_pcurves() {
        let mut store = TopologyStore::new();
        let solid = d_profile().execute(&mut store).unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        for e in store.shell_edges(shell).unwrap() {
            let data = store.edge(e).unwrap();
            assert!(data.primary_face.is_some() && data.secondary_face.is_some());
            assert!(data.primary_pcurve.is_some() && data.secondary_pcurve.is_some());
        }
        for &f in &store.shell(shell).unwrap().faces {
            assert!(store.face(f).unwrap().uv_domain.is_some());
        }
    }

    #[test]
    fn clockwise_profile_rejected() {
        let mut store = TopologyStore::new();
        let op = ExtrudeProfile::new(
            Point2::origin(),
            vec![
                ProfileSegment::Line {
                    to: Point2::new(0.0, 1.0),
                },
                ProfileSegment::Line {
                    to: Point2::new(1.0, 1.0),
                },
                ProfileSegment::Line {
                    to: Point2::new(1.0, 0.0),
                },
                ProfileSegment::Line {
                    to: Point2::origin(),
                },
            ],
            1.0,
        );
        assert!(op.execute(&mut store).is_err());
    }

    #[test]
    fn mismatched_arc_rejected() {
        let mut store = TopologyStore::new();
        let op = ExtrudeProfile::new(
            Point2::new(1.0, 0.0),
            vec![
                ProfileSegment::Arc {
                    center: Point2::origin(),
                    to: Point2::new(-2.0, 0.0),
                    ccw: true,
                },
                ProfileSegment::Line {
                    to: Point2::new(1.0, 0.0),
                },
            ],
            1.0,
        );
        assert!(op.execute(&mut store).is_err());
    }
}
