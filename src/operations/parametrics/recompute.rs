use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::error::{EditError, Result};
use crate::geometry::curve::{InterpolatedCurve, Pcurve};
use crate::geometry::surface::{adjust_periodic, Surface};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Point3};
use crate::operations::query::{
    intersect_curve_surface, intersect_surfaces, newton_intersect, CheckConsistency,
};
use crate::topology::{
    EdgeCurve, EdgeData, EdgeId, FaceId, TrimmedCurve, VertexId, ARC_SEGMENTS,
};

use super::{Parametrics, ParametricsOutcome};

impl Parametrics<'_> {
    /// Recomputes every dirty vertex and edge and validates the edited shell.
    ///
    /// Vertices are placed first: on a known tangential edge curve where it
    /// crosses the remaining face, else on a seam of two faces sharing one
    /// surface, else at the common point of three surfaces found by Newton
    /// iteration from the old position. Edges are then rebuilt between their
    /// new vertices: seams as parameter-space lines, tangential edges from
    /// their known curves, all others by intersecting their two surfaces.
    /// Each rebuilt edge gets fresh pcurves, the faces around it a fresh
    /// parameter domain, and the shell must pass [`CheckConsistency`].
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Infeasible`] if a vertex or edge cannot be
    /// placed and [`EditError::Inconsistent`] if the result fails the
    /// consistency check or turns a face inside out. The working copy is
    /// removed in either case.
    pub fn result(mut self) -> Result<ParametricsOutcome> {
        let mut orientation = Vec::new();
        for e in &self.edges_to_recalc {
            for f in self.store.edge(*e)?.faces() {
                if let Some(area) = self.loop_area(f) {
                    orientation.push((f, area));
                }
            }
        }
        orientation.sort_by_key(|(f, _)| *f);
        orientation.dedup_by_key(|(f, _)| *f);

        let vertices: Vec<VertexId> = self.vertices_to_recalc.iter().copied().collect();
        for v in vertices {
            let point = self.recompute_vertex(v)?;
            self.store.vertex_mut(v)?.point = point;
        }

        let mut involved = BTreeSet::new();
        let edges: Vec<EdgeId> = self.edges_to_recalc.iter().copied().collect();
        for e in edges {
            self.recompute_edge(e)?;
            involved.extend(self.store.edge(e)?.faces());
        }
        for &f in &involved {
            self.store.force_recalc(f)?;
        }

        let report = CheckConsistency::new(self.clone)
            .with_tolerance(self.config.point_tolerance)
            .execute(&*self.store)?;
        if let Some(issue) = report.issues.first() {
            warn!(%issue, issues = report.issues.len(), "edited shell rejected");
            return Err(EditError::Inconsistent(issue.to_string()).into());
        }
        self.check_orientation(&orientation)?;

        self.committed = true;
        info!(
            shell = ?self.clone,
            vertices = self.vertices_to_recalc.len(),
            edges = self.edges_to_recalc.len(),
            "edit applied"
        );
        Ok(ParametricsOutcome {
            shell: self.clone,
            involved_faces: involved.into_iter().collect(),
        })
    }

    /// Signed parameter-space area of the outer loop of `face`.
    fn loop_area(&self, face: FaceId) -> Option<f64> {
        self.store
            .face_uv_loop(face)
            .ok()
            .map(|uv| signed_area_2d(&uv))
    }

    /// Rejects faces whose loop reversed or collapsed during the edit.
    fn check_orientation(&self, before: &[(FaceId, f64)]) -> Result<()> {
        let eps = self.config.point_tolerance * self.config.point_tolerance;
        for &(face, old) in before {
            if old.abs() <= eps {
                continue;
            }
            let new = self.loop_area(face).unwrap_or(0.0);
            if new * old.signum() <= eps {
                warn!(?face, old, new, "edited face turned inside out");
                return Err(EditError::Inconsistent(format!(
                    "face loop area went from {old:.3e} to {new:.3e}"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// The curve an edge is already known to follow after the edit: a
    /// staged curve, or the unchanged curve of a tangential edge.
    fn known_curve(&self, edge: EdgeId) -> Result<Option<TrimmedCurve>> {
        if let Some(c) = self.modified_curves.get(&edge) {
            return Ok(Some(c.clone()));
        }
        if self.tangential.contains(&edge) {
            return Ok(Some(self.store.edge(edge)?.curve.clone()));
        }
        Ok(None)
    }

    fn recompute_vertex(&self, v: VertexId) -> Result<Point3> {
        let old = self.store.vertex(v)?.point;
        let faces = self.adjacency.involved_faces(v);
        let edges = self.adjacency.all_edges(v);

        // Three surfaces meeting tangentially have no isolated common point,
        // so a vertex on a tangential edge slides along that edge.
        for &e in edges {
            let Some(curve) = self.known_curve(e)? else {
                continue;
            };
            let data = self.store.edge(e)?;
            let anchor = if data.start == v {
                curve.start_point()?
            } else {
                curve.end_point()?
            };
            for &f in faces {
                if data.primary_face == Some(f) || data.secondary_face == Some(f) {
                    continue;
                }
                let surface = &self.store.face(f)?.surface;
                let hits = intersect_curve_surface(&curve, surface, &self.config)?;
                if let Some(p) = nearest(hits.iter().map(|h| h.point), &anchor) {
                    debug!(?v, ?e, "vertex placed on tangential edge");
                    return Ok(p);
                }
            }
        }

        if faces.len() >= 3 {
            let tol = self.config.same_geometry_tolerance;
            let mut seam_hits = Vec::new();
            for &e in edges {
                let data = self.store.edge(e)?;
                let (Some(f1), Some(f2)) = (data.primary_face, data.secondary_face) else {
                    continue;
                };
                let s1 = &self.store.face(f1)?.surface;
                if !s1.same_geometry(&self.store.face(f2)?.surface, tol) {
                    continue;
                }
                let Some(&other) = faces.iter().find(|&&f| f != f1 && f != f2) else {
                    continue;
                };
                let surface = &self.store.face(other)?.surface;
                let hits = intersect_curve_surface(&data.curve, surface, &self.config)?;
                seam_hits.extend(hits.into_iter().map(|h| h.point));
            }
            if let Some(p) = nearest(seam_hits.into_iter(), &old) {
                debug!(?v, "vertex placed on seam");
                return Ok(p);
            }

            let s0 = &self.store.face(faces[0])?.surface;
            let s1 = &self.store.face(faces[1])?.surface;
            let s2 = &self.store.face(faces[2])?.surface;
            if let Some(p) = newton_intersect([s0, s1, s2], &old, &self.config) {
                return Ok(p);
            }
        }

        warn!(?v, %old, "vertex has no position on the edited surfaces");
        Err(EditError::Infeasible(format!("no position for the vertex at {old}")).into())
    }

    fn recompute_edge(&mut self, e: EdgeId) -> Result<()> {
        let data = self.store.edge(e)?.clone();
        let seeds = [
            self.store.vertex(data.start)?.point,
            self.store.vertex(data.end)?.point,
        ];
        let Some((curve, clamp)) = self.rebuild_curve(e, &data, &seeds)? else {
            warn!(?e, "edge has no curve on the edited surfaces");
            return Err(EditError::Infeasible(format!(
                "no curve between {} and {}",
                seeds[0], seeds[1]
            ))
            .into());
        };

        let first = curve.start_point()?;
        let mut curve = if (first - seeds[0]).norm() > (first - seeds[1]).norm() {
            curve.reversed()
        } else {
            curve
        };
        if clamp {
            curve = curve.clamped_to(&seeds[0], &seeds[1]);
        }

        let samples = curve.samples()?;
        let mut pcurves = Vec::with_capacity(2);
        for f in data.faces() {
            let face = self.store.face(f)?;
            let mut points = samples.clone();
            if !self.store.edge_forward_in(e, f)? {
                points.reverse();
            }
            let domain = face.uv_domain.unwrap_or_else(|| face.surface.domain());
            let pc =
                Pcurve::project(&face.surface, &points)?.adjust_periodic(&face.surface, &domain);
            pcurves.push((f, pc));
        }

        let edge = self.store.edge_mut(e)?;
        edge.curve = curve;
        for (f, pc) in pcurves {
            edge.set_pcurve(f, pc);
        }
        Ok(())
    }

    /// New curve of an edge between `seeds`, and whether it still has to be
    /// trimmed to them.
    #[allow(clippy::cast_precision_loss)]
    fn rebuild_curve(
        &self,
        e: EdgeId,
        data: &EdgeData,
        seeds: &[Point3; 2],
    ) -> Result<Option<(TrimmedCurve, bool)>> {
        let Some(f1) = data.primary_face else {
            return Ok(None);
        };
        let face1 = self.store.face(f1)?;
        let s1 = &face1.surface;
        let Some(f2) = data.secondary_face else {
            let kept = match self.known_curve(e)? {
                Some(c) => Some(c),
                None => (!self.modified_faces.contains(&f1)).then(|| data.curve.clone()),
            };
            return Ok(kept.map(|c| (c, true)));
        };
        let s2 = &self.store.face(f2)?.surface;

        if s1.same_geometry(s2, self.config.same_geometry_tolerance) {
            let domain = face1.uv_domain.unwrap_or_else(|| s1.domain());
            let uv = |p: &Point3| {
                let (u, v) = s1.inverse(p);
                adjust_periodic(s1, &domain, Point2::new(u, v))
            };
            let (a, b) = (uv(&seeds[0]), uv(&seeds[1]));
            let points = (0..=ARC_SEGMENTS)
                .map(|i| {
                    let q = a + (b - a) * (i as f64 / ARC_SEGMENTS as f64);
                    s1.evaluate(q.x, q.y)
                })
                .collect::<Result<Vec<_>>>()?;
            debug!(?e, "seam rebuilt in parameter space");
            let curve = TrimmedCurve::whole(EdgeCurve::Polyline(InterpolatedCurve::new(points)?));
            return Ok(Some((curve, true)));
        }

        if let Some(known) = self.known_curve(e)? {
            debug!(?e, "tangential edge follows its known curve");
            return Ok(Some((known, true)));
        }

        let step = data.curve.length()?.max((seeds[1] - seeds[0]).norm())
            / self.config.march_segments.max(1) as f64;
        let hint = data.curve.start_direction()?;
        let curve = intersect_surfaces(s1, s2, &seeds[0], &seeds[1], &hint, step, &self.config)?;
        Ok(curve.map(|c| {
            let clamp = !c.is_dual_surface();
            (c, clamp)
        }))
    }
}

/// The point of `points` closest to `target`.
fn nearest(points: impl Iterator<Item = Point3>, target: &Point3) -> Option<Point3> {
    points.min_by(|a, b| (a - target).norm().total_cmp(&(b - target).norm()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BrepEditError;
    use crate::math::Vector3;
    use crate::operations::creation::{ExtrudeProfile, MakeBox, MakeCylinder, ProfileSegment};
    use crate::topology::{FaceSurface, ShellId, TopologyStore};

    fn box_shell(store: &mut TopologyStore) -> ShellId {
        let solid = MakeBox::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0))
            .execute(store)
            .unwrap();
        store.solid(solid).unwrap().outer_shell
    }

    fn roof_of(store: &TopologyStore, shell: ShellId) -> FaceId {
        store
            .shell(shell)
            .unwrap()
            .faces
            .iter()
            .copied()
            .find(|&f| match &store.face(f).unwrap().surface {
                FaceSurface::Plane(p) => p.plane_normal().z > 0.99,
                _ => false,
            })
            .unwrap()
    }

    #[test]
    fn nearest_picks_the_closest_point() {
        let pts = [
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-2.0, 0.0, 0.0),
        ];
        let p = nearest(pts.into_iter(), &Point3::origin()).unwrap();
        assert_eq!(p, Point3::new(1.0, 0.0, 0.0));
        assert!(nearest(std::iter::empty(), &Point3::origin()).is_none());
    }

    #[test]
    fn raised_roof_moves_its_corners() {
        let mut store = TopologyStore::new();
        let shell = box_shell(&mut store);
        let roof = roof_of(&store, shell);
        let mut session = Parametrics::new(&mut store, shell).unwrap();
        session.move_face(roof, &Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let outcome = session.result().unwrap();

        // roof and the four walls
        assert_eq!(outcome.involved_faces.len(), 5);
        for v in store.shell_vertices(outcome.shell).unwrap() {
            let z = store.vertex(v).unwrap().point.z;
            assert!(z.abs() < 1e-9 || (z - 3.0).abs() < 1e-9, "unexpected height {z}");
        }
    }

    #[test]
    fn roof_pushed_through_the_floor_is_rejected() {
        let mut store = TopologyStore::new();
        let shell = box_shell(&mut store);
        let roof = roof_of(&store, shell);
        let before = store.entity_counts();

        let mut session = Parametrics::new(&mut store, shell).unwrap();
        session.move_face(roof, &Vector3::new(0.0, 0.0, -3.0)).unwrap();
        let result = session.result();
        assert!(matches!(result, Err(BrepEditError::Edit(EditError::Inconsistent(_)))));
        assert_eq!(store.entity_counts(), before);
    }

    #[test]
    fn shrinking_a_cylinder_moves_the_seams() {
        let mut store = TopologyStore::new();
        let solid = MakeCylinder::new(Point3::origin(), 2.0, 1.0)
            .execute(&mut store)
            .unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        let half = store.shell(shell).unwrap().faces[0];
        let mut session = Parametrics::new(&mut store, shell).unwrap();
        session.modify_radius(half, 1.5).unwrap();
        let outcome = session.result().unwrap();

        for v in store.shell_vertices(outcome.shell).unwrap() {
            let p = store.vertex(v).unwrap().point;
            assert!((p.coords.xy().norm() - 1.5).abs() < 1e-9);
        }
        for e in store.shell_edges(outcome.shell).unwrap() {
            for p in store.edge(e).unwrap().curve.samples().unwrap() {
                assert!((p.coords.xy().norm() - 1.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn failure_removes_the_working_copy() {
        let mut store = TopologyStore::new();
        // shaft of radius 2 with a flat at x = 1
        let (x, y) = (1.0, 3.0_f64.sqrt());
        let solid = ExtrudeProfile::new(
            Point2::new(x, -y),
            vec![
                ProfileSegment::Line {
                    to: Point2::new(x, y),
                },
                ProfileSegment::Arc {
                    center: Point2::origin(),
                    to: Point2::new(x, -y),
                    ccw: true,
                },
            ],
            1.0,
        )
        .execute(&mut store)
        .unwrap();
        let shell = store.solid(solid).unwrap().outer_shell;
        let shaft = store
            .shell(shell)
            .unwrap()
            .faces
            .iter()
            .copied()
            .find(|&f| matches!(store.face(f).unwrap().surface, FaceSurface::Cylinder(_)))
            .unwrap();
        let before = store.entity_counts();

        let mut session = Parametrics::new(&mut store, shell).unwrap();
        session.modify_radius(shaft, 0.9).unwrap();
        let result = session.result();
        assert!(matches!(result, Err(BrepEditError::Edit(EditError::Infeasible(_)))));
        assert_eq!(store.entity_counts(), before);
    }
}
