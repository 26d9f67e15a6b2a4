use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::error::{EditError, OperationError, Result};
use crate::geometry::curve::InterpolatedCurve;
use crate::math::Vector3;
use crate::topology::{EdgeCurve, EdgeId, FaceId, FaceSurface, TrimmedCurve};

use super::Parametrics;

impl Parametrics<'_> {
    /// Moves `face` by `offset`.
    ///
    /// Faces meeting the moved face along a tangential edge follow the move,
    /// unless the offset slides them along themselves (a plane moved within
    /// itself, a cylinder along its axis). Every tangential edge met gets the
    /// translated curve as seed for the recomputation. All decisions are made
    /// on the geometry before the move; the surfaces are translated last.
    ///
    /// `face` may belong to the source shell or to the working copy.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnsupportedTarget`] if the face is not part of
    /// the edited shell or was already changed in this session.
    pub fn move_face(&mut self, face: FaceId, offset: &Vector3) -> Result<()> {
        let target = self.resolve_face(face).ok_or_else(|| {
            EditError::UnsupportedTarget("face is not part of the edited shell".into())
        })?;
        if self.modified_faces.contains(&target) {
            return Err(EditError::UnsupportedTarget(
                "face was already changed in this session".into(),
            )
            .into());
        }

        let tol = self.config.tangency_tolerance;
        let mut queue = VecDeque::from([target]);
        let mut to_move = Vec::new();
        self.modified_faces.insert(target);

        while let Some(f) = queue.pop_front() {
            to_move.push(f);
            for oe in self.store.face_edges(f)? {
                let edge = oe.edge;
                let (start, end) = {
                    let data = self.store.edge(edge)?;
                    (data.start, data.end)
                };
                if self.tangential.contains(&edge) {
                    let neighbour = self
                        .store
                        .other_face(edge, f)?
                        .filter(|o| !self.modified_faces.contains(o));
                    if neighbour.is_some() || !self.modified_curves.contains_key(&edge) {
                        let moved = self.store.edge(edge)?.curve.translated(offset);
                        self.modified_curves.insert(edge, moved);
                    }
                    if let Some(other) = neighbour {
                        if self.store.face(other)?.surface.is_extruded(offset, tol) {
                            debug!(?other, "tangential neighbour slides along itself");
                        } else {
                            debug!(?other, ?edge, "tangential neighbour follows the move");
                            self.modified_faces.insert(other);
                            queue.push_back(other);
                        }
                    }
                }
                self.mark_vertex_dirty(start);
                self.mark_vertex_dirty(end);
            }
        }

        for f in &to_move {
            let data = self.store.face_mut(*f)?;
            data.surface = data.surface.translated(offset);
        }
        debug!(moved = to_move.len(), ?offset, "faces moved");
        Ok(())
    }

    /// Changes the radius of a cylinder, sphere or torus face (minor radius
    /// for a torus).
    ///
    /// All faces connected to `face` by tangential edges and lying on the
    /// same surface (a cylinder split by seams, for instance) get the new
    /// radius together. A lone round face is changed only if it has no
    /// tangential neighbour; a rounded edge between two faces would need
    /// its axis moved, which is not supported.
    ///
    /// `face` must belong to the source shell. On error nothing is staged.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a non-positive radius,
    /// [`EditError::UnsupportedTarget`] for a face without a radius, a face
    /// from another shell or an already changed face, and
    /// [`EditError::UnresolvedTopology`] for a face between two tangential
    /// neighbours.
    pub fn modify_radius(&mut self, face: FaceId, radius: f64) -> Result<()> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "radius must be positive, got {radius}"
            ))
            .into());
        }
        let target = self.clone_of_face(face).ok_or_else(|| {
            EditError::UnsupportedTarget("radius edits take a face of the source shell".into())
        })?;
        if self.modified_faces.contains(&target) {
            return Err(EditError::UnsupportedTarget(
                "face was already changed in this session".into(),
            )
            .into());
        }
        let surface = self.store.face(target)?.surface.clone();
        if surface.radius().is_none() {
            return Err(
                EditError::UnsupportedTarget(format!("a {} has no radius", surface.kind())).into(),
            );
        }

        let (group, seams, neighbours) = self.same_surface_group(target, &surface)?;
        if group.len() == 1 && !neighbours.is_empty() {
            warn!(neighbours = neighbours.len(), "radius change rejected");
            let err = if neighbours.len() == 2 {
                EditError::UnresolvedTopology(
                    "round face between two tangential faces needs a new axis".into(),
                )
            } else {
                EditError::UnsupportedTarget(format!(
                    "round face with {} tangential neighbours",
                    neighbours.len()
                ))
            };
            return Err(err.into());
        }

        let mut new_surfaces = Vec::with_capacity(group.len());
        for &f in &group {
            let s = &self.store.face(f)?.surface;
            let Some(changed) = s.with_radius(radius) else {
                return Err(EditError::UnsupportedTarget(format!(
                    "a {} has no radius",
                    s.kind()
                ))
                .into());
            };
            new_surfaces.push((f, changed?));
        }

        let mut seam_curves = Vec::with_capacity(seams.len());
        for edge in seams {
            seam_curves.push((edge, self.seam_curve(edge, &new_surfaces)?));
        }
        let mut corners = Vec::new();
        for &(f, _) in &new_surfaces {
            corners.extend(self.store.face_vertices(f)?);
        }

        for (f, s) in new_surfaces {
            self.store.face_mut(f)?.surface = s;
            self.modified_faces.insert(f);
        }
        for v in corners {
            self.mark_vertex_dirty(v);
        }
        self.modified_curves.extend(seam_curves);
        debug!(faces = group.len(), radius, "radius changed");
        Ok(())
    }

    /// Changes the diameter of a round face; see [`Parametrics::modify_radius`].
    ///
    /// # Errors
    ///
    /// Same as [`Parametrics::modify_radius`] with half the diameter.
    pub fn modify_diameter(&mut self, face: FaceId, diameter: f64) -> Result<()> {
        self.modify_radius(face, diameter / 2.0)
    }

    /// Faces reachable from `start` over tangential edges onto the same
    /// surface, the edges crossed doing so, and the other faces met at
    /// tangential edges.
    fn same_surface_group(
        &self,
        start: FaceId,
        surface: &FaceSurface,
    ) -> Result<(Vec<FaceId>, BTreeSet<EdgeId>, BTreeSet<FaceId>)> {
        let tol = self.config.same_geometry_tolerance;
        let mut group = vec![start];
        let mut seen = HashSet::from([start]);
        let mut seams = BTreeSet::new();
        let mut neighbours = BTreeSet::new();
        let mut i = 0;
        while i < group.len() {
            let f = group[i];
            i += 1;
            for oe in self.store.face_edges(f)? {
                if !self.tangential.contains(&oe.edge) {
                    continue;
                }
                let Some(other) = self.store.other_face(oe.edge, f)? else {
                    continue;
                };
                if self.store.face(other)?.surface.same_geometry(surface, tol) {
                    seams.insert(oe.edge);
                    if seen.insert(other) {
                        group.push(other);
                    }
                } else {
                    neighbours.insert(other);
                }
            }
        }
        Ok((group, seams, neighbours))
    }

    /// New curve of an edge between two faces on one changed surface: its
    /// pcurve, taken from the face that runs along the edge, mapped through
    /// that face's new surface from `changed`.
    fn seam_curve(&self, edge: EdgeId, changed: &[(FaceId, FaceSurface)]) -> Result<TrimmedCurve> {
        let data = self.store.edge(edge)?;
        for f in data.faces() {
            if !self.store.edge_forward_in(edge, f)? {
                continue;
            }
            let Some(pc) = data.pcurve_for(f) else {
                continue;
            };
            let surface = match changed.iter().find(|(c, _)| *c == f) {
                Some((_, s)) => s,
                None => &self.store.face(f)?.surface,
            };
            let points = pc.map_to_3d(surface)?;
            return Ok(TrimmedCurve::whole(EdgeCurve::Polyline(
                InterpolatedCurve::new(points)?,
            )));
        }
        let points = data.curve.samples()?;
        Ok(TrimmedCurve::whole(EdgeCurve::Polyline(
            InterpolatedCurve::new(points)?,
        )))
    }
}
