use crate::error::{Result, TopologyError};
use crate::geometry::curve::Pcurve;
use crate::math::Point3;
use crate::topology::{
    EdgeData, EdgeId, FaceData, FaceId, FaceSurface, OrientedEdge, ShellData, ShellId,
    TopologyStore, TrimmedCurve, VertexData, VertexId, WireData,
};

/// Assembles a shell from vertices, edges and face loops.
///
/// Entities are inserted into the store as they are added; [`ShellBuilder::build`]
/// links every edge to the faces using it and computes the pcurves and
/// parameter domains of all faces.
pub struct ShellBuilder<'a> {
    store: &'a mut TopologyStore,
    faces: Vec<FaceId>,
}

impl<'a> ShellBuilder<'a> {
    /// Starts an empty shell in `store`.
    pub fn new(store: &'a mut TopologyStore) -> Self {
        Self {
            store,
            faces: Vec::new(),
        }
    }

    /// Adds a vertex at `point`.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.store.add_vertex(VertexData::new(point))
    }

    /// Adds an edge from `start` to `end` along `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve end points are away from the vertices.
    pub fn add_edge(
        &mut self,
        start: VertexId,
        end: VertexId,
        curve: TrimmedCurve,
    ) -> Result<EdgeId> {
        let gap = |v: VertexId, p: Point3| -> Result<f64> {
            Ok(self.store.vertex(v)?.distance_to(&p))
        };
        if gap(start, curve.start_point()?)? > 1e-9 || gap(end, curve.end_point()?)? > 1e-9 {
            return Err(TopologyError::InvalidTopology(
                "edge curve does not end at its vertices".into(),
            )
            .into());
        }
        Ok(self.store.add_edge(EdgeData::new(start, end, curve)))
    }

    /// Adds a face bounded by the closed loop `edges`.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is empty or not connected end to start.
    pub fn add_face(
        &mut self,
        surface: FaceSurface,
        same_sense: bool,
        edges: Vec<OrientedEdge>,
    ) -> Result<FaceId> {
        let ends = edges
            .iter()
            .map(|oe| {
                let e = self.store.edge(oe.edge)?;
                Ok(if oe.forward { (e.start, e.end) } else { (e.end, e.start) })
            })
            .collect::<Result<Vec<_>>>()?;
        if ends.is_empty() {
            return Err(TopologyError::WireNotClosed.into());
        }
        for (i, &(_, to)) in ends.iter().enumerate() {
            let (from, _) = ends[(i + 1) % ends.len()];
            if from != to {
                return Err(TopologyError::WireNotClosed.into());
            }
        }
        let wire = self.store.add_wire(WireData::closed(edges));
        let face = self.store.add_face(FaceData::new(surface, wire, same_sense));
        self.faces.push(face);
        Ok(face)
    }

    /// Links edges to faces, computes pcurves and face domains, and inserts
    /// the shell.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is used by more than two faces, or by
    /// fewer than two when `is_closed` is set.
    pub fn build(self, is_closed: bool) -> Result<ShellId> {
        let Self { store, faces } = self;

        for &face in &faces {
            for oe in store.face_edges(face)? {
                let edge = store.edge_mut(oe.edge)?;
                if edge.primary_face.is_none() {
                    edge.primary_face = Some(face);
                } else if edge.secondary_face.is_none() {
                    edge.secondary_face = Some(face);
                } else {
                    return Err(TopologyError::InvalidTopology(
                        "edge used by more than two faces".into(),
                    )
                    .into());
                }
            }
        }

        for &face in &faces {
            attach_pcurves(store, face)?;
            store.force_recalc(face)?;
        }

        let shell = store.add_shell(ShellData {
            faces,
            is_closed,
        });
        if is_closed {
            for e in store.shell_edges(shell)? {
                if store.edge(e)?.secondary_face.is_none() {
                    return Err(TopologyError::InvalidTopology(
                        "closed shell has a boundary edge".into(),
                    )
                    .into());
                }
            }
        }
        Ok(shell)
    }
}

/// Projects every boundary edge of `face` into its parameter space, in loop
/// direction, chaining the pcurves continuously across periodic seams.
fn attach_pcurves(store: &mut TopologyStore, face: FaceId) -> Result<()> {
    let surface = store.face(face)?.surface.clone();
    let mut prev_end = None;
    for oe in store.face_edges(face)? {
        let edge = store.edge(oe.edge)?;
        let mut samples = edge.curve.samples()?;
        if !oe.forward {
            samples.reverse();
        }
        let mut pc = Pcurve::project(&surface, &samples)?;
        if let Some(prev) = prev_end {
            pc = pc.unwrapped_near(&surface, &prev);
        }
        prev_end = Some(pc.end());
        store.edge_mut(oe.edge)?.set_pcurve(face, pc);
    }
    Ok(())
}
