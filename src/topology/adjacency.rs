use std::collections::HashMap;

use crate::error::Result;
use crate::geometry::surface::Surface;

use super::{EdgeId, FaceId, ShellId, TopologyStore, VertexId};

/// Parameters along an edge at which tangency is sampled.
const TANGENCY_SAMPLES: [f64; 3] = [0.25, 0.5, 0.75];

/// Vertex-centred adjacency of one shell.
///
/// Built once from a consistent shell; it reflects topology only, so it
/// stays valid while geometry is edited.
#[derive(Debug, Default)]
pub struct ShellAdjacency {
    vertex_edges: HashMap<VertexId, Vec<EdgeId>>,
    vertex_faces: HashMap<VertexId, Vec<FaceId>>,
}

impl ShellAdjacency {
    /// Collects edges and faces around every vertex of `shell`.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced entity is missing.
    pub fn build(store: &TopologyStore, shell: ShellId) -> Result<Self> {
        let mut adj = Self::default();
        for &face in &store.shell(shell)?.faces {
            for oe in store.face_edges(face)? {
                let edge = store.edge(oe.edge)?;
                for v in [edge.start, edge.end] {
                    let edges = adj.vertex_edges.entry(v).or_default();
                    if !edges.contains(&oe.edge) {
                        edges.push(oe.edge);
                    }
                    let faces = adj.vertex_faces.entry(v).or_default();
                    if !faces.contains(&face) {
                        faces.push(face);
                    }
                }
            }
        }
        Ok(adj)
    }

    /// Edges incident to `vertex`.
    #[must_use]
    pub fn all_edges(&self, vertex: VertexId) -> &[EdgeId] {
        self.vertex_edges.get(&vertex).map_or(&[], Vec::as_slice)
    }

    /// Faces incident to `vertex`, in shell order.
    #[must_use]
    pub fn involved_faces(&self, vertex: VertexId) -> &[FaceId] {
        self.vertex_faces.get(&vertex).map_or(&[], Vec::as_slice)
    }
}

/// Whether the two faces at `edge` meet without a crease.
///
/// The surface normals are compared at interior samples of the edge curve;
/// parallel or anti-parallel normals within `tol` count as tangent. Boundary
/// edges are never tangential.
///
/// # Errors
///
/// Returns an error if a referenced entity is missing or evaluation fails.
pub fn is_tangential_edge(store: &TopologyStore, edge: EdgeId, tol: f64) -> Result<bool> {
    let data = store.edge(edge)?;
    let (Some(f1), Some(f2)) = (data.primary_face, data.secondary_face) else {
        return Ok(false);
    };
    let s1 = &store.face(f1)?.surface;
    let s2 = &store.face(f2)?.surface;
    for s in TANGENCY_SAMPLES {
        let p = data.curve.point_at_fraction(s)?;
        if s1.gradient(&p).cross(&s2.gradient(&p)).norm() > tol {
            return Ok(false);
        }
    }
    Ok(true)
}
