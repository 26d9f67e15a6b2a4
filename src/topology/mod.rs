pub mod adjacency;
pub mod edge;
pub mod face;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;

pub use adjacency::{is_tangential_edge, ShellAdjacency};
pub use edge::{EdgeCurve, EdgeData, EdgeId, TrimmedCurve, ARC_SEGMENTS};
pub use face::{FaceData, FaceId, FaceSurface};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use crate::geometry::surface::SurfaceDomain;
use crate::math::Point2;
use slotmap::SlotMap;

/// Central arena that owns all topological entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    // --- Wire operations ---

    /// Inserts a wire and returns its ID.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Returns a reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Returns a mutable reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire_mut(&mut self, id: WireId) -> Result<&mut WireData, TopologyError> {
        self.wires
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    // --- Shell operations ---

    /// Inserts a shell and returns its ID.
    pub fn add_shell(&mut self, data: ShellData) -> ShellId {
        self.shells.insert(data)
    }

    /// Returns a reference to the shell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shell(&self, id: ShellId) -> Result<&ShellData, TopologyError> {
        self.shells
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("shell".into()))
    }

    /// Returns a mutable reference to the shell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shell_mut(&mut self, id: ShellId) -> Result<&mut ShellData, TopologyError> {
        self.shells
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("shell".into()))
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    /// Returns a mutable reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid_mut(&mut self, id: SolidId) -> Result<&mut SolidData, TopologyError> {
        self.solids
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }
}

/// Navigation across the face/edge/vertex graph.
impl TopologyStore {
    /// All oriented edge uses of a face, outer wire first.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its wires is missing.
    pub fn face_edges(&self, face: FaceId) -> Result<Vec<OrientedEdge>, TopologyError> {
        let data = self.face(face)?;
        let mut out = Vec::new();
        for w in data.wires() {
            out.extend(self.wire(w)?.edges.iter().copied());
        }
        Ok(out)
    }

    /// Distinct vertices on the boundary of a face, in loop order.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced entity is missing.
    pub fn face_vertices(&self, face: FaceId) -> Result<Vec<VertexId>, TopologyError> {
        let mut out = Vec::new();
        for oe in self.face_edges(face)? {
            let e = self.edge(oe.edge)?;
            for v in [e.start, e.end] {
                if !out.contains(&v) {
                    out.push(v);
                }
            }
        }
        Ok(out)
    }

    /// The face across `edge` from `face`, `None` on a boundary edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or does not bound `face`.
    pub fn other_face(&self, edge: EdgeId, face: FaceId) -> Result<Option<FaceId>, TopologyError> {
        let e = self.edge(edge)?;
        if e.primary_face == Some(face) {
            Ok(e.secondary_face)
        } else if e.secondary_face == Some(face) {
            Ok(e.primary_face)
        } else {
            Err(TopologyError::InvalidTopology(
                "edge does not bound the given face".into(),
            ))
        }
    }

    /// Whether `face` traverses `edge` from its start to its end.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not use the edge.
    pub fn edge_forward_in(&self, edge: EdgeId, face: FaceId) -> Result<bool, TopologyError> {
        for w in self.face(face)?.wires() {
            if let Some(oe) = self.wire(w)?.find(edge) {
                return Ok(oe.forward);
            }
        }
        Err(TopologyError::InvalidTopology(
            "face does not use the given edge".into(),
        ))
    }

    /// Distinct edges of a shell, in face and loop order.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced entity is missing.
    pub fn shell_edges(&self, shell: ShellId) -> Result<Vec<EdgeId>, TopologyError> {
        let mut out = Vec::new();
        for &f in &self.shell(shell)?.faces {
            for oe in self.face_edges(f)? {
                if !out.contains(&oe.edge) {
                    out.push(oe.edge);
                }
            }
        }
        Ok(out)
    }

    /// Distinct vertices of a shell.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced entity is missing.
    pub fn shell_vertices(&self, shell: ShellId) -> Result<Vec<VertexId>, TopologyError> {
        let mut out = Vec::new();
        for e in self.shell_edges(shell)? {
            let data = self.edge(e)?;
            for v in [data.start, data.end] {
                if !out.contains(&v) {
                    out.push(v);
                }
            }
        }
        Ok(out)
    }

    /// The solid whose outer or inner shell is `shell`.
    #[must_use]
    pub fn solid_of_shell(&self, shell: ShellId) -> Option<SolidId> {
        self.solids.iter().find_map(|(id, s)| {
            (s.outer_shell == shell || s.inner_shells.contains(&shell)).then_some(id)
        })
    }

    /// The parameter-space loop of a face: its outer wire's pcurves
    /// chained end to start, each shifted by whole periods to stay
    /// continuous with the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if a pcurve is missing.
    pub fn face_uv_loop(&self, face: FaceId) -> Result<Vec<Point2>, TopologyError> {
        let data = self.face(face)?;
        let mut out: Vec<Point2> = Vec::new();
        for oe in &self.wire(data.outer_wire)?.edges {
            let pc = self
                .edge(oe.edge)?
                .pcurve_for(face)
                .ok_or_else(|| TopologyError::InvalidTopology("edge without pcurve".into()))?;
            let pc = match out.last() {
                Some(prev) => pc.unwrapped_near(&data.surface, prev),
                None => pc.clone(),
            };
            let skip = usize::from(!out.is_empty());
            out.extend(pc.points().iter().skip(skip).copied());
        }
        Ok(out)
    }

    /// Recomputes derived face data after its surface or boundary changed:
    /// the parameter-space domain is rebuilt from the pcurves and the cached
    /// area is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or a pcurve is missing.
    pub fn force_recalc(&mut self, face: FaceId) -> Result<(), TopologyError> {
        let uv = self.face_uv_loop(face)?;
        let data = self.face_mut(face)?;
        data.uv_domain = SurfaceDomain::bounding(&uv);
        data.cached_area = None;
        Ok(())
    }

    /// Removes a vertex, returning its data if it was present.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<VertexData> {
        self.vertices.remove(id)
    }

    /// Removes an edge, returning its data if it was present.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<EdgeData> {
        self.edges.remove(id)
    }

    /// Removes a wire, returning its data if it was present.
    pub fn remove_wire(&mut self, id: WireId) -> Option<WireData> {
        self.wires.remove(id)
    }

    /// Removes a face without its wires.
    pub fn remove_face(&mut self, id: FaceId) -> Option<FaceData> {
        self.faces.remove(id)
    }

    /// Removes a shell and every face, wire, edge and vertex it uses.
    ///
    /// Entities must not be shared with another shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell is missing.
    pub fn remove_shell(&mut self, shell: ShellId) -> Result<(), TopologyError> {
        let edges = self.shell_edges(shell)?;
        let vertices = self.shell_vertices(shell)?;
        let faces = self.shell(shell)?.faces.clone();
        for f in faces {
            if let Some(data) = self.remove_face(f) {
                for w in data.wires() {
                    self.remove_wire(w);
                }
            }
        }
        for e in edges {
            self.remove_edge(e);
        }
        for v in vertices {
            self.remove_vertex(v);
        }
        self.shells.remove(shell);
        Ok(())
    }

    /// Number of live entities per kind: vertices, edges, wires, faces, shells.
    #[must_use]
    pub fn entity_counts(&self) -> [usize; 5] {
        [
            self.vertices.len(),
            self.edges.len(),
            self.wires.len(),
            self.faces.len(),
            self.shells.len(),
        ]
    }
}
