use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use tracing::{debug, warn};

use crate::error::{Result, TopologyError};
use crate::topology::{
    is_tangential_edge, EdgeId, FaceId, ShellAdjacency, ShellData, ShellId, TopologyStore,
    TrimmedCurve, VertexId, WireId,
};

use super::ParametricsConfig;

/// Result of a successful edit session.
#[derive(Debug, Clone)]
pub struct ParametricsOutcome {
    /// The edited shell, a new shell in the store.
    pub shell: ShellId,
    /// Faces of the new shell whose boundary was recomputed.
    pub involved_faces: Vec<FaceId>,
}

/// An edit session on one shell.
///
/// Creating the session deep-copies the source shell into fresh entities of
/// the same store. Edits are staged on that copy and recorded as dirty
/// vertices and edges; [`Parametrics::result`] recomputes them and hands the
/// copy over to the caller. A session dropped without a successful result
/// removes its copy again, so the store is left as it was.
pub struct Parametrics<'a> {
    pub(super) store: &'a mut TopologyStore,
    pub(super) config: ParametricsConfig,
    pub(super) source: ShellId,
    pub(super) clone: ShellId,
    pub(super) face_map: HashMap<FaceId, FaceId>,
    pub(super) edge_map: HashMap<EdgeId, EdgeId>,
    pub(super) vertex_map: HashMap<VertexId, VertexId>,
    pub(super) adjacency: ShellAdjacency,
    /// Edges of the copy that were tangential before any edit.
    pub(super) tangential: HashSet<EdgeId>,
    pub(super) vertices_to_recalc: BTreeSet<VertexId>,
    pub(super) edges_to_recalc: BTreeSet<EdgeId>,
    pub(super) modified_faces: BTreeSet<FaceId>,
    /// Already known new curves of tangential edges, used as seeds.
    pub(super) modified_curves: HashMap<EdgeId, TrimmedCurve>,
    pub(super) committed: bool,
}

/// Identity maps from source entities to their copies.
#[derive(Default)]
struct ShellCopy {
    shell: ShellId,
    faces: HashMap<FaceId, FaceId>,
    edges: HashMap<EdgeId, EdgeId>,
    vertices: HashMap<VertexId, VertexId>,
    wires: Vec<WireId>,
}

impl ShellCopy {
    /// Removes whatever part of the copy was already inserted.
    fn discard(&self, store: &mut TopologyStore) {
        for &f in self.faces.values() {
            store.remove_face(f);
        }
        for &w in &self.wires {
            store.remove_wire(w);
        }
        for &e in self.edges.values() {
            store.remove_edge(e);
        }
        for &v in self.vertices.values() {
            store.remove_vertex(v);
        }
    }
}

impl<'a> Parametrics<'a> {
    /// Starts a session on `shell` with default tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell or one of its entities is missing.
    pub fn new(store: &'a mut TopologyStore, shell: ShellId) -> Result<Self> {
        Self::with_config(store, shell, ParametricsConfig::default())
    }

    /// Starts a session on `shell`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell or one of its entities is missing.
    pub fn with_config(
        store: &'a mut TopologyStore,
        shell: ShellId,
        config: ParametricsConfig,
    ) -> Result<Self> {
        let copy = copy_shell(store, shell)?;
        let mut session = Self {
            store,
            config,
            source: shell,
            clone: copy.shell,
            face_map: copy.faces,
            edge_map: copy.edges,
            vertex_map: copy.vertices,
            adjacency: ShellAdjacency::default(),
            tangential: HashSet::new(),
            vertices_to_recalc: BTreeSet::new(),
            edges_to_recalc: BTreeSet::new(),
            modified_faces: BTreeSet::new(),
            modified_curves: HashMap::new(),
            committed: false,
        };
        session.adjacency = ShellAdjacency::build(&*session.store, session.clone)?;
        for e in session.store.shell_edges(session.clone)? {
            if is_tangential_edge(&*session.store, e, config.tangency_tolerance)? {
                session.tangential.insert(e);
            }
        }
        debug!(
            faces = session.face_map.len(),
            edges = session.edge_map.len(),
            tangential = session.tangential.len(),
            "edit session started"
        );
        Ok(session)
    }

    /// The shell being edited.
    #[must_use]
    pub fn source_shell(&self) -> ShellId {
        self.source
    }

    /// The working copy the edits are staged on.
    #[must_use]
    pub fn cloned_shell(&self) -> ShellId {
        self.clone
    }

    /// Read access to the store while the session holds it.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &*self.store
    }

    #[must_use]
    pub fn config(&self) -> &ParametricsConfig {
        &self.config
    }

    /// Copy of a source face.
    #[must_use]
    pub fn clone_of_face(&self, face: FaceId) -> Option<FaceId> {
        self.face_map.get(&face).copied()
    }

    /// Copy of a source edge.
    #[must_use]
    pub fn clone_of_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        self.edge_map.get(&edge).copied()
    }

    /// Copy of a source vertex.
    #[must_use]
    pub fn clone_of_vertex(&self, vertex: VertexId) -> Option<VertexId> {
        self.vertex_map.get(&vertex).copied()
    }

    /// Faces of the copy whose surface was changed, directly or by propagation.
    #[must_use]
    pub fn modified_faces(&self) -> &BTreeSet<FaceId> {
        &self.modified_faces
    }

    /// Whether `face` (source or copy) has a changed surface.
    #[must_use]
    pub fn is_modified(&self, face: FaceId) -> bool {
        self.resolve_face(face)
            .is_some_and(|f| self.modified_faces.contains(&f))
    }

    /// Maps a source face to its copy; faces of the copy map to themselves.
    pub(super) fn resolve_face(&self, face: FaceId) -> Option<FaceId> {
        if let Some(&f) = self.face_map.get(&face) {
            return Some(f);
        }
        self.store
            .shell(self.clone)
            .ok()
            .filter(|s| s.contains(face))
            .map(|_| face)
    }

    /// Marks `vertex` and every edge meeting it for recomputation.
    pub(super) fn mark_vertex_dirty(&mut self, vertex: VertexId) {
        self.vertices_to_recalc.insert(vertex);
        self.edges_to_recalc
            .extend(self.adjacency.all_edges(vertex).iter().copied());
    }
}

impl Drop for Parametrics<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(err) = self.store.remove_shell(self.clone) {
            warn!(%err, "could not discard the edit copy");
        }
    }
}

fn lookup<K: Hash + Eq, V: Copy>(map: &HashMap<K, V>, key: &K) -> Result<V> {
    map.get(key).copied().ok_or_else(|| {
        TopologyError::InvalidTopology("shell references an entity outside itself".into()).into()
    })
}

/// Copies `source` with all its entities, remapping every internal reference.
/// On failure nothing of the copy is left in the store.
fn copy_shell(store: &mut TopologyStore, source: ShellId) -> Result<ShellCopy> {
    let mut copy = ShellCopy::default();
    if let Err(err) = fill_copy(store, source, &mut copy) {
        copy.discard(store);
        return Err(err);
    }
    Ok(copy)
}

fn fill_copy(store: &mut TopologyStore, source: ShellId, copy: &mut ShellCopy) -> Result<()> {
    let shell = store.shell(source)?.clone();

    for v in store.shell_vertices(source)? {
        let data = store.vertex(v)?.clone();
        copy.vertices.insert(v, store.add_vertex(data));
    }

    for e in store.shell_edges(source)? {
        let mut data = store.edge(e)?.clone();
        data.start = lookup(&copy.vertices, &data.start)?;
        data.end = lookup(&copy.vertices, &data.end)?;
        copy.edges.insert(e, store.add_edge(data));
    }

    for &f in &shell.faces {
        let mut data = store.face(f)?.clone();
        data.outer_wire = copy_wire(store, data.outer_wire, copy)?;
        for w in &mut data.inner_wires {
            *w = copy_wire(store, *w, copy)?;
        }
        copy.faces.insert(f, store.add_face(data));
    }

    for &e in copy.edges.values() {
        let data = store.edge_mut(e)?;
        data.primary_face = data.primary_face.map(|f| lookup(&copy.faces, &f)).transpose()?;
        data.secondary_face = data.secondary_face.map(|f| lookup(&copy.faces, &f)).transpose()?;
    }

    let faces = shell
        .faces
        .iter()
        .map(|f| lookup(&copy.faces, f))
        .collect::<Result<_>>()?;
    copy.shell = store.add_shell(ShellData {
        faces,
        is_closed: shell.is_closed,
    });
    Ok(())
}

fn copy_wire(store: &mut TopologyStore, wire: WireId, copy: &mut ShellCopy) -> Result<WireId> {
    let mut data = store.wire(wire)?.clone();
    for oe in &mut data.edges {
        oe.edge = lookup(&copy.edges, &oe.edge)?;
    }
    let id = store.add_wire(data);
    copy.wires.push(id);
    Ok(id)
}
