use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::geometry::surface::Surface;
use crate::math::intersect_2d::segments_cross_2d;
use crate::topology::{EdgeId, FaceId, ShellId, TopologyStore, VertexId};

/// One problem found by [`CheckConsistency`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyIssue {
    /// A face loop is not connected end to start.
    OpenWire { face: FaceId },
    /// An edge is used by the wrong number of face loops.
    EdgeUseCount { edge: EdgeId, uses: usize },
    /// The faces recorded on an edge differ from the faces using it.
    FaceLinkMismatch { edge: EdgeId },
    /// An edge curve does not end at the edge's vertices.
    CurveEndpoint { edge: EdgeId, gap: f64 },
    /// A vertex is away from the surface of a face around it.
    VertexOffSurface { vertex: VertexId, face: FaceId, distance: f64 },
    /// An edge curve leaves the surface of an adjacent face.
    CurveOffSurface { edge: EdgeId, face: FaceId, distance: f64 },
    /// A pcurve is missing or does not map back onto the edge ends.
    PcurveMismatch { edge: EdgeId, face: FaceId },
    /// A face's parameter-space loop crosses itself.
    SelfIntersectingLoop { face: FaceId },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenWire { .. } => write!(f, "face loop is not closed"),
            Self::EdgeUseCount { uses, .. } => write!(f, "edge used by {uses} face loops"),
            Self::FaceLinkMismatch { .. } => write!(f, "edge face links do not match its uses"),
            Self::CurveEndpoint { gap, .. } => {
                write!(f, "edge curve misses its vertex by {gap:.3e}")
            }
            Self::VertexOffSurface { distance, .. } => {
                write!(f, "vertex is {distance:.3e} away from an adjacent surface")
            }
            Self::CurveOffSurface { distance, .. } => {
                write!(f, "edge curve is {distance:.3e} away from an adjacent surface")
            }
            Self::PcurveMismatch { .. } => write!(f, "pcurve does not match its edge"),
            Self::SelfIntersectingLoop { .. } => write!(f, "face loop crosses itself"),
        }
    }
}

/// Result of a consistency check.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    /// All problems found, in check order.
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    /// Whether no problem was found.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validates the topological and geometric coherence of a shell.
///
/// Topology: every face loop is closed and connected, every edge is used by
/// at most two loops (exactly two in a closed shell) and records those faces.
/// Geometry: edge curves end at their vertices, vertices and curve samples
/// lie on all adjacent surfaces, pcurves map back onto the edge ends, and no
/// face loop crosses itself in parameter space.
pub struct CheckConsistency {
    shell: ShellId,
    tolerance: f64,
}

impl CheckConsistency {
    /// Creates a new `CheckConsistency` query with a `1e-6` point tolerance.
    #[must_use]
    pub fn new(shell: ShellId) -> Self {
        Self {
            shell,
            tolerance: 1e-6,
        }
    }

    /// Sets the distance tolerance for points on surfaces and curve ends.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell references missing entities or curve
    /// evaluation fails; geometric problems are reported, not raised.
    pub fn execute(&self, store: &TopologyStore) -> Result<ConsistencyReport> {
        let mut report = ConsistencyReport::default();
        let shell = store.shell(self.shell)?;
        let tol = self.tolerance;

        let mut uses: HashMap<EdgeId, Vec<FaceId>> = HashMap::new();
        for &face in &shell.faces {
            self.check_loops(store, face, &mut report)?;
            for oe in store.face_edges(face)? {
                uses.entry(oe.edge).or_default().push(face);
            }
        }

        for edge in store.shell_edges(self.shell)? {
            let data = store.edge(edge)?;
            let users = uses.get(&edge).map_or(&[][..], Vec::as_slice);
            if users.len() > 2 || (shell.is_closed && users.len() != 2) {
                report.issues.push(ConsistencyIssue::EdgeUseCount {
                    edge,
                    uses: users.len(),
                });
            }
            let linked: Vec<FaceId> = data.faces().collect();
            if linked.len() != users.len() || users.iter().any(|f| !linked.contains(f)) {
                report.issues.push(ConsistencyIssue::FaceLinkMismatch { edge });
            }

            let start = store.vertex(data.start)?.point;
            let end = store.vertex(data.end)?.point;
            let gap = (data.curve.start_point()? - start)
                .norm()
                .max((data.curve.end_point()? - end).norm());
            if gap > tol {
                report.issues.push(ConsistencyIssue::CurveEndpoint { edge, gap });
            }

            let samples = data.curve.samples()?;
            for &face in &linked {
                let surface = &store.face(face)?.surface;
                let distance = samples
                    .iter()
                    .map(|p| surface.signed_distance(p).abs())
                    .fold(0.0, f64::max);
                if distance > tol {
                    report.issues.push(ConsistencyIssue::CurveOffSurface { edge, face, distance });
                }

                let forward = store.edge_forward_in(edge, face)?;
                let (first, last) = if forward { (start, end) } else { (end, start) };
                let matches = match data.pcurve_for(face) {
                    Some(pc) => {
                        let a = surface.evaluate(pc.start().x, pc.start().y)?;
                        let b = surface.evaluate(pc.end().x, pc.end().y)?;
                        (a - first).norm() <= tol && (b - last).norm() <= tol
                    }
                    None => false,
                };
                if !matches {
                    report.issues.push(ConsistencyIssue::PcurveMismatch { edge, face });
                }
            }
        }

        for &face in &shell.faces {
            let surface = &store.face(face)?.surface;
            for vertex in store.face_vertices(face)? {
                let distance = surface.signed_distance(&store.vertex(vertex)?.point).abs();
                if distance > tol {
                    report.issues.push(ConsistencyIssue::VertexOffSurface {
                        vertex,
                        face,
                        distance,
                    });
                }
            }
        }

        Ok(report)
    }

    fn check_loops(
        &self,
        store: &TopologyStore,
        face: FaceId,
        report: &mut ConsistencyReport,
    ) -> Result<()> {
        for wire in store.face(face)?.wires() {
            let data = store.wire(wire)?;
            let mut ends = Vec::with_capacity(data.edges.len());
            for oe in &data.edges {
                let e = store.edge(oe.edge)?;
                ends.push(if oe.forward { (e.start, e.end) } else { (e.end, e.start) });
            }
            let connected = !ends.is_empty()
                && ends
                    .iter()
                    .enumerate()
                    .all(|(i, &(_, to))| ends[(i + 1) % ends.len()].0 == to);
            if !data.is_closed || !connected {
                report.issues.push(ConsistencyIssue::OpenWire { face });
                return Ok(());
            }
        }

        let Ok(uv) = store.face_uv_loop(face) else {
            // Missing pcurves are reported per edge.
            return Ok(());
        };
        let n = uv.len().saturating_sub(1);
        let margin = self.tolerance;
        'outer: for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if segments_cross_2d(&uv[i], &uv[i + 1], &uv[j], &uv[j + 1], margin) {
                    report.issues.push(ConsistencyIssue::SelfIntersectingLoop { face });
                    break 'outer;
                }
            }
        }
        Ok(())
    }
}
