/// Tolerances and iteration bounds of an edit session.
///
/// The defaults suit models in the unit-to-hundreds range; scale the
/// tolerances with the model size for very small or very large parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricsConfig {
    /// Maximum deviation for two surfaces to count as the same surface.
    pub same_geometry_tolerance: f64,
    /// Maximum `|n1 x n2|` of the face normals along a tangential edge.
    pub tangency_tolerance: f64,
    /// Maximum distance of vertices and curve points from their surfaces.
    pub point_tolerance: f64,
    /// Convergence threshold of the Newton solvers.
    pub newton_tolerance: f64,
    /// Iteration bound of the Newton solvers.
    pub newton_max_iterations: usize,
    /// Target number of segments of a marched intersection curve.
    pub march_segments: usize,
    /// Hard bound on the points of a marched intersection curve.
    pub march_max_points: usize,
}

impl Default for ParametricsConfig {
    fn default() -> Self {
        Self {
            same_geometry_tolerance: 1e-8,
            tangency_tolerance: 1e-6,
            point_tolerance: 1e-6,
            newton_tolerance: 1e-10,
            newton_max_iterations: 50,
            march_segments: 32,
            march_max_points: 4096,
        }
    }
}

impl ParametricsConfig {
    /// Sets the same-surface tolerance.
    #[must_use]
    pub fn with_same_geometry_tolerance(mut self, tol: f64) -> Self {
        self.same_geometry_tolerance = tol;
        self
    }

    /// Sets the tangency tolerance.
    #[must_use]
    pub fn with_tangency_tolerance(mut self, tol: f64) -> Self {
        self.tangency_tolerance = tol;
        self
    }

    /// Sets the point tolerance used by the consistency check.
    #[must_use]
    pub fn with_point_tolerance(mut self, tol: f64) -> Self {
        self.point_tolerance = tol;
        self
    }

    /// Sets the Newton convergence threshold and iteration bound.
    #[must_use]
    pub fn with_newton(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.newton_tolerance = tolerance;
        self.newton_max_iterations = max_iterations;
        self
    }

    /// Sets the marching resolution and point bound.
    #[must_use]
    pub fn with_marching(mut self, segments: usize, max_points: usize) -> Self {
        self.march_segments = segments;
        self.march_max_points = max_points;
        self
    }
}
