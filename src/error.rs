use thiserror::Error;

/// Top-level error type for the B-Rep editing kernel.
#[derive(Debug, Error)]
pub enum BrepEditError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to construction operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Outcomes of a parametric edit that did not produce a new shell.
///
/// None of these are fatal: the source shell is always left untouched and the
/// caller may retry with other parameters.
#[derive(Debug, Error)]
pub enum EditError {
    /// The requested edit does not apply to the given face.
    #[error("unsupported edit target: {0}")]
    UnsupportedTarget(String),

    /// The topology around the face needs a reshaping strategy that is not implemented.
    #[error("unresolved topology case: {0}")]
    UnresolvedTopology(String),

    /// A vertex or edge could not be recomputed on the edited surfaces.
    #[error("edit is geometrically infeasible: {0}")]
    Infeasible(String),

    /// The recomputed shell failed the consistency check.
    #[error("edited shell is inconsistent: {0}")]
    Inconsistent(String),
}

/// Convenience type alias for results using [`BrepEditError`].
pub type Result<T> = std::result::Result<T, BrepEditError>;
