mod area;
mod consistency;
mod curve_surface_intersect;
mod intersect;

pub use area::FaceArea;
pub use consistency::{CheckConsistency, ConsistencyIssue, ConsistencyReport};
pub use curve_surface_intersect::{intersect_curve_surface, CurveSurfaceHit};
pub use intersect::{intersect_surfaces, newton_intersect};
