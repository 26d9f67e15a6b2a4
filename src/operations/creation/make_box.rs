use crate::error::{OperationError, Result};
use crate::math::{Point2, Point3};
use crate::topology::{SolidId, TopologyStore};

use super::{ExtrudeProfile, ProfileSegment};

/// Creates an axis-aligned box solid from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// The box is the extrusion of its bottom rectangle, so it has six planar
    /// faces, twelve edges and eight vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the corners do not span a positive volume.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        if hi.x <= lo.x || hi.y <= lo.y || hi.z <= lo.z {
            return Err(OperationError::InvalidInput(
                "max corner must exceed min corner on every axis".into(),
            )
            .into());
        }
        ExtrudeProfile::new(
            Point2::new(lo.x, lo.y),
            vec![
                ProfileSegment::Line {
                    to: Point2::new(hi.x, lo.y),
                },
                ProfileSegment::Line {
                    to: Point2::new(hi.x, hi.y),
                },
                ProfileSegment::Line {
                    to: Point2::new(lo.x, hi.y),
                },
                ProfileSegment::Line {
                    to: Point2::new(lo.x, lo.y),
                },
            ],
            hi.z - lo.z,
        )
        .between(lo.z, hi.z)
        .execute(store)
    }
}
