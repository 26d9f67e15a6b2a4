use crate::error::{OperationError, Result};
use crate::math::{Point2, Point3, TOLERANCE};
use crate::topology::{SolidId, TopologyStore};

use super::{ExtrudeProfile, ProfileSegment};

/// Creates a cylinder solid standing on `center` along +Z.
///
/// The lateral surface is split into two half faces by two seam edges, so
/// the two faces form one co-surface group.
pub struct MakeCylinder {
    center: Point3,
    radius: f64,
    height: f64,
}

impl MakeCylinder {
    /// Creates a new `MakeCylinder` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64, height: f64) -> Self {
        Self {
            center,
            radius,
            height,
        }
    }

    /// Executes the operation, creating the cylinder in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is not positive.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.radius < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder radius must be positive".into()).into(),
            );
        }
        if self.height < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder height must be positive".into()).into(),
            );
        }
        let c = Point2::new(self.center.x, self.center.y);
        let east = Point2::new(c.x + self.radius, c.y);
        let west = Point2::new(c.x - self.radius, c.y);
        ExtrudeProfile::new(
            east,
            vec![
                ProfileSegment::Arc {
                    center: c,
                    to: west,
                    ccw: true,
                },
                ProfileSegment::Arc {
                    center: c,
                    to: east,
                    ccw: true,
                },
            ],
            self.height,
        )
        .between(self.center.z, self.center.z + self.height)
        .execute(store)
    }
}
