use crate::error::Result;
use crate::geometry::surface::Surface;
use crate::topology::{FaceId, TopologyStore};

/// Computes the area of a face.
///
/// The area `∬ |Su x Sv| du dv` over the face's parameter-space loop is
/// turned into the boundary integral `∮ u·f(v) dv` (Green's theorem), where
/// `f` is the surface's area element, and evaluated with the midpoint rule
/// on the pcurve polygon. The result is cached on the face until
/// [`TopologyStore::force_recalc`] clears it.
pub struct FaceArea {
    face: FaceId,
}

impl FaceArea {
    /// Creates a new `FaceArea` query.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Returns the cached area or computes and caches it.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its pcurves is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<f64> {
        if let Some(area) = store.face(self.face)?.cached_area {
            return Ok(area);
        }
        let area = self.compute(store)?;
        store.face_mut(self.face)?.cached_area = Some(area);
        Ok(area)
    }

    /// Computes the area without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its pcurves is missing.
    pub fn compute(&self, store: &TopologyStore) -> Result<f64> {
        let surface = &store.face(self.face)?.surface;
        let uv = store.face_uv_loop(self.face)?;
        let mut sum = 0.0;
        for w in uv.windows(2) {
            let (a, b) = (w[0], w[1]);
            let u_mid = 0.5 * (a.x + b.x);
            let v_mid = 0.5 * (a.y + b.y);
            sum += u_mid * surface.area_element(v_mid) * (b.y - a.y);
        }
        Ok(sum.abs())
    }
}
