use super::{Point2, TOLERANCE};

/// Bounded segment-segment intersection in parameter space.
///
/// Returns `(t, u)` with both in `[0, 1]` when segment `a0-a1` meets
/// segment `b0-b1`. Parallel segments never report a hit.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = (d.x * db.y - d.y * db.x) / cross;
    let u = (d.x * da.y - d.y * da.x) / cross;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` if the segments cross at a point interior to both.
///
/// Touching at (or within `margin` of) an endpoint does not count, so
/// consecutive segments of a polyline never report a crossing.
#[must_use]
pub fn segments_cross_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2, margin: f64) -> bool {
    segment_segment_intersect_2d(a0, a1, b0, b1)
        .is_some_and(|(t, u)| t > margin && t < 1.0 - margin && u > margin && u < 1.0 - margin)
}
