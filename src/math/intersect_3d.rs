use super::{Point3, Vector3, TOLERANCE};

/// Relationship between two planes given in point-normal form.
#[derive(Debug)]
pub enum PlanePairRelation {
    /// Planes intersect along a line.
    IntersectionLine {
        origin: Point3,
        direction: Vector3,
    },
    /// Planes are parallel but not coincident.
    Parallel { distance: f64 },
    /// Planes are the same (coincident).
    Coincident,
}

/// Computes the intersection of the planes `(oa, na)` and `(ob, nb)`.
///
/// Normals must be unit length. The returned `direction` is `na x nb`
/// normalized; `origin` is the point of the line closest to `oa`.
#[must_use]
pub fn plane_plane_intersect(
    oa: &Point3,
    na: &Vector3,
    ob: &Point3,
    nb: &Vector3,
) -> PlanePairRelation {
    let dir = na.cross(nb);
    let dir_len = dir.norm();

    if dir_len < TOLERANCE {
        let dist = (ob - oa).dot(na).abs();
        if dist < TOLERANCE {
            return PlanePairRelation::Coincident;
        }
        return PlanePairRelation::Parallel { distance: dist };
    }

    // p = oa + s * na + t * nb satisfies both plane equations.
    let d2 = nb.dot(&(ob - oa));
    let dot_nn = na.dot(nb);
    let denom = 1.0 - dot_nn * dot_nn;
    let s = -dot_nn * d2 / denom;
    let t = d2 / denom;

    PlanePairRelation::IntersectionLine {
        origin: oa + na * s + nb * t,
        direction: dir / dir_len,
    }
}

/// Real roots of `a*t^2 + b*t + c = 0`, ascending, with the tangent double root reported once.
#[must_use]
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE {
        if b.abs() < TOLERANCE {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < -TOLERANCE {
        return Vec::new();
    }
    let sq = disc.max(0.0).sqrt();
    let t1 = (-b - sq) / (2.0 * a);
    let t2 = (-b + sq) / (2.0 * a);
    let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    if hi - lo < TOLERANCE {
        vec![lo]
    } else {
        vec![lo, hi]
    }
}
