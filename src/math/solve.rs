//! Small dense solves used by the Newton iterations on implicit surfaces.

use super::{Matrix3, Vector3, TOLERANCE};

/// Solves `m * x = rhs` for a 3x3 system.
///
/// Returns `None` when the matrix is (numerically) singular.
#[must_use]
pub fn solve_3x3(m: &Matrix3, rhs: &Vector3) -> Option<Vector3> {
    if m.determinant().abs() < TOLERANCE * TOLERANCE {
        return None;
    }
    m.lu().solve(rhs)
}

/// Minimum-norm step `d` with `g1 . d = -f1` and `g2 . d = -f2`.
///
/// This is the Gauss-Newton correction that pulls a point onto the
/// intersection of two implicit surfaces with gradients `g1`, `g2` and
/// residuals `f1`, `f2`. Returns `None` when the gradients are parallel.
#[must_use]
pub fn min_norm_step_2(g1: &Vector3, f1: f64, g2: &Vector3, f2: f64) -> Option<Vector3> {
    let a = g1.dot(g1);
    let b = g1.dot(g2);
    let c = g2.dot(g2);
    let det = a * c - b * b;
    if det.abs() < TOLERANCE * TOLERANCE * a.max(c).max(1.0) {
        return None;
    }
    let l1 = (c * f1 - b * f2) / det;
    let l2 = (a * f2 - b * f1) / det;
    Some(-(g1 * l1 + g2 * l2))
}
