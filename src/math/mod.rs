pub mod intersect_2d;
pub mod intersect_3d;
pub mod polygon_2d;
pub mod solve;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix type.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns a unit vector perpendicular to the given unit vector.
#[must_use]
pub fn perpendicular_dir(axis: &Vector3) -> Vector3 {
    let candidate = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let perp = axis.cross(&candidate);
    perp / perp.norm()
}

/// Returns `true` if the two unit vectors are parallel or anti-parallel within `tol`.
#[must_use]
pub fn is_parallel(a: &Vector3, b: &Vector3, tol: f64) -> bool {
    a.cross(b).norm() <= tol
}

/// Distance from `point` to the infinite line through `origin` with unit direction `dir`.
#[must_use]
pub fn distance_to_line(point: &Point3, origin: &Point3, dir: &Vector3) -> f64 {
    let dp = point - origin;
    (dp - dir * dp.dot(dir)).norm()
}
