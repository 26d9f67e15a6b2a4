use std::f64::consts::PI;

use crate::error::Result;
use crate::geometry::curve::{Curve, Line};
use crate::geometry::surface::{Cylinder, Plane, Sphere, Surface};
use crate::math::intersect_3d::quadratic_roots;
use crate::math::{Point3, TOLERANCE};
use crate::operations::parametrics::ParametricsConfig;
use crate::topology::{EdgeCurve, FaceSurface, TrimmedCurve};

/// Samples per scan of the signed distance along a curve.
const SCAN_SAMPLES: usize = 256;

/// Bisection steps refining one sign change.
const BISECTION_STEPS: usize = 80;

/// A single intersection point between a curve and a surface.
#[derive(Debug, Clone, Copy)]
pub struct CurveSurfaceHit {
    /// Parameter on the curve.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
}

/// Intersects the extension of `curve` with `surface`.
///
/// The search is not limited to the current trim: lines are infinite, arcs
/// are searched over their full circle and polylines half their length
/// beyond each end. Lines against planes, cylinders and spheres are solved
/// analytically; everything else scans the surface's signed distance along
/// the curve and refines each sign change by bisection. Hits are sorted by
/// curve parameter.
///
/// # Errors
///
/// Returns an error if curve evaluation fails.
pub fn intersect_curve_surface(
    curve: &TrimmedCurve,
    surface: &FaceSurface,
    cfg: &ParametricsConfig,
) -> Result<Vec<CurveSurfaceHit>> {
    if let EdgeCurve::Line(line) = &curve.curve {
        match surface {
            FaceSurface::Plane(plane) => return intersect_line_plane(line, plane),
            FaceSurface::Cylinder(cyl) => return intersect_line_cylinder(line, cyl),
            FaceSurface::Sphere(sph) => return intersect_line_sphere(line, sph),
            FaceSurface::Torus(_) => {}
        }
    }

    let (lo, hi) = search_range(curve);
    scan_signed_distance(&curve.curve, surface, lo, hi, cfg)
}

/// Parameter interval searched for intersections.
fn search_range(curve: &TrimmedCurve) -> (f64, f64) {
    let (a, b) = (curve.t_start.min(curve.t_end), curve.t_start.max(curve.t_end));
    match &curve.curve {
        EdgeCurve::Arc(_) => {
            let mid = 0.5 * (a + b);
            (mid - PI, mid + PI)
        }
        EdgeCurve::Line(_) | EdgeCurve::Polyline(_) | EdgeCurve::DualSurface(_) => {
            let ext = 0.5 * (b - a).max(1.0);
            (a - ext, b + ext)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn scan_signed_distance(
    curve: &EdgeCurve,
    surface: &FaceSurface,
    lo: f64,
    hi: f64,
    cfg: &ParametricsConfig,
) -> Result<Vec<CurveSurfaceHit>> {
    let f = |t: f64| -> Result<f64> { Ok(surface.signed_distance(&curve.evaluate(t)?)) };
    let step = (hi - lo) / SCAN_SAMPLES as f64;

    let mut hits: Vec<CurveSurfaceHit> = Vec::new();
    let mut t0 = lo;
    let mut f0 = f(t0)?;
    for i in 1..=SCAN_SAMPLES {
        let t1 = lo + step * i as f64;
        let f1 = f(t1)?;
        let root = if f0.abs() <= cfg.newton_tolerance {
            Some(t0)
        } else if f0 * f1 < 0.0 {
            Some(bisect(&f, t0, f0, t1, cfg.newton_tolerance)?)
        } else {
            None
        };
        if let Some(t) = root {
            let point = curve.evaluate(t)?;
            if hits.last().is_none_or(|h| (h.point - point).norm() > cfg.point_tolerance) {
                hits.push(CurveSurfaceHit { t, point });
            }
        }
        t0 = t1;
        f0 = f1;
    }
    Ok(hits)
}

fn bisect(
    f: &impl Fn(f64) -> Result<f64>,
    mut a: f64,
    mut fa: f64,
    mut b: f64,
    tol: f64,
) -> Result<f64> {
    for _ in 0..BISECTION_STEPS {
        let m = 0.5 * (a + b);
        let fm = f(m)?;
        if fm.abs() <= tol || (b - a).abs() <= TOLERANCE * TOLERANCE {
            return Ok(m);
        }
        if fa * fm < 0.0 {
            b = m;
        } else {
            a = m;
            fa = fm;
        }
    }
    Ok(0.5 * (a + b))
}

/// Line-Plane intersection: solve `(O + t*D - P0) . N = 0`.
fn intersect_line_plane(line: &Line, plane: &Plane) -> Result<Vec<CurveSurfaceHit>> {
    let dir = line.direction();
    let normal = plane.plane_normal();

    let denom = dir.dot(normal);
    if denom.abs() < TOLERANCE {
        return Ok(vec![]);
    }

    let t = (plane.origin() - line.origin()).dot(normal) / denom;
    Ok(vec![CurveSurfaceHit {
        t,
        point: line.evaluate(t)?,
    }])
}

/// Line-Cylinder intersection: reduce to 2D circle-line problem.
fn intersect_line_cylinder(line: &Line, cyl: &Cylinder) -> Result<Vec<CurveSurfaceHit>> {
    let axis = cyl.axis();
    let r = cyl.radius();

    let dp = line.origin() - cyl.center();
    let dp_perp = dp - axis * dp.dot(axis);
    let dir_perp = line.direction() - axis * line.direction().dot(axis);

    // Solve |dp_perp + t * dir_perp|^2 = r^2
    let a = dir_perp.dot(&dir_perp);
    let b = 2.0 * dp_perp.dot(&dir_perp);
    let c = dp_perp.dot(&dp_perp) - r * r;
    if a < TOLERANCE {
        return Ok(vec![]);
    }
    quadratic_hits(line, a, b, c)
}

/// Line-Sphere intersection: solve `|O + t*D - C|^2 = r^2`.
fn intersect_line_sphere(line: &Line, sph: &Sphere) -> Result<Vec<CurveSurfaceHit>> {
    let dir = line.direction();
    let dp = line.origin() - sph.center();
    let r = sph.radius();

    let a = dir.dot(dir);
    let b = 2.0 * dp.dot(dir);
    let c = dp.dot(&dp) - r * r;
    quadratic_hits(line, a, b, c)
}

fn quadratic_hits(line: &Line, a: f64, b: f64, c: f64) -> Result<Vec<CurveSurfaceHit>> {
    quadratic_roots(a, b, c)
        .into_iter()
        .map(|t| {
            Ok(CurveSurfaceHit {
                t,
                point: line.evaluate(t)?,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Arc;
    use crate::geometry::surface::Torus;
    use crate::math::Vector3;

    fn cfg() -> ParametricsConfig {
        ParametricsConfig::default()
    }

    fn vertical_segment(x: f64, y: f64) -> TrimmedCurve {
        TrimmedCurve::segment(Point3::new(x, y, 0.0), Point3::new(x, y, 1.0)).unwrap()
    }

    #[test]
    fn line_plane_beyond_trim() {
        let plane = Plane::from_normal(Point3::new(0.0, 0.0, 3.0), Vector3::z()).unwrap();
        let plane = FaceSurface::Plane(plane);
        let hits = intersect_curve_surface(&vertical_segment(1.0, 2.0), &plane, &cfg()).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn line_cylinder_two_hits() {
        let cyl = FaceSurface::Cylinder(
            Cylinder::new(Point3::origin(), 2.0, Vector3::z(), Vector3::x()).unwrap(),
        );
        let seg =
            TrimmedCurve::segment(Point3::new(-5.0, 1.0, 0.0), Point3::new(5.0, 1.0, 0.0)).unwrap();
        let hits = intersect_curve_surface(&seg, &cyl, &cfg()).unwrap();
        assert_eq!(hits.len(), 2);
        let x = 3.0_f64.sqrt();
        assert!((hits[0].point - Point3::new(-x, 1.0, 0.0)).norm() < 1e-9);
        assert!((hits[1].point - Point3::new(x, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn line_parallel_to_cylinder_axis_misses() {
        let cyl = FaceSurface::Cylinder(
            Cylinder::new(Point3::origin(), 2.0, Vector3::z(), Vector3::x()).unwrap(),
        );
        let hits = intersect_curve_surface(&vertical_segment(2.0, 0.0), &cyl, &cfg()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn arc_against_plane_uses_full_circle() {
        let arc = Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 0.0, 0.5).unwrap();
        let curve = TrimmedCurve::new(EdgeCurve::Arc(arc), 0.0, 0.5);
        // Plane y = 0.5 cuts the circle at 30 and 150 degrees; both lie outside the trim.
        let plane = Plane::from_normal(Point3::new(0.0, 0.5, 0.0), Vector3::y()).unwrap();
        let plane = FaceSurface::Plane(plane);
        let hits = intersect_curve_surface(&curve, &plane, &cfg()).unwrap();
        assert_eq!(hits.len(), 2);
        for h in &hits {
            assert!((h.point.y - 0.5).abs() < 1e-9);
            assert!((h.point.coords.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn line_torus_by_scanning() {
        let torus = FaceSurface::Torus(
            Torus::new(Point3::origin(), 3.0, 1.0, Vector3::z(), Vector3::x()).unwrap(),
        );
        let seg =
            TrimmedCurve::segment(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0)).unwrap();
        let hits = intersect_curve_surface(&seg, &torus, &cfg()).unwrap();
        let xs: Vec<f64> = hits.iter().map(|h| h.point.x).filter(|x| *x > 0.0).collect();
        assert_eq!(xs.len(), 2);
        assert!((xs[0] - 2.0).abs() < 1e-8);
        assert!((xs[1] - 4.0).abs() < 1e-8);
    }
}
