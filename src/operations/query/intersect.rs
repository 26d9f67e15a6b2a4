use tracing::debug;

use crate::error::Result;
use crate::geometry::curve::{InterpolatedCurve, Line};
use crate::geometry::surface::Surface;
use crate::math::intersect_3d::{plane_plane_intersect, PlanePairRelation};
use crate::math::solve::{min_norm_step_2, solve_3x3};
use crate::math::{Matrix3, Point3, Vector3, TOLERANCE};
use crate::operations::parametrics::ParametricsConfig;
use crate::topology::{EdgeCurve, FaceSurface, TrimmedCurve};

/// Intersection curve of two surfaces running from `start` to `end`.
///
/// Two planes give their exact intersection line. Any other pair is traced
/// by predictor-corrector marching from `start`: each step follows the
/// cross product of the surface gradients, oriented along the previous step
/// (the first step along `direction_hint`), and is pulled back onto both
/// surfaces by Gauss-Newton. The march stops once it is within one and a
/// half steps of `end` while heading towards it, and snaps onto `end`.
///
/// Returns `Ok(None)` when no curve is found: parallel planes, tangent
/// surfaces, a diverging corrector, or more than `march_max_points` points.
///
/// # Errors
///
/// Returns an error if building the curve geometry fails.
pub fn intersect_surfaces(
    a: &FaceSurface,
    b: &FaceSurface,
    start: &Point3,
    end: &Point3,
    direction_hint: &Vector3,
    step: f64,
    cfg: &ParametricsConfig,
) -> Result<Option<TrimmedCurve>> {
    if (end - start).norm() < cfg.point_tolerance {
        return Ok(None);
    }

    if let (FaceSurface::Plane(pa), FaceSurface::Plane(pb)) = (a, b) {
        let relation =
            plane_plane_intersect(pa.origin(), pa.plane_normal(), pb.origin(), pb.plane_normal());
        let PlanePairRelation::IntersectionLine { origin, direction } = relation else {
            return Ok(None);
        };
        let direction = if direction.dot(&(end - start)) < 0.0 {
            -direction
        } else {
            direction
        };
        let line = Line::new(origin, direction)?;
        let t0 = (start - origin).dot(&direction);
        let t1 = (end - origin).dot(&direction);
        return Ok(Some(TrimmedCurve::new(EdgeCurve::Line(line), t0, t1)));
    }

    let Some(points) = march(a, b, start, end, direction_hint, step, cfg) else {
        return Ok(None);
    };
    let curve = InterpolatedCurve::new(points)?;
    Ok(Some(TrimmedCurve::whole(EdgeCurve::DualSurface(curve))))
}

fn march(
    a: &FaceSurface,
    b: &FaceSurface,
    start: &Point3,
    end: &Point3,
    direction_hint: &Vector3,
    step: f64,
    cfg: &ParametricsConfig,
) -> Option<Vec<Point3>> {
    if step <= TOLERANCE {
        return None;
    }
    let mut heading = if direction_hint.norm() > TOLERANCE {
        direction_hint.normalize()
    } else {
        (end - start).normalize()
    };
    let mut points = vec![*start];
    let mut p = *start;

    loop {
        let tangent = a.gradient(&p).cross(&b.gradient(&p));
        let len = tangent.norm();
        if len < TOLERANCE {
            debug!(?p, "marching stopped: surfaces are tangent");
            return None;
        }
        let mut tangent = tangent / len;
        if tangent.dot(&heading) < 0.0 {
            tangent = -tangent;
        }

        let to_end = end - p;
        if to_end.norm() <= 1.5 * step && tangent.dot(&to_end) > 0.0 {
            points.push(*end);
            return Some(points);
        }
        if points.len() >= cfg.march_max_points {
            debug!(points = points.len(), "marching stopped: point bound reached");
            return None;
        }

        let q = correct(a, b, p + tangent * step, cfg)?;
        if (q - p).norm() < 0.1 * step {
            return None;
        }
        heading = tangent;
        points.push(q);
        p = q;
    }
}

/// Pulls `q` onto both surfaces.
fn correct(
    a: &FaceSurface,
    b: &FaceSurface,
    mut q: Point3,
    cfg: &ParametricsConfig,
) -> Option<Point3> {
    for _ in 0..cfg.newton_max_iterations {
        let (fa, fb) = (a.signed_distance(&q), b.signed_distance(&q));
        if fa.abs().max(fb.abs()) <= cfg.newton_tolerance {
            return Some(q);
        }
        let d = min_norm_step_2(&a.gradient(&q), fa, &b.gradient(&q), fb)?;
        q += d;
        if d.norm() <= cfg.newton_tolerance {
            return Some(q);
        }
    }
    None
}

/// Common point of three surfaces by Newton iteration on their implicit
/// forms, seeded at `seed`.
///
/// Returns `None` if the Jacobian becomes singular or the iteration does
/// not end within `point_tolerance` of all three surfaces.
#[must_use]
pub fn newton_intersect(
    surfaces: [&FaceSurface; 3],
    seed: &Point3,
    cfg: &ParametricsConfig,
) -> Option<Point3> {
    let residual =
        |p: &Point3| Vector3::from_iterator(surfaces.iter().map(|s| s.signed_distance(p)));
    let mut p = *seed;
    for _ in 0..cfg.newton_max_iterations {
        let f = residual(&p);
        if f.amax() <= cfg.newton_tolerance {
            break;
        }
        let jacobian = Matrix3::from_rows(&[
            surfaces[0].gradient(&p).transpose(),
            surfaces[1].gradient(&p).transpose(),
            surfaces[2].gradient(&p).transpose(),
        ]);
        let d = solve_3x3(&jacobian, &-f)?;
        p += d;
        if d.norm() <= cfg.newton_tolerance {
            break;
        }
    }
    (residual(&p).amax() <= cfg.point_tolerance).then_some(p)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Cylinder, Plane, Sphere};
    use std::f64::consts::PI;

    fn cfg() -> ParametricsConfig {
        ParametricsConfig::default()
    }

    fn plane(origin: Point3, normal: Vector3) -> FaceSurface {
        FaceSurface::Plane(Plane::from_normal(origin, normal).unwrap())
    }

    fn z_cylinder(r: f64) -> FaceSurface {
        let cyl = Cylinder::new(Point3::origin(), r, Vector3::z(), Vector3::x()).unwrap();
        FaceSurface::Cylinder(cyl)
    }

    #[test]
    fn two_planes_give_a_line() {
        let a = plane(Point3::origin(), Vector3::z());
        let b = plane(Point3::new(1.0, 0.0, 0.0), Vector3::x());
        let start = Point3::new(1.0, 2.0, 0.0);
        let end = Point3::new(1.0, -1.0, 0.0);
        let c = intersect_surfaces(&a, &b, &start, &end, &Vector3::zeros(), 0.1, &cfg())
            .unwrap()
            .unwrap();
        assert!((c.start_point().unwrap() - start).norm() < 1e-12);
        assert!((c.end_point().unwrap() - end).norm() < 1e-12);
        assert!(c.t_end > c.t_start);
    }

    #[test]
    fn parallel_planes_have_no_curve() {
        let a = plane(Point3::origin(), Vector3::z());
        let b = plane(Point3::new(0.0, 0.0, 1.0), Vector3::z());
        let end = Point3::new(1.0, 0.0, 0.0);
        let r = intersect_surfaces(&a, &b, &Point3::origin(), &end, &Vector3::x(), 0.1, &cfg())
            .unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn marching_follows_the_hint_around_a_circle() {
        let cyl = z_cylinder(2.0);
        let floor = plane(Point3::origin(), -Vector3::z());
        let start = Point3::new(2.0, 0.0, 0.0);
        let end = Point3::new(-2.0, 0.0, 0.0);
        let step = PI * 2.0 / 32.0;
        let c = intersect_surfaces(&cyl, &floor, &start, &end, &Vector3::y(), step, &cfg())
            .unwrap()
            .unwrap();
        assert!(c.is_dual_surface());
        let pts = c.samples().unwrap();
        assert!((pts[0] - start).norm() < 1e-12);
        assert!((pts[pts.len() - 1] - end).norm() < 1e-12);
        for p in &pts {
            assert!(p.y >= -1e-9, "marched through the wrong half: {p}");
            assert!((p.coords.xy().norm() - 2.0).abs() < 1e-8);
            assert!(p.z.abs() < 1e-8);
        }
        assert!((c.length().unwrap() - 2.0 * PI).abs() < 0.05);
    }

    #[test]
    fn three_planes_meet_in_a_corner() {
        let a = plane(Point3::new(1.0, 0.0, 0.0), Vector3::x());
        let b = plane(Point3::new(0.0, 2.0, 0.0), Vector3::y());
        let c = plane(Point3::new(0.0, 0.0, 3.0), Vector3::z());
        let p = newton_intersect([&a, &b, &c], &Point3::origin(), &cfg()).unwrap();
        assert!((p - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn newton_on_curved_surfaces() {
        let sphere = FaceSurface::Sphere(
            Sphere::new(Point3::origin(), 2.0, Vector3::z(), Vector3::x()).unwrap(),
        );
        let a = plane(Point3::new(1.0, 0.0, 0.0), Vector3::x());
        let b = plane(Point3::origin(), Vector3::y());
        let p = newton_intersect([&sphere, &a, &b], &Point3::new(1.0, 0.0, 1.5), &cfg()).unwrap();
        assert!((p - Point3::new(1.0, 0.0, 3.0_f64.sqrt())).norm() < 1e-9);
    }

    #[test]
    fn newton_reports_missing_point() {
        let cyl = z_cylinder(0.9);
        let a = plane(Point3::new(1.0, 0.0, 0.0), Vector3::x());
        let floor = plane(Point3::origin(), -Vector3::z());
        let seed = Point3::new(1.0, 1.7, 0.0);
        assert!(newton_intersect([&cyl, &a, &floor], &seed, &cfg()).is_none());
    }
}
