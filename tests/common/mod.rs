#![allow(dead_code)]

use brepedit::geometry::{Arc, Plane, Sphere};
use brepedit::math::{Point2, Point3, Vector3};
use brepedit::operations::creation::{
    ExtrudeProfile, MakeBox, MakeCylinder, ProfileSegment, ShellBuilder,
};
use brepedit::topology::{
    EdgeCurve, FaceId, FaceSurface, OrientedEdge, ShellId, SolidData, SolidId, TopologyStore,
    TrimmedCurve,
};
use tracing_subscriber::EnvFilter;

/// Routes library logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn outer_shell(store: &TopologyStore, solid: SolidId) -> ShellId {
    store.solid(solid).unwrap().outer_shell
}

pub fn unit_box(store: &mut TopologyStore) -> (SolidId, ShellId) {
    let solid = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
        .execute(store)
        .unwrap();
    (solid, outer_shell(store, solid))
}

/// Cylinder of radius 2 and height 1, its side split into two halves.
pub fn split_cylinder(store: &mut TopologyStore) -> (SolidId, ShellId) {
    let solid = MakeCylinder::new(Point3::origin(), 2.0, 1.0)
        .execute(store)
        .unwrap();
    (solid, outer_shell(store, solid))
}

/// A 1 x 2 block whose +X side is a half cylinder of radius 1, so both
/// flats at `y = +-1` run tangentially into the cylinder.
pub fn d_shape(store: &mut TopologyStore) -> (SolidId, ShellId) {
    let solid = ExtrudeProfile::new(
        Point2::new(0.0, -1.0),
        vec![
            ProfileSegment::Arc {
                center: Point2::origin(),
                to: Point2::new(0.0, 1.0),
                ccw: true,
            },
            ProfileSegment::Line {
                to: Point2::new(-1.0, 1.0),
            },
            ProfileSegment::Line {
                to: Point2::new(-1.0, -1.0),
            },
            ProfileSegment::Line {
                to: Point2::new(0.0, -1.0),
            },
        ],
        1.0,
    )
    .execute(store)
    .unwrap();
    (solid, outer_shell(store, solid))
}

/// A shaft of radius 2 with a flat milled at `x = 1`.
pub fn d_cut_shaft(store: &mut TopologyStore) -> (SolidId, ShellId) {
    let (x, y) = (1.0, 3.0_f64.sqrt());
    let solid = ExtrudeProfile::new(
        Point2::new(x, -y),
        vec![
            ProfileSegment::Line {
                to: Point2::new(x, y),
            },
            ProfileSegment::Arc {
                center: Point2::origin(),
                to: Point2::new(x, -y),
                ccw: true,
            },
        ],
        1.0,
    )
    .execute(store)
    .unwrap();
    (solid, outer_shell(store, solid))
}

/// The corner of a ball of radius 2 about the origin cut off by the planes
/// `x = 0.5`, `y = 0.5` and `z = 0.5`: three flat faces and one spherical
/// patch bounded by three circular arcs.
pub fn ball_corner(store: &mut TopologyStore) -> (SolidId, ShellId) {
    let (r, a) = (2.0_f64, 0.5_f64);
    let s = (r * r - 2.0 * a * a).sqrt();
    let rho = (r * r - a * a).sqrt();
    let (t0, t1) = (a.atan2(s), s.atan2(a));

    let mut b = ShellBuilder::new(store);
    let c = Point3::new(a, a, a);
    let corner = b.add_vertex(c);
    let vx = b.add_vertex(Point3::new(s, a, a));
    let vy = b.add_vertex(Point3::new(a, s, a));
    let vz = b.add_vertex(Point3::new(a, a, s));

    let line = |p: Point3, q: Point3| TrimmedCurve::segment(p, q).unwrap();
    let to_x = b.add_edge(corner, vx, line(c, Point3::new(s, a, a))).unwrap();
    let to_y = b.add_edge(corner, vy, line(c, Point3::new(a, s, a))).unwrap();
    let to_z = b.add_edge(corner, vz, line(c, Point3::new(a, a, s))).unwrap();

    // each arc starts at the vertex nearer its reference direction
    let arc = |center: Point3, normal: Vector3, ref_dir: Vector3| {
        let arc = Arc::new(center, rho, normal, ref_dir, t0, t1).unwrap();
        TrimmedCurve::whole(EdgeCurve::Arc(arc))
    };
    let on_z = arc(Point3::new(0.0, 0.0, a), Vector3::z(), Vector3::x());
    let on_x = arc(Point3::new(a, 0.0, 0.0), Vector3::x(), Vector3::y());
    let on_y = arc(Point3::new(0.0, a, 0.0), Vector3::y(), Vector3::z());
    let on_z = b.add_edge(vx, vy, on_z).unwrap();
    let on_x = b.add_edge(vy, vz, on_x).unwrap();
    let on_y = b.add_edge(vz, vx, on_y).unwrap();

    let fwd = |e| OrientedEdge::new(e, true);
    let rev = |e| OrientedEdge::new(e, false);
    let flat = |normal: Vector3| FaceSurface::Plane(Plane::from_normal(c, normal).unwrap());
    b.add_face(flat(-Vector3::x()), true, vec![fwd(to_z), rev(on_x), rev(to_y)]).unwrap();
    b.add_face(flat(-Vector3::y()), true, vec![fwd(to_x), rev(on_y), rev(to_z)]).unwrap();
    b.add_face(flat(-Vector3::z()), true, vec![fwd(to_y), rev(on_z), rev(to_x)]).unwrap();
    let ball = Sphere::new(Point3::origin(), r, Vector3::z(), Vector3::x()).unwrap();
    b.add_face(FaceSurface::Sphere(ball), true, vec![fwd(on_z), fwd(on_x), fwd(on_y)]).unwrap();

    let shell = b.build(true).unwrap();
    (store.add_solid(SolidData::new(shell)), shell)
}

pub fn faces_where(
    store: &TopologyStore,
    shell: ShellId,
    pred: impl Fn(&FaceSurface) -> bool,
) -> Vec<FaceId> {
    store
        .shell(shell)
        .unwrap()
        .faces
        .iter()
        .copied()
        .filter(|&f| pred(&store.face(f).unwrap().surface))
        .collect()
}

pub fn sphere_faces(store: &TopologyStore, shell: ShellId) -> Vec<FaceId> {
    faces_where(store, shell, |s| matches!(s, FaceSurface::Sphere(_)))
}

pub fn cylinder_faces(store: &TopologyStore, shell: ShellId) -> Vec<FaceId> {
    faces_where(store, shell, |s| matches!(s, FaceSurface::Cylinder(_)))
}

/// The planar face with outward normal `normal` through `point`.
pub fn plane_face(store: &TopologyStore, shell: ShellId, normal: Vector3, point: Point3) -> FaceId {
    let found = faces_where(store, shell, |s| match s {
        FaceSurface::Plane(p) => {
            p.plane_normal().dot(&normal).abs() > 0.999
                && (point - p.origin()).dot(p.plane_normal()).abs() < 1e-9
        }
        _ => false,
    });
    assert_eq!(found.len(), 1, "expected exactly one matching plane");
    found[0]
}

pub fn vertex_points(store: &TopologyStore, shell: ShellId) -> Vec<Point3> {
    store
        .shell_vertices(shell)
        .unwrap()
        .into_iter()
        .map(|v| store.vertex(v).unwrap().point)
        .collect()
}

/// Both sets contain the same points up to `tol`, in any order.
pub fn assert_same_points(a: &[Point3], b: &[Point3], tol: f64) {
    assert_eq!(a.len(), b.len());
    for p in a {
        assert!(
            b.iter().any(|q| (p - q).norm() <= tol),
            "point {p} has no counterpart"
        );
    }
}
