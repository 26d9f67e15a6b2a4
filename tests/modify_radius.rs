#![allow(clippy::unwrap_used)]

mod common;

use approx::assert_abs_diff_eq;
use brepedit::error::{EditError, OperationError};
use brepedit::math::{Point3, Vector3};
use brepedit::operations::query::CheckConsistency;
use brepedit::topology::{FaceSurface, ShellId, TopologyStore};
use brepedit::{BrepEditError, Parametrics, RadiusAction};

use common::*;

fn radial_distances(store: &TopologyStore, shell: ShellId) -> Vec<f64> {
    vertex_points(store, shell)
        .into_iter()
        .map(|p| p.coords.xy().norm())
        .collect()
}

#[test]
fn either_half_of_a_split_cylinder_resizes_both() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (_, shell) = split_cylinder(&mut store);
    let halves = cylinder_faces(&store, shell);
    assert_eq!(halves.len(), 2);

    for half in halves {
        let mut session = Parametrics::new(&mut store, shell).unwrap();
        session.modify_radius(half, 3.0).unwrap();
        let outcome = session.result().unwrap();

        for f in cylinder_faces(&store, outcome.shell) {
            assert_eq!(store.face(f).unwrap().surface.radius(), Some(3.0));
        }
        for r in radial_distances(&store, outcome.shell) {
            assert_abs_diff_eq!(r, 3.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn radius_round_trip_restores_the_cylinder() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (_, shell) = split_cylinder(&mut store);
    let before = vertex_points(&store, shell);

    let half = cylinder_faces(&store, shell)[0];
    let mut session = Parametrics::new(&mut store, shell).unwrap();
    session.modify_radius(half, 3.0).unwrap();
    let grown = session.result().unwrap().shell;

    let half = cylinder_faces(&store, grown)[0];
    let mut session = Parametrics::new(&mut store, grown).unwrap();
    session.modify_radius(half, 2.0).unwrap();
    let restored = session.result().unwrap().shell;

    assert_same_points(&before, &vertex_points(&store, restored), 1e-9);
}

#[test]
fn diameter_is_twice_the_radius() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (_, shell) = split_cylinder(&mut store);
    let half = cylinder_faces(&store, shell)[0];

    let mut session = Parametrics::new(&mut store, shell).unwrap();
    session.modify_radius(half, 2.5).unwrap();
    let by_radius = session.result().unwrap().shell;

    let mut session = Parametrics::new(&mut store, shell).unwrap();
    session.modify_diameter(half, 5.0).unwrap();
    let by_diameter = session.result().unwrap().shell;

    assert_same_points(
        &vertex_points(&store, by_radius),
        &vertex_points(&store, by_diameter),
        1e-12,
    );
}

#[test]
fn shaft_too_thin_for_its_flat_is_rejected() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (_, shell) = d_cut_shaft(&mut store);
    let round = cylinder_faces(&store, shell)[0];
    let counts = store.entity_counts();

    {
        let mut session = Parametrics::new(&mut store, shell).unwrap();
        session.modify_radius(round, 0.9).unwrap();
        let err = session.result().unwrap_err();
        assert!(matches!(err, BrepEditError::Edit(EditError::Infeasible(_))));
    }
    assert_eq!(store.entity_counts(), counts);

    let mut session = Parametrics::new(&mut store, shell).unwrap();
    session.modify_radius(round, 2.5).unwrap();
    let outcome = session.result().unwrap();
    let report = CheckConsistency::new(outcome.shell).execute(&store).unwrap();
    assert!(report.is_consistent(), "{:?}", report.issues);

    // the flat stays at x = 1 and now meets the larger circle
    let y = (2.5_f64 * 2.5 - 1.0).sqrt();
    for p in vertex_points(&store, outcome.shell) {
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y.abs(), y, epsilon = 1e-9);
    }
}

#[test]
fn unsuitable_targets_are_rejected() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (_, boxed) = unit_box(&mut store);
    let (_, d) = d_shape(&mut store);
    let side = plane_face(&store, boxed, Vector3::x(), Point3::new(1.0, 0.0, 0.0));
    let rounded = cylinder_faces(&store, d)[0];

    let mut session = Parametrics::new(&mut store, boxed).unwrap();
    let err = session.modify_radius(side, 1.0).unwrap_err();
    assert!(matches!(err, BrepEditError::Edit(EditError::UnsupportedTarget(_))));
    drop(session);

    let mut session = Parametrics::new(&mut store, d).unwrap();
    let err = session.modify_radius(rounded, 2.0).unwrap_err();
    assert!(matches!(err, BrepEditError::Edit(EditError::UnresolvedTopology(_))));
    let err = session.modify_radius(rounded, 0.0).unwrap_err();
    assert!(matches!(err, BrepEditError::Operation(OperationError::InvalidInput(_))));
}

#[test]
fn committed_radius_change_replaces_the_shaft() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (solid, shell) = d_cut_shaft(&mut store);
    let round = cylinder_faces(&store, shell)[0];

    let mut action = RadiusAction::new(shell, round);
    assert_abs_diff_eq!(action.current_diameter(&store).unwrap(), 4.0, epsilon = 1e-12);
    assert!(!action.set_radius(&mut store, 0.5).unwrap());
    assert!(action.set_diameter(&mut store, 6.0).unwrap());
    let committed = action.commit(&mut store).unwrap();

    assert_eq!(outer_shell(&store, solid), committed);
    assert!(store.shell(shell).is_err());
    let round = cylinder_faces(&store, committed)[0];
    assert_eq!(store.face(round).unwrap().surface.radius(), Some(3.0));
    let report = CheckConsistency::new(committed).execute(&store).unwrap();
    assert!(report.is_consistent(), "{:?}", report.issues);
}

#[test]
fn ball_corner_grows_about_its_center() {
    init_tracing();
    let mut store = TopologyStore::new();
    let (_, shell) = ball_corner(&mut store);
    let report = CheckConsistency::new(shell).execute(&store).unwrap();
    assert!(report.is_consistent(), "{:?}", report.issues);
    let patch = sphere_faces(&store, shell)[0];

    let mut session = Parametrics::new(&mut store, shell).unwrap();
    session.modify_radius(patch, 2.5).unwrap();
    let outcome = session.result().unwrap();

    let grown = sphere_faces(&store, outcome.shell);
    assert_eq!(grown.len(), 1);
    let FaceSurface::Sphere(ball) = &store.face(grown[0]).unwrap().surface else {
        unreachable!()
    };
    assert_abs_diff_eq!(ball.radius(), 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(*ball.center(), Point3::origin(), epsilon = 1e-12);

    let s = (2.5_f64 * 2.5 - 0.5).sqrt();
    let expected = [
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(s, 0.5, 0.5),
        Point3::new(0.5, s, 0.5),
        Point3::new(0.5, 0.5, s),
    ];
    assert_same_points(&expected, &vertex_points(&store, outcome.shell), 1e-9);

    let report = CheckConsistency::new(outcome.shell).execute(&store).unwrap();
    assert!(report.is_consistent(), "{:?}", report.issues);
}
