// tests/trackball.rs
//
// Gesture composition checks for the arcball trackball.

use approx::assert_abs_diff_eq;
use dld_volume::trackball::{arc_angle, incremental_rotation};
use dld_volume::{Quaternion, RotationMatrix, TrackballEngine, Vector3, Viewport};
use std::f32::consts::FRAC_PI_2;

fn assert_matrix_eq(actual: RotationMatrix, expected: RotationMatrix) {
    for (a, e) in actual.as_array().iter().zip(expected.as_array()) {
        assert_abs_diff_eq!(*a, *e, epsilon = 1e-5);
    }
}

fn drag(engine: &mut TrackballEngine, from: (f32, f32), to: (f32, f32)) {
    engine.begin_drag(from.0, from.1);
    engine.drag_to(to.0, to.1);
    engine.end_drag();
}

#[test]
fn two_gestures_equal_one_with_composed_increment() {
    let viewport = Viewport::new(512.0, 512.0);
    let first = ((256.0, 256.0), (330.0, 200.0));
    let second = ((100.0, 300.0), (180.0, 420.0));

    let mut engine = TrackballEngine::new(viewport);
    drag(&mut engine, first.0, first.1);
    drag(&mut engine, second.0, second.1);

    let increment = |(from, to): ((f32, f32), (f32, f32))| {
        incremental_rotation(viewport.project(from.0, from.1), viewport.project(to.0, to.1))
    };
    let composed = increment(second) * increment(first);

    let mut single = TrackballEngine::new(viewport);
    single.apply_increment(composed);

    assert_matrix_eq(engine.rotation_matrix(), single.rotation_matrix());
}

#[test]
fn moves_within_a_gesture_do_not_accumulate() {
    let viewport = Viewport::default();
    let mut engine = TrackballEngine::new(viewport);
    engine.begin_drag(256.0, 256.0);
    engine.drag_to(400.0, 100.0);
    engine.drag_to(300.0, 220.0);

    let mut direct = TrackballEngine::new(viewport);
    direct.begin_drag(256.0, 256.0);
    direct.drag_to(300.0, 220.0);

    assert_matrix_eq(engine.rotation_matrix(), direct.rotation_matrix());
}

#[test]
fn reset_view_is_identity() {
    let mut engine = TrackballEngine::default();
    drag(&mut engine, (10.0, 20.0), (500.0, 480.0));
    engine.side_view();
    engine.reset();
    assert_eq!(
        engine.rotation_matrix().as_array(),
        &[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]
    );
}

#[test]
fn side_view_matches_reference_matrix() {
    let mut engine = TrackballEngine::default();
    drag(&mut engine, (200.0, 200.0), (260.0, 310.0));
    engine.side_view();

    // quarter turn about +y, then a quarter turn about -z, column-major
    let expected = RotationMatrix([
        0.0, 0.0, -1.0, 0.0, //
        1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
    assert_matrix_eq(engine.rotation_matrix(), expected);
    assert_eq!(engine.previous(), engine.current());

    let composed = Quaternion::from_axis_angle(FRAC_PI_2, -Vector3::Z)
        * Quaternion::from_axis_angle(FRAC_PI_2, Vector3::Y);
    assert_matrix_eq(expected, composed.to_rotation_matrix());
}

#[test]
fn drag_after_side_view_composes_onto_it() {
    let viewport = Viewport::default();
    let mut engine = TrackballEngine::new(viewport);
    engine.side_view();
    let baseline = engine.previous();
    engine.begin_drag(256.0, 256.0);
    engine.drag_to(256.0, 150.0);

    let increment = incremental_rotation(viewport.project(256.0, 256.0), viewport.project(256.0, 150.0));
    assert_matrix_eq(
        engine.rotation_matrix(),
        (increment * baseline).normalize().to_rotation_matrix(),
    );
}

#[test]
fn rounding_past_one_does_not_poison_rotation() {
    assert!(!arc_angle(1.000_000_1).is_nan());
    assert!(!arc_angle(-1.000_000_1).is_nan());

    let mut engine = TrackballEngine::default();
    for _ in 0..100 {
        engine.begin_drag(123.0, 77.0);
        engine.drag_to(123.0, 77.0);
        engine.end_drag();
    }
    assert!(engine.rotation_matrix().as_array().iter().all(|v| v.is_finite()));
}

#[test]
fn opposite_points_fall_back_to_a_finite_rotation() {
    // antipodal start and end give a zero axis
    let q = incremental_rotation(Vector3::X, -Vector3::X);
    let mut engine = TrackballEngine::default();
    engine.apply_increment(q);
    assert!(engine.rotation_matrix().as_array().iter().all(|v| v.is_finite()));
}
