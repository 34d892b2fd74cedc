use std::time::Duration;

use cgmath::Point3;
use coffee_smoke::camera::{Camera, OrbitController, Projection};

const FRAME: Duration = Duration::from_millis(16);

fn rig() -> (Camera, OrbitController) {
    (
        Camera::new((8.0, 10.0, 12.0), (0.0, 3.0, 0.0)),
        OrbitController::new(0.005, 0.1),
    )
}

#[test]
fn initial_pose_round_trips_through_spherical_form() {
    let (camera, _) = rig();
    let eye = camera.eye();
    assert!((eye.x - 8.0).abs() < 1e-4);
    assert!((eye.y - 10.0).abs() < 1e-4);
    assert!((eye.z - 12.0).abs() < 1e-4);
    assert_eq!(camera.target, Point3::new(0.0, 3.0, 0.0));
}

#[test]
fn projection_aspect_tracks_size() {
    let mut projection = Projection::new(1600, 900, cgmath::Deg(25.0), 0.1, 100.0);
    assert_eq!(projection.aspect(), 1600.0 / 900.0);
    projection.resize(1280, 720);
    assert_eq!(projection.aspect(), 1280.0 / 720.0);
}

#[test]
fn damped_update_eases_towards_the_drag_goal() {
    let (mut camera, mut controller) = rig();
    // First update adopts the camera pose as the goal.
    controller.update(&mut camera, FRAME);
    let start_yaw = camera.yaw;

    // A 100px drag at rotate speed 0.005 puts the goal 0.5 rad away.
    controller.rotate(100.0, 0.0);
    let goal = start_yaw.0 - 0.5;

    controller.update(&mut camera, FRAME);
    // Moved, but not the whole way in a single damped step.
    assert!((camera.yaw - start_yaw).0.abs() > 1e-4);
    assert!((camera.yaw - start_yaw).0.abs() < 0.25);

    // Repeated updates approach the goal monotonically and converge.
    let mut gap = (camera.yaw.0 - goal).abs();
    for _ in 0..200 {
        controller.update(&mut camera, FRAME);
        let new_gap = (camera.yaw.0 - goal).abs();
        assert!(new_gap <= gap + 1e-6);
        gap = new_gap;
    }
    assert!(gap < 0.05);
}

#[test]
fn undamped_update_snaps_to_the_goal() {
    let (mut camera, mut controller) = rig();
    controller.enable_damping = false;
    controller.update(&mut camera, FRAME);

    controller.rotate(100.0, 0.0);
    controller.update(&mut camera, FRAME);
    let snapped = camera.yaw;
    // A further update with no new input must not move the camera.
    controller.update(&mut camera, FRAME);
    assert!((camera.yaw - snapped).0.abs() < 1e-6);
}

#[test]
fn pitch_is_clamped_away_from_the_poles() {
    let (mut camera, mut controller) = rig();
    controller.enable_damping = false;
    controller.update(&mut camera, FRAME);

    controller.rotate(0.0, 1.0e6);
    controller.update(&mut camera, FRAME);
    assert!(camera.pitch.0 < std::f32::consts::FRAC_PI_2);

    controller.rotate(0.0, -2.0e6);
    controller.update(&mut camera, FRAME);
    assert!(camera.pitch.0 > -std::f32::consts::FRAC_PI_2);
}

#[test]
fn zoom_keeps_the_distance_positive_and_bounded() {
    let (mut camera, mut controller) = rig();
    controller.enable_damping = false;
    controller.update(&mut camera, FRAME);

    for _ in 0..100 {
        controller.zoom(5.0);
    }
    controller.update(&mut camera, FRAME);
    assert!(camera.distance > 0.0);

    for _ in 0..100 {
        controller.zoom(-5.0);
    }
    controller.update(&mut camera, FRAME);
    assert!(camera.distance <= 80.0);
}
