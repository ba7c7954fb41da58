// Host-side tests for pointer mapping and the camera's pointer ray.

use glam::{Vec2, Vec3};
use portfolio_particles::constants::*;
use portfolio_particles::core::Camera;
use portfolio_particles::input::*;

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-6
}

#[test]
fn viewport_corners_map_to_ndc() {
    let c = |x, y| viewport_to_ndc(x, y, 800.0, 600.0).expect("valid viewport");
    assert!(approx(c(0.0, 0.0), Vec2::new(-1.0, 1.0)));
    assert!(approx(c(800.0, 600.0), Vec2::new(1.0, -1.0)));
    assert!(approx(c(400.0, 300.0), Vec2::ZERO));
}

#[test]
fn out_of_viewport_positions_clamp() {
    let ndc = viewport_to_ndc(-50.0, 900.0, 800.0, 600.0).expect("valid viewport");
    assert!(approx(ndc, Vec2::new(-1.0, -1.0)));
}

#[test]
fn degenerate_viewport_is_rejected() {
    assert!(viewport_to_ndc(10.0, 10.0, 0.0, 600.0).is_none());
    assert!(viewport_to_ndc(f64::NAN, 10.0, 800.0, 600.0).is_none());
}

#[test]
fn pointer_state_keeps_last_valid_position() {
    let mut state = PointerState::default();
    assert!(state.ndc.is_none());
    state.update(400.0, 300.0, 800.0, 600.0);
    assert!(state.ndc.is_some_and(|p| approx(p, Vec2::ZERO)));
    state.update(1.0, 1.0, 0.0, 0.0);
    assert!(state.ndc.is_some_and(|p| approx(p, Vec2::ZERO)));
    state.clear();
    assert!(state.ndc.is_none());
}

#[test]
fn press_queues_one_burst_and_moves_the_pointer() {
    let mut state = PointerState::default();
    assert!(state.take_burst().is_none());
    state.press(0.0, 0.0, 800.0, 600.0);
    state.press(800.0, 600.0, 800.0, 600.0);
    assert!(state.ndc.is_some_and(|p| approx(p, Vec2::new(1.0, -1.0))));
    assert!(state.take_burst().is_some_and(|p| approx(p, Vec2::new(1.0, -1.0))));
    assert!(state.take_burst().is_none());

    state.press(10.0, 10.0, 0.0, 600.0);
    assert!(state.take_burst().is_none());
    state.update(400.0, 300.0, 800.0, 600.0);
    assert!(state.take_burst().is_none());
}

#[test]
fn center_ray_hits_origin_plane_under_eye() {
    let cam = Camera::default();
    let hit = cam.pointer_to_plane(Vec2::ZERO).expect("ray hits plane");
    assert!(hit.distance(Vec3::ZERO) < 1e-2, "hit = {:?}", hit);
}

#[test]
fn off_center_ray_lands_on_matching_side() {
    let mut cam = Camera::default();
    cam.set_viewport(1600, 900);
    let hit = cam.pointer_to_plane(Vec2::new(0.5, -0.5)).expect("ray hits plane");
    assert!(hit.x > 0.0 && hit.y < 0.0);
    assert!(hit.z.abs() < 1e-2);
}

#[test]
fn camera_eases_toward_pointer_and_stays_bounded() {
    let mut cam = Camera::default();
    for _ in 0..500 {
        cam.follow_pointer(Vec2::new(1.0, 1.0));
    }
    assert!((cam.eye.x - CAMERA_POINTER_TRAVEL).abs() < 1e-2);
    assert!((cam.eye.y + CAMERA_POINTER_TRAVEL).abs() < 1e-2);
    assert_eq!(cam.eye.z, CAMERA_Z);
}
