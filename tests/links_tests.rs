// Host-side tests for neighbor link construction.

use glam::Vec3;
use portfolio_particles::core::{build_links, Link};

fn pair(distance: f32) -> [Vec3; 2] {
    [Vec3::ZERO, Vec3::new(distance, 0.0, 0.0)]
}

#[test]
fn close_pair_is_linked() {
    let mut out = Vec::new();
    build_links(&pair(10.0), 15.0, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!((out[0].a, out[0].b), (0, 1));
    assert!((out[0].strength - (1.0 - 10.0 / 15.0)).abs() < 1e-6);
}

#[test]
fn far_pair_is_not_linked() {
    let mut out = Vec::new();
    build_links(&pair(20.0), 15.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn threshold_is_exclusive() {
    let mut out = Vec::new();
    build_links(&pair(15.0), 15.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn every_close_pair_is_listed_once() {
    let positions = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(0.0, 5.0, 0.0),
        Vec3::new(100.0, 100.0, 100.0),
    ];
    let mut out = Vec::new();
    build_links(&positions, 10.0, &mut out);
    let pairs: Vec<(u32, u32)> = out.iter().map(|l| (l.a, l.b)).collect();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    assert!(out.iter().all(|l| l.a < l.b));
    assert!(out.iter().all(|l| l.strength > 0.0 && l.strength <= 1.0));
}

#[test]
fn output_is_cleared_between_builds() {
    let mut out = vec![Link {
        a: 7,
        b: 9,
        strength: 0.5,
    }];
    build_links(&pair(10.0), 15.0, &mut out);
    assert_eq!(out.len(), 1);
    build_links(&pair(30.0), 15.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn degenerate_threshold_yields_nothing() {
    let mut out = Vec::new();
    build_links(&pair(0.0), 0.0, &mut out);
    assert!(out.is_empty());
    build_links(&pair(1.0), f32::NAN, &mut out);
    assert!(out.is_empty());
}

#[test]
fn coincident_particles_link_at_full_strength() {
    let mut out = Vec::new();
    build_links(&pair(0.0), 15.0, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].strength, 1.0);
}
