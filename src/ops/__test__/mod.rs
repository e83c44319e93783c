//! Properties of the stick attenuation that hold for any orientation.

use crate::ops::{cm_stick, spherical_to_cartesian, stick_protocol, Float4};
use approx::assert_relative_eq;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const SAMPLES: usize = 500;

fn random_unit(rng: &mut StdRng) -> Float4<f64> {
    let n = spherical_to_cartesian(rng.gen_range(0.0..PI), rng.gen_range(0.0..2.0 * PI));
    Float4::from(n)
}

#[test]
fn test_zero_b_gives_unit_signal() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..SAMPLES {
        let g = random_unit(&mut rng);
        let d = rng.gen_range(0.0..3e-3);
        let theta = rng.gen_range(-10.0..10.0);
        let phi = rng.gen_range(-10.0..10.0);
        assert_eq!(cm_stick(g, 0.0, d, theta, phi), 1.0);
    }
}

#[test]
fn test_zero_d_gives_unit_signal() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..SAMPLES {
        let g = random_unit(&mut rng);
        let b = rng.gen_range(0.0..1e4);
        let theta = rng.gen_range(-10.0..10.0);
        let phi = rng.gen_range(-10.0..10.0);
        assert_eq!(cm_stick(g, b, 0.0, theta, phi), 1.0);
    }
}

#[test]
fn test_signal_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..SAMPLES {
        let g = random_unit(&mut rng);
        let b = rng.gen_range(0.0..5e3);
        let d = rng.gen_range(0.0..3e-3);
        let s = cm_stick(g, b, d, rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        assert!(s > 0.0 && s <= 1.0, "signal {s} out of (0, 1]");
    }
}

#[test]
fn test_stick_has_no_polarity() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..SAMPLES {
        let g = random_unit(&mut rng);
        let (b, d) = (rng.gen_range(0.0..5e3), rng.gen_range(0.0..3e-3));
        let theta = rng.gen_range(0.0..PI);
        let phi = rng.gen_range(0.0..2.0 * PI);

        let s = cm_stick(g, b, d, theta, phi);
        let flipped = cm_stick(g, b, d, PI - theta, phi + PI);
        assert_relative_eq!(s, flipped, epsilon = 1e-12);
    }
}

#[test]
fn test_gradient_sign_does_not_matter() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..SAMPLES {
        let g = random_unit(&mut rng);
        let neg = Float4::from_xyz(-g.x, -g.y, -g.z);
        let (theta, phi) = (rng.gen_range(0.0..PI), rng.gen_range(0.0..PI));
        assert_relative_eq!(
            cm_stick(g, 1e3, 2e-3, theta, phi),
            cm_stick(neg, 1e3, 2e-3, theta, phi),
            epsilon = 1e-12
        );
    }
}

/// Rotating the gradient about the stick axis keeps `g · n`, so the signal
/// must stay the same.
#[test]
fn test_depends_only_on_angle_to_axis() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..SAMPLES {
        let theta = rng.gen_range(0.0..PI);
        let phi = rng.gen_range(0.0..2.0 * PI);
        let n = spherical_to_cartesian(theta, phi);
        let g = random_unit(&mut rng);
        let angle = rng.gen_range(0.0..2.0 * PI);

        // Rodrigues rotation of g about n
        let v = g.xyz();
        let k_dot_v = n[0] * v[0] + n[1] * v[1] + n[2] * v[2];
        let cross = [
            n[1] * v[2] - n[2] * v[1],
            n[2] * v[0] - n[0] * v[2],
            n[0] * v[1] - n[1] * v[0],
        ];
        let (sin_a, cos_a) = angle.sin_cos();
        let rotated: [f64; 3] = std::array::from_fn(|i| {
            v[i] * cos_a + cross[i] * sin_a + n[i] * k_dot_v * (1.0 - cos_a)
        });

        let s = cm_stick(g, 2e3, 1.5e-3, theta, phi);
        let s_rot = cm_stick(Float4::from(rotated), 2e3, 1.5e-3, theta, phi);
        assert_relative_eq!(s, s_rot, epsilon = 1e-10);
    }
}

#[test]
fn test_protocol_is_monotone_in_angle() {
    // gradients sweeping from the stick axis (z) towards x
    let n = 32;
    let mut g = Array2::<f32>::zeros((n, 3));
    for i in 0..n {
        let a = (i as f32) / (n as f32 - 1.0) * std::f32::consts::FRAC_PI_2;
        g[[i, 0]] = a.sin();
        g[[i, 2]] = a.cos();
    }
    let b = Array1::from_elem(n, 1000.0f32);
    let s = stick_protocol(&g.view(), &b.view(), 2e-3, 0.0, 0.0);

    assert_relative_eq!(s[0], (-2.0f32).exp(), epsilon = 1e-6);
    assert_relative_eq!(s[n - 1], 1.0, epsilon = 1e-6);
    for w in s.windows(2) {
        assert!(w[1] >= w[0]);
    }
}
