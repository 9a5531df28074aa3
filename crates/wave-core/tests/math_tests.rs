// Tests for the pure waveform math: attenuation, per-curve height, phase
// wrapping and the spawn-time random helpers.

use rand::prelude::*;
use std::f64::consts::TAU;
use wave_core::math::*;
use wave_core::ATTENUATION_K;

fn random_shape(rng: &mut StdRng) -> CurveShape {
    CurveShape {
        amplitude: rng.gen_range(0.0..=1.5),
        phase: rng.gen_range(0.0..TAU),
        offset: rng.gen_range(-3.0..=3.0),
        width: rng.gen_range(0.5..=3.0),
        verse: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
    }
}

#[test]
fn attenuation_is_one_at_origin() {
    assert!((attenuation(0.0, ATTENUATION_K) - 1.0).abs() < 1e-12);
}

#[test]
fn attenuation_stays_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut xs: Vec<f64> = (-2000..=2000).map(|i| i as f64 * 0.05).collect();
    xs.extend((0..2000).map(|_| rng.gen_range(-1e6..1e6)));
    xs.extend([1e150, -1e150, f64::MAX.sqrt()]);
    for x in xs {
        let a = attenuation(x, ATTENUATION_K);
        assert!(a > 0.0 && a <= 1.0, "attenuation({x}) = {a} outside (0, 1]");
    }
}

#[test]
fn attenuation_decays_with_distance() {
    let mut prev = attenuation(0.0, ATTENUATION_K);
    for i in 1..400 {
        let x = i as f64 * 0.1;
        let a = attenuation(x, ATTENUATION_K);
        assert!(a < prev, "attenuation not decreasing at x={x}");
        assert!((attenuation(-x, ATTENUATION_K) - a).abs() < 1e-15, "not symmetric at {x}");
        prev = a;
    }
}

#[test]
fn curve_y_is_never_negative() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5000 {
        let shape = random_shape(&mut rng);
        let size = rng.gen_range(1..=5);
        let index = rng.gen_range(0..size);
        let x = rng.gen_range(-25.0..=25.0);
        let y = curve_y(x, &shape, index, size, ATTENUATION_K);
        assert!(y >= 0.0, "curve_y negative for {shape:?} idx={index}/{size} x={x}: {y}");
        assert!(y <= shape.amplitude + 1e-12);
    }
}

#[test]
fn curve_y_is_zero_without_amplitude() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..1000 {
        let mut shape = random_shape(&mut rng);
        shape.amplitude = 0.0;
        let x = rng.gen_range(-25.0..=25.0);
        assert_eq!(curve_y(x, &shape, 1, 3, ATTENUATION_K), 0.0);
    }
}

#[test]
fn single_member_group_is_centered() {
    let mut rng = StdRng::seed_from_u64(13);
    assert_eq!(static_offset(0, 1), 0.0);
    for _ in 0..500 {
        let s = random_shape(&mut rng);
        let x = rng.gen_range(-25.0..=25.0);
        let local_x = x / s.width - s.offset;
        let expected =
            (s.amplitude * (s.verse * local_x - s.phase).sin() * attenuation(local_x, ATTENUATION_K))
                .abs();
        let y = curve_y(x, &s, 0, 1, ATTENUATION_K);
        assert!(y.is_finite());
        assert!((y - expected).abs() < 1e-12, "x={x}: {y} vs {expected}");
    }
}

#[test]
fn static_offsets_spread_evenly() {
    for size in 2..=5 {
        assert!((static_offset(0, size) + 4.0).abs() < 1e-12);
        assert!((static_offset(size - 1, size) - 4.0).abs() < 1e-12);
        let step = 8.0 / (size - 1) as f64;
        for i in 1..size {
            let d = static_offset(i, size) - static_offset(i - 1, size);
            assert!((d - step).abs() < 1e-12, "uneven spacing for size {size}");
        }
    }
}

#[test]
fn degenerate_width_falls_back_to_unit() {
    let base = CurveShape {
        amplitude: 1.0,
        phase: 0.3,
        offset: 0.5,
        width: 1.0,
        verse: 1.0,
    };
    for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        let shape = CurveShape { width: bad, ..base };
        for x in [-3.0, 0.0, 2.5] {
            let y = curve_y(x, &shape, 0, 2, ATTENUATION_K);
            assert!(y.is_finite(), "width {bad} produced {y}");
            assert_eq!(y, curve_y(x, &base, 0, 2, ATTENUATION_K));
        }
    }
}

#[test]
fn lerp_hits_endpoints_and_midpoint() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert!((lerp(2.0, 6.0, 0.5) - 4.0).abs() < 1e-12);
}

#[test]
fn normalize_phase_stays_in_range() {
    for p in [0.0, TAU, -TAU, 1e12, -1e12, 123456.789, -1e-18, f64::NAN, f64::INFINITY] {
        let n = normalize_phase(p);
        assert!((0.0..TAU).contains(&n), "normalize_phase({p}) = {n}");
    }
}

#[test]
fn normalize_phase_over_long_runs() {
    // Accumulate like a curve would over a very long session.
    let mut rng = StdRng::seed_from_u64(21);
    let mut phase = 0.0;
    for _ in 0..200_000 {
        phase = normalize_phase(phase + rng.gen_range(0.0..3.0));
        assert!((0.0..TAU).contains(&phase), "phase escaped: {phase}");
    }
}

#[test]
fn random_helpers_respect_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut seen = [false; 4];
    for _ in 0..2000 {
        let v = random_range(&mut rng, -3.0, 3.0);
        assert!((-3.0..=3.0).contains(&v));
        let i = random_int(&mut rng, 2, 5);
        assert!((2..=5).contains(&i));
        seen[(i - 2) as usize] = true;
        let s = random_verse(&mut rng);
        assert!(s == 1.0 || s == -1.0);
    }
    assert!(seen.iter().all(|s| *s), "inclusive bounds never sampled: {seen:?}");
    assert_eq!(random_range(&mut rng, 1.5, 1.5), 1.5);
    assert_eq!(random_int(&mut rng, 500, 500), 500);
}
