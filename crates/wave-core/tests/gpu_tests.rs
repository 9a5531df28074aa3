// Tests for the uniform layout, lattice and per-draw packing.

use std::time::Duration;
use wave_core::gpu::{self, BandUniforms, CurvePacked, LatticeVertex};
use wave_core::{
    Channel, ChannelGroup, CompositeParams, Curve, CurveManager, CurveParams, FrameState, Side,
    Viewport, WaveConfig, GPU_SAMPLE_COUNT, GUIDE_HALF_THICKNESS_PX,
};

fn curve(index: usize, amplitude: f64, phase: f64) -> Curve {
    let p = CurveParams {
        final_amplitude: 1.0,
        offset: -1.25,
        width: 2.5,
        verse: -1.0,
        speed: 0.75,
        despawn_timeout_ms: 900,
        spawned_at: Duration::ZERO,
        group_index: index,
        channel: Channel::Green,
    };
    Curve::with_state(p, amplitude, phase, Duration::from_millis(40))
}

#[test]
fn uniform_block_fits_one_slot() {
    assert_eq!(std::mem::size_of::<CurvePacked>(), 32);
    assert_eq!(std::mem::size_of::<BandUniforms>(), 224);
    assert!(std::mem::size_of::<BandUniforms>() as u64 <= gpu::UNIFORM_SLOT_STRIDE);
    assert_eq!(std::mem::size_of::<LatticeVertex>(), 8);
    let u = BandUniforms::default();
    assert_eq!(bytemuck::bytes_of(&u).len(), 224);
}

#[test]
fn lattice_pairs_baseline_and_crest() {
    let lattice = gpu::build_lattice(25.0, GPU_SAMPLE_COUNT);
    assert_eq!(lattice.len(), 2 * GPU_SAMPLE_COUNT as usize);
    assert_eq!(lattice[0].x, -25.0);
    assert_eq!(lattice.last().unwrap().x, 25.0);
    for (i, pair) in lattice.chunks(2).enumerate() {
        assert_eq!(pair[0].x, pair[1].x, "column {i}");
        assert_eq!(pair[0].edge, 0.0);
        assert_eq!(pair[1].edge, 1.0);
    }
    for w in lattice.chunks(2).collect::<Vec<_>>().windows(2) {
        assert!(w[1][0].x > w[0][0].x);
    }
}

#[test]
fn degenerate_lattice_still_spans_domain() {
    let lattice = gpu::build_lattice(10.0, 0);
    assert_eq!(lattice.len(), 4);
    assert_eq!(lattice[0].x, -10.0);
    assert_eq!(lattice[2].x, 10.0);
}

#[test]
fn curves_pack_in_group_order() {
    let group = ChannelGroup::from_curves(
        Channel::Green,
        (0..3).map(|i| curve(i, 0.5 + i as f64 * 0.1, 0.25 * i as f64)),
    );
    let (packed, count) = gpu::pack_curves(&group);
    assert_eq!(count, 3);
    for (i, p) in packed[..3].iter().enumerate() {
        assert!((p.shape[0] - (0.5 + i as f32 * 0.1)).abs() < 1e-6);
        assert!((p.shape[1] - 0.25 * i as f32).abs() < 1e-6);
        assert_eq!(p.shape[2], -1.25);
        assert_eq!(p.shape[3], 2.5);
        assert_eq!(p.placement, [-1.0, i as f32, 3.0, 0.0]);
    }
    assert!(packed[3..].iter().all(|p| *p == CurvePacked::default()));
}

#[test]
fn band_uniforms_carry_frame_values() {
    let config = WaveConfig::default().with_seed(4);
    let manager = CurveManager::new(&config);
    let params = CompositeParams::from(&config);
    let frame = FrameState {
        manager: &manager,
        amplitude: 0.6,
        phase: 1.0,
        viewport: Viewport::new(300.0, 120.0).with_pixel_ratio(1.5),
    };

    let u = gpu::pack_band(&frame, Channel::Blue, Side::Below, &params, GPU_SAMPLE_COUNT);
    assert_eq!(u.color, Channel::Blue.color());
    assert_eq!(u.viewport, [300.0, 60.0, -1.0, 0.6]);
    assert_eq!(u.shape, [25.0, 4.0, 0.8, 0.0]);
    let size = manager.group(Channel::Blue).unwrap().size() as u32;
    assert_eq!(u.counts, [GPU_SAMPLE_COUNT, size, 0, 0]);

    let g = gpu::pack_band(&frame, Channel::Guide, Side::Above, &params, GPU_SAMPLE_COUNT);
    assert_eq!(g.counts[1], 0);
    assert_eq!(g.viewport[2], 1.0);
    assert_eq!(g.shape[3], (GUIDE_HALF_THICKNESS_PX * 1.5) as f32);
    assert_eq!(g.color, Channel::Guide.color());
}

#[test]
fn guide_kernel_height_is_its_floor() {
    let config = WaveConfig::default().with_seed(5);
    let manager = CurveManager::new(&config);
    let frame = FrameState {
        manager: &manager,
        amplitude: 1.0,
        phase: 0.0,
        viewport: Viewport::new(200.0, 100.0),
    };
    let u = gpu::pack_band(
        &frame,
        Channel::Guide,
        Side::Above,
        &CompositeParams::from(&config),
        GPU_SAMPLE_COUNT,
    );
    for s in -25..=25 {
        assert_eq!(gpu::kernel::band_height(&u, s as f32), GUIDE_HALF_THICKNESS_PX as f32);
    }
}

#[test]
fn draw_order_matches_cpu_renderer() {
    let with_guide: Vec<_> = gpu::band_draws(true).collect();
    assert_eq!(with_guide.len(), gpu::MAX_BAND_DRAWS);
    assert_eq!(with_guide[0], (Channel::Guide, Side::Above));
    assert_eq!(with_guide[1], (Channel::Guide, Side::Below));
    assert_eq!(with_guide[2], (Channel::Red, Side::Above));
    assert_eq!(with_guide[7], (Channel::Blue, Side::Below));
    let without: Vec<_> = gpu::band_draws(false).collect();
    assert_eq!(without, with_guide[2..].to_vec());
}

#[test]
fn shader_source_declares_entry_points() {
    assert!(gpu::SIRI_WAVE_WGSL.contains("fn vs_band"));
    assert!(gpu::SIRI_WAVE_WGSL.contains("fn fs_band"));
    assert!(gpu::SIRI_WAVE_WGSL.contains("array<CurvePacked, 5>"));
}
