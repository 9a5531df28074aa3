// Tests for configuration defaults and validation.

use std::time::Duration;
use wave_core::*;

#[test]
fn defaults_match_constants_and_validate() {
    let c = WaveConfig::default();
    assert!(c.validate().is_ok());
    assert_eq!(c.graph_x, GRAPH_X);
    assert_eq!(c.sample_step, SAMPLE_STEP);
    assert_eq!(c.amplitude_factor, AMPLITUDE_FACTOR);
    assert_eq!(c.attenuation_k, ATTENUATION_K);
    assert_eq!(c.despawn_factor, DESPAWN_FACTOR);
    assert_eq!(c.lerp_speed, LERP_SPEED);
    assert_eq!(c.respawn_check_interval, Duration::from_millis(100));
    assert_eq!(c.initial_amplitude, DEFAULT_AMPLITUDE);
    assert_eq!(c.initial_speed, DEFAULT_SPEED);
    assert!(c.show_guide);
    assert_eq!(c.seed, None);
    assert_eq!(c.ranges.group_size, Span::new(2, 5));
    assert_eq!(c.ranges.despawn_timeout_ms, Span::new(500, 2000));
    assert_eq!(WaveConfig::default().with_seed(3).seed, Some(3));
}

fn rejected(mutate: impl FnOnce(&mut WaveConfig)) -> &'static str {
    let mut c = WaveConfig::default();
    mutate(&mut c);
    match c.validate() {
        Err(WaveError::InvalidConfig { field, .. }) => field,
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn invalid_values_name_their_field() {
    assert_eq!(rejected(|c| c.graph_x = 0.0), "graph_x");
    assert_eq!(rejected(|c| c.sample_step = f64::NAN), "sample_step");
    assert_eq!(rejected(|c| c.attenuation_k = -4.0), "attenuation_k");
    assert_eq!(rejected(|c| c.lerp_speed = 1.5), "lerp_speed");
    assert_eq!(rejected(|c| c.despawn_factor = 0.0), "despawn_factor");
    assert_eq!(rejected(|c| c.initial_amplitude = -1.0), "initial_amplitude");
    assert_eq!(rejected(|c| c.ranges.group_size = Span::new(0, 3)), "ranges.group_size");
    assert_eq!(rejected(|c| c.ranges.group_size = Span::new(2, 6)), "ranges.group_size");
    assert_eq!(rejected(|c| c.ranges.group_size = Span::new(4, 2)), "ranges.group_size");
    assert_eq!(rejected(|c| c.ranges.width = Span::new(0.0, 2.0)), "ranges.width");
    assert_eq!(
        rejected(|c| c.ranges.despawn_timeout_ms = Span::new(900, 100)),
        "ranges.despawn_timeout_ms"
    );
}

#[test]
fn error_messages_are_readable() {
    let mut c = WaveConfig::default();
    c.graph_x = -1.0;
    let msg = c.validate().unwrap_err().to_string();
    assert!(msg.contains("graph_x"), "{msg}");
    assert!(msg.contains("> 0"), "{msg}");
}

#[test]
fn fixed_spans_are_valid() {
    let mut c = WaveConfig::default();
    c.ranges.amplitude = Span::fixed(1.0);
    c.ranges.group_size = Span::fixed(5);
    c.ranges.despawn_timeout_ms = Span::fixed(500);
    assert!(c.validate().is_ok());
}

#[test]
fn channel_colors_render_as_css() {
    assert_eq!(Channel::Red.css_color(), "rgba(173,57,76,1.000)");
    assert_eq!(Channel::Green.css_color(), "rgba(48,220,155,1.000)");
    assert_eq!(Channel::Blue.css_color(), "rgba(15,82,169,1.000)");
    assert_eq!(Channel::Guide.css_color(), "rgba(255,255,255,0.350)");
}
