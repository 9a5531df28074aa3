mod render;

use std::time::Instant;
use wave_core::{Driver, Viewport, WaveRenderer};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use crate::render::GpuWaveRenderer;

const AMPLITUDE_STEP: f64 = 0.25;
const SPEED_STEP: f64 = 0.05;

fn viewport_of(window: &winit::window::Window) -> Viewport {
    let size = window.inner_size();
    Viewport::new(size.width as f32, size.height as f32)
        .with_pixel_ratio(window.scale_factor() as f32)
}

/// Apply a key press. Returns `false` when the app should quit.
fn handle_key(driver: &mut Driver, key: &Key) -> bool {
    let targets = driver.control().targets();
    match key {
        Key::Named(NamedKey::Escape) => return false,
        Key::Named(NamedKey::Space) => {
            if driver.is_running() {
                driver.stop();
            } else {
                driver.start();
            }
        }
        Key::Named(NamedKey::ArrowUp) => driver.set_amplitude(targets.amplitude + AMPLITUDE_STEP),
        Key::Named(NamedKey::ArrowDown) => driver.set_amplitude(targets.amplitude - AMPLITUDE_STEP),
        Key::Named(NamedKey::ArrowRight) => driver.set_speed(targets.speed + SPEED_STEP),
        Key::Named(NamedKey::ArrowLeft) => driver.set_speed(targets.speed - SPEED_STEP),
        _ => return true,
    }
    let t = driver.control().targets();
    log::info!(
        "[wave] running={} amplitude->{:.2} speed->{:.2}",
        driver.is_running(),
        t.amplitude,
        t.speed
    );
    true
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Siri Wave (native)")
        .build(&event_loop)?;

    let mut driver = Driver::create(viewport_of(&window), true);
    let mut gpu = pollster::block_on(GpuWaveRenderer::new(&window, driver.config()));
    if gpu.is_disabled() {
        log::warn!("[wave] animating without output");
    }
    let window = &window;
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            gpu.resize(size.width, size.height);
            driver.set_viewport(viewport_of(window));
            if !driver.is_running() {
                // keep the frozen frame on screen
                gpu.render(&driver.frame());
            }
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if !handle_key(&mut driver, &logical_key) {
                elwt.exit();
            }
            last_frame = Instant::now();
        }
        Event::AboutToWait => {
            let now = Instant::now();
            let elapsed = now - last_frame;
            last_frame = now;
            if driver.is_running() {
                elwt.set_control_flow(ControlFlow::Poll);
                driver.advance(elapsed, &mut gpu);
                window.request_redraw();
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    })?;
    Ok(())
}
