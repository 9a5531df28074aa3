#![cfg(target_arch = "wasm32")]
mod canvas;
mod dom;
mod frame;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wave_core::Driver;
use web_sys as web;

use crate::canvas::CanvasSink;
use crate::frame::{FrameCallback, WaveApp};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("siri-wave-web loaded");
    Ok(())
}

/// A waveform bound to one `<canvas>`. Instances are independent.
#[wasm_bindgen]
pub struct SiriWave {
    app: Rc<RefCell<WaveApp>>,
    tick: FrameCallback,
    resize_listener: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl SiriWave {
    /// Attach to the canvas with id `canvas_id`, sized to its CSS box.
    pub fn create(canvas_id: &str, auto_start: bool) -> Result<SiriWave, JsValue> {
        Self::init(canvas_id, auto_start).map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    pub fn start(&self) {
        frame::start_loop(&self.app, &self.tick);
    }

    /// Freeze on the last drawn frame.
    pub fn stop(&self) {
        self.app.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = setAmplitude)]
    pub fn set_amplitude(&self, value: f64) {
        self.app.borrow().driver.set_amplitude(value);
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, value: f64) {
        self.app.borrow().driver.set_speed(value);
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.app.borrow().driver.is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn amplitude(&self) -> f64 {
        self.app.borrow().driver.amplitude()
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f64 {
        self.app.borrow().driver.speed()
    }

    /// Re-read the canvas CSS size, e.g. after a layout change that did not
    /// fire a window resize.
    pub fn resize(&self) {
        self.app.borrow_mut().resize();
    }
}

impl SiriWave {
    fn init(canvas_id: &str, auto_start: bool) -> anyhow::Result<SiriWave> {
        let canvas = dom::canvas_by_id(canvas_id)?;
        dom::sync_canvas_backing_size(&canvas);
        let sink = CanvasSink::new(dom::context_2d(&canvas)?);
        let driver = Driver::create(frame::canvas_viewport(&canvas), false);
        let app = Rc::new(RefCell::new(WaveApp::new(driver, sink, canvas)));
        let tick = frame::frame_callback(&app);

        let app_weak = Rc::downgrade(&app);
        let resize_listener = Closure::wrap(Box::new(move || {
            if let Some(app) = app_weak.upgrade() {
                app.borrow_mut().resize();
            }
        }) as Box<dyn FnMut()>);
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        window
            .add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("resize listener: {e:?}"))?;

        log::info!("[wave] attached to #{canvas_id}");
        let wave = SiriWave {
            app,
            tick,
            resize_listener,
        };
        if auto_start {
            wave.start();
        }
        Ok(wave)
    }
}

impl Drop for SiriWave {
    fn drop(&mut self) {
        self.app.borrow_mut().cancel();
        if let Some(w) = web::window() {
            let _ = w.remove_event_listener_with_callback(
                "resize",
                self.resize_listener.as_ref().unchecked_ref(),
            );
        }
    }
}
