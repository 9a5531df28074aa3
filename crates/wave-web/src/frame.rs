use crate::canvas::CanvasSink;
use crate::dom;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wave_core::{CpuRenderer, Driver, Viewport, WaveRenderer};
use web_sys as web;

pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    Viewport::new(canvas.width() as f32, canvas.height() as f32)
        .with_pixel_ratio(dom::device_pixel_ratio() as f32)
}

/// Per-instance state behind the `SiriWave` handle.
pub struct WaveApp {
    pub driver: Driver,
    renderer: CpuRenderer<CanvasSink>,
    canvas: web::HtmlCanvasElement,
    last_instant: Instant,
    raf_id: Option<i32>,
}

impl WaveApp {
    pub fn new(driver: Driver, sink: CanvasSink, canvas: web::HtmlCanvasElement) -> Self {
        let renderer = CpuRenderer::new(driver.config(), sink);
        Self {
            driver,
            renderer,
            canvas,
            last_instant: Instant::now(),
            raf_id: None,
        }
    }

    pub fn start(&mut self) {
        self.driver.start();
        self.last_instant = Instant::now();
    }

    pub fn stop(&mut self) {
        self.driver.stop();
        cancel_frame(self.raf_id.take());
    }

    /// Pick up a new CSS size. Resizing clears the canvas, so a stopped wave
    /// is redrawn from its frozen state.
    pub fn resize(&mut self) {
        if !dom::sync_canvas_backing_size(&self.canvas) {
            return;
        }
        self.driver.set_viewport(canvas_viewport(&self.canvas));
        if !self.driver.is_running() {
            self.renderer.render(&self.driver.frame());
        }
    }

    pub fn cancel(&mut self) {
        cancel_frame(self.raf_id.take());
    }

    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now - self.last_instant;
        self.last_instant = now;
        if !self.driver.is_running() {
            return false;
        }
        self.driver.advance(elapsed, &mut self.renderer);
        true
    }
}

fn request_frame(tick: &FrameCallback) -> Option<i32> {
    let w = web::window()?;
    let cb = tick.borrow();
    let cb = cb.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

fn cancel_frame(id: Option<i32>) {
    if let (Some(id), Some(w)) = (id, web::window()) {
        let _ = w.cancel_animation_frame(id);
    }
}

/// Build the rAF callback for `app`. It holds only weak references, so
/// dropping the returned handle and the app ends the loop.
pub fn frame_callback(app: &Rc<RefCell<WaveApp>>) -> FrameCallback {
    let tick: FrameCallback = Rc::new(RefCell::new(None));
    let app_weak: Weak<RefCell<WaveApp>> = Rc::downgrade(app);
    let tick_weak = Rc::downgrade(&tick);
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let (Some(app), Some(tick)) = (app_weak.upgrade(), tick_weak.upgrade()) else {
            return;
        };
        let mut app = app.borrow_mut();
        app.raf_id = None;
        if app.frame() {
            app.raf_id = request_frame(&tick);
        }
    }) as Box<dyn FnMut()>));
    tick
}

/// Schedule the loop unless a frame is already pending.
pub fn start_loop(app: &Rc<RefCell<WaveApp>>, tick: &FrameCallback) {
    let mut app = app.borrow_mut();
    app.start();
    if app.raf_id.is_none() {
        app.raf_id = request_frame(tick);
    }
}
