/// NeuroSphere Web - canvas host for the sphere visualization
///
/// Drives the core renderer from `requestAnimationFrame` on a `<canvas>` 2D
/// context and rebuilds the sphere when the window is resized. If the canvas
/// or its context is missing the component stays inert: no nodes, no frames,
/// no listeners.
use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use neurosphere_core::{FrameLoop, SceneConfig, SphereRenderer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

pub mod canvas;

pub use canvas::CanvasSurface;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Device pixels backing a CSS-sized canvas
pub fn backing_size(css_width: f64, css_height: f64, pixel_ratio: f64) -> (u32, u32) {
    let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    (
        (css_width.max(0.0) * ratio).round() as u32,
        (css_height.max(0.0) * ratio).round() as u32,
    )
}

/// Frame count as exposed to JS, saturating instead of wrapping
fn frame_count(frames: u64) -> u32 {
    u32::try_from(frames).unwrap_or(u32::MAX)
}

/// Everything the frame callback and the resize listener share
struct Scene {
    sphere: SphereRenderer,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    frames: FrameLoop<i32>,
}

impl Scene {
    /// Match the canvas backing store to its CSS box and the device pixel ratio
    fn fit(&mut self, window: &Window) {
        let pixel_ratio = window.device_pixel_ratio();
        let rect = self.canvas.get_bounding_client_rect();
        let (width, height) = backing_size(rect.width(), rect.height(), pixel_ratio);

        self.canvas.set_width(width);
        self.canvas.set_height(height);

        // Resizing the backing store resets the transform, so this never accumulates
        if let Err(err) = self
            .surface
            .context()
            .set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)
        {
            warn!("failed to scale canvas context: {:?}", err);
        }

        if self
            .sphere
            .resize(rect.width() as f32, rect.height() as f32, pixel_ratio as f32)
        {
            debug!(
                "canvas resized to {}x{} css px at ratio {}",
                rect.width(),
                rect.height(),
                pixel_ratio
            );
        }
    }

    fn render(&mut self) {
        self.sphere.frame(&mut self.surface);
    }
}

#[wasm_bindgen]
pub struct NeuroSphere {
    window: Option<Window>,
    scene: Option<Rc<RefCell<Scene>>>,
    frame_callback: FrameCallback,
    resize_callback: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl NeuroSphere {
    /// Attach to the canvas with id `canvas_id` and start animating
    ///
    /// `config_toml` optionally overrides the scene defaults; an invalid
    /// config is an error, a missing canvas or 2D context is not.
    pub fn attach(canvas_id: &str, config_toml: Option<String>) -> Result<NeuroSphere, JsValue> {
        let config = match config_toml {
            Some(text) => SceneConfig::from_toml_str(&text)
                .map_err(|err| JsValue::from_str(&err.to_string()))?,
            None => SceneConfig::default(),
        };

        let Some((window, canvas, context)) = acquire(canvas_id) else {
            warn!("canvas #{canvas_id} or its 2d context is unavailable; sphere disabled");
            return Ok(NeuroSphere::inert());
        };

        let scene = Rc::new(RefCell::new(Scene {
            sphere: SphereRenderer::new(config),
            surface: CanvasSurface::new(context),
            canvas,
            frames: FrameLoop::new(),
        }));
        scene.borrow_mut().fit(&window);

        let mut sphere = NeuroSphere {
            window: Some(window.clone()),
            scene: Some(scene.clone()),
            frame_callback: Rc::new(RefCell::new(None)),
            resize_callback: None,
        };

        // The resize listener runs to completion on the event queue, so the
        // node set is fully replaced before the next frame callback reads it
        let resize_scene = scene.clone();
        let resize_window = window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            resize_scene.borrow_mut().fit(&resize_window);
        });
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        sphere.resize_callback = Some(on_resize);

        let tick_scene = scene.clone();
        let tick_window = window.clone();
        let tick_callback = sphere.frame_callback.clone();
        *sphere.frame_callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            let mut scene = tick_scene.borrow_mut();
            if !scene.frames.begin_frame() {
                return;
            }
            scene.render();

            if let Some(callback) = tick_callback.borrow().as_ref() {
                let scheduled = scene.frames.try_schedule(|| {
                    tick_window.request_animation_frame(callback.as_ref().unchecked_ref())
                });
                if let Err(err) = scheduled {
                    warn!("failed to schedule animation frame: {:?}", err);
                }
            }
        }));

        let started = match sphere.frame_callback.borrow().as_ref() {
            Some(callback) => scene.borrow_mut().frames.try_schedule(|| {
                window.request_animation_frame(callback.as_ref().unchecked_ref())
            }),
            None => Ok(false),
        };
        started?;

        info!(
            "sphere attached to #{canvas_id} with {} nodes",
            scene.borrow().sphere.nodes().len()
        );
        Ok(sphere)
    }

    fn inert() -> NeuroSphere {
        NeuroSphere {
            window: None,
            scene: None,
            frame_callback: Rc::new(RefCell::new(None)),
            resize_callback: None,
        }
    }

    /// Whether frames are still being produced
    pub fn is_running(&self) -> bool {
        self.scene
            .as_ref()
            .map_or(false, |scene| !scene.borrow().frames.is_cancelled())
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u32 {
        self.scene
            .as_ref()
            .map_or(0, |scene| frame_count(scene.borrow().frames.frames()))
    }

    /// Stop animating and release the pending frame and the resize listener
    pub fn stop(&mut self) {
        let Some(window) = self.window.take() else {
            return;
        };

        if let Some(scene) = self.scene.as_ref() {
            let pending = scene.borrow_mut().frames.cancel();
            if let Some(handle) = pending {
                if let Err(err) = window.cancel_animation_frame(handle) {
                    warn!("failed to cancel animation frame: {:?}", err);
                }
            }
        }

        if let Some(on_resize) = self.resize_callback.take() {
            if let Err(err) = window
                .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            {
                warn!("failed to remove resize listener: {:?}", err);
            }
        }

        // Dropping the closure breaks its reference cycle with itself
        self.frame_callback.borrow_mut().take();
        info!("sphere stopped");
    }
}

impl Drop for NeuroSphere {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Look up the window, the canvas element and its 2D context
fn acquire(canvas_id: &str) -> Option<(Window, HtmlCanvasElement, CanvasRenderingContext2d)> {
    let window = web_sys::window()?;
    let canvas = window
        .document()?
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let context = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((window, canvas, context))
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook and logging for better messages in the browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    Ok(())
}
