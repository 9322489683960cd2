//! Browser front end
//!
//! Binds a [`Table`] to `#canvas`, forwards mouse events as pointer samples,
//! wires `#start-btn` to restart, fills the optional `#color-menu` picker and
//! runs the `requestAnimationFrame` loop until [`WebApp::stop`] is called.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlCanvasElement, MouseEvent};

use crate::interaction::{PointerEvent, PointerKind};
use crate::renderer::CanvasSurface;
use crate::scheduler::LoopHandle;
use crate::settings::Settings;
use crate::table::Table;

/// Event listeners that are removed again on detach or drop
#[derive(Default)]
pub struct ListenerSet {
    entries: Vec<(EventTarget, &'static str, Closure<dyn FnMut(MouseEvent)>)>,
}

impl ListenerSet {
    pub fn add(&mut self, target: &EventTarget, kind: &'static str, handler: impl FnMut(MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            log::warn!("Cannot listen for {}: {:?}", kind, e);
            return;
        }
        self.entries.push((target.clone(), kind, closure));
    }

    pub fn detach(&mut self) {
        for (target, kind, closure) in self.entries.drain(..) {
            let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.detach();
    }
}

struct Shared {
    table: RefCell<Table>,
    surface: RefCell<CanvasSurface>,
    last_time: Cell<f64>,
    handle: LoopHandle,
    /// Page-level swatch buttons, hidden while nothing is selected
    picker: Option<Element>,
}

/// A running table in the page
pub struct WebApp {
    shared: Rc<Shared>,
    listeners: ListenerSet,
}

impl WebApp {
    /// Stop the frame loop and detach every listener
    pub fn stop(&mut self) {
        self.shared.handle.stop();
        self.listeners.detach();
    }

    pub fn restart(&self) {
        self.shared.table.borrow_mut().restart();
    }

    pub fn choose_color(&self, color: &str) {
        self.shared.table.borrow_mut().choose_color(color);
    }

    pub fn selected_color(&self) -> Option<String> {
        self.shared.table.borrow().selected_color().map(str::to_string)
    }
}

/// Attach to the page and start the loop
pub fn start() -> Result<WebApp, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or("no #canvas element")?
        .dyn_into()?;

    // Write back the sanitized values so they can be edited in storage
    let settings = Settings::load();
    settings.save();
    canvas.set_width(settings.arena_width as u32);
    canvas.set_height(settings.arena_height as u32);

    let surface = CanvasSurface::new(&canvas).ok_or("canvas has no 2d context")?;
    let seed = js_sys::Date::now() as u64;
    let table = Table::new(&settings, seed);
    log::info!("Table created with seed {}", seed);

    let shared = Rc::new(Shared {
        table: RefCell::new(table),
        surface: RefCell::new(surface),
        last_time: Cell::new(0.0),
        handle: LoopHandle::new(),
        picker: document.get_element_by_id("color-menu"),
    });

    let mut listeners = ListenerSet::default();
    let target: &EventTarget = canvas.as_ref();
    for (kind, pointer) in [
        ("mousedown", PointerKind::Press),
        ("mousemove", PointerKind::Move),
        ("mouseup", PointerKind::Release),
        ("dblclick", PointerKind::DoubleActivate),
    ] {
        let shared = shared.clone();
        let canvas = canvas.clone();
        listeners.add(target, kind, move |event: MouseEvent| {
            let pos = to_arena(&canvas, &event);
            shared.table.borrow_mut().pointer(PointerEvent { kind: pointer, pos });
        });
    }

    if let Some(button) = document.get_element_by_id("start-btn") {
        let shared = shared.clone();
        let target: &EventTarget = button.as_ref();
        listeners.add(target, "click", move |_event: MouseEvent| {
            shared.table.borrow_mut().restart();
        });
    } else {
        log::warn!("No #start-btn, table stays empty until restart() is called");
    }

    build_color_picker(&document, &shared, &mut listeners)?;

    request_animation_frame(shared.clone());
    log::info!("Billiards running ({} listeners)", listeners.len());

    Ok(WebApp { shared, listeners })
}

/// One button per palette color under `#color-menu`
fn build_color_picker(document: &Document, shared: &Rc<Shared>, listeners: &mut ListenerSet) -> Result<(), JsValue> {
    let Some(picker) = shared.picker.as_ref() else {
        log::info!("No #color-menu, colors are picked from the canvas menu only");
        return Ok(());
    };

    let palette = shared.table.borrow().controller().palette().to_vec();
    for color in palette {
        let button = document.create_element("button")?;
        button.set_attribute("style", &format!("background-color: {}; width: 20px; height: 20px", color))?;
        button.set_attribute("title", &color)?;
        picker.append_child(&button)?;

        let shared = shared.clone();
        let target: &EventTarget = button.as_ref();
        listeners.add(target, "click", move |_event: MouseEvent| {
            shared.table.borrow_mut().choose_color(&color);
        });
    }
    Ok(())
}

/// Mouse position in arena units (canvas may be CSS-scaled)
fn to_arena(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
    let css = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
    let pixels = Vec2::new(canvas.width() as f32, canvas.height() as f32);
    let scale = if css.x > 0.0 && css.y > 0.0 { pixels / css } else { Vec2::ONE };
    Vec2::new(event.offset_x() as f32, event.offset_y() as f32) * scale
}

fn request_animation_frame(shared: Rc<Shared>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        frame_loop(shared, time);
    });
    if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed, frame loop ends: {:?}", e);
        return;
    }
    closure.forget();
}

fn frame_loop(shared: Rc<Shared>, time: f64) {
    if !shared.handle.is_running() {
        return;
    }

    let last = shared.last_time.replace(time);
    let elapsed = if last > 0.0 { ((time - last) / 1000.0) as f32 } else { 0.0 };

    {
        let mut table = shared.table.borrow_mut();
        let mut surface = shared.surface.borrow_mut();
        table.frame(elapsed, &mut *surface);
    }

    if let Some(picker) = shared.picker.as_ref() {
        let open = shared.table.borrow().selected_color().is_some();
        if let Err(e) = picker.toggle_attribute_with_force("hidden", !open) {
            log::warn!("Cannot toggle #color-menu: {:?}", e);
        }
    }

    request_animation_frame(shared);
}
