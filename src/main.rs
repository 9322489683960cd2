//! Billiards entry point
//!
//! On the web this attaches to the page and runs until `stop()` is called.
//! Natively it plays a scripted break shot headless and logs what happened.

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;

    use billiards::platform::web::{self, WebApp};
    use wasm_bindgen::prelude::*;

    thread_local! {
        static APP: RefCell<Option<WebApp>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Billiards starting...");
        let app = web::start()?;
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        Ok(())
    }

    /// Stop the loop and detach all listeners
    #[wasm_bindgen]
    pub fn stop() {
        APP.with(|slot| {
            if let Some(mut app) = slot.borrow_mut().take() {
                app.stop();
            }
        });
    }

    #[wasm_bindgen]
    pub fn restart() {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                app.restart();
            }
        });
    }

    /// Callback for an external color picker
    #[wasm_bindgen]
    pub fn choose_color(color: &str) {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                app.choose_color(color);
            }
        });
    }

    #[wasm_bindgen]
    pub fn selected_color() -> Option<String> {
        APP.with(|slot| slot.borrow().as_ref().and_then(|app| app.selected_color()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use billiards::interaction::PointerEvent;
    use billiards::renderer::RecordingSurface;
    use billiards::{CollisionModel, Settings, Table};

    env_logger::init();
    log::info!("Billiards (native) starting...");

    // Usage: billiards [frames] [velocity_swap|spring_impulse]
    let args: Vec<String> = std::env::args().collect();
    let frames: u32 = args.get(1).and_then(|arg| arg.parse().ok()).unwrap_or(600);

    let mut settings = Settings::load();
    if let Some(arg) = args.get(2) {
        match arg.parse::<CollisionModel>() {
            Ok(model) => settings.collision_model = model,
            Err(e) => log::warn!("{}, keeping {}", e, settings.collision_model),
        }
    }
    log::info!("Collision model: {}", settings.collision_model);
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });

    let mut table = Table::new(&settings, seed);
    table.restart();

    let Some(cue) = table.world().balls().first().map(|b| b.pos) else {
        log::warn!("Rack is empty, nothing to simulate");
        return;
    };

    // Break shot: grab the bottom ball and pull up toward the rack
    table.pointer(PointerEvent::press(cue.x, cue.y));
    table.pointer(PointerEvent::moved(cue.x + 4.0, cue.y - 120.0));
    let outcome = table.pointer(PointerEvent::release(cue.x + 4.0, cue.y - 120.0));
    log::info!("Break: {:?}", outcome);

    let mut surface = RecordingSurface::default();
    let dt = 1.0 / settings.tick_rate_hz;
    let mut ticks = 0u64;
    for frame in 1..=frames {
        ticks += table.frame(dt, &mut surface) as u64;

        if frame % 60 == 0 {
            let world = table.world();
            let moving = world.balls().iter().filter(|b| b.vel.length() > 0.05).count();
            let speed: f32 = world.balls().iter().map(|b| b.vel.length()).sum();
            log::info!("frame {}: {} of {} balls moving, total speed {:.2}", frame, moving, world.len(), speed);
        }
    }

    println!(
        "Simulated {} frames ({} ticks) with {} balls, seed {}",
        surface.frames(),
        ticks,
        table.world().len(),
        seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
