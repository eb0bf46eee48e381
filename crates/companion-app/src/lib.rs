//! Companion App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles all platform adapters and hands them to the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use companion_core::ports::StoragePort;
use companion_platform::storage::{auto_detect_storage, open_storage};
use companion_types::config::{CompanionConfig, CONFIG_STORAGE_KEY};

const CANVAS_ID: &str = "companion_canvas";

/// WASM entry point, called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Companion WASM starting...");

    let bootstrap = auto_detect_storage();
    let config = load_config(bootstrap.as_ref()).await;
    let storage = open_storage(&config.storage.backend);
    log::info!("Using {} storage", storage.backend_name());

    let Some(canvas) = find_canvas() else {
        log::error!("No canvas element with id '{}'", CANVAS_ID);
        return;
    };

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(app::CompanionApp::new(cc, config, storage)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}

fn find_canvas() -> Option<web_sys::HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(CANVAS_ID)?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()
}

/// Restore the saved config, or persist the defaults on first run.
async fn load_config(storage: &dyn StoragePort) -> CompanionConfig {
    match storage.get(CONFIG_STORAGE_KEY).await {
        Ok(Some(data)) => match serde_json::from_str::<CompanionConfig>(&data) {
            Ok(config) => {
                log::info!("Config restored from storage");
                return config;
            }
            Err(e) => log::warn!("Ignoring unreadable config: {}", e),
        },
        Ok(None) => {}
        Err(e) => log::warn!("Config restore failed: {}", e),
    }

    let config = CompanionConfig::default();
    if let Ok(json) = serde_json::to_string(&config) {
        if let Err(e) = storage.set(CONFIG_STORAGE_KEY, &json).await {
            log::warn!("Config save failed: {}", e);
        }
    }
    config
}
