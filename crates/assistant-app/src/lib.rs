//! Woodworking Assistant: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters and the conversation manager and
//! hands them to the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use assistant_platform::storage::auto_detect_storage;
use assistant_types::config::StorageConfig;

/// WASM entry point, called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Woodworking assistant starting...");

    // Settings always live in browser storage, whatever backend the
    // session itself is configured to use.
    let config_storage = auto_detect_storage(&StorageConfig::default());
    let config = app::load_config(config_storage.as_ref()).await;

    let web_options = eframe::WebOptions::default();

    let document = web_sys::window()
        .expect("No window")
        .document()
        .expect("No document");
    let canvas = document
        .get_element_by_id("assistant_canvas")
        .expect("No canvas element with id 'assistant_canvas'")
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .expect("Element is not a canvas");

    wasm_bindgen_futures::spawn_local(async move {
        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(app::AssistantApp::new(cc, config, config_storage)))),
            )
            .await
            .expect("Failed to start eframe");
    });
}
