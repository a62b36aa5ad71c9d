#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use series::SerialDecoder;

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // Must be asked before eframe spawns any thread.
    let decoder = SerialDecoder::local();
    log::info!("Decoding the exports with the offset {}", decoder.offset());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Power dashboard",
        native_options,
        Box::new(move |cc| Box::new(power_dashboard::PowerApp::new(cc, decoder))),
    )
    .map_err(|e| anyhow::anyhow!("Could not start the dashboard: {e}"))
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let decoder = SerialDecoder::local();
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        eframe::WebRunner::new()
            .start(
                "the_canvas_id", // hardcoded it here
                web_options,
                Box::new(move |cc| Box::new(power_dashboard::PowerApp::new(cc, decoder))),
            )
            .await
            .expect("failed to start eframe");
    });
}
