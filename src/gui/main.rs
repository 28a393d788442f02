#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod worker;

use app::Video2GifApp;
use video2gif::{augment_search_path, Toolchain};

fn main() -> Result<(), eframe::Error> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // Launched from a desktop shortcut, PATH may not include ffmpeg's usual homes.
    augment_search_path();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 320.0])
            .with_title("video2gif"),
        ..Default::default()
    };

    eframe::run_native(
        "video2gif",
        options,
        Box::new(|_cc| Ok(Box::new(Video2GifApp::new(Toolchain::default())))),
    )
}
