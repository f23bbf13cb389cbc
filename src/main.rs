mod app;
mod color;
mod data;
mod state;
mod ui;

use app::VeloScatterApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Velo Scatter – Alpe d'Huez Race Times",
        options,
        Box::new(|cc| Ok(Box::new(VeloScatterApp::new(cc)))),
    )
}
