use eframe::egui;

use crate::data::fetch;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VeloScatterApp {
    pub state: AppState,
}

impl VeloScatterApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut state = AppState::default();
        // Kick off the initial download so the window opens onto live data.
        state.begin_fetch(fetch::spawn_fetch(
            fetch::DATA_URL.to_owned(),
            cc.egui_ctx.clone(),
        ));
        Self { state }
    }
}

impl eframe::App for VeloScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up a finished download before drawing anything.
        self.state.poll_fetch();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: legend, filters, detail card ----
        egui::SidePanel::left("rider_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: scatterplot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::race_plot(ui, &mut self.state);
        });
    }
}
