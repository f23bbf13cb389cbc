use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color;
use crate::data::fetch;
use crate::data::model::RaceRecord;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – legend, filters, selected-rider card
// ---------------------------------------------------------------------------

/// Render the left rider panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Riders");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the widgets below.
    let nationalities: Vec<String> = dataset.nationalities.iter().cloned().collect();
    let selected_record: Option<RaceRecord> =
        state.selected.map(|idx| dataset.records[idx].clone());
    let (mut clean_count, mut doping_count) = (0usize, 0usize);
    for &idx in &state.visible_indices {
        if dataset.records[idx].doping_flag() {
            doping_count += 1;
        } else {
            clean_count += 1;
        }
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Legend with per-group counts ----
            ui.strong("Legend");
            ui.label(
                RichText::new(format!("● No allegations  ({clean_count})")).color(color::CLEAN),
            );
            ui.label(
                RichText::new(format!("● Doping allegation  ({doping_count})"))
                    .color(color::DOPING),
            );
            ui.separator();

            // ---- Doping status toggles ----
            ui.strong("Doping status");
            let mut show_clean = state.filters.show_clean;
            if ui.checkbox(&mut show_clean, "No allegations").changed() {
                state.filters.show_clean = show_clean;
                state.refilter();
            }
            let mut show_doping = state.filters.show_doping;
            if ui.checkbox(&mut show_doping, "Doping allegation").changed() {
                state.filters.show_doping = show_doping;
                state.refilter();
            }
            ui.separator();

            // ---- Nationality filter (collapsible) ----
            let n_selected = state.filters.nationalities.len();
            let header_text = format!("Nationality  ({n_selected}/{})", nationalities.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_nationalities();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_nationalities();
                        }
                    });

                    for nat in &nationalities {
                        let mut checked = state.filters.nationalities.contains(nat);
                        if ui.checkbox(&mut checked, nat).changed() {
                            state.toggle_nationality(nat);
                        }
                    }
                });
            ui.separator();

            // ---- Selected rider detail card ----
            ui.strong("Selected rider");
            match &selected_record {
                Some(rec) => {
                    ui.label(RichText::new(&rec.name).strong());
                    ui.label(format!("{}, place {}", rec.nationality, rec.place));
                    ui.label(format!("{}: {}", rec.year, rec.time));
                    ui.label(rec.doping_text());
                    if !rec.url.is_empty() {
                        ui.hyperlink_to("Reference", &rec.url);
                    }
                }
                None => {
                    ui.label("Click a mark to inspect it.");
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Data", |ui: &mut Ui| {
            if ui.button("Refresh").clicked() {
                let ctx = ui.ctx().clone();
                state.begin_fetch(fetch::spawn_fetch(fetch::DATA_URL.to_owned(), ctx));
                ui.close_menu();
            }
            if ui.button("Open local copy…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} race results, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if state.loading {
            ui.separator();
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open race results")
        .add_filter("Supported files", &["json", "csv"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} race results from {}",
                    dataset.len(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => state.set_load_error(e.to_string()),
        }
    }
}
