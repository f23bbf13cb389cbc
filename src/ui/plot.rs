use std::ops::RangeInclusive;

use eframe::egui::{self, Ui};
use egui_plot::{GridMark, Legend, MarkerShape, Plot, PlotPoint, Points};

use crate::color;
use crate::data::model::{RaceRecord, format_seconds_tick};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Race-time scatterplot (central panel)
// ---------------------------------------------------------------------------

/// Mark radius in points, shared by drawing and hover hit-testing.
const MARK_RADIUS: f32 = 6.0;

/// Render the scatterplot in the central panel.
pub fn race_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.heading("Downloading race results…");
            } else {
                ui.heading("No dataset loaded  (Data → Refresh)");
            }
        });
        return;
    };

    let (year_lo, year_hi) = dataset.year_bounds();
    let (time_lo, time_hi) = dataset.time_bounds();

    // Split the visible records into the two colour groups for the legend,
    // remembering each mark's record index for hit-testing.
    let mut clean: Vec<[f64; 2]> = Vec::new();
    let mut doping: Vec<[f64; 2]> = Vec::new();
    let mut positions: Vec<([f64; 2], usize)> = Vec::new();
    for &idx in &state.visible_indices {
        let rec = &dataset.records[idx];
        let pos = [f64::from(rec.year), f64::from(rec.time.total_seconds())];
        positions.push((pos, idx));
        if rec.doping_flag() {
            doping.push(pos);
        } else {
            clean.push(pos);
        }
    }

    let response = Plot::new("race_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Ascent time")
        .x_axis_formatter(year_tick_label)
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format_seconds_tick(mark.value)
        })
        .include_x(year_lo)
        .include_x(year_hi)
        .include_y(time_lo)
        .include_y(time_hi)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(clean)
                    .name("No allegations")
                    .color(color::CLEAN)
                    .filled(true)
                    .radius(MARK_RADIUS)
                    .shape(MarkerShape::Circle),
            );
            plot_ui.points(
                Points::new(doping)
                    .name("Doping allegation")
                    .color(color::DOPING)
                    .filled(true)
                    .radius(MARK_RADIUS)
                    .shape(MarkerShape::Circle),
            );

            // Hit test in screen space so the hover zone matches the
            // drawn radius at any zoom level.
            let hovered = plot_ui.pointer_coordinate().and_then(|pointer| {
                let cursor = plot_ui.screen_from_plot(pointer);
                positions
                    .iter()
                    .map(|&(pos, idx)| {
                        let center = plot_ui.screen_from_plot(PlotPoint::new(pos[0], pos[1]));
                        (center.distance(cursor), idx)
                    })
                    .filter(|&(dist, _)| dist <= MARK_RADIUS + 1.0)
                    .min_by(|a, b| a.0.total_cmp(&b.0))
                    .map(|(_, idx)| idx)
            });

            // Redraw the hovered mark lightened, on top of its group.
            if let Some(idx) = hovered {
                let rec = &dataset.records[idx];
                let pos = [f64::from(rec.year), f64::from(rec.time.total_seconds())];
                plot_ui.points(
                    Points::new(vec![pos])
                        .color(color::highlight(color::mark_color(rec.doping_flag())))
                        .filled(true)
                        .radius(MARK_RADIUS)
                        .shape(MarkerShape::Circle),
                );
            }

            hovered
        });

    let hovered = response.inner;

    if let Some(idx) = hovered {
        let rec = &dataset.records[idx];
        egui::show_tooltip_at_pointer(
            &response.response.ctx,
            response.response.layer_id,
            egui::Id::new("mark_tooltip"),
            |ui: &mut Ui| {
                let [header, result, doping] = tooltip_lines(rec);
                ui.strong(header);
                ui.label(result);
                ui.label(doping);
            },
        );
    }

    // A click selects the hovered mark; clicking empty plot clears the
    // selection.
    if response.response.clicked() {
        if let Some(idx) = hovered {
            let rec = &dataset.records[idx];
            log::debug!(
                "Selected {} ({}, {})",
                rec.name,
                rec.year,
                rec.time.iso_timestamp()
            );
        }
        state.selected = hovered;
    }
}

/// Integer year labels; fractional grid lines get no label.
fn year_tick_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

/// The three tooltip lines for a record.
pub fn tooltip_lines(record: &RaceRecord) -> [String; 3] {
    [
        format!("{} ({})", record.name, record.nationality),
        format!("Year: {}, Time: {}", record.year, record.time),
        record.doping_text().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RaceRecord, RawRecord};

    fn record(doping: &str) -> RaceRecord {
        RaceRecord::from_raw(RawRecord {
            time: "36:40".to_string(),
            place: 1,
            seconds: 2200,
            name: "Marco".to_string(),
            year: 1998,
            nationality: "ITA".to_string(),
            doping: doping.to_string(),
            url: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_tooltip_lines_name_year_time() {
        let lines = tooltip_lines(&record(""));
        assert_eq!(lines[0], "Marco (ITA)");
        assert_eq!(lines[1], "Year: 1998, Time: 36:40");
        assert_eq!(lines[2], "No doping allegations");
    }

    #[test]
    fn test_tooltip_lines_show_allegation_text() {
        let lines = tooltip_lines(&record("EPO admission"));
        assert_eq!(lines[2], "EPO admission");
    }

    #[test]
    fn test_year_ticks_are_plain_integers() {
        let mark = |value: f64| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(year_tick_label(mark(1998.0), &(0.0..=1.0)), "1998");
        assert_eq!(year_tick_label(mark(1998.5), &(0.0..=1.0)), "");
    }
}
