use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Mark colours for the two doping categories
// ---------------------------------------------------------------------------

/// Riders with no allegation on record.
pub const CLEAN: Color32 = Color32::from_rgb(0, 128, 0);
/// Riders with a doping allegation.
pub const DOPING: Color32 = Color32::from_rgb(255, 0, 0);

/// Colour for a record's mark, keyed by its doping flag.
pub fn mark_color(doping: bool) -> Color32 {
    if doping {
        DOPING
    } else {
        CLEAN
    }
}

/// Lightened variant drawn over a mark while it is hovered.
pub fn highlight(color: Color32) -> Color32 {
    let srgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = srgb.into_color();
    hsl.lightness = (hsl.lightness + 0.25).min(0.9);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
