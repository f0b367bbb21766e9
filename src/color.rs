use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar colour ramp
// ---------------------------------------------------------------------------

const BLUE_HUE: f32 = 212.0;
const DARKEST: f32 = 0.28;
const LIGHTEST: f32 = 0.78;

/// `n` shades of blue from dark to light, one per bar.
///
/// The first bar (the strongest row of the selection) gets the darkest shade.
pub fn blues_ramp(n: usize) -> Vec<[u8; 3]> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 {
                0.0
            } else {
                i as f32 / (n - 1) as f32
            };
            let lightness = DARKEST + t * (LIGHTEST - DARKEST);
            let hsl = Hsl::new(BLUE_HUE, 0.65, lightness);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ]
        })
        .collect()
}

/// Same ramp as [`blues_ramp`], for egui widgets.
pub fn blues_ramp_color32(n: usize) -> Vec<Color32> {
    blues_ramp(n)
        .into_iter()
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
        .collect()
}
