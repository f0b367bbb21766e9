use std::io::Cursor;
use std::sync::OnceLock;

use image::{ImageFormat, Rgb, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use thiserror::Error;

use crate::color::blues_ramp;
use crate::config::ChartConfig;
use crate::data::model::SelectionResult;

/// Default download name of the chart export.
pub const PNG_FILE_NAME: &str = "states_histogram.png";
pub const PNG_MIME: &str = "image/png";

const MIN_WIDTH: u32 = 120;
const MIN_HEIGHT: u32 = 100;

/// Family name the embedded font is registered under.
const FONT_FAMILY: &str = "sans-serif";
const LABEL_SIZE: i32 = 14;
/// Rough advance of one label character at `LABEL_SIZE`.
const LABEL_CHAR_PX: u32 = 8;

/// Why a chart could not be drawn. Never leaves this module: callers get a
/// placeholder image instead.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to plot")]
    NoCategories,

    #[error("chart size {width}x{height} is below the minimum")]
    Degenerate { width: u32, height: u32 },

    #[error("chart font could not be loaded")]
    FontUnavailable,

    #[error("drawing chart: {0}")]
    Draw(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Register the font bundled with egui once per process.
fn ensure_font() -> Result<(), RenderError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED.get_or_init(|| {
        register_font(FONT_FAMILY, FontStyle::Normal, epaint_default_fonts::UBUNTU_LIGHT)
            .is_ok()
    });
    if ok {
        Ok(())
    } else {
        Err(RenderError::FontUnavailable)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render the selection as a PNG bar chart titled "Top-N state frequencies":
/// labels along the x axis, counts on the y axis, bars in selection order.
///
/// Any rendering failure (including an empty selection) yields a blank
/// placeholder PNG instead.
pub fn render_png(selection: &SelectionResult, config: &ChartConfig) -> Vec<u8> {
    match try_render_png(selection, config) {
        Ok(bytes) => bytes,
        Err(RenderError::NoCategories) => {
            log::debug!("empty selection, exporting placeholder chart");
            placeholder_png(config)
        }
        Err(e) => {
            log::warn!("chart rendering failed, exporting placeholder: {e}");
            placeholder_png(config)
        }
    }
}

fn try_render_png(
    selection: &SelectionResult,
    config: &ChartConfig,
) -> Result<Vec<u8>, RenderError> {
    if selection.is_empty() {
        return Err(RenderError::NoCategories);
    }
    let (w, h) = (config.width, config.height);
    if w < MIN_WIDTH || h < MIN_HEIGHT {
        return Err(RenderError::Degenerate {
            width: w,
            height: h,
        });
    }
    ensure_font()?;

    let mut buf = vec![255u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        draw_chart(&root, selection, w, h)?;
        root.present().map_err(draw_err)?;
    }

    let img = RgbImage::from_raw(w, h, buf).ok_or(RenderError::Degenerate {
        width: w,
        height: h,
    })?;
    encode(&img)
}

/// A blank white image. Falls back to the default size when the configured
/// one is unusable.
fn placeholder_png(config: &ChartConfig) -> Vec<u8> {
    let (w, h) = if config.width < MIN_WIDTH || config.height < MIN_HEIGHT {
        let d = ChartConfig::default();
        (d.width, d.height)
    } else {
        (config.width, config.height)
    };
    let img = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));

    encode(&img).unwrap_or_else(|e| {
        log::error!("placeholder chart could not be encoded: {e}");
        Vec::new()
    })
}

fn encode(img: &RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_chart(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    selection: &SelectionResult,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_err)?;

    let n = selection.len();
    let labels: Vec<String> = selection
        .rows
        .iter()
        .map(|r| r.state_label.clone())
        .collect();

    // Labels too wide for their slot are drawn vertically.
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let slot_px = width.saturating_sub(90) / n as u32;
    let rotate = longest * LABEL_CHAR_PX > slot_px;
    let label_area = if rotate {
        (longest * LABEL_CHAR_PX + 24).clamp(40, (height / 3).max(40))
    } else {
        40
    };

    let max_count = selection.max_count().max(1);
    let y_max = max_count + max_count / 8 + 1;

    let mut chart = ChartBuilder::on(root)
        .caption(selection.title(), (FONT_FAMILY, 22))
        .margin(10)
        .x_label_area_size(label_area)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0u64..y_max)
        .map_err(draw_err)?;

    let label_font = if rotate {
        (FONT_FAMILY, LABEL_SIZE)
            .into_font()
            .transform(FontTransform::Rotate90)
    } else {
        (FONT_FAMILY, LABEL_SIZE).into_font()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(label_font)
        .y_label_style((FONT_FAMILY, 13))
        .x_desc("State")
        .y_desc("Count")
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()
        .map_err(draw_err)?;

    let colors = blues_ramp(n);
    chart
        .draw_series(selection.rows.iter().zip(colors).enumerate().map(
            |(i, (row, [r, g, b]))| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0),
                        (SegmentValue::Exact(i + 1), row.count),
                    ],
                    RGBColor(r, g, b).filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            },
        ))
        .map_err(draw_err)?;

    chart
        .draw_series(selection.rows.iter().enumerate().map(|(i, row)| {
            EmptyElement::at((SegmentValue::CenterOf(i), row.count))
                + Text::new(row.count.to_string(), (-4, -16), (FONT_FAMILY, 12))
        }))
        .map_err(draw_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FrequencyRow, SortOrder};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn selection(pairs: &[(&str, u64)]) -> SelectionResult {
        SelectionResult {
            rows: pairs.iter().map(|(l, c)| FrequencyRow::new(*l, *c)).collect(),
            order: SortOrder::Descending,
            top_n: pairs.len(),
        }
    }

    fn decode(bytes: &[u8]) -> RgbImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .unwrap()
            .to_rgb8()
    }

    #[test]
    fn renders_png_of_configured_size() {
        let cfg = ChartConfig::default();
        let bytes = try_render_png(&selection(&[("00", 3), ("01", 2)]), &cfg).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);
        let img = decode(&bytes);
        assert_eq!(img.dimensions(), (cfg.width, cfg.height));
    }

    #[test]
    fn different_labels_draw_different_charts() {
        let cfg = ChartConfig::default();
        let ab = try_render_png(&selection(&[("ab", 3)]), &cfg).unwrap();
        let xy = try_render_png(&selection(&[("xy", 3)]), &cfg).unwrap();
        assert_ne!(ab, xy);
    }

    #[test]
    fn caption_follows_effective_top_n() {
        let cfg = ChartConfig::default();
        let mut sel = selection(&[("00", 3), ("11", 1)]);
        let top_two = try_render_png(&sel, &cfg).unwrap();
        sel.top_n = 7;
        let top_seven = try_render_png(&sel, &cfg).unwrap();
        assert_ne!(top_two, top_seven);
    }

    #[test]
    fn caption_and_axis_descriptions_are_drawn() {
        let cfg = ChartConfig::default();
        let img = decode(&try_render_png(&selection(&[("0", 1)]), &cfg).unwrap());
        let inked = |x: u32, y: u32| img.get_pixel(x, y).0.iter().any(|&c| c < 128);
        // Caption band above the plot area.
        assert!((0..cfg.width).any(|x| (0..30).any(|y| inked(x, y))));
        // "Count" runs along the left edge.
        assert!((10..30).any(|x| (100..300).any(|y| inked(x, y))));
        // "State" sits under the tick labels.
        assert!((0..cfg.width).any(|x| (cfg.height - 30..cfg.height).any(|y| inked(x, y))));
    }

    #[test]
    fn first_bar_is_tallest_and_darkest_in_descending_selection() {
        let cfg = ChartConfig::default();
        let img = decode(&render_png(&selection(&[("00", 4), ("11", 1)]), &cfg));
        let ramp = blues_ramp(2);
        let count = |rgb: [u8; 3]| img.pixels().filter(|p| p.0 == rgb).count();
        assert!(count(ramp[0]) > count(ramp[1]));
        assert!(count(ramp[1]) > 0);
    }

    #[test]
    fn empty_selection_gives_placeholder() {
        let cfg = ChartConfig::default();
        let bytes = render_png(&SelectionResult::default(), &cfg);
        let img = decode(&bytes);
        assert_eq!(img.dimensions(), (cfg.width, cfg.height));
        let ramp = blues_ramp(1);
        assert!(img.pixels().all(|p| p.0 != ramp[0]));
    }

    #[test]
    fn degenerate_size_gives_default_sized_placeholder() {
        let cfg = ChartConfig {
            width: 0,
            height: 0,
        };
        let img = decode(&render_png(&selection(&[("0", 1)]), &cfg));
        let d = ChartConfig::default();
        assert_eq!(img.dimensions(), (d.width, d.height));
        assert!(matches!(
            try_render_png(&selection(&[("0", 1)]), &cfg),
            Err(RenderError::Degenerate { .. })
        ));
    }

    #[test]
    fn long_labels_are_rotated_and_still_render() {
        let pairs: Vec<(String, u64)> = (0..50)
            .map(|i| (format!("{i:016b}"), 1000 - i as u64))
            .collect();
        let refs: Vec<(&str, u64)> = pairs.iter().map(|(l, c)| (l.as_str(), *c)).collect();
        let bytes = try_render_png(&selection(&refs), &ChartConfig::default()).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    fn non_bitstring_labels_render() {
        let sel = selection(&[("|ψ⟩ up", 5), ("состояние", 2), ("a,b", 1)]);
        let bytes = try_render_png(&sel, &ChartConfig::default()).unwrap();
        assert_eq!(decode(&bytes).dimensions(), (1000, 400));
    }
}
