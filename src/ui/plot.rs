use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::blues_ramp_color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Frequency chart + table (central panel)
// ---------------------------------------------------------------------------

/// Render the bar chart and the frequency table in the central panel.
pub fn frequency_view(ui: &mut Ui, state: &AppState) {
    let output = match &state.output {
        Some(out) => out,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view state frequencies  (File → Open…)");
            });
            return;
        }
    };

    let selection = &output.selection;
    ui.heading(selection.title());

    if selection.is_empty() {
        ui.label("Nothing to show.");
        return;
    }

    let colors = blues_ramp_color32(selection.len());
    let bars: Vec<Bar> = selection
        .rows
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (row, color))| {
            Bar::new(i as f64, row.count as f64)
                .name(&row.state_label)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = selection
        .rows
        .iter()
        .map(|r| r.state_label.clone())
        .collect();

    let plot_height = (ui.available_height() * 0.55).max(160.0);
    Plot::new("frequency_plot")
        .height(plot_height)
        .x_axis_label("State")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Count"));
        });

    ui.add_space(8.0);
    frequency_table(ui, state);
}

fn frequency_table(ui: &mut Ui, state: &AppState) {
    let Some(output) = &state.output else {
        return;
    };
    let rows = &output.selection.rows;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("State");
            });
            header.col(|ui| {
                ui.strong("Count");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui| {
                    ui.label(RichText::new(&r.state_label).monospace());
                });
                row.col(|ui| {
                    ui.label(r.count.to_string());
                });
            });
        });
}
