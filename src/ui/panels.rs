use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::error::format_bytes;
use crate::data::model::SortOrder;
use crate::export::Artifact;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – pipeline controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.output.is_none() {
        ui.label("No file loaded.");
        ui.add_space(4.0);
        ui.label(format!(
            "Open a .json file with a `statevector` list (max {}).",
            format_bytes(state.config.limits.max_upload_bytes)
        ));
        return;
    }

    // ---- Wildcard filter ----
    ui.strong("Filter by pattern");
    let mut pattern = state.request.pattern.clone();
    let response = ui.add(egui::TextEdit::singleline(&mut pattern).hint_text("e.g. 1**0"));
    ui.label(RichText::new("Each * matches exactly one character.").small());
    if response.changed() {
        state.set_pattern(pattern);
    }
    ui.separator();

    // ---- Sort direction ----
    ui.strong("Sort by frequency");
    let mut order = state.request.order;
    ui.horizontal(|ui: &mut Ui| {
        for choice in [SortOrder::Descending, SortOrder::Ascending] {
            ui.radio_value(&mut order, choice, choice.to_string());
        }
    });
    state.set_order(order);
    ui.separator();

    // ---- Top-N ----
    ui.strong("States shown");
    let max = state.slider_max();
    if max == 0 {
        ui.label("No states match the filter.");
    } else {
        let mut n = state.request.top_n.clamp(1, max);
        if ui.add(egui::Slider::new(&mut n, 1..=max)).changed() {
            state.set_top_n(n);
        }
    }
    ui.separator();

    // ---- Downloads ----
    ui.strong("Export");
    let Some(out) = &state.output else {
        return;
    };
    let table = out.exports.table.clone();
    let chart = out.exports.chart.clone();
    let mut saved = Ok(());
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Save CSV…").clicked() {
            saved = save_artifact_dialog(&table, "CSV", "csv");
        }
        if ui.button("Save PNG…").clicked() {
            saved = save_artifact_dialog(&chart, "PNG image", "png");
        }
    });
    if let Err(file_name) = saved {
        state.notices.push(format!("Could not save {file_name}."));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(out) = &state.output {
            let name = state.source_name.as_deref().unwrap_or("upload");
            ui.label(format!(
                "{name}: {} records, {} distinct states, {} shown",
                out.total_records,
                out.distinct_states,
                out.selection.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        for notice in &state.notices {
            ui.separator();
            ui.label(RichText::new(notice).color(Color32::YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measured states")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

/// Ask for a target path and write the artifact there. The error carries the
/// artifact's file name.
fn save_artifact_dialog(
    artifact: &Artifact,
    filter_name: &str,
    extension: &str,
) -> Result<(), &'static str> {
    let target = rfd::FileDialog::new()
        .set_title("Save export")
        .set_file_name(artifact.file_name)
        .add_filter(filter_name, &[extension])
        .save_file();

    let Some(path) = target else {
        return Ok(());
    };
    match std::fs::write(&path, &artifact.bytes) {
        Ok(()) => {
            log::info!(
                "Saved {} ({}, {} bytes) to {}",
                artifact.file_name,
                artifact.mime,
                artifact.bytes.len(),
                path.display()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to save {}: {e}", path.display());
            Err(artifact.file_name)
        }
    }
}
