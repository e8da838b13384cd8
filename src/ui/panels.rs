use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Table;
use crate::data::{export, loader};
use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Left side panel – the filter form
// ---------------------------------------------------------------------------

/// Render the filter form. Nothing recomputes until the Apply button is
/// pressed: one submission, one pass.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Branding (centered) ----
    let banner = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(banner)
                .max_width(ui.available_width() * 0.8)
                .max_height(90.0)
                .rounding(4.0),
        );
    });
    ui.add_space(4.0);

    ui.heading("Filters");
    ui.separator();

    if state.raw.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone the option lists so we can mutate state inside the loop.
    let options = state.options.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Chart type ----
            ui.strong("Chart type");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut state.chart_kind, ChartKind::Bar, "Bars");
                ui.radio_value(&mut state.chart_kind, ChartKind::Pie, "Pie");
            });
            ui.separator();

            // ---- Age range (inclusive at both ends) ----
            ui.strong("Age");
            let (lo, hi) = state.age_bounds;
            ui.add(egui::Slider::new(&mut state.age_min, lo..=hi).text("from"));
            ui.add(egui::Slider::new(&mut state.age_max, lo..=hi).text("to"));
            state.clamp_age_range();
            ui.separator();

            // ---- Per-column multiselects (collapsible) ----
            for (column, entries) in &options {
                let selected = state.selections.entry(column.clone()).or_default();
                let header_text = format!("{column}  ({}/{})", selected.len(), entries.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(column);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(column);
                            }
                        });

                        // Re-borrow after potential mutation from All/None
                        let selected = state.selections.entry(column.clone()).or_default();

                        for value in entries {
                            let mut checked = selected.contains(value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                if checked {
                                    selected.insert(value.clone());
                                } else {
                                    selected.remove(value);
                                }
                            }
                        }
                    });
            }

            ui.add_space(8.0);
            if ui.button("Apply filters").clicked() {
                match state.apply_filters() {
                    Ok(()) => state.status_message = None,
                    Err(e) => {
                        log::error!("filter pass failed: {e}");
                        state.status_message = Some(format!("Error: {e}"));
                    }
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
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(raw), Some(filtered)) = (&state.raw, &state.filtered) {
            ui.label(format!(
                "{} rows loaded, {} after filters",
                raw.len(),
                filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bank marketing data")
        .add_filter("Supported files", &["csv", "xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Spreadsheet", &["xlsx", "xls"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(table) => {
                log::info!("Loaded {} rows, columns {:?}", table.len(), table.columns());
                if let Err(e) = state.set_dataset(table) {
                    log::error!("Dataset rejected: {e}");
                    state.status_message = Some(format!("Error: {e}"));
                }
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Ask where to save, serialize, and write. Export failures land in the
/// status bar like load failures do.
pub fn save_table_dialog(state: &mut AppState, table: &Table, default_name: &str) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save spreadsheet")
        .set_file_name(default_name)
        .add_filter("Excel workbook", &["xlsx"])
        .save_file()
    else {
        return;
    };

    let result = export::to_xlsx(table)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| {
            std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))
        });

    match result {
        Ok(()) => log::info!("Wrote {} rows to {}", table.len(), path.display()),
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
