use eframe::egui::{ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Polygon};

use crate::color::OutcomeColors;
use crate::data::model::Table;
use crate::data::summary::DistributionSummary;
use crate::state::{AppState, ChartKind};
use crate::ui::panels;

/// How many leading rows of each table are shown.
const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Central panel – previews, charts, summaries, downloads
// ---------------------------------------------------------------------------

/// Render the report area: raw and filtered previews, the raw-vs-filtered
/// outcome charts, both distribution tables, and the spreadsheet downloads.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(raw) = &state.raw else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to begin  (File → Open…)");
        });
        return;
    };

    // Download clicks are collected during rendering and handled once the
    // borrows on the tables are released.
    let mut pending_download: Option<(Table, &'static str)> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Before filters");
            head_preview(ui, raw, "raw_head");
            ui.separator();

            ui.heading("After filters");
            match &state.filtered {
                Some(filtered) => {
                    head_preview(ui, filtered, "filtered_head");
                    if filtered.is_empty() {
                        ui.label("No rows match the current filters.");
                    }
                    if ui.button("📥 Filtered table (xlsx)").clicked() {
                        pending_download = Some((filtered.clone(), "bank_filtered.xlsx"));
                    }
                }
                None => {
                    ui.label("Apply the filters to derive a subset.");
                }
            }
            ui.separator();

            ui.heading("Outcome distribution");
            ui.columns(2, |cols: &mut [Ui]| {
                distribution_chart(
                    &mut cols[0],
                    "raw_chart",
                    "Raw data",
                    &state.raw_summary,
                    state.chart_kind,
                    &state.outcome_colors,
                );
                distribution_chart(
                    &mut cols[1],
                    "filtered_chart",
                    "Filtered data",
                    &state.filtered_summary,
                    state.chart_kind,
                    &state.outcome_colors,
                );
            });
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                summary_table(
                    &mut cols[0],
                    "raw_summary",
                    "Raw data",
                    &state.raw_summary,
                    &state.outcome_colors,
                );
                if cols[0].button("📥 Raw distribution (xlsx)").clicked() {
                    pending_download =
                        Some((state.raw_summary.to_table(), "bank_raw_distribution.xlsx"));
                }

                summary_table(
                    &mut cols[1],
                    "filtered_summary",
                    "Filtered data",
                    &state.filtered_summary,
                    &state.outcome_colors,
                );
                if cols[1].button("📥 Filtered distribution (xlsx)").clicked() {
                    pending_download = Some((
                        state.filtered_summary.to_table(),
                        "bank_filtered_distribution.xlsx",
                    ));
                }
            });
        });

    if let Some((table, default_name)) = pending_download {
        panels::save_table_dialog(state, &table, default_name);
    }
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

fn head_preview(ui: &mut Ui, table: &Table, id: &str) {
    ui.push_id(id, |ui: &mut Ui| {
        let shown = table.len().min(PREVIEW_ROWS);
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), table.columns().len())
            .header(20.0, |mut header| {
                for name in table.columns() {
                    header.col(|ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown, |mut row| {
                    let cells = &table.rows()[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}

fn summary_table(
    ui: &mut Ui,
    id: &str,
    title: &str,
    summary: &DistributionSummary,
    colors: &OutcomeColors,
) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(title);
    });
    if summary.is_empty() {
        ui.label("No rows to summarize.");
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(90.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("outcome");
                });
                header.col(|ui| {
                    ui.strong("percent");
                });
            })
            .body(|body| {
                body.rows(18.0, summary.entries.len(), |mut row| {
                    let entry = &summary.entries[row.index()];
                    row.col(|ui| {
                        ui.colored_label(colors.color_for(&entry.label), entry.label.as_str());
                    });
                    row.col(|ui| {
                        // Rounding happens here, at presentation time only.
                        ui.label(format!("{:.2}", entry.percent));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn distribution_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    summary: &DistributionSummary,
    kind: ChartKind,
    colors: &OutcomeColors,
) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(title);
    });
    if summary.is_empty() {
        ui.label("No data.");
        return;
    }
    match kind {
        ChartKind::Bar => bar_chart(ui, id, summary, colors),
        ChartKind::Pie => pie_chart(ui, id, summary, colors),
    }
}

fn bar_chart(ui: &mut Ui, id: &str, summary: &DistributionSummary, colors: &OutcomeColors) {
    Plot::new(id)
        .legend(Legend::default())
        .height(240.0)
        .y_axis_label("Share (%)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, entry) in summary.entries.iter().enumerate() {
                let bar = Bar::new(i as f64, entry.percent).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .color(colors.color_for(&entry.label))
                        .name(format!("{} ({:.2}%)", entry.label, entry.percent)),
                );
            }
        });
}

fn pie_chart(ui: &mut Ui, id: &str, summary: &DistributionSummary, colors: &OutcomeColors) {
    Plot::new(id)
        .legend(Legend::default())
        .height(240.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // Slices start at 12 o'clock and run counter-clockwise.
            let mut start_turn = 0.25;
            for entry in &summary.entries {
                let fraction = entry.percent / 100.0;
                let color = colors.color_for(&entry.label);
                plot_ui.polygon(
                    Polygon::new(slice_points(start_turn, fraction))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, color))
                        .name(format!("{} ({:.2}%)", entry.label, entry.percent)),
                );
                start_turn += fraction;
            }
        });
}

/// Unit-circle sector as a closed polygon: the center plus an arc sampled
/// finely enough to look round.
fn slice_points(start_turn: f64, fraction: f64) -> PlotPoints<'static> {
    let steps = ((fraction * 64.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let turn = start_turn + fraction * i as f64 / steps as f64;
        let angle = turn * std::f64::consts::TAU;
        points.push([angle.cos(), angle.sin()]);
    }
    PlotPoints::from(points)
}
