use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::series_colors;
use crate::plot::chart::{Chart, bar_layout, category_at};
use crate::plot::plan::ChartKind;
use crate::settings::Settings;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart canvas (central panel)
// ---------------------------------------------------------------------------

/// Render the committed chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.loaded.is_empty() {
                "Open CSV files to start  (File → Open…)"
            } else {
                "Pick a graph type and columns, then press Plot"
            };
            ui.heading(hint);
        });
        return;
    };

    let mut plot = Plot::new(("chart", state.chart_generation))
        .legend(Legend::default())
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if !chart.categories.is_empty() {
        let categories = chart.categories.clone();
        plot = plot.x_axis_formatter(move |mark, _range| {
            category_at(&categories, mark.value)
                .map(str::to_string)
                .unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| draw_series(plot_ui, chart, &state.settings));
}

fn draw_series(plot_ui: &mut egui_plot::PlotUi, chart: &Chart, settings: &Settings) {
    let colors = series_colors(chart.series.len());
    let count = chart.series.len();

    for (i, (series, color)) in chart.series.iter().zip(colors).enumerate() {
        match chart.kind {
            ChartKind::Line => {
                let mut segments = series.segments();
                // Keep all-missing series in the legend.
                if segments.is_empty() {
                    segments.push(Vec::new());
                }
                for segment in segments {
                    plot_ui.line(
                        Line::new(PlotPoints::from(segment))
                            .name(&series.label)
                            .color(color)
                            .width(settings.line_width),
                    );
                }
            }
            ChartKind::Scatter => {
                let points: PlotPoints = series.present_points().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&series.label)
                        .color(color)
                        .radius(settings.marker_radius),
                );
            }
            ChartKind::Bar => {
                let (offset, width) = bar_layout(i, count);
                let bars: Vec<Bar> = series
                    .present_points()
                    .map(|[x, y]| Bar::new(x + offset, y).width(width))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&series.label).color(color));
            }
        }
    }
}
