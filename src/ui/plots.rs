use egui_plot::{HLine, Line, Plot, PlotPoints};

/// Max pairwise distance over the detector window, one point per tick.
pub fn distance_window_plot(
    ui: &mut egui::Ui,
    title: &str,
    time_step: f64,
    values: &[f64],
    ceiling: f64,
) {
    let points: PlotPoints = values
        .iter()
        .enumerate()
        .map(|(i, d)| [i as f64 * time_step, *d])
        .collect();
    let line = Line::new("max distance", points);

    ui.vertical(|ui| {
        ui.label(title);

        Plot::new(title)
            .height(150.0)
            .allow_scroll(false)
            .allow_drag(false)
            .include_y(0.0)
            .include_y(ceiling)
            .x_axis_formatter(|mark, _| format!("{:.2}", mark.value))
            .y_axis_formatter(|mark, _| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                plot_ui.hline(HLine::new("", ceiling).color(egui::Color32::DARK_GRAY));
                plot_ui.line(line);
            });
    });
}
