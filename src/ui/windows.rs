use egui::{CentralPanel, Color32, Pos2, SidePanel, Stroke, TopBottomPanel, Ui, vec2};

use crate::core::phase::circle_position;
use crate::sim::OscillatorId;
use crate::ui::plots::distance_window_plot;
use crate::ui::viewdata::{Control, UiFrame};

const COUPLING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;
const TIME_STEP_RANGE: std::ops::RangeInclusive<f64> = 0.001..=1.0;
const COUPLING_NUDGE: f64 = 0.0001;
const TIME_STEP_NUDGE: f64 = 0.001;

const PALETTE: [Color32; 6] = [
    Color32::RED,
    Color32::YELLOW,
    Color32::BLUE,
    Color32::GREEN,
    Color32::from_rgb(255, 128, 0),
    Color32::from_rgb(160, 32, 240),
];

fn oscillator_color(id: OscillatorId) -> Color32 {
    PALETTE[(id.0 as usize).saturating_sub(1) % PALETTE.len()]
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Slider state owned by the viewer.
///
/// The sliders keep their raw value; the core only ever sees it rounded to
/// three decimals, so small nudges accumulate until they show.
#[derive(Clone, Debug)]
pub struct ViewerState {
    pub coupling: f64,
    pub time_step: f64,
    pub draw_lines: bool,
    sent_coupling: f64,
    sent_time_step: f64,
}

impl ViewerState {
    pub fn new(coupling: f64, time_step: f64) -> Self {
        Self {
            coupling,
            time_step,
            draw_lines: false,
            sent_coupling: round3(coupling),
            sent_time_step: round3(time_step),
        }
    }

    pub fn nudge_coupling(&mut self, delta: f64) {
        self.coupling =
            (self.coupling + delta).clamp(*COUPLING_RANGE.start(), *COUPLING_RANGE.end());
    }

    pub fn nudge_time_step(&mut self, delta: f64) {
        self.time_step =
            (self.time_step + delta).clamp(*TIME_STEP_RANGE.start(), *TIME_STEP_RANGE.end());
    }

    /// Controls for every value whose rounded form changed since the last call.
    pub fn take_controls(&mut self) -> Vec<Control> {
        let mut out = Vec::new();
        let k = round3(self.coupling);
        if k != self.sent_coupling {
            self.sent_coupling = k;
            out.push(Control::SetCoupling(k));
        }
        let dt = round3(self.time_step);
        if dt != self.sent_time_step {
            self.sent_time_step = dt;
            out.push(Control::SetTimeStep(dt));
        }
        out
    }
}

fn controls_panel(ui: &mut Ui, frame: &UiFrame, state: &mut ViewerState) {
    ui.heading("Parameters");

    ui.add(
        egui::Slider::new(&mut state.coupling, COUPLING_RANGE)
            .step_by(0.001)
            .text("K"),
    );
    ui.horizontal(|ui| {
        if ui.button("-").clicked() {
            state.nudge_coupling(-COUPLING_NUDGE);
        }
        ui.label(format!("K = {:.3}", round3(state.coupling)));
        if ui.button("+").clicked() {
            state.nudge_coupling(COUPLING_NUDGE);
        }
    });

    ui.add(
        egui::Slider::new(&mut state.time_step, TIME_STEP_RANGE)
            .step_by(0.001)
            .text("dt"),
    );
    ui.horizontal(|ui| {
        if ui.button("-").clicked() {
            state.nudge_time_step(-TIME_STEP_NUDGE);
        }
        ui.label(format!("dt = {:.3}", round3(state.time_step)));
        if ui.button("+").clicked() {
            state.nudge_time_step(TIME_STEP_NUDGE);
        }
    });

    ui.separator();
    ui.label("Colors of oscillators:");
    for o in &frame.oscillators {
        ui.colored_label(
            oscillator_color(o.id),
            format!("{} (freq = {})", o.id, o.frequency),
        );
    }

    ui.separator();
    ui.checkbox(&mut state.draw_lines, "Draw lines");
}

fn status_panel(ui: &mut Ui, frame: &UiFrame) {
    ui.heading("Max distance between points");
    if let Some(record) = &frame.record {
        if let Some((a, b)) = record.pair {
            ui.label(format!("{a} - {b} = {:.3}", record.max_distance));
            for aux in &record.aux {
                ui.label(format!("{a} - {} = {:.3}", aux.other, aux.from_first));
                ui.label(format!("{b} - {} = {:.3}", aux.other, aux.from_second));
            }
        }
    }

    ui.separator();
    ui.label(format!("t={:.2}", frame.elapsed));
    match frame.synchronization_time {
        Some(t) => ui.label(format!("Synchronized at t=~{t:.3}")),
        None => ui.label("Not synchronized"),
    };
    if let Some(err) = &frame.error {
        ui.colored_label(Color32::RED, err);
    }

    ui.separator();
    distance_window_plot(
        ui,
        "Distance window",
        frame.time_step,
        &frame.history,
        frame.radius * std::f64::consts::PI,
    );
}

fn draw_circle(ui: &mut Ui, frame: &UiFrame, draw_lines: bool) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::WHITE);

    let center = rect.center();
    let fit = 0.45 * rect.width().min(rect.height());
    let radius = if frame.radius > 0.0 {
        (frame.radius as f32).min(fit)
    } else {
        fit
    };
    painter.circle_stroke(center, radius, Stroke::new(5.0, Color32::BLACK));

    let position = |phase: f64| -> Pos2 {
        let (x, y) = circle_position(phase, radius as f64);
        center + vec2(x as f32, y as f32)
    };
    let position_of = |id: OscillatorId| {
        frame
            .oscillators
            .iter()
            .find(|o| o.id == id)
            .map(|o| position(o.phase))
    };

    if draw_lines {
        if let Some((a, b)) = frame.record.as_ref().and_then(|r| r.pair) {
            let stroke = Stroke::new(3.0, Color32::BLACK);
            let mut segments = vec![(a, b)];
            if let Some(record) = &frame.record {
                for aux in &record.aux {
                    segments.push((a, aux.other));
                    segments.push((b, aux.other));
                }
            }
            for (from, to) in segments {
                if let (Some(p), Some(q)) = (position_of(from), position_of(to)) {
                    painter.line_segment([p, q], stroke);
                }
            }
        }
    }

    for o in &frame.oscillators {
        painter.circle_filled(position(o.phase), 10.0, oscillator_color(o.id));
    }
}

/// === Main window ===
pub fn main_window(ctx: &egui::Context, frame: &UiFrame, state: &mut ViewerState) {
    TopBottomPanel::top("top").show(ctx, |ui| {
        ui.heading("Kuramoto Model");
        ui.label(format!(
            "{} oscillators, K = {:.3}, dt = {:.3}, tick {}",
            frame.oscillators.len(),
            frame.coupling,
            frame.time_step,
            frame.ticks
        ));
    });

    SidePanel::left("controls").show(ctx, |ui| {
        controls_panel(ui, frame, state);
    });
    SidePanel::right("status")
        .min_width(280.0)
        .show(ctx, |ui| status_panel(ui, frame));
    CentralPanel::default().show(ctx, |ui| {
        draw_circle(ui, frame, state.draw_lines);
    });
}
