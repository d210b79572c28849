use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::*;

use crate::sim::Simulation;
use crate::ui::viewdata::{Control, UiFrame};
use crate::ui::windows::{ViewerState, main_window};
use crate::worker;

pub struct App {
    ui_frame_rx: Receiver<UiFrame>,
    control_tx: Sender<Control>,
    last_frame: UiFrame,
    viewer: ViewerState,
    worker_handle: Option<JoinHandle<()>>,
    exiting: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        sim: Simulation,
        tick_rate_hz: f64,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        let (ui_frame_tx, ui_frame_rx) = bounded::<UiFrame>(8);
        let (control_tx, control_rx) = bounded::<Control>(64);

        let viewer = ViewerState::new(sim.clock().coupling(), sim.clock().time_step());
        let last_frame = UiFrame::capture(&sim);

        let worker_handle = match worker::spawn(
            sim,
            tick_rate_hz,
            ui_frame_tx,
            control_rx,
            stop_flag.clone(),
        ) {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!(%err, "failed to spawn simulation worker");
                None
            }
        };

        cc.egui_ctx.set_visuals(egui::Visuals::light());

        Self {
            ui_frame_rx,
            control_tx,
            last_frame,
            viewer,
            worker_handle,
            exiting: stop_flag,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.exiting.load(Ordering::SeqCst) {
            info!("SIGINT received: closing window");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Pull newest frame (drain to latest)
        while let Ok(f) = self.ui_frame_rx.try_recv() {
            self.last_frame = f;
        }

        main_window(ctx, &self.last_frame, &mut self.viewer);

        for control in self.viewer.take_controls() {
            debug!(?control, "parameter change");
            if self.control_tx.try_send(control).is_err() {
                warn!(?control, "control channel full, change dropped");
            }
        }

        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.exiting.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}
