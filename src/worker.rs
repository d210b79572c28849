//! Simulation worker thread feeding the viewer.
//!
//! The worker owns the `Simulation`; one tick runs to completion before a
//! frame is captured, so the viewer only ever sees committed state.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use tracing::{error, info, trace, warn};

use crate::sim::Simulation;
use crate::ui::viewdata::{Control, UiFrame};

pub fn spawn(
    sim: Simulation,
    tick_rate_hz: f64,
    ui_tx: Sender<UiFrame>,
    control_rx: Receiver<Control>,
    exiting: Arc<AtomicBool>,
) -> std::io::Result<thread::JoinHandle<()>> {
    let tick_rate_hz = if tick_rate_hz.is_finite() && tick_rate_hz > 0.0 {
        tick_rate_hz
    } else {
        warn!(tick_rate_hz, "invalid tick rate, using 60 Hz");
        60.0
    };
    thread::Builder::new()
        .name("simulation".into())
        .spawn(move || worker_loop(sim, tick_rate_hz, ui_tx, control_rx, exiting))
}

fn apply(sim: &mut Simulation, control: Control) {
    // Rejections are already logged by the clock.
    let _ = match control {
        Control::SetCoupling(k) => sim.set_coupling(k),
        Control::SetTimeStep(dt) => sim.set_time_step(dt),
    };
}

fn worker_loop(
    mut sim: Simulation,
    tick_rate_hz: f64,
    ui_tx: Sender<UiFrame>,
    control_rx: Receiver<Control>,
    exiting: Arc<AtomicBool>,
) {
    let tick_duration = Duration::from_secs_f64(1.0 / tick_rate_hz);
    let mut next_deadline = Instant::now();
    let mut halted = false;
    info!(tick_rate_hz, "simulation worker started");

    loop {
        if exiting.load(Ordering::SeqCst) {
            info!(ticks = sim.clock().ticks(), "stopping simulation worker");
            break;
        }

        next_deadline += tick_duration;

        // Parameters only change between ticks.
        while let Ok(control) = control_rx.try_recv() {
            apply(&mut sim, control);
        }

        if !halted {
            let frame = match sim.tick() {
                Ok(_) => UiFrame::capture(&sim),
                Err(err) => {
                    error!(%err, "simulation halted");
                    halted = true;
                    UiFrame {
                        error: Some(err.to_string()),
                        ..UiFrame::capture(&sim)
                    }
                }
            };
            let _ = ui_tx.try_send(frame);
        }

        let now = Instant::now();
        if now < next_deadline {
            thread::sleep(next_deadline - now);
        } else {
            next_deadline = now;
            trace!("worker overrun");
        }
    }
}
