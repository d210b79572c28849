// Entry point: headless batch run, or the eframe viewer with a simulation worker.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use phaselock::app::App;
use phaselock::cli::Args;
use phaselock::config::AppConfig;
use phaselock::sim::headless;

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let mut cfg = AppConfig::load_or_default(&args.config);
    if let Some(k) = args.coupling {
        cfg.simulation.coupling = k;
    }
    if let Some(dt) = args.time_step {
        cfg.simulation.time_step = dt;
    }
    let mut sim = cfg.build_simulation()?;

    if args.nogui {
        let summary = headless::run(&mut sim, args.ticks)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", summary.to_text());
        }
        return Ok(());
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    let tick_rate_hz = cfg.simulation.tick_rate_hz;
    eframe::run_native(
        "Kuramoto Model",
        native_options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, sim, tick_rate_hz, stop_flag)))),
    )?;
    Ok(())
}
