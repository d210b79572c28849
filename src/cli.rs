use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "phaselock.toml")]
    pub config: String,

    /// Run without GUI (headless)
    #[arg(long, default_value_t = false)]
    pub nogui: bool,

    /// Number of ticks to run headless
    #[arg(long, default_value_t = 1000)]
    pub ticks: u64,

    /// Coupling strength K (overrides config)
    #[arg(long)]
    pub coupling: Option<f64>,

    /// Integration time step dt (overrides config)
    #[arg(long)]
    pub time_step: Option<f64>,

    /// Print the headless summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Log filter, e.g. "info" or "phaselock=debug" (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}
