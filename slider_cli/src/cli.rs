//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "slider",
    version,
    about = "Gesture volume slider: finger distance to volume key pulses"
)]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/slider.toml")]
    pub config: PathBuf,

    /// Replay tracked points from a CSV trace (x1,y1,x2,y2) instead of the
    /// synthetic sweep
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Log as JSON lines instead of pretty, and print results as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calibrate, then run the control loop until Ctrl-C or end of trace
    Run {
        /// Stop after this many ticks
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Skip the startup calibration pulses and trust the configured volume
        #[arg(long, action = ArgAction::SetTrue)]
        no_calibrate: bool,
        /// Draw a volume bar on stderr every tick
        #[arg(long, action = ArgAction::SetTrue)]
        bar: bool,
        /// Print tick and latency stats
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Only send the calibration pulses and report the asserted volume
    Calibrate,
    /// Validate config and trace, build the pipeline, print `ok`
    SelfCheck,
}
