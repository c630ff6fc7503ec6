//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "pitune.toml";

#[derive(Parser, Debug)]
#[command(
    name = "pitune",
    version,
    about = "PI controller simulator and tuning advisor"
)]
pub struct Cli {
    /// Path to config TOML (default: ./pitune.toml when present, else built-in defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and logs as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ActingArg {
    /// error = setpoint - feedback
    Direct,
    /// error = feedback - setpoint
    Reverse,
}

/// Controller settings; each flag overrides the preset, which overrides `[controller]`.
#[derive(Args, Debug, Clone, Default)]
pub struct GainArgs {
    /// Start from a named preset (see `pitune presets`)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,
    /// Proportional gain
    #[arg(long, allow_negative_numbers = true)]
    pub kp: Option<f64>,
    /// Integral gain, per minute
    #[arg(long, allow_negative_numbers = true)]
    pub ki: Option<f64>,
    /// Integral rate limit, per minute (>= 0)
    #[arg(long, allow_negative_numbers = true)]
    pub imax: Option<f64>,
    /// Startup value of the integral (STUP)
    #[arg(long, alias = "stup", allow_negative_numbers = true)]
    pub istartup: Option<f64>,
    /// Integral magnitude limit (>= 0)
    #[arg(long, allow_negative_numbers = true)]
    pub ilimit: Option<f64>,
    /// Acting direction
    #[arg(long, value_enum)]
    pub acting: Option<ActingArg>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run controller ticks for one feedback/setpoint sample
    Step {
        /// Feedback (process value)
        #[arg(long, allow_negative_numbers = true)]
        fb: f64,
        /// Setpoint
        #[arg(long, allow_negative_numbers = true)]
        sp: f64,
        #[command(flatten)]
        gains: GainArgs,
        /// Integral carried over from a previous step (default: startup value)
        #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
        integral: Option<f64>,
        /// Number of 1-second ticks to run with these inputs
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        ticks: u32,
    },
    /// Interactive session: read `<fb> <sp>`, `reset`, or `set <key> <value>` lines from stdin
    Session {
        #[command(flatten)]
        gains: GainArgs,
    },
    /// Suggest Kp/Ki from a logged CSV (Time,Feedback,Setpoint)
    Suggest {
        /// Process log CSV
        #[arg(long, value_name = "FILE")]
        log: PathBuf,
        /// Write the replayed curves to this CSV
        #[arg(long, value_name = "FILE")]
        replay_out: Option<PathBuf>,
    },
    /// List the preset catalog
    Presets,
    /// Print (or write) a starter log CSV
    Template {
        /// Output file (default: stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}
