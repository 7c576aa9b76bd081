//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

/// Shutterpost - button-triggered capture and upload pipeline
#[derive(Parser, Debug)]
#[command(
    name = "shutterpost",
    author,
    version,
    about = "Button-triggered capture and upload pipeline",
    long_about = "An edge-device pipeline that polls a physical button, captures a \n\
                  still image on each press, and uploads it over HTTP.\n\n\
                  Built without the real-hardware feature it simulates button \n\
                  presses and serves a canned image, so the pipeline can be \n\
                  exercised on any machine."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SHUTTERPOST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SHUTTERPOST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the capture/upload pipeline
    Run(RunArgs),

    /// Display the resolved configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Logical button line identifier
    #[arg(long, default_value = "GPIO26", env = "BUTTON")]
    pub button: String,

    /// Upload endpoint (a bare host:port is given an http scheme)
    #[arg(long, default_value = "localhost:1323", env = "POST_IMAGE_URL")]
    pub endpoint: String,

    /// Shared secret sent with every upload
    #[arg(
        long,
        default_value = "raspitoken",
        env = "RASPI_SECRET",
        hide_env_values = true
    )]
    pub secret: String,

    /// Button polling interval in milliseconds
    #[arg(long, default_value = "100", env = "SHUTTERPOST_INTERVAL_MS")]
    pub interval_ms: u64,

    /// Frame channel capacity
    #[arg(long, default_value = "10", env = "SHUTTERPOST_CAPACITY")]
    pub capacity: usize,

    /// Per-request upload timeout in seconds (0 = unbounded)
    #[arg(long, default_value = "10", env = "SHUTTERPOST_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Run duration limit in seconds (0 = run until interrupted)
    #[arg(long, default_value = "0", env = "SHUTTERPOST_TIMEOUT")]
    pub timeout: u64,

    /// Stop after this many captures (0 = unlimited)
    #[arg(long, default_value = "0", env = "SHUTTERPOST_MAX_CAPTURES")]
    pub max_captures: u64,

    /// V4L2 device index (real hardware only)
    #[arg(long, default_value = "0", env = "SHUTTERPOST_CAMERA_DEVICE")]
    pub camera_device: usize,

    /// Samples between simulated presses (demo mode only)
    #[arg(long, default_value = "20", env = "SHUTTERPOST_DEMO_PULSE")]
    pub demo_pulse: usize,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
