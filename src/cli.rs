use clap::{Parser, ValueEnum};

use crate::core::drive::DriveKind;

/// How the event stream is printed when no WAV is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Chosen bin index per event (control-rate view).
    Index,
    /// Output value in [-0.5, 0.5] per event (audio-rate view).
    Signal,
    /// One JSON object per event.
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "statfeed.toml")]
    pub config: String,

    /// Write the audio-rate output to a wav file
    #[arg(long)]
    pub wav: Option<String>,

    /// Seconds to render when writing wav
    #[arg(long, default_value_t = 2.0)]
    pub seconds: f32,

    /// Number of events to print when not writing wav
    #[arg(long, default_value_t = 32)]
    pub events: usize,

    /// Bins in use (overrides config)
    #[arg(long)]
    pub bins: Option<f32>,

    /// Exponent (overrides config)
    #[arg(long)]
    pub exponent: Option<f32>,

    /// Drive seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drive noise colour (overrides config)
    #[arg(long, value_enum)]
    pub drive: Option<DriveKind>,

    /// Printed event format
    #[arg(long, value_enum, default_value_t = OutputFormat::Index)]
    pub format: OutputFormat,

    /// tracing filter, e.g. "info" or "statfeed=debug"
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
