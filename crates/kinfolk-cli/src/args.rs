//! Command-line argument definitions for the Kinfolk CLI.

use clap::Parser;

/// Command-line arguments for the kinfolk chart tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV person table; the built-in sample is used when omitted
    pub input: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Canvas width the chart is centered in, overriding the configuration
    #[arg(long)]
    pub width: Option<f32>,

    /// Render the built-in sample dataset and ignore INPUT
    #[arg(long)]
    pub sample: bool,

    /// Fail instead of falling back to the sample when INPUT cannot be loaded
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
