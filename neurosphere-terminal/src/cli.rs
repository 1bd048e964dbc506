use clap::Parser;
use std::path::PathBuf;

/// NeuroSphere - a rotating point-cloud sphere rendered in the terminal.
#[derive(Parser, Debug)]
#[command(name = "neurosphere", version, about)]
pub struct Args {
    /// Scene config file (TOML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the number of nodes on the sphere.
    #[arg(short, long)]
    pub nodes: Option<usize>,

    /// Target frames per second.
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
