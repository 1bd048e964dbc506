/// NeuroSphere Terminal Demo - Rotating neural sphere
///
/// Renders the sphere visualization with colored characters.
/// Controls:
///   - Space: Pause / resume
///   - A/D / Left/Right: Spin the sphere
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use log::info;
use neurosphere_core::SceneConfig;
use neurosphere_terminal::TerminalApp;
use std::fs;

mod cli;

fn load_config(args: &cli::Args) -> Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config = SceneConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            info!("loaded config from {}", path.display());
            config
        }
        None => SceneConfig::default(),
    };

    if let Some(nodes) = args.nodes {
        config.node_count = nodes;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = cli::parse();

    let level = args.log_level.as_deref().unwrap_or("warn");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&args)?;
    info!(
        "starting with {} nodes at {} fps",
        config.node_count, args.fps
    );

    let mut app = TerminalApp::new(config, args.fps).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    println!("Thank you for using NeuroSphere!");
    Ok(())
}
