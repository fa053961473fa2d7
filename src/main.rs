mod game;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use game::content::{Content, ContentSource};
use game::GameConfig;

const SCENARIOS_ENV: &str = "THIEF_SCENARIOS";
const SAVE_ENV: &str = "THIEF_SAVE";

/// Positional argument first, then the environment, then the default.
fn resolve_config(args: &[String]) -> GameConfig {
    let mut config = GameConfig::default();

    let scenarios = args
        .get(1)
        .cloned()
        .or_else(|| std::env::var(SCENARIOS_ENV).ok());
    config.content = match scenarios.as_deref() {
        None | Some("-") | Some("") => ContentSource::Bundled,
        Some(path) => ContentSource::File(PathBuf::from(path)),
    };

    if let Some(path) = args
        .get(2)
        .cloned()
        .or_else(|| std::env::var(SAVE_ENV).ok())
        .filter(|p| !p.is_empty())
    {
        config.save_path = PathBuf::from(path);
    }

    config
}

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   cargo run   # session start/end, choices, saves
    //   RUST_LOG=debug  cargo run   # + raw deltas, parsed selections, file paths
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args
        .get(1)
        .is_some_and(|a| a == "-h" || a == "--help")
    {
        println!(
            "Usage: thief [scenarios.json|-] [savegame.json]\n\
             \n\
             Without arguments the bundled scenarios are played and the game is\n\
             saved to ./savegame.json. {SCENARIOS_ENV} and {SAVE_ENV} are used when\n\
             the matching argument is missing.\n\
             \n\
             Logging: set RUST_LOG=debug for verbose output"
        );
        return Ok(());
    }

    let config = resolve_config(&args);
    info!(
        "Content: {}, save file: {}",
        config.content,
        config.save_path.display()
    );

    let content = Content::load(&config.content)
        .with_context(|| format!("could not load scenarios from {}", config.content))?;

    let ending = game::run(&content, &config)?;
    info!("Exiting after {ending:?}");
    Ok(())
}
