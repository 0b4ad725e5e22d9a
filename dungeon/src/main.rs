//! Dungeon Adventure: a multi-agent D&D scenario.
//!
//! ```bash
//! cargo run -p dungeon -- --seed 7
//! RUST_LOG=troupe=info cargo run -p dungeon   # also show the dialogue
//! ```

use dungeon::cli::{parse_args, Command, USAGE};
use dungeon::scenario::SUMMARY_BANNER;
use dungeon::{build_world, run_adventure, ScenarioError};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use troupe::{ClaudeModel, LanguageModel, ResultsExtractor, TroupeError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            print!("{USAGE}");
            return Ok(());
        }
        Command::Run(config) => config,
    };

    let model = ClaudeModel::from_env()
        .map_err(|e| match e {
            TroupeError::Model(claude::Error::NoApiKey) => ScenarioError::NoApiKey,
            other => ScenarioError::Troupe(other),
        })?
        .with_config(config.model_config());
    let model: Arc<dyn LanguageModel> = Arc::new(model);

    let mut world = build_world(model.clone(), &config);
    let mut extractor = ResultsExtractor::new(model);
    let mut rng = config.rng();

    let summary = run_adventure(&mut world, &mut extractor, &mut rng, &config).await?;

    println!("{SUMMARY_BANNER}");
    println!("{summary}");
    Ok(())
}
