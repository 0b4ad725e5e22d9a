//! The dungeon adventure: opening briefing, random events, final summary.

use crate::characters::{create_dnd_character, PARTY};
use crate::events::{event_resolution, random_event};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use troupe::{LanguageModel, ModelConfig, ResultsExtractor, TroupeError, World};

pub const WORLD_NAME: &str = "Dungeon Adventure";

pub const OPENING_BROADCAST: &str = "\
Adventurers, before you lies a mysterious dungeon, rumored to hold a legendary treasure.
You must work together to overcome its traps and enemies and find the way out.

Please discuss the following questions:
1. Who will lead the party?
2. How will you deal with potential dangers?
3. If you find the treasure, how will it be divided?";

pub const EXTRACTION_OBJECTIVE: &str =
    "Summarize the party's discussions, including strategy, division of roles, and team dynamics.";

pub const SITUATION: &str =
    "An adventuring party enters a dungeon and discusses how to face its challenges and random events.";

pub const SUMMARY_BANNER: &str = "\n====== Dungeon Adventure Summary ======\n";

/// Errors from running the scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Simulation error: {0}")]
    Troupe(#[from] TroupeError),

    #[error("No agent named {0} in the world")]
    MissingAgent(String),

    #[error("No API key configured - set ANTHROPIC_API_KEY environment variable")]
    NoApiKey,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Configuration for one adventure.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Name of the shared world.
    pub world_name: String,

    /// World steps after the opening briefing and after each event.
    pub steps_per_round: usize,

    /// Number of random events.
    pub event_rounds: usize,

    /// Whose transcript gets summarized at the end.
    pub leader: String,

    /// Seed for event selection; random when unset.
    pub seed: Option<u64>,

    /// Model to use for personas and extraction.
    pub model: Option<String>,

    /// Maximum tokens per model reply.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            world_name: WORLD_NAME.to_string(),
            steps_per_round: 4,
            event_rounds: 3,
            leader: "Thorin".to_string(),
            seed: None,
            model: None,
            max_tokens: 1024,
            temperature: Some(0.8),
        }
    }
}

impl ScenarioConfig {
    pub fn with_steps_per_round(mut self, steps: usize) -> Self {
        self.steps_per_round = steps;
        self
    }

    pub fn with_event_rounds(mut self, rounds: usize) -> Self {
        self.event_rounds = rounds;
        self
    }

    pub fn with_leader(mut self, leader: impl Into<String>) -> Self {
        self.leader = leader.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Generation settings for the Claude-backed model.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// RNG for event selection, seeded if a seed was given.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Create the party and put it in a fresh world.
pub fn build_world(model: Arc<dyn LanguageModel>, config: &ScenarioConfig) -> World {
    let party = PARTY.iter().map(create_dnd_character).collect();
    World::new(config.world_name.as_str(), party, model)
}

/// Play the whole adventure and return the leader's summary.
pub async fn run_adventure<R: Rng>(
    world: &mut World,
    extractor: &mut ResultsExtractor,
    rng: &mut R,
    config: &ScenarioConfig,
) -> Result<String, ScenarioError> {
    info!(world = world.name(), "opening briefing");
    world.broadcast(OPENING_BROADCAST);
    world.run(config.steps_per_round).await?;

    for round in 1..=config.event_rounds {
        let event = random_event(rng);
        info!(round, event = event.description, "random event");
        event_resolution(event, world, config.steps_per_round).await?;
    }

    let leader = world
        .agent_by_name(&config.leader)
        .ok_or_else(|| ScenarioError::MissingAgent(config.leader.clone()))?;

    let summary = extractor
        .extract_results_from_agent(leader, EXTRACTION_OBJECTIVE, SITUATION)
        .await?;
    Ok(summary)
}
