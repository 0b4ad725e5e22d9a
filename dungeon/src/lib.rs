//! Three adventurers, one dungeon.
//!
//! A scripted multi-agent D&D scenario on top of `troupe`: Thorin, Elena
//! and Shade get an opening briefing, talk it over, face a few random
//! events, and finally Thorin's transcript is summarized.
//!
//! ```ignore
//! use std::sync::Arc;
//! use dungeon::{build_world, run_adventure, ScenarioConfig};
//! use troupe::{ClaudeModel, ResultsExtractor};
//!
//! let config = ScenarioConfig::default().with_seed(7);
//! let model = Arc::new(ClaudeModel::from_env()?.with_config(config.model_config()));
//! let mut world = build_world(model.clone(), &config);
//! let mut extractor = ResultsExtractor::new(model);
//! let summary = run_adventure(&mut world, &mut extractor, &mut config.rng(), &config).await?;
//! ```

pub mod characters;
pub mod cli;
pub mod events;
pub mod scenario;

pub use characters::{create_dnd_character, CharacterSheet, PARTY};
pub use events::{event_resolution, random_event, Event, EVENTS};
pub use scenario::{build_world, run_adventure, ScenarioConfig, ScenarioError};
