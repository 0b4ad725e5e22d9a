//! Language-model-backed personas sharing a simulated world.
//!
//! This crate provides:
//! - `Persona`: a character sheet plus an episodic transcript
//! - `World`: broadcasts and sequential turn order for a group of personas
//! - `ResultsExtractor`: model-written summaries of a persona's transcript
//! - `LanguageModel`: the seam every model call goes through
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use troupe::{ClaudeModel, Persona, ResultsExtractor, World};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = Arc::new(ClaudeModel::from_env()?);
//!
//!     let mut thorin = Persona::new("Thorin");
//!     thorin.define("race", "Dwarf");
//!
//!     let mut world = World::new("Mountain Hall", vec![thorin], model.clone());
//!     world.broadcast("A horn sounds from the gate.");
//!     world.run(2).await?;
//!
//!     let mut extractor = ResultsExtractor::new(model);
//!     let thorin = world.agent_by_name("Thorin").expect("registered above");
//!     let summary = extractor
//!         .extract_results_from_agent(thorin, "Summarize what happened.", "A siege.")
//!         .await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod extraction;
pub mod model;
pub mod persona;
pub mod testing;
pub mod world;

pub use error::TroupeError;
pub use extraction::ResultsExtractor;
pub use model::{ClaudeModel, LanguageModel, ModelConfig, Prompt, Speaker, Turn};
pub use persona::{Action, Episode, EpisodicMemory, Persona};
pub use testing::ScriptedModel;
pub use world::World;
