//! The shared world personas live in.
//!
//! The world owns turn order: every step, each persona acts once in
//! registration order, and whatever it says is heard by all the others
//! before the next persona acts.

use crate::error::TroupeError;
use crate::model::LanguageModel;
use crate::persona::Persona;
use std::sync::Arc;
use tracing::info;

/// Source name attached to broadcast stimuli.
pub const WORLD_SOURCE: &str = "world";

/// A named group of personas sharing one model.
pub struct World {
    name: String,
    personas: Vec<Persona>,
    model: Arc<dyn LanguageModel>,
    step: usize,
    broadcasts: Vec<String>,
}

impl World {
    pub fn new(
        name: impl Into<String>,
        personas: Vec<Persona>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            name: name.into(),
            personas,
            model,
            step: 0,
            broadcasts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver a message to every persona.
    pub fn broadcast(&mut self, message: &str) {
        info!(world = %self.name, recipients = self.personas.len(), "broadcast");
        for persona in &mut self.personas {
            persona.listen(WORLD_SOURCE, message);
        }
        self.broadcasts.push(message.to_string());
    }

    /// Advance the world by `steps` steps.
    pub async fn run(&mut self, steps: usize) -> Result<(), TroupeError> {
        for _ in 0..steps {
            self.step += 1;
            info!(world = %self.name, step = self.step, "step");

            for speaker in 0..self.personas.len() {
                let action = self.personas[speaker]
                    .act(self.model.as_ref(), &self.name)
                    .await?;

                let Some(speech) = action.speech else {
                    continue;
                };
                let speaker_name = self.personas[speaker].name().to_string();
                for (index, listener) in self.personas.iter_mut().enumerate() {
                    if index != speaker {
                        listener.listen(speaker_name.as_str(), speech.as_str());
                    }
                }
            }
        }
        Ok(())
    }

    pub fn agent_by_name(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name() == name)
    }

    pub fn agents(&self) -> &[Persona] {
        &self.personas
    }

    /// Total steps advanced so far.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Every broadcast so far, oldest first.
    pub fn broadcasts(&self) -> &[String] {
        &self.broadcasts
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("name", &self.name)
            .field("personas", &self.personas.len())
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}
