//! Results extraction: model-written summaries of a persona's transcript.

use crate::error::TroupeError;
use crate::model::{LanguageModel, Prompt};
use crate::persona::Persona;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Summarizes what a persona went through against a stated objective.
pub struct ResultsExtractor {
    model: Arc<dyn LanguageModel>,
    agent_extractions: HashMap<String, String>,
}

impl ResultsExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            agent_extractions: HashMap::new(),
        }
    }

    /// Ask the model to summarize `agent`'s full transcript.
    ///
    /// The result is cached under the agent's name, replacing any earlier
    /// extraction for that agent.
    pub async fn extract_results_from_agent(
        &mut self,
        agent: &Persona,
        extraction_objective: &str,
        situation: &str,
    ) -> Result<String, TroupeError> {
        info!(agent = agent.name(), episodes = agent.memory().len(), "extracting results");

        let prompt = Prompt::new(include_str!("prompts/extraction.txt"))
            .with_user(build_request(agent, extraction_objective, situation));

        let result = self.model.complete(prompt).await?.trim().to_string();
        if result.is_empty() {
            return Err(TroupeError::EmptyResponse);
        }

        self.agent_extractions
            .insert(agent.name().to_string(), result.clone());
        Ok(result)
    }

    /// The most recent extraction for the named agent, if any.
    pub fn agent_extraction(&self, name: &str) -> Option<&str> {
        self.agent_extractions.get(name).map(String::as_str)
    }
}

fn build_request(agent: &Persona, objective: &str, situation: &str) -> String {
    let mut request = String::new();
    request.push_str("## Extraction Objective\n");
    request.push_str(objective);
    request.push_str("\n\n## Situation\n");
    request.push_str(situation);
    request.push_str(&format!("\n\n## Interaction History of {}\n", agent.name()));

    if agent.memory().is_empty() {
        request.push_str("(no interactions recorded)\n");
    } else {
        request.push_str(&agent.transcript());
    }
    request
}
