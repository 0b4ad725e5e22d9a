//! Episodic memory for personas.
//!
//! Keeps the full transcript so extraction can see everything, while
//! prompts only replay a sliding window of recent episodes.

use super::Action;
use crate::model::Turn;
use serde::{Deserialize, Serialize};

/// Maximum number of recent episodes replayed into a prompt.
pub const MAX_RECENT_EPISODES: usize = 40;

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Episode {
    /// Something the persona heard.
    Stimulus { source: String, content: String },
    /// Something the persona did on its turn.
    Action(Action),
}

/// The persona's episodic memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodicMemory {
    episodes: Vec<Episode>,
}

impl EpisodicMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    /// Every episode, oldest first.
    pub fn all(&self) -> &[Episode] {
        &self.episodes
    }

    /// The most recent `count` episodes, oldest first.
    pub fn recent(&self, count: usize) -> &[Episode] {
        let start = self.episodes.len().saturating_sub(count);
        &self.episodes[start..]
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Prompt turns for the recent window. Stimuli are user turns; the
    /// persona's own actions replay as the JSON it is asked to produce.
    pub fn recent_turns(&self) -> Vec<Turn> {
        self.recent(MAX_RECENT_EPISODES)
            .iter()
            .map(|episode| match episode {
                Episode::Stimulus { source, content } => {
                    Turn::user(format!("{source}: {content}"))
                }
                Episode::Action(action) => Turn::assistant(action.to_json()),
            })
            .collect()
    }

    /// Render the full transcript as text, one line per utterance.
    pub fn render(&self, owner: &str) -> String {
        let mut out = String::new();
        for episode in &self.episodes {
            match episode {
                Episode::Stimulus { source, content } => {
                    out.push_str(&format!("[{source}] {content}\n"));
                }
                Episode::Action(action) => {
                    if let Some(ref thought) = action.thought {
                        out.push_str(&format!("{owner} (thinks): {thought}\n"));
                    }
                    if let Some(ref speech) = action.speech {
                        out.push_str(&format!("{owner}: {speech}\n"));
                    }
                }
            }
        }
        out
    }
}
