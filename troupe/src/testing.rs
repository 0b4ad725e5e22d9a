//! Testing utilities.
//!
//! `ScriptedModel` stands in for a real language model: it replays queued
//! replies in order and records every prompt it was given, so tests can
//! run whole scenarios deterministically and without API calls.

use crate::error::TroupeError;
use crate::model::{LanguageModel, Prompt};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Reply used once the script runs out: a thought, no speech.
pub const DEFAULT_REPLY: &str = r#"{"thought": "I wait to see what the others do.", "speech": ""}"#;

/// A language model that returns scripted replies.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    /// Create a model that returns `replies` in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Add a reply to the end of the script.
    pub fn queue(&self, reply: impl Into<String>) {
        lock(&self.replies).push_back(reply.into());
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<Prompt> {
        lock(&self.prompts).clone()
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<Prompt> {
        lock(&self.prompts).last().cloned()
    }
}

// A panic while holding the lock only happens inside a failing test.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: Prompt) -> Result<String, TroupeError> {
        lock(&self.prompts).push(prompt);
        let reply = lock(&self.replies).pop_front();
        Ok(reply.unwrap_or_else(|| DEFAULT_REPLY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Action;

    #[tokio::test]
    async fn test_replays_in_order_then_defaults() {
        let model = ScriptedModel::new(vec!["one", "two"]);
        model.queue("three");

        assert_eq!(model.complete(Prompt::new("a")).await.unwrap(), "one");
        assert_eq!(model.complete(Prompt::new("b")).await.unwrap(), "two");
        assert_eq!(model.complete(Prompt::new("c")).await.unwrap(), "three");
        assert_eq!(model.complete(Prompt::new("d")).await.unwrap(), DEFAULT_REPLY);

        assert_eq!(model.calls(), 4);
        assert_eq!(model.last_prompt().unwrap().system, "d");
    }

    #[test]
    fn test_default_reply_is_silent() {
        let action = Action::parse(DEFAULT_REPLY);
        assert!(action.is_silent());
        assert!(action.thought.is_some());
    }
}
