//! The language-model seam.
//!
//! Personas and the extractor never talk to an API directly; they build a
//! `Prompt` and hand it to a `LanguageModel`. `ClaudeModel` is the real
//! implementation, `ScriptedModel` (in `testing`) the deterministic one.

use crate::error::TroupeError;
use async_trait::async_trait;
use claude::{Claude, Message, Request};
use tracing::debug;

/// Sent when a prompt would otherwise end on the persona's own turn.
pub(crate) const CONTINUE_NUDGE: &str =
    "(Time passes. Decide what you think and say next, answering in the required JSON format.)";

/// Sent when a prompt would otherwise start with an assistant turn.
const OPENING_NUDGE: &str = "(The scene begins.)";

/// Core trait for anything that can complete a prompt.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete the prompt and return the generated text.
    async fn complete(&self, prompt: Prompt) -> Result<String, TroupeError>;
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// A system prompt plus conversation turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub turns: Vec<Turn>,
}

impl Prompt {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            turns: Vec::new(),
        }
    }

    pub fn with_turns(mut self, turns: Vec<Turn>) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_user(mut self, text: impl Into<String>) -> Self {
        self.turns.push(Turn::user(text));
        self
    }

    /// Concatenated text of every user turn. Handy for assertions.
    pub fn user_text(&self) -> String {
        self.turns
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert to API messages: adjacent turns from the same speaker are
    /// merged, and the conversation always starts and ends on a user turn.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut merged: Vec<Turn> = Vec::with_capacity(self.turns.len() + 2);

        for turn in &self.turns {
            match merged.last_mut() {
                Some(last) if last.speaker == turn.speaker => {
                    last.text.push_str("\n\n");
                    last.text.push_str(&turn.text);
                }
                _ => merged.push(turn.clone()),
            }
        }

        if merged.first().is_some_and(|t| t.speaker == Speaker::Assistant) {
            merged.insert(0, Turn::user(OPENING_NUDGE));
        }
        if !matches!(merged.last(), Some(t) if t.speaker == Speaker::User) {
            merged.push(Turn::user(CONTINUE_NUDGE));
        }

        merged
            .into_iter()
            .map(|t| match t.speaker {
                Speaker::User => Message::user(t.text),
                Speaker::Assistant => Message::assistant(t.text),
            })
            .collect()
    }
}

/// Generation settings for `ClaudeModel`.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// The model to use (defaults to the client's model).
    pub model: Option<String>,

    /// Maximum tokens per reply.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 1024,
            temperature: Some(0.8),
        }
    }
}

impl ModelConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A `LanguageModel` backed by the Claude Messages API.
#[derive(Debug, Clone)]
pub struct ClaudeModel {
    client: Claude,
    config: ModelConfig,
}

impl ClaudeModel {
    pub fn new(client: Claude) -> Self {
        Self {
            client,
            config: ModelConfig::default(),
        }
    }

    /// Create a model from the ANTHROPIC_API_KEY environment variable.
    pub fn from_env() -> Result<Self, TroupeError> {
        Ok(Self::new(Claude::from_env()?))
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn build_request(&self, prompt: &Prompt) -> Request {
        let mut request = Request::new(prompt.to_messages())
            .with_system(prompt.system.as_str())
            .with_max_tokens(self.config.max_tokens);

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }
        if let Some(temp) = self.config.temperature {
            request = request.with_temperature(temp);
        }
        request
    }
}

#[async_trait]
impl LanguageModel for ClaudeModel {
    async fn complete(&self, prompt: Prompt) -> Result<String, TroupeError> {
        let request = self.build_request(&prompt);
        debug!(turns = request.messages.len(), "sending completion request");

        let response = self.client.complete(request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "completion received"
        );

        let text = response.text();
        if text.trim().is_empty() {
            return Err(TroupeError::EmptyResponse);
        }
        Ok(text)
    }
}
