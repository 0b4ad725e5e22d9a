//! Personas: simulated characters driven by a language model.
//!
//! A persona is an attribute sheet plus an episodic memory. On its turn it
//! renders both into a prompt, asks the model for a thought and an optional
//! line of speech, and records the result.

mod memory;

pub use memory::{Episode, EpisodicMemory, MAX_RECENT_EPISODES};

use crate::error::TroupeError;
use crate::model::{LanguageModel, Prompt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What a persona did on one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
}

impl Action {
    /// Parse a model reply. Accepts bare JSON, fenced JSON, or JSON buried in
    /// prose; anything else is taken as plain speech. A JSON reply cut off
    /// before its closing brace keeps whatever fields survived.
    pub fn parse(reply: &str) -> Self {
        let reply = reply.trim();
        let fenced = strip_code_fence(reply);

        let parsed = serde_json::from_str::<Action>(fenced)
            .ok()
            .or_else(|| brace_slice(fenced).and_then(|json| serde_json::from_str(json).ok()))
            .or_else(|| brace_slice(reply).and_then(|json| serde_json::from_str(json).ok()))
            .or_else(|| truncated(fenced));

        match parsed {
            Some(action) => Self {
                thought: non_empty(action.thought),
                speech: non_empty(action.speech),
            },
            None => Self {
                thought: None,
                speech: non_empty(Some(reply.to_string())),
            },
        }
    }

    /// The JSON shape personas are asked to answer in.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn is_silent(&self) -> bool {
        self.speech.is_none()
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Multi-line fences may carry a language tag; one-line fences open straight
    // into the body.
    let body = match rest.split_once('\n') {
        Some((tag, body)) if !tag.contains('{') => body,
        _ => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    text.get(start..=end)
}

/// An object that opens but never closes, as when the reply hit the token
/// limit. Always yields an action, silent if no field can be read back.
fn truncated(text: &str) -> Option<Action> {
    if !text.starts_with('{') || text.contains('}') {
        return None;
    }
    Some(Action {
        thought: partial_field(text, "thought"),
        speech: partial_field(text, "speech"),
    })
}

/// The string value of `key`, up to its closing quote or the end of input.
fn partial_field(json: &str, key: &str) -> Option<String> {
    let quoted_key = format!("\"{key}\"");
    let after_key = &json[json.find(&quoted_key)? + quoted_key.len()..];
    let value = after_key.trim_start().strip_prefix(':')?.trim_start().strip_prefix('"')?;

    let mut end = value.len();
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                end = i;
                break;
            }
            _ => escaped = false,
        }
    }

    let raw = value[..end].trim_end_matches('\\');
    serde_json::from_str(&format!("\"{raw}\"")).ok()
}

/// A simulated character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    name: String,
    attributes: BTreeMap<String, Value>,
    memory: EpisodicMemory,
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            memory: EpisodicMemory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a single attribute, replacing any previous value.
    pub fn define(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Set an attribute to an ordered list of records.
    pub fn define_several<I>(&mut self, key: impl Into<String>, records: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.attributes
            .insert(key.into(), Value::Array(records.into_iter().collect()));
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The full character sheet as JSON, name first.
    pub fn sheet(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        for (key, value) in &self.attributes {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    pub fn memory(&self) -> &EpisodicMemory {
        &self.memory
    }

    /// Hear something from `source`.
    pub fn listen(&mut self, source: impl Into<String>, content: impl Into<String>) {
        self.memory.store(Episode::Stimulus {
            source: source.into(),
            content: content.into(),
        });
    }

    /// Take one turn inside `world_name`.
    pub async fn act(
        &mut self,
        model: &dyn LanguageModel,
        world_name: &str,
    ) -> Result<Action, TroupeError> {
        let prompt = Prompt::new(self.build_system_prompt(world_name))
            .with_turns(self.memory.recent_turns());

        let reply = model.complete(prompt).await?;
        debug!(persona = %self.name, %reply, "model reply");

        let action = Action::parse(&reply);
        if let Some(ref speech) = action.speech {
            info!(persona = %self.name, "{speech}");
        }
        self.memory.store(Episode::Action(action.clone()));
        Ok(action)
    }

    /// The whole interaction history as text.
    pub fn transcript(&self) -> String {
        self.memory.render(&self.name)
    }

    fn build_system_prompt(&self, world_name: &str) -> String {
        let sheet = serde_json::to_string_pretty(&self.sheet()).unwrap_or_default();
        include_str!("../prompts/persona.txt")
            .replace("{name}", &self.name)
            .replace("{world}", world_name)
            .replace("{sheet}", &sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use serde_json::json;

    #[test]
    fn test_define_and_define_several() {
        let mut p = Persona::new("Shade");
        p.define("race", "Halfling");
        p.define("race", "Halfling rogue");
        p.define_several("skills", vec![json!({"skill": "Stealth"}), json!({"skill": "Lockpicking"})]);

        assert_eq!(p.attribute("race"), Some(&json!("Halfling rogue")));
        assert_eq!(
            p.attribute("skills"),
            Some(&json!([{"skill": "Stealth"}, {"skill": "Lockpicking"}]))
        );
        assert_eq!(p.sheet()["name"], "Shade");
        assert!(p.attribute("class").is_none());
    }

    #[test]
    fn test_parse_plain_json() {
        let action = Action::parse(r#"{"thought": "A trap?", "speech": "Hold!"}"#);
        assert_eq!(action.thought.as_deref(), Some("A trap?"));
        assert_eq!(action.speech.as_deref(), Some("Hold!"));
    }

    #[test]
    fn test_parse_fenced_json_and_blank_speech() {
        let action = Action::parse("```json\n{\"thought\": \"Wait.\", \"speech\": \"  \"}\n```");
        assert_eq!(action.thought.as_deref(), Some("Wait."));
        assert!(action.is_silent());
    }

    #[test]
    fn test_parse_single_line_fence() {
        let action = Action::parse("```{\"thought\": \"Hmm.\", \"speech\": \"Hold!\"}```");
        assert_eq!(action.thought.as_deref(), Some("Hmm."));
        assert_eq!(action.speech.as_deref(), Some("Hold!"));

        let action = Action::parse("```json {\"speech\": \"Hold!\"}```");
        assert_eq!(action.speech.as_deref(), Some("Hold!"));
    }

    #[test]
    fn test_parse_truncated_reply_keeps_partial_speech() {
        let action =
            Action::parse(r#"{"thought": "The bridge looks weak", "speech": "Elena, cast your"#);
        assert_eq!(action.thought.as_deref(), Some("The bridge looks weak"));
        assert_eq!(action.speech.as_deref(), Some("Elena, cast your"));

        let action = Action::parse(r#"{"speech": "She said \"run\" and then\"#);
        assert_eq!(action.speech.as_deref(), Some("She said \"run\" and then"));
    }

    #[test]
    fn test_parse_truncated_reply_without_speech_is_silent() {
        let action = Action::parse(r#"{"thought": "The bridge looks we"#);
        assert_eq!(action.thought.as_deref(), Some("The bridge looks we"));
        assert!(action.is_silent());

        let action = Action::parse("```json\n{\"thou");
        assert_eq!(action, Action::default());
    }

    #[test]
    fn test_parse_json_inside_prose() {
        let action = Action::parse("Sure! {\"speech\": \"To the bridge.\"} Hope that helps.");
        assert_eq!(action.speech.as_deref(), Some("To the bridge."));
        assert!(action.thought.is_none());
    }

    #[test]
    fn test_parse_falls_back_to_speech() {
        let action = Action::parse("I draw my axe and step forward.");
        assert_eq!(action.speech.as_deref(), Some("I draw my axe and step forward."));
        assert!(action.thought.is_none());
    }

    #[test]
    fn test_action_json_round_trips_through_parse() {
        let action = Action {
            thought: Some("Gold!".to_string()),
            speech: None,
        };
        assert_eq!(action.to_json(), r#"{"thought":"Gold!"}"#);
        assert_eq!(Action::parse(&action.to_json()), action);
    }

    #[tokio::test]
    async fn test_act_records_stimulus_and_action() {
        let model = ScriptedModel::new(vec![r#"{"thought": "Hmm.", "speech": "I'll lead."}"#]);
        let mut thorin = Persona::new("Thorin");
        thorin.define("class", "Warrior");
        thorin.listen("world", "Who will lead?");

        let action = thorin.act(&model, "Dungeon Adventure").await.unwrap();

        assert_eq!(action.speech.as_deref(), Some("I'll lead."));
        assert_eq!(thorin.memory().len(), 2);

        let prompt = &model.prompts()[0];
        assert!(prompt.system.contains("Thorin"));
        assert!(prompt.system.contains("Dungeon Adventure"));
        assert!(prompt.system.contains("\"class\": \"Warrior\""));
        assert_eq!(prompt.user_text(), "world: Who will lead?");

        assert!(thorin.transcript().contains("Thorin: I'll lead."));
    }
}
