use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Body of `POST /api/generate`.
///
/// `prompt` stays untyped so a non-string value is reported as invalid input
/// instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(Value::String(prompt.into())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPrompt {
    #[error("prompt is missing")]
    Missing,
    #[error("prompt must be a string, got {0}")]
    NotAString(&'static str),
    #[error("prompt is empty")]
    Empty,
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),
}

/// A validated prompt: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn parse(raw: Option<&Value>) -> Result<Self, InvalidPrompt> {
        let text = match raw {
            None | Some(Value::Null) => return Err(InvalidPrompt::Missing),
            Some(Value::String(text)) => text,
            Some(other) => return Err(InvalidPrompt::NotAString(json_type(other))),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(InvalidPrompt::Empty);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
