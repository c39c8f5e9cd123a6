use super::prompt::Prompt;
use serde::Serialize;

/// Body of the upstream generate call: `{ contents: [{ role, parts: [{ text }] }] }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// One user turn with one text part.
    pub fn single_turn(prompt: &Prompt) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.as_str().to_string(),
                }],
            }],
        }
    }
}
