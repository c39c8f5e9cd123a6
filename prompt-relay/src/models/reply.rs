use serde::Serialize;
use serde_json::Value;

const PARTS_TEXT: &str = "/candidates/0/content/parts/0/text";
const CONTENT_TEXT: &str = "/candidates/0/content/text";

/// What the relay recognised in a successful upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    /// `candidates[0].content.parts[0].text`
    PartText(String),
    /// `candidates[0].content.text`
    ContentText(String),
    /// Neither shape; passed through untouched.
    Unrecognized(Value),
}

impl UpstreamReply {
    /// Shapes are tried in order and only match a non-empty string.
    pub fn classify(payload: Value) -> Self {
        if let Some(text) = non_empty_str(&payload, PARTS_TEXT) {
            return UpstreamReply::PartText(text);
        }
        if let Some(text) = non_empty_str(&payload, CONTENT_TEXT) {
            return UpstreamReply::ContentText(text);
        }
        UpstreamReply::Unrecognized(payload)
    }
}

fn non_empty_str(payload: &Value, pointer: &str) -> Option<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Successful body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RelayResponse {
    Text { text: String },
    Raw { raw: Value },
}

impl From<UpstreamReply> for RelayResponse {
    fn from(reply: UpstreamReply) -> Self {
        match reply {
            UpstreamReply::PartText(text) | UpstreamReply::ContentText(text) => {
                RelayResponse::Text { text }
            }
            UpstreamReply::Unrecognized(raw) => RelayResponse::Raw { raw },
        }
    }
}
