//! Request, envelope and reply shapes for the relay.

pub mod envelope;
pub mod prompt;
pub mod reply;

pub use envelope::{Content, GenerateContentRequest, Part};
pub use prompt::{GenerateRequest, InvalidPrompt, Prompt};
pub use reply::{RelayResponse, UpstreamReply};
