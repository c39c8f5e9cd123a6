pub mod relay;
pub mod upstream;

pub use relay::{PromptRelay, RelayError};
pub use upstream::{HttpTextUpstream, TextUpstream};
