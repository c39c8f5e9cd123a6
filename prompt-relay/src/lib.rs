pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::PromptRelay;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<PromptRelay>,
}

impl AppState {
    pub fn new(relay: Arc<PromptRelay>) -> Self {
        Self { relay }
    }
}
