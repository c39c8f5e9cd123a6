//! Validation, envelope construction and reply mapping for `/api/generate`.

use super::upstream::TextUpstream;
use crate::models::{
    GenerateContentRequest, GenerateRequest, InvalidPrompt, Prompt, RelayResponse, UpstreamReply,
};
use reqwest::StatusCode;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid prompt: {0}")]
    InvalidInput(#[from] InvalidPrompt),

    #[error("upstream responded {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidInput(_) => AppError::BadRequest("prompt is required".to_string()),
            RelayError::Upstream { body, .. } => AppError::BadGateway {
                message: "Upstream text API error".to_string(),
                details: body,
            },
            RelayError::Internal(err) => AppError::InternalError(err),
        }
    }
}

/// Forwards one prompt per call. Holds no per-request state.
#[derive(Clone)]
pub struct PromptRelay {
    upstream: Arc<dyn TextUpstream>,
}

impl PromptRelay {
    pub fn new(upstream: Arc<dyn TextUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<RelayResponse, RelayError> {
        let prompt = match Prompt::parse(request.prompt.as_ref()) {
            Ok(prompt) => prompt,
            Err(reason) => {
                tracing::warn!(%reason, "Rejected generate request");
                return Err(reason.into());
            }
        };

        let envelope = GenerateContentRequest::single_turn(&prompt);
        tracing::debug!(prompt_len = prompt.as_str().len(), "Relaying prompt");

        let payload = match self.upstream.generate_content(&envelope).await {
            Ok(payload) => payload,
            Err(RelayError::Upstream { status, body }) => {
                tracing::error!(status = status.as_u16(), body = %body, "Text API error");
                return Err(RelayError::Upstream { status, body });
            }
            Err(err) => {
                tracing::error!(error = %format!("{:#}", err), "Server error");
                return Err(err);
            }
        };

        let reply = UpstreamReply::classify(payload);
        if let UpstreamReply::Unrecognized(_) = reply {
            tracing::warn!("Text API returned an unrecognized payload; relaying it raw");
        }

        Ok(reply.into())
    }
}
