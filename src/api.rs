//! Client for the remote inference endpoint
//!
//! One POST per chat turn. Every failure is normalized into [`ApiError`]
//! before it leaves this module.

mod config;
mod error;
#[cfg(test)]
pub mod testing;

pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};

use error::{normalize, ServerErrorBody, TransportFailure};

use crate::chat::{BackendReply, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// Sends one chat turn and returns the normalized reply
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    /// Origin the transport talks to
    fn base_url(&self) -> &str;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        (**self).send_chat_message(request).await
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

/// HTTP implementation backed by `reqwest`
pub struct ApiService {
    client: Client,
    config: ApiConfig,
}

impl ApiService {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportFailure> {
        let url = self.config.chat_url();
        tracing::info!(method = "POST", url = %url, "API request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // A non-2xx stays a server error even when its body is unreadable
            let body = match response.text().await {
                Ok(text) => ServerErrorBody::parse(&text),
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), error = %e, "Failed to read error body");
                    ServerErrorBody::default()
                }
            };
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        tracing::info!(status = status.as_u16(), url = %url, "API response");

        let reply: BackendReply =
            serde_json::from_str(&body).map_err(|e| TransportFailure::Other {
                detail: format!("Failed to parse response: {e}"),
            })?;

        if let Some(info) = &reply.model_info {
            let timing = info.timing.clone().unwrap_or_default();
            tracing::debug!(
                model_path = ?info.model_path,
                context_length = ?info.context_length,
                threads = ?info.threads,
                max_tokens = ?info.max_tokens,
                total_time = ?timing.total_time,
                llm_inference_time = ?timing.llm_inference_time,
                pre_processing_time = ?timing.pre_processing_time,
                post_processing_time = ?timing.post_processing_time,
                "Model info"
            );
        }

        Ok(ChatResponse::success(reply.response))
    }
}

#[async_trait]
impl ChatTransport for ApiService {
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.post_chat(request).await.map_err(|failure| {
            let status = match &failure {
                TransportFailure::Status { status, .. } => Some(*status),
                _ => None,
            };
            tracing::error!(status = ?status, error = %failure.detail(), "API response error");
            normalize(failure)
        })
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
