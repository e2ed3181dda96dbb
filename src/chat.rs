//! Chat data model shared by the controller, the transport and the view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}

/// Body of `POST /llm/chat`.
///
/// The endpoint is single-turn, so only the latest message is carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Normalized result of a successful round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            success: true,
            error: None,
        }
    }
}

// ============================================================================
// Wire format of the inference endpoint
// ============================================================================

/// 2xx body returned by the inference endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BackendReply {
    pub response: String,
    #[serde(default)]
    pub model_info: Option<ModelInfo>,
}

/// Diagnostic block attached to every reply. Logged, never rendered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub model_path: Option<String>,
    pub context_length: Option<u64>,
    pub threads: Option<u32>,
    pub max_tokens: Option<u32>,
    pub timing: Option<ModelTiming>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelTiming {
    pub total_time: Option<f64>,
    pub llm_inference_time: Option<f64>,
    pub pre_processing_time: Option<f64>,
    pub post_processing_time: Option<f64>,
}
