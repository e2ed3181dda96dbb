//! Effects produced by state transitions

use crate::api::ApiError;
use crate::chat::{ChatMessage, ChatRequest};

/// Effects to be applied by the controller after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append to the conversation
    AppendMessage(ChatMessage),

    /// Replace the input field
    SetInput(String),

    /// Empty the input field
    ClearInput,

    /// Dispatch one request to the transport
    SendRequest(ChatRequest),

    /// Bring the newest entry into view
    ScrollToLatest,

    /// Log a failed round trip; never rendered
    ReportFailure(ApiError),
}
