//! Events that drive the controller

use crate::api::ApiError;
use crate::chat::ChatResponse;
use chrono::{DateTime, Utc};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        at: DateTime<Utc>,
    },
    SuggestionSelected {
        text: String,
    },

    // Transport events
    ReplyReceived {
        response: ChatResponse,
        at: DateTime<Utc>,
    },
    ReplyFailed {
        error: ApiError,
        at: DateTime<Utc>,
    },
}
