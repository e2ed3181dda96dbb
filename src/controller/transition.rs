//! Pure state transition function
//!
//! Given the same state, input and event this always yields the same
//! result. All I/O happens in the controller applying the effects.

use super::{ChatState, Effect, Event, APOLOGY};
use crate::chat::{ChatMessage, ChatRequest};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events the current state refuses
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is already in flight")]
    Busy,
    #[error("Input is blank")]
    BlankInput,
    #[error("Reply arrived with no request in flight")]
    UnexpectedReply,
}

pub fn transition(
    state: &ChatState,
    input: &str,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (ChatState::Sending { .. }, Event::Submit { .. } | Event::SuggestionSelected { .. }) => {
            Err(TransitionError::Busy)
        }

        (ChatState::Idle, Event::Submit { at }) => {
            if input.trim().is_empty() {
                return Err(TransitionError::BlankInput);
            }
            // The raw text is kept and sent; trimming only gates submission.
            Ok(TransitionResult::new(ChatState::Sending { since: at })
                .with_effect(Effect::AppendMessage(ChatMessage::user(input, at)))
                .with_effect(Effect::ClearInput)
                .with_effect(Effect::ScrollToLatest)
                .with_effect(Effect::SendRequest(ChatRequest::new(input))))
        }

        (ChatState::Idle, Event::SuggestionSelected { text }) => {
            Ok(TransitionResult::new(ChatState::Idle).with_effect(Effect::SetInput(text)))
        }

        // ============================================================
        // Settlement: always back to Idle with exactly one reply entry
        // ============================================================
        (ChatState::Sending { .. }, Event::ReplyReceived { response, at }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::AppendMessage(ChatMessage::assistant(
                    response.message,
                    at,
                )))
                .with_effect(Effect::ScrollToLatest))
        }

        (ChatState::Sending { .. }, Event::ReplyFailed { error, at }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::ReportFailure(error))
                .with_effect(Effect::AppendMessage(ChatMessage::assistant(APOLOGY, at)))
                .with_effect(Effect::ScrollToLatest))
        }

        (ChatState::Idle, Event::ReplyReceived { .. } | Event::ReplyFailed { .. }) => {
            Err(TransitionError::UnexpectedReply)
        }
    }
}
