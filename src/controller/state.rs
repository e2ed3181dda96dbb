//! Controller state and the in-memory conversation

use crate::chat::ChatMessage;
use chrono::{DateTime, Utc};

/// Fixed reply shown for any failed round trip
pub const APOLOGY: &str = "죄송합니다. 오류가 발생했습니다. 나중에 다시 시도해주세요.";

/// Prompts offered on the welcome screen
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "강아지가 밥을 안 먹어요",
    "예방접종 주기는 어떻게 되나요?",
    "강아지가 이상 행동을 보이고 있어요",
    "오늘 식욕이 없어요",
];

/// Busy guard. At most one request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Sending { since: DateTime<Utc> },
}

impl ChatState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ChatState::Sending { .. })
    }
}

/// Append-only message sequence for the lifetime of a session
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
