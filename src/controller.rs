//! Interaction controller
//!
//! Mediates user input, invokes the transport and appends the results to the
//! conversation. State changes go through the pure [`transition`] function;
//! [`Controller`] applies the resulting effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatState, Conversation, APOLOGY, SUGGESTED_PROMPTS};
pub use transition::transition;

use crate::api::{ApiError, ChatTransport};
use crate::chat::{ChatMessage, ChatRequest, ChatResponse};
use chrono::Utc;
use std::sync::Arc;

/// Owns the conversation, the input field and the busy guard
pub struct Controller<T: ChatTransport> {
    transport: Arc<T>,
    state: ChatState,
    conversation: Conversation,
    input: String,
    /// Set whenever the conversation changed and the view should follow it
    scroll_requested: bool,
}

/// A dispatched request whose reply has not been fed back yet
pub struct PendingReply<T: ChatTransport> {
    transport: Arc<T>,
    request: ChatRequest,
}

impl<T: ChatTransport> PendingReply<T> {
    #[cfg(test)]
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Perform the round trip. Runs to completion or to the transport timeout.
    pub async fn resolve(self) -> Result<ChatResponse, ApiError> {
        self.transport.send_chat_message(&self.request).await
    }
}

impl<T: ChatTransport> Controller<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            state: ChatState::Idle,
            conversation: Conversation::new(),
            input: String::new(),
            scroll_requested: false,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the send control is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.input.trim().is_empty()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Replace the input text. Ignored while a request is in flight.
    #[allow(dead_code)] // API completeness
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.is_busy() {
            return false;
        }
        self.input = text.into();
        true
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if self.is_busy() {
            return false;
        }
        self.input.push(c);
        true
    }

    /// Append a block of text, e.g. a paste. Ignored while a request is in flight.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if self.is_busy() {
            return false;
        }
        self.input.push_str(text);
        true
    }

    pub fn pop_char(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.input.pop().is_some()
    }

    /// Pre-fill the input with one of [`SUGGESTED_PROMPTS`]
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let Some(text) = SUGGESTED_PROMPTS.get(index) else {
            return false;
        };
        self.dispatch(Event::SuggestionSelected {
            text: (*text).to_string(),
        })
        .is_some()
    }

    /// Consume a pending scroll-to-latest request
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Start a round trip from the current input.
    ///
    /// Returns `None` when the input is blank or a request is already in
    /// flight. The caller must hand the outcome of [`PendingReply::resolve`]
    /// back through [`Controller::finish`].
    pub fn begin_submit(&mut self) -> Option<PendingReply<T>> {
        let request = self.dispatch(Event::Submit { at: Utc::now() })??;
        Some(PendingReply {
            transport: Arc::clone(&self.transport),
            request,
        })
    }

    /// Settle the in-flight request. Always returns to idle.
    pub fn finish(&mut self, outcome: Result<ChatResponse, ApiError>) {
        let at = Utc::now();
        let event = match outcome {
            Ok(response) => Event::ReplyReceived { response, at },
            Err(error) => Event::ReplyFailed { error, at },
        };
        self.dispatch(event);
    }

    /// Full round trip: submit, await the transport, settle.
    ///
    /// Returns `false` if the submission was a no-op.
    #[allow(dead_code)] // The view uses the split form
    pub async fn submit(&mut self) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };
        let outcome = pending.resolve().await;
        self.finish(outcome);
        true
    }

    /// Run one event through the transition function and apply its effects.
    ///
    /// Returns `None` if the event was refused, otherwise the request to
    /// dispatch, if any.
    fn dispatch(&mut self, event: Event) -> Option<Option<ChatRequest>> {
        let result = match transition(&self.state, &self.input, event) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, state = ?self.state, "Event ignored");
                return None;
            }
        };

        self.state = result.new_state;
        let mut request = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage(message) => self.conversation.push(message),
                Effect::SetInput(text) => self.input = text,
                Effect::ClearInput => self.input.clear(),
                Effect::SendRequest(req) => request = Some(req),
                Effect::ScrollToLatest => self.scroll_requested = true,
                Effect::ReportFailure(error) => {
                    tracing::error!(
                        error = %error,
                        status = ?error.status,
                        code = ?error.code.as_ref().map(|c| c.as_str()),
                        "Chat request failed"
                    );
                }
            }
        }
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::ErrorCode;
    use crate::chat::Role;

    fn controller() -> (Arc<MockTransport>, Controller<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let controller = Controller::new(Arc::clone(&transport));
        (transport, controller)
    }

    #[tokio::test]
    async fn test_round_trip_appends_two_entries() {
        let (transport, mut ctl) = controller();
        transport.queue_reply("fine");

        ctl.set_input("How often should I vaccinate?");
        assert!(ctl.submit().await);

        let msgs = ctl.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].content, "How often should I vaccinate?");
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, "fine");
        assert!(!ctl.is_busy());
        assert_eq!(ctl.input(), "");
        assert!(ctl.take_scroll_request());
        assert!(!ctl.take_scroll_request());
    }

    #[tokio::test]
    async fn test_raw_input_is_sent_untrimmed() {
        let (transport, mut ctl) = controller();
        transport.queue_reply("ok");

        ctl.set_input("  hi  ");
        ctl.submit().await;

        assert_eq!(
            transport.recorded_requests(),
            vec![ChatRequest::new("  hi  ")]
        );
        assert_eq!(ctl.messages()[0].content, "  hi  ");
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let (transport, mut ctl) = controller();
        ctl.set_input("   \n ");

        assert!(!ctl.submit().await);
        assert!(ctl.messages().is_empty());
        assert_eq!(ctl.input(), "   \n ");
        assert!(transport.recorded_requests().is_empty());
        assert!(!ctl.take_scroll_request());
    }

    #[tokio::test]
    async fn test_timeout_yields_apology() {
        let (transport, mut ctl) = controller();
        transport.queue_error(ApiError::network());

        ctl.set_input("hello");
        ctl.submit().await;

        let msgs = ctl.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content, APOLOGY);
        assert!(!ctl.is_busy());
    }

    #[tokio::test]
    async fn test_server_error_detail_not_rendered() {
        let (transport, mut ctl) = controller();
        transport.queue_error(ApiError {
            message: "boom".to_string(),
            status: Some(500),
            code: Some(ErrorCode::Server("X".to_string())),
        });

        ctl.set_input("hello");
        ctl.submit().await;

        assert_eq!(ctl.messages()[1].content, APOLOGY);
        assert!(ctl.messages().iter().all(|m| !m.content.contains("boom")));
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_ignored() {
        let (transport, mut ctl) = controller();
        transport.queue_reply("first reply");

        ctl.set_input("first");
        let pending = ctl.begin_submit().unwrap();
        assert!(ctl.is_busy());
        assert!(!ctl.can_submit());

        // Input is disabled and a second submission does nothing
        assert!(!ctl.set_input("second"));
        assert!(!ctl.push_char('x'));
        assert!(!ctl.insert_text("pasted"));
        assert!(ctl.begin_submit().is_none());
        assert!(!ctl.select_suggestion(0));
        assert_eq!(ctl.messages().len(), 1);
        assert_eq!(ctl.input(), "");

        let outcome = pending.resolve().await;
        ctl.finish(outcome);

        assert!(!ctl.is_busy());
        assert_eq!(ctl.messages().len(), 2);
        assert_eq!(transport.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_stray_finish_while_idle_is_ignored() {
        let (_transport, mut ctl) = controller();
        ctl.finish(Ok(ChatResponse::success("orphan")));
        assert!(ctl.messages().is_empty());
        assert!(!ctl.is_busy());
    }

    #[test]
    fn test_suggestion_sets_exact_text() {
        let (transport, mut ctl) = controller();
        ctl.set_input("draft");

        assert!(ctl.select_suggestion(1));
        assert_eq!(ctl.input(), SUGGESTED_PROMPTS[1]);
        assert!(ctl.messages().is_empty());
        assert!(!ctl.is_busy());
        assert!(transport.recorded_requests().is_empty());

        assert!(!ctl.select_suggestion(SUGGESTED_PROMPTS.len()));
        assert_eq!(ctl.input(), SUGGESTED_PROMPTS[1]);
    }

    #[test]
    fn test_input_editing() {
        let (_transport, mut ctl) = controller();
        assert!(!ctl.can_submit());
        ctl.push_char('h');
        ctl.push_char('i');
        assert_eq!(ctl.input(), "hi");
        assert!(ctl.can_submit());
        assert!(ctl.pop_char());
        assert!(ctl.pop_char());
        assert!(!ctl.pop_char());
        assert!(ctl.insert_text("a\nb"));
        assert_eq!(ctl.input(), "a\nb");
        assert_eq!(ctl.base_url(), "http://mock.invalid");
    }
}
