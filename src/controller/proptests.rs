//! Property-based tests for the controller
//!
//! Random interleavings of typing, submissions, suggestion picks and
//! settlements must preserve:
//! - the conversation never shrinks or reorders
//! - every settled user entry is followed by exactly one assistant entry
//! - refused submissions leave conversation and input untouched

use super::*;
use crate::api::testing::MockTransport;
use crate::api::ErrorCode;
use crate::chat::Role;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Type(String),
    Submit,
    Suggest(usize),
    ReplyOk(String),
    ReplyErr(Option<u16>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[ a-z가-힣\n]{0,12}".prop_map(Op::Type),
        3 => Just(Op::Submit),
        1 => (0usize..6).prop_map(Op::Suggest),
        2 => "[a-zA-Z ]{1,20}".prop_map(Op::ReplyOk),
        1 => proptest::option::of(400u16..600).prop_map(Op::ReplyErr),
    ]
}

fn assert_alternating(messages: &[ChatMessage]) {
    for (i, m) in messages.iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(m.role, expected, "entry {i} out of order");
    }
}

proptest! {
    #[test]
    fn prop_conversation_invariants(ops in proptest::collection::vec(arb_op(), 1..60)) {
        let mut ctl = Controller::new(Arc::new(MockTransport::new()));
        let mut pending: Option<PendingReply<MockTransport>> = None;

        for op in ops {
            let before: Vec<ChatMessage> = ctl.messages().to_vec();
            let input_before = ctl.input().to_string();
            let was_busy = ctl.is_busy();

            match op {
                Op::Type(text) => {
                    let accepted = ctl.set_input(text.clone());
                    prop_assert_eq!(accepted, !was_busy);
                    if accepted {
                        prop_assert_eq!(ctl.input(), text.as_str());
                    }
                }
                Op::Submit => {
                    let started = ctl.begin_submit();
                    let should_start = !was_busy && !input_before.trim().is_empty();
                    prop_assert_eq!(started.is_some(), should_start);
                    if let Some(p) = started {
                        prop_assert_eq!(&p.request().message, &input_before);
                        prop_assert_eq!(ctl.messages().len(), before.len() + 1);
                        prop_assert_eq!(ctl.input(), "");
                        prop_assert!(ctl.is_busy());
                        pending = Some(p);
                    } else {
                        prop_assert_eq!(ctl.messages(), before.as_slice());
                        prop_assert_eq!(ctl.input(), input_before.as_str());
                    }
                }
                Op::Suggest(index) => {
                    let applied = ctl.select_suggestion(index);
                    prop_assert_eq!(applied, !was_busy && index < SUGGESTED_PROMPTS.len());
                    if applied {
                        prop_assert_eq!(ctl.input(), SUGGESTED_PROMPTS[index]);
                    }
                    prop_assert_eq!(ctl.messages(), before.as_slice());
                }
                Op::ReplyOk(text) => {
                    if pending.take().is_some() {
                        ctl.finish(Ok(ChatResponse::success(text.clone())));
                        prop_assert_eq!(ctl.messages().len(), before.len() + 1);
                        prop_assert_eq!(&ctl.messages()[before.len()].content, &text);
                    } else {
                        ctl.finish(Ok(ChatResponse::success(text)));
                        prop_assert_eq!(ctl.messages(), before.as_slice());
                    }
                }
                Op::ReplyErr(status) => {
                    let error = ApiError {
                        message: "failure".to_string(),
                        status,
                        code: status.map(|_| ErrorCode::Server("E".to_string())),
                    };
                    let had_pending = pending.take().is_some();
                    ctl.finish(Err(error));
                    if had_pending {
                        prop_assert_eq!(ctl.messages().len(), before.len() + 1);
                        prop_assert_eq!(&ctl.messages()[before.len()].content, APOLOGY);
                    } else {
                        prop_assert_eq!(ctl.messages(), before.as_slice());
                    }
                }
            }

            // Append-only: the old sequence is always a prefix of the new one
            prop_assert!(ctl.messages().starts_with(&before));
            prop_assert_eq!(ctl.is_busy(), pending.is_some());

            let len = ctl.messages().len();
            if ctl.is_busy() {
                prop_assert_eq!(len % 2, 1);
            } else {
                prop_assert_eq!(len % 2, 0);
            }
            assert_alternating(ctl.messages());
        }
    }
}
