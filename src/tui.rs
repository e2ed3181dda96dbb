//! Terminal front end
//!
//! Owns the controller on the UI task. Round trips run on spawned tasks and
//! report back over a channel so drawing never waits on the network.

mod keys;
mod view;

use crate::api::{ApiError, ChatTransport};
use crate::chat::ChatResponse;
use crate::controller::Controller;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as TermEvent, EventStream, KeyEventKind,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::supports_keyboard_enhancement;
use futures::StreamExt;
use keys::Action;
use ratatui::DefaultTerminal;
use std::io;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::mpsc;
use view::ViewState;

/// Redraw cadence for the busy indicator
const TICK: Duration = Duration::from_millis(500);
const SCROLL_STEP: usize = 5;

type Outcome = Result<ChatResponse, ApiError>;

pub async fn run<T: ChatTransport + 'static>(controller: Controller<T>) -> io::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = match enable_input_modes() {
        Ok(enhanced) => {
            let result = event_loop(&mut terminal, controller).await;
            disable_input_modes(enhanced);
            result
        }
        Err(e) => Err(e),
    };
    ratatui::restore();
    result
}

/// Ask the terminal for modifier-aware keys and bracketed paste.
///
/// Without the keyboard enhancement, Shift+Enter arrives as a bare Enter;
/// without bracketed paste, every pasted newline arrives as Enter.
/// Returns whether the enhancement flags were pushed.
fn enable_input_modes() -> io::Result<bool> {
    let mut stdout = io::stdout();
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    execute!(stdout, EnableBracketedPaste)?;
    tracing::debug!(keyboard_enhancement = enhanced, "Terminal input modes enabled");
    Ok(enhanced)
}

fn disable_input_modes(enhanced: bool) {
    let mut stdout = io::stdout();
    if enhanced {
        if let Err(e) = execute!(stdout, PopKeyboardEnhancementFlags) {
            tracing::warn!(error = %e, "Failed to pop keyboard enhancement flags");
        }
    }
    if let Err(e) = execute!(stdout, DisableBracketedPaste) {
        tracing::warn!(error = %e, "Failed to disable bracketed paste");
    }
}

async fn event_loop<T: ChatTransport + 'static>(
    terminal: &mut DefaultTerminal,
    mut controller: Controller<T>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Outcome>();
    let mut ticker = tokio::time::interval(TICK);
    let mut view = ViewState::default();

    tracing::info!(base_url = %controller.base_url(), "Chat session started");

    loop {
        if controller.take_scroll_request() {
            view.follow_latest();
        }
        terminal.draw(|frame| view::render(frame, &controller, &mut view))?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    return Ok(());
                };
                if on_terminal_event(event?, &mut controller, &mut view, &reply_tx).is_break() {
                    if controller.is_busy() {
                        tracing::info!("Quitting with a request in flight");
                    }
                    return Ok(());
                }
            }
            Some(outcome) = reply_rx.recv() => controller.finish(outcome),
            _ = ticker.tick() => {}
        }
    }
}

/// Route one terminal event. `Break` means quit.
fn on_terminal_event<T: ChatTransport + 'static>(
    event: TermEvent,
    controller: &mut Controller<T>,
    view: &mut ViewState,
    reply_tx: &mpsc::UnboundedSender<Outcome>,
) -> ControlFlow<()> {
    match event {
        // Pasted text only edits the draft, newlines included
        TermEvent::Paste(text) => {
            controller.insert_text(&text.replace("\r\n", "\n").replace('\r', "\n"));
        }
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => match keys::action_for(key) {
            Some(Action::Quit) => return ControlFlow::Break(()),
            Some(action) => apply(action, controller, view, reply_tx),
            None => {}
        },
        _ => {}
    }
    ControlFlow::Continue(())
}

fn apply<T: ChatTransport + 'static>(
    action: Action,
    controller: &mut Controller<T>,
    view: &mut ViewState,
    reply_tx: &mpsc::UnboundedSender<Outcome>,
) {
    match action {
        Action::Submit => {
            if let Some(pending) = controller.begin_submit() {
                let tx = reply_tx.clone();
                tokio::spawn(async move {
                    // Receiver only goes away when the UI has exited
                    let _ = tx.send(pending.resolve().await);
                });
            }
        }
        Action::Newline => {
            controller.push_char('\n');
        }
        Action::Backspace => {
            controller.pop_char();
        }
        Action::Insert(c) => {
            controller.push_char(c);
        }
        // Suggestions are only offered on the welcome screen
        Action::Suggest(index) => {
            if controller.messages().is_empty() {
                controller.select_suggestion(index);
            }
        }
        Action::ScrollUp => view.scroll_up(SCROLL_STEP),
        Action::ScrollDown => view.scroll_down(SCROLL_STEP),
        Action::FollowLatest => view.follow_latest(),
        Action::Quit => {}
    }
}
