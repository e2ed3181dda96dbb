//! Rendering of the chat screen

use crate::api::ChatTransport;
use crate::chat::{ChatMessage, Role};
use crate::controller::{ChatState, Controller, SUGGESTED_PROMPTS};
use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

const TITLE: &str = "AI 상담";
const WARNING_BANNER: &str =
    "본 AI 상담은 참고용으로 제공되며, 정확한 진단과 치료는 반드시 수의사와 상담 후 진행해주세요.";
const GREETING: &str = "🤖 안녕하세요! 반려동물 건강 상담 AI입니다. 무엇을 도와드릴까요?";
const PLACEHOLDER: &str = "메시지를 입력하세요...";
const INPUT_HEIGHT: u16 = 5;

const USER_COLOR: Color = Color::Cyan;
const ASSISTANT_COLOR: Color = Color::Green;
const MUTED: Color = Color::DarkGray;

/// Scroll position of the conversation pane
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    /// Lines scrolled past at the top
    offset: usize,
    /// Pin the view to the newest entry
    follow: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

impl ViewState {
    pub fn follow_latest(&mut self) {
        self.follow = true;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    /// Clamp against the rendered content and return the offset to draw at
    pub fn resolve(&mut self, total_lines: usize, visible: usize) -> usize {
        let max = total_lines.saturating_sub(visible);
        if self.follow || self.offset >= max {
            self.offset = max;
            self.follow = true;
        }
        self.offset
    }
}

pub fn render<T: ChatTransport>(frame: &mut Frame, controller: &Controller<T>, view: &mut ViewState) {
    let [header, body, input, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .centered(),
        header,
    );

    render_conversation(frame, controller, view, body);
    render_input(frame, controller, input);
    render_footer(frame, controller, footer);
}

fn render_conversation<T: ChatTransport>(
    frame: &mut Frame,
    controller: &Controller<T>,
    view: &mut ViewState,
    area: Rect,
) {
    let text = if controller.messages().is_empty() {
        welcome_text(controller.is_busy())
    } else {
        conversation_text(controller.messages(), controller.state(), Utc::now())
    };

    let block = Block::bordered().border_style(Style::default().fg(MUTED));
    let inner = block.inner(area);
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    let total = paragraph.line_count(inner.width);
    let offset = view.resolve(total, usize::from(inner.height));

    frame.render_widget(
        paragraph
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .block(block),
        area,
    );
}

fn welcome_text(busy: bool) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            WARNING_BANNER,
            Style::default().fg(Color::Yellow),
        )),
        Line::default(),
        Line::from(GREETING),
        Line::default(),
    ];
    let style = if busy {
        Style::default().fg(MUTED)
    } else {
        Style::default()
    };
    for (i, prompt) in SUGGESTED_PROMPTS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("[F{}] ", i + 1), style.add_modifier(Modifier::BOLD)),
            Span::styled(*prompt, style),
        ]));
    }
    Text::from(lines)
}

fn conversation_text(messages: &[ChatMessage], state: ChatState, now: DateTime<Utc>) -> Text<'static> {
    let mut lines = Vec::new();
    for message in messages {
        let (label, color) = match message.role {
            Role::User => ("나", USER_COLOR),
            Role::Assistant => ("AI", ASSISTANT_COLOR),
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" · {}", message.timestamp.with_timezone(&Local).format("%H:%M")),
                Style::default().fg(MUTED),
            ),
        ]));
        lines.extend(message.content.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::default());
    }

    if let ChatState::Sending { since } = state {
        let elapsed = (now - since).num_seconds().max(0);
        lines.push(Line::from(Span::styled(
            format!("⏳ 답변을 기다리는 중... ({elapsed}s)"),
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )));
    }
    Text::from(lines)
}

fn render_input<T: ChatTransport>(frame: &mut Frame, controller: &Controller<T>, area: Rect) {
    let busy = controller.is_busy();
    let send_marker = if busy {
        " ⏳ "
    } else if controller.can_submit() {
        " 📤 Enter "
    } else {
        " 📤 "
    };
    let border = if busy { MUTED } else { Color::White };
    let block = Block::bordered()
        .border_style(Style::default().fg(border))
        .title_bottom(Line::from(send_marker).right_aligned());

    let paragraph = if controller.input().is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(MUTED)))
    } else {
        let style = if busy {
            Style::default().fg(MUTED)
        } else {
            Style::default()
        };
        let text: Vec<Line> = controller
            .input()
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
        Paragraph::new(text).wrap(Wrap { trim: false })
    };

    // Keep the tail of a long draft visible
    let inner = block.inner(area);
    let total = paragraph.line_count(inner.width);
    let offset = total.saturating_sub(usize::from(inner.height));
    frame.render_widget(
        paragraph
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .block(block),
        area,
    );
}

fn render_footer<T: ChatTransport>(frame: &mut Frame, controller: &Controller<T>, area: Rect) {
    let help = if controller.messages().is_empty() {
        "Enter send · Alt+Enter newline · F1-F4 suggestion · Esc quit"
    } else {
        "Enter send · Alt+Enter newline · PgUp/PgDn scroll · End latest · Esc quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(help, Style::default().fg(MUTED)),
            Span::styled(
                format!("  {}", controller.base_url()),
                Style::default().fg(MUTED).add_modifier(Modifier::DIM),
            ),
        ])),
        area,
    );
}
