use ratatui::layout::Rect;
use serde::Serialize;
use serde_json::Value;

use crate::client::QueryClient;

/// Shown for every failed exchange, regardless of the failure kind.
pub const FALLBACK_REPLY: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Agent,
}

/// Message content. The variant only affects presentation: string answers
/// render as plain text, everything else as a pre-formatted JSON block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Json(String),
}

impl MessageBody {
    /// Dispatch on the shape of the answer value. Strings render inline;
    /// any other JSON value (object, array, number, boolean, null) becomes
    /// a 4-space-indented block.
    pub fn from_answer(answer: Value) -> Self {
        match answer {
            Value::String(text) => MessageBody::Text(text),
            other => MessageBody::Json(pretty_json(&other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageBody::Text(text) | MessageBody::Json(text) => text,
        }
    }
}

fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    if value.serialize(&mut serializer).is_ok() {
        if let Ok(text) = String::from_utf8(buf) {
            return text;
        }
    }

    // Compact form if pretty serialization somehow fails
    value.to_string()
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub body: MessageBody,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Draft state
    pub draft: String,
    pub draft_cursor: usize, // cursor position in draft, in chars

    // Conversation state
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
    pub query_task: Option<tokio::task::JoinHandle<anyhow::Result<Value>>>,

    // Chat pane scroll state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub chat_area: Option<Rect>, // For mouse hit-testing (updated during render)

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub client: QueryClient,
}

impl App {
    pub fn new(client: QueryClient) -> Self {
        Self {
            should_quit: false,
            // The input is focused from the start, like a chat page
            input_mode: InputMode::Editing,

            draft: String::new(),
            draft_cursor: 0,

            messages: Vec::new(),
            pending: false,
            query_task: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,

            animation_frame: 0,

            client,
        }
    }

    /// Start a submission cycle. Appends the user message, clears the draft
    /// and marks the exchange pending, returning the query to send. Returns
    /// `None` (no state change) for blank drafts or while a request is
    /// already outstanding.
    pub fn begin_query(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() || self.pending {
            return None;
        }

        let query = std::mem::take(&mut self.draft);
        self.draft_cursor = 0;

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            body: MessageBody::Text(query.clone()),
        });
        self.pending = true;

        // Scroll so the thinking indicator is visible
        self.scroll_chat_to_bottom();

        Some(query)
    }

    /// Finish the submission cycle with the outcome of the request. Every
    /// failure collapses to the same fallback reply.
    pub fn settle_query(&mut self, result: anyhow::Result<Value>) {
        let body = match result {
            Ok(answer) => MessageBody::from_answer(answer),
            Err(_) => MessageBody::Text(FALLBACK_REPLY.to_string()),
        };

        self.messages.push(ChatMessage {
            role: ChatRole::Agent,
            body,
        });
        self.pending = false;

        self.scroll_chat_to_bottom();
    }

    /// Reap the query task once it has finished. A task that panicked or
    /// was aborted settles the exchange as a failure.
    pub async fn poll_query_task(&mut self) {
        let finished = self
            .query_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);

        if !finished {
            return;
        }

        if let Some(task) = self.query_task.take() {
            match task.await {
                Ok(result) => self.settle_query(result),
                Err(join_error) => self.settle_query(Err(join_error.into())),
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.pending {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        let max_scroll = self.chat_line_count().saturating_sub(self.visible_chat_height());
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll);
    }

    pub fn scroll_chat_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Scroll so the newest message (or the thinking indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.chat_line_count();
        let visible_height = self.visible_chat_height();

        if total_lines > visible_height {
            self.chat_scroll = total_lines - visible_height;
        } else {
            self.chat_scroll = 0;
        }
    }

    fn visible_chat_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Estimate the rendered line count of the conversation, accounting for
    /// wrapping at the chat pane width.
    fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            total_lines += 1; // Role line ("You:" or "Agent:")
            for line in msg.body.as_str().lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1; // Empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.pending {
            total_lines += 2; // "Agent:" + "Thinking..."
        }

        total_lines
    }
}
