use serde::Deserialize;
use serde::Serialize;

use super::panels::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MessageContent {
    Text(String),
    Panel(Panel),
}

impl MessageContent {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Panel(_) => None,
        }
    }

    pub fn as_panel(&self) -> Option<&Panel> {
        match self {
            Self::Panel(panel) => Some(panel),
            Self::Text(_) => None,
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text.lines().map(str::to_string).collect(),
            Self::Panel(panel) => panel.to_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub seq: u64,
    pub role: ChatRole,
    pub content: MessageContent,
    #[serde(default)]
    pub typing: bool,
}

/// Append-only conversation log.
///
/// The typing indicator is kept outside the committed sequence: it trails the
/// log while a reply is pending and is replaced, never edited, when the reply
/// lands.
#[derive(Debug, Clone)]
pub struct MessageLog {
    next_seq: u64,
    messages: Vec<ChatMessage>,
    typing: Option<ChatMessage>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self {
            next_seq: 1,
            messages: Vec::new(),
            typing: None,
        }
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without touching the typing indicator; used by replay.
    pub fn append(&mut self, role: ChatRole, content: MessageContent) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.messages.push(ChatMessage {
            seq,
            role,
            content,
            typing: false,
        });
        seq
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> u64 {
        self.append(ChatRole::User, MessageContent::Text(text.into()))
    }

    /// Commits an assistant reply, consuming any typing placeholder.
    pub fn push_assistant(&mut self, content: MessageContent) -> u64 {
        self.typing = None;
        self.append(ChatRole::Assistant, content)
    }

    pub fn begin_typing(&mut self) {
        if self.typing.is_none() {
            self.typing = Some(ChatMessage {
                seq: 0,
                role: ChatRole::Assistant,
                content: MessageContent::Text(String::new()),
                typing: true,
            });
        }
    }

    pub fn clear_typing(&mut self) {
        self.typing = None;
    }

    pub fn typing_indicator(&self) -> Option<&ChatMessage> {
        self.typing.as_ref()
    }

    pub fn get(&self, seq: u64) -> Option<&ChatMessage> {
        self.messages.iter().find(|message| message.seq == seq)
    }

    /// Panel access for in-place section toggles; the message itself keeps
    /// its slot and sequence number.
    pub fn panel_mut(&mut self, seq: u64) -> Option<&mut Panel> {
        self.messages
            .iter_mut()
            .find(|message| message.seq == seq)
            .and_then(|message| match &mut message.content {
                MessageContent::Panel(panel) => Some(panel),
                MessageContent::Text(_) => None,
            })
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sequence_numbers_are_monotonic_from_one() {
        let mut log = MessageLog::new();
        log.push_user("a");
        log.push_assistant(MessageContent::text("b"));
        log.push_user("c");
        let seqs: Vec<u64> = log.iter().map(|message| message.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn typing_placeholder_is_replaced_by_reply() {
        let mut log = MessageLog::new();
        log.push_user("hello");
        log.begin_typing();
        assert!(log.typing_indicator().is_some());
        assert_eq!(log.len(), 1);

        log.push_assistant(MessageContent::text("hi"));
        assert!(log.typing_indicator().is_none());
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|message| !message.typing));
    }

    #[test]
    fn content_serializes_with_type_tag() {
        let encoded = serde_json::to_string(&MessageContent::text("hi")).unwrap_or_default();
        assert_eq!(encoded, r#"{"type":"text","value":"hi"}"#);
    }
}
