use super::panels::CanvasSectionId;
use super::panels::CanvasStage;
use super::router::ReplyStep;

#[derive(Debug, Clone)]
pub enum PortalAction {
    User(UserAction),
    Runtime(RuntimeAction),
}

#[derive(Debug, Clone)]
pub enum UserAction {
    InputChar(char),
    InputBackspace,
    InputPaste(String),
    ClearInput,
    /// Sends the input box contents.
    Submit,
    SubmitText(String),
    /// Zero-based index into the visible chips.
    ActivateChip(usize),
    SelectDocuments(Vec<String>),
    RemoveDocument(u64),
    ExpandCanvasSection {
        message_seq: u64,
        section: CanvasSectionId,
    },
    CollapseCanvas {
        message_seq: u64,
    },
    SubmitApplication,
    ResetSession,
}

/// Timer completions. Each one names what it was scheduled for so stale
/// deliveries can be told apart.
#[derive(Debug, Clone)]
pub enum RuntimeAction {
    DeliverReply {
        submission: u64,
        step: ReplyStep,
        last: bool,
    },
    AdvanceCanvas {
        message_seq: u64,
        stage: CanvasStage,
    },
    ApplyDocumentVerdicts {
        batch_id: u64,
    },
}

/// Parsed form of a line typed into the chat box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Send(String),
    Upload(Vec<String>),
    /// One-based position in the document list.
    Remove(usize),
    Submit,
    Reset,
}

impl ChatCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Some(Self::Send(line.to_string()));
        };
        let mut parts = rest.split_whitespace();
        match parts.next() {
            Some("upload") => Some(Self::Upload(parts.map(str::to_string).collect())),
            Some("remove") => parts
                .next()
                .and_then(|value| value.parse::<usize>().ok())
                .filter(|position| *position > 0)
                .map(Self::Remove),
            Some("submit") => Some(Self::Submit),
            Some("reset") => Some(Self::Reset),
            _ => Some(Self::Send(line.to_string())),
        }
    }
}
