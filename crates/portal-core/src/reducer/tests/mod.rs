use pretty_assertions::assert_eq;

pub(super) use super::reduce;
pub(super) use super::PortalEffect;
pub(super) use crate::actions::PortalAction;
pub(super) use crate::actions::RuntimeAction;
pub(super) use crate::actions::UserAction;
pub(super) use crate::chat::ChatRole;
pub(super) use crate::documents::DocumentStatus;
pub(super) use crate::panels::CanvasSectionId;
pub(super) use crate::panels::CanvasStage;
pub(super) use crate::panels::Panel;
pub(super) use crate::panels::SectionState;
pub(super) use crate::persistence::TranscriptEvent;
pub(super) use crate::progress::StepStatus;
pub(super) use crate::router::ReplyStep;
pub(super) use crate::state::SessionOptions;
pub(super) use crate::state::SessionState;
pub(super) use crate::suggestions::chip_titles;

mod chat_flow;
mod documents;
mod reply_ordering;

fn state() -> SessionState {
    SessionState::new(SessionOptions::default())
}

fn user(state: &mut SessionState, action: UserAction) -> Vec<PortalEffect> {
    reduce(state, PortalAction::User(action))
}

fn runtime(state: &mut SessionState, action: RuntimeAction) -> Vec<PortalEffect> {
    reduce(state, PortalAction::Runtime(action))
}

/// Sends `text` and returns the queued submission with its reply steps.
fn send(state: &mut SessionState, text: &str) -> (u64, Vec<ReplyStep>) {
    let effects = user(state, UserAction::SubmitText(text.to_string()));
    effects
        .into_iter()
        .find_map(|effect| match effect {
            PortalEffect::ScheduleReply { submission, steps } => Some((submission, steps)),
            _ => None,
        })
        .expect("reply scheduled")
}

/// Delivers every step of a queued reply, as the reply worker would.
fn deliver_all(state: &mut SessionState, submission: u64, steps: Vec<ReplyStep>) -> Vec<PortalEffect> {
    let count = steps.len();
    let mut effects = Vec::new();
    for (idx, step) in steps.into_iter().enumerate() {
        effects.extend(runtime(
            state,
            RuntimeAction::DeliverReply {
                submission,
                step,
                last: idx + 1 == count,
            },
        ));
    }
    effects
}

fn transcript(state: &SessionState) -> Vec<(ChatRole, String)> {
    state
        .messages
        .iter()
        .map(|message| {
            let text = message
                .content
                .as_text()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    message
                        .content
                        .as_panel()
                        .map(|panel| format!("[{}]", panel.title()))
                        .unwrap_or_default()
                });
            (message.role, text)
        })
        .collect()
}

fn journal(effects: &[PortalEffect]) -> Vec<&TranscriptEvent> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            PortalEffect::Journal(event) => Some(event),
            _ => None,
        })
        .collect()
}

fn assert_single_current(state: &SessionState) {
    let current = state
        .progress
        .steps()
        .iter()
        .filter(|step| step.status == StepStatus::Current)
        .count();
    assert_eq!(current, usize::from(!state.progress.is_finished()));
}
