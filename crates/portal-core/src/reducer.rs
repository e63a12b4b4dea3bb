use super::actions::PortalAction;
use super::actions::RuntimeAction;
use super::actions::UserAction;
use super::chat::ChatRole;
use super::chat::MessageContent;
use super::panels::Panel;
use super::persistence::TranscriptEvent;
use super::router::route;
use super::router::ReplyStep;
use super::router::SessionEffect;
use super::state::SessionState;

/// Work the reducer asks its owner to perform. Timers scheduled here report
/// back through [`RuntimeAction`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEffect {
    ScheduleReply {
        submission: u64,
        steps: Vec<ReplyStep>,
    },
    ScheduleCanvas {
        message_seq: u64,
    },
    ScheduleAnalysis {
        batch_id: u64,
    },
    CancelAnalysis {
        batch_id: u64,
    },
    /// Drop every timer belonging to the previous session.
    CancelPending,
    Journal(TranscriptEvent),
    RequestFrame,
}

pub fn reduce(state: &mut SessionState, action: PortalAction) -> Vec<PortalEffect> {
    match action {
        PortalAction::User(user) => reduce_user(state, user),
        PortalAction::Runtime(runtime) => reduce_runtime(state, runtime),
    }
}

fn reduce_user(state: &mut SessionState, action: UserAction) -> Vec<PortalEffect> {
    match action {
        UserAction::InputChar(ch) => {
            state.draft.push(ch);
            vec![PortalEffect::RequestFrame]
        }
        UserAction::InputBackspace => {
            state.draft.pop();
            vec![PortalEffect::RequestFrame]
        }
        UserAction::InputPaste(text) => {
            state.draft.push_str(text.replace(['\r', '\n'], " ").as_str());
            vec![PortalEffect::RequestFrame]
        }
        UserAction::ClearInput => {
            state.draft.clear();
            vec![PortalEffect::RequestFrame]
        }
        UserAction::Submit => {
            if state.draft.trim().is_empty() {
                return Vec::new();
            }
            let text = std::mem::take(&mut state.draft);
            submit(state, text)
        }
        UserAction::SubmitText(text) => submit(state, text),
        UserAction::ActivateChip(index) => {
            let Some(text) = state
                .suggestions
                .get(index)
                .and_then(|chip| chip.send_text())
                .map(str::to_string)
            else {
                tracing::debug!(index, "ignoring inactive suggestion chip");
                return Vec::new();
            };
            submit(state, text)
        }
        UserAction::SelectDocuments(selection) => {
            let batch = state.documents.select_files(&selection);
            let filenames = batch
                .document_ids
                .iter()
                .filter_map(|id| state.documents.get(*id))
                .map(|document| document.filename.clone())
                .collect();
            tracing::info!(batch_id = batch.batch_id, "document analysis started");
            vec![
                PortalEffect::Journal(TranscriptEvent::DocumentsSelected {
                    batch_id: batch.batch_id,
                    document_ids: batch.document_ids.to_vec(),
                    filenames,
                }),
                PortalEffect::ScheduleAnalysis {
                    batch_id: batch.batch_id,
                },
                PortalEffect::RequestFrame,
            ]
        }
        UserAction::RemoveDocument(document_id) => {
            let Some(removed) = state.documents.remove(document_id) else {
                return Vec::new();
            };
            let mut effects = vec![PortalEffect::Journal(TranscriptEvent::DocumentRemoved {
                document_id,
            })];
            if state.documents.abandoned_batch(removed.batch_id) {
                state.documents.forget_batch(removed.batch_id);
                tracing::info!(batch_id = removed.batch_id, "analysis abandoned, batch emptied");
                effects.push(PortalEffect::CancelAnalysis {
                    batch_id: removed.batch_id,
                });
            }
            effects.push(PortalEffect::RequestFrame);
            effects
        }
        UserAction::ExpandCanvasSection {
            message_seq,
            section,
        } => {
            let Some(Panel::ApplicationCanvas(canvas)) = state.messages.panel_mut(message_seq)
            else {
                return Vec::new();
            };
            canvas.expand(section);
            vec![PortalEffect::RequestFrame]
        }
        UserAction::CollapseCanvas { message_seq } => {
            let Some(Panel::ApplicationCanvas(canvas)) = state.messages.panel_mut(message_seq)
            else {
                return Vec::new();
            };
            canvas.collapse();
            vec![PortalEffect::RequestFrame]
        }
        UserAction::SubmitApplication => {
            if state.progress.is_finished() {
                return Vec::new();
            }
            state.progress.finish();
            vec![
                PortalEffect::Journal(TranscriptEvent::ApplicationSubmitted),
                PortalEffect::RequestFrame,
            ]
        }
        UserAction::ResetSession => {
            state.reset();
            let mut effects = vec![PortalEffect::CancelPending];
            effects.extend(
                state
                    .opening_events()
                    .into_iter()
                    .map(PortalEffect::Journal),
            );
            effects.push(PortalEffect::RequestFrame);
            effects
        }
    }
}

/// Appends the user turn now and queues the routed reply.
fn submit(state: &mut SessionState, text: String) -> Vec<PortalEffect> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let outcome = route(text.as_str(), state);
    let message_seq = state.messages.push_user(text.clone());
    let submission = state.allocate_submission();
    state.messages.begin_typing();
    tracing::debug!(
        submission,
        intent = outcome.intent.label(),
        steps = outcome.steps.len(),
        "reply queued"
    );
    vec![
        PortalEffect::Journal(TranscriptEvent::MessageAppended {
            message_seq,
            role: ChatRole::User,
            content: MessageContent::Text(text),
        }),
        PortalEffect::ScheduleReply {
            submission,
            steps: outcome.steps,
        },
        PortalEffect::RequestFrame,
    ]
}

fn reduce_runtime(state: &mut SessionState, action: RuntimeAction) -> Vec<PortalEffect> {
    match action {
        RuntimeAction::DeliverReply {
            submission,
            step,
            last,
        } => deliver_reply(state, submission, step, last),
        RuntimeAction::AdvanceCanvas { message_seq, stage } => {
            let Some(Panel::ApplicationCanvas(canvas)) = state.messages.panel_mut(message_seq)
            else {
                return Vec::new();
            };
            canvas.apply_stage(stage);
            vec![PortalEffect::RequestFrame]
        }
        RuntimeAction::ApplyDocumentVerdicts { batch_id } => {
            let updated = state.documents.apply_verdicts(batch_id);
            if updated == 0 {
                tracing::debug!(batch_id, "no documents left for verdicts");
                return Vec::new();
            }
            tracing::info!(batch_id, updated, "document analysis finished");
            vec![
                PortalEffect::Journal(TranscriptEvent::DocumentsAnalyzed { batch_id, updated }),
                PortalEffect::RequestFrame,
            ]
        }
    }
}

fn deliver_reply(
    state: &mut SessionState,
    submission: u64,
    step: ReplyStep,
    last: bool,
) -> Vec<PortalEffect> {
    // Only the oldest outstanding submission may speak.
    if state.pending_submissions.front() != Some(&submission) {
        tracing::debug!(submission, "dropping reply for a stale submission");
        return Vec::new();
    }

    let ReplyStep {
        content,
        suggestions,
        effects: session_effects,
        ..
    } = step;
    let opens_canvas = matches!(content.as_panel(), Some(Panel::ApplicationCanvas(_)));
    let message_seq = state.messages.push_assistant(content.clone());
    let mut effects = vec![PortalEffect::Journal(TranscriptEvent::MessageAppended {
        message_seq,
        role: ChatRole::Assistant,
        content,
    })];

    for effect in session_effects {
        match effect {
            SessionEffect::AdvanceTo(target) => {
                if let Some(step_index) = state.progress.advance(target) {
                    let title = state
                        .progress
                        .current_step()
                        .map(|step| step.title.clone())
                        .unwrap_or_default();
                    effects.push(PortalEffect::Journal(TranscriptEvent::StepAdvanced {
                        step_index,
                        title,
                    }));
                }
            }
            SessionEffect::SetDraft(text) => state.draft = text,
        }
    }
    if let Some(chips) = suggestions {
        state.suggestions = chips;
    }
    if opens_canvas {
        effects.push(PortalEffect::ScheduleCanvas { message_seq });
    }
    if last {
        state.pending_submissions.pop_front();
    }
    if state.is_awaiting_reply() {
        state.messages.begin_typing();
    }
    effects.push(PortalEffect::RequestFrame);
    effects
}

#[cfg(test)]
mod tests;
