use super::*;
use pretty_assertions::assert_eq;

#[test]
fn blank_input_appends_nothing_and_routes_nothing() {
    let mut state = state();
    assert!(user(&mut state, UserAction::SubmitText("   ".to_string())).is_empty());
    assert!(user(&mut state, UserAction::Submit).is_empty());
    assert_eq!(state.messages.len(), 1);
    assert!(!state.is_awaiting_reply());
}

#[test]
fn user_message_lands_before_the_reply_timer_fires() {
    let mut state = state();
    let (_submission, steps) = send(&mut state, "hello");
    assert_eq!(steps.len(), 1);
    assert_eq!(
        state.messages.last().map(|message| message.role),
        Some(ChatRole::User)
    );
    assert!(state.messages.typing_indicator().is_some());
}

#[test]
fn prefill_moves_to_documents_and_swaps_chips() {
    let mut state = state();
    let (submission, steps) = send(&mut state, "Can you prefill this?");
    let effects = deliver_all(&mut state, submission, steps);

    assert_eq!(state.progress.current_index(), Some(2));
    assert_eq!(
        chip_titles(&state.suggestions),
        vec![
            "Upload Required Documents",
            "Calculate ESG Score",
            "Get AI Recommendations",
            "Submit Application",
        ]
    );
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, PortalEffect::ScheduleCanvas { .. })));
    assert!(journal(&effects)
        .iter()
        .any(|event| matches!(event, TranscriptEvent::StepAdvanced { step_index: 2, .. })));
    assert!(state.messages.typing_indicator().is_none());
    assert_single_current(&state);
}

#[test]
fn prefill_ack_arrives_before_canvas_with_typing_in_between() {
    let mut state = state();
    let (submission, mut steps) = send(&mut state, "prefill");
    let canvas = steps.pop().expect("canvas step");
    let ack = steps.pop().expect("ack step");

    runtime(
        &mut state,
        RuntimeAction::DeliverReply {
            submission,
            step: ack,
            last: false,
        },
    );
    assert!(state.messages.typing_indicator().is_some());
    assert_eq!(chip_titles(&state.suggestions)[0], "Prefill Application");

    runtime(
        &mut state,
        RuntimeAction::DeliverReply {
            submission,
            step: canvas,
            last: true,
        },
    );
    let texts: Vec<String> = transcript(&state).into_iter().map(|(_, text)| text).collect();
    assert_eq!(texts.last().map(String::as_str), Some("[Application canvas]"));
    assert!(state.messages.typing_indicator().is_none());
}

#[test]
fn diversity_fills_the_input_box_without_sending() {
    let mut state = state();
    let (submission, steps) = send(&mut state, "diversity");
    deliver_all(&mut state, submission, steps);
    assert!(state.draft.starts_with("Our diversity metrics show 45% female leadership"));
    assert_eq!(state.messages.len(), 3);

    let effects = user(&mut state, UserAction::Submit);
    assert!(state.draft.is_empty());
    assert!(effects
        .iter()
        .any(|effect| matches!(effect, PortalEffect::ScheduleReply { .. })));
}

#[test]
fn score_reply_is_the_fixed_card() {
    let mut state = state();
    let (submission, steps) = send(&mut state, "What's my score?");
    deliver_all(&mut state, submission, steps);
    let Some(Panel::EsgScore(card)) = state.messages.last().and_then(|m| m.content.as_panel())
    else {
        panic!("expected score card");
    };
    assert_eq!(card.overall, 78);
    assert_eq!(
        card.pillars.iter().map(|entry| entry.score).collect::<Vec<_>>(),
        vec![82, 75, 77]
    );
    assert_eq!(state.progress.current_index(), Some(0));
}

#[test]
fn only_enabled_chips_send() {
    let mut state = state();
    assert!(user(&mut state, UserAction::ActivateChip(1)).is_empty());
    assert!(user(&mut state, UserAction::ActivateChip(9)).is_empty());

    let (_, steps) = {
        let effects = user(&mut state, UserAction::ActivateChip(3));
        effects
            .into_iter()
            .find_map(|effect| match effect {
                PortalEffect::ScheduleReply { submission, steps } => Some((submission, steps)),
                _ => None,
            })
            .expect("resume chip sends")
    };
    assert!(matches!(
        steps[0].content.as_panel(),
        Some(Panel::ContinueForm(_))
    ));
    assert_eq!(
        transcript(&state).last().map(|(_, text)| text.as_str()),
        Some("Continue where we left off")
    );
}

#[test]
fn input_editing_updates_the_draft() {
    let mut state = state();
    user(&mut state, UserAction::InputChar('h'));
    user(&mut state, UserAction::InputChar('i'));
    user(&mut state, UserAction::InputBackspace);
    user(&mut state, UserAction::InputPaste(" there\nfriend".to_string()));
    assert_eq!(state.draft, "h there friend");

    user(&mut state, UserAction::ClearInput);
    assert_eq!(state.draft, "");
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn canvas_sections_follow_the_timeline_and_accordion() {
    let mut state = state();
    let (submission, steps) = send(&mut state, "prefill");
    let effects = deliver_all(&mut state, submission, steps);
    let message_seq = effects
        .iter()
        .find_map(|effect| match effect {
            PortalEffect::ScheduleCanvas { message_seq } => Some(*message_seq),
            _ => None,
        })
        .expect("canvas scheduled");

    runtime(
        &mut state,
        RuntimeAction::AdvanceCanvas {
            message_seq,
            stage: CanvasStage::ApplicantComplete,
        },
    );
    user(
        &mut state,
        UserAction::ExpandCanvasSection {
            message_seq,
            section: CanvasSectionId::EsgProfile,
        },
    );

    let Some(Panel::ApplicationCanvas(canvas)) =
        state.messages.get(message_seq).and_then(|m| m.content.as_panel())
    else {
        panic!("expected canvas");
    };
    assert_eq!(
        canvas.section_state(CanvasSectionId::Applicant),
        Some(SectionState::Complete)
    );
    assert_eq!(
        canvas.section_state(CanvasSectionId::EsgProfile),
        Some(SectionState::Loading)
    );
    assert_eq!(canvas.expanded, Some(CanvasSectionId::EsgProfile));
}

#[test]
fn canvas_actions_on_text_messages_are_ignored() {
    let mut state = state();
    assert!(runtime(
        &mut state,
        RuntimeAction::AdvanceCanvas {
            message_seq: 1,
            stage: CanvasStage::DocumentsReady,
        },
    )
    .is_empty());
    assert!(user(&mut state, UserAction::CollapseCanvas { message_seq: 42 }).is_empty());
}
