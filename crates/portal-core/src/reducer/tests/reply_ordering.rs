use super::*;
use pretty_assertions::assert_eq;

#[test]
fn replies_follow_submission_order() {
    let mut state = state();
    let (first, first_steps) = send(&mut state, "A");
    let (second, second_steps) = send(&mut state, "B");
    deliver_all(&mut state, first, first_steps);
    deliver_all(&mut state, second, second_steps);

    let roles: Vec<ChatRole> = transcript(&state)
        .into_iter()
        .skip(1)
        .map(|(role, _)| role)
        .collect();
    assert_eq!(
        roles,
        vec![
            ChatRole::User,
            ChatRole::User,
            ChatRole::Assistant,
            ChatRole::Assistant,
        ]
    );
}

#[test]
fn out_of_turn_reply_is_dropped() {
    let mut state = state();
    let (_first, _) = send(&mut state, "A");
    let (second, second_steps) = send(&mut state, "B");
    let effects = deliver_all(&mut state, second, second_steps);
    assert!(effects.is_empty());
    assert_eq!(state.messages.len(), 3);
}

#[test]
fn typing_indicator_stays_while_later_replies_are_pending() {
    let mut state = state();
    let (first, first_steps) = send(&mut state, "A");
    let (second, second_steps) = send(&mut state, "prefill");

    deliver_all(&mut state, first, first_steps);
    assert!(state.messages.typing_indicator().is_some());
    assert_eq!(state.pending_submissions.front(), Some(&second));

    deliver_all(&mut state, second, second_steps);
    assert!(state.messages.typing_indicator().is_none());
    assert!(!state.is_awaiting_reply());
}

#[test]
fn message_sequence_numbers_increase_through_the_conversation() {
    let mut state = state();
    for text in ["one", "two", "three"] {
        let (submission, steps) = send(&mut state, text);
        deliver_all(&mut state, submission, steps);
    }
    let seqs: Vec<u64> = state.messages.iter().map(|message| message.seq).collect();
    assert_eq!(seqs, (1..=7).collect::<Vec<u64>>());
}
