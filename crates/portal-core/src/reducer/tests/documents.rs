use super::*;
use pretty_assertions::assert_eq;

fn analysis_batch(effects: &[PortalEffect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            PortalEffect::ScheduleAnalysis { batch_id } => Some(*batch_id),
            _ => None,
        })
        .expect("analysis scheduled")
}

#[test]
fn selection_creates_pending_entries_then_verdicts_apply() {
    let mut state = state();
    let effects = user(
        &mut state,
        UserAction::SelectDocuments(vec!["policy.pdf".to_string()]),
    );
    let batch_id = analysis_batch(&effects);
    assert_eq!(state.documents.len(), 3);
    assert!(state.documents.is_analyzing());

    let effects = runtime(&mut state, RuntimeAction::ApplyDocumentVerdicts { batch_id });
    assert!(matches!(
        journal(&effects).as_slice(),
        [TranscriptEvent::DocumentsAnalyzed { updated: 3, .. }]
    ));
    let statuses: Vec<DocumentStatus> = state.documents.iter().map(|doc| doc.status).collect();
    assert_eq!(
        statuses,
        vec![
            DocumentStatus::Verified,
            DocumentStatus::Verified,
            DocumentStatus::Pending,
        ]
    );
}

#[test]
fn removing_the_whole_batch_cancels_its_analysis() {
    let mut state = state();
    let effects = user(&mut state, UserAction::SelectDocuments(Vec::new()));
    let batch_id = analysis_batch(&effects);
    let ids: Vec<u64> = state.documents.iter().map(|doc| doc.id).collect();

    let mut cancelled = false;
    for id in ids {
        let effects = user(&mut state, UserAction::RemoveDocument(id));
        cancelled |= effects
            .iter()
            .any(|effect| matches!(effect, PortalEffect::CancelAnalysis { batch_id: b } if *b == batch_id));
    }
    assert!(cancelled);
    assert!(!state.documents.is_analyzing());

    // A verdict that was already in flight finds nothing to update.
    assert!(runtime(&mut state, RuntimeAction::ApplyDocumentVerdicts { batch_id }).is_empty());
}

#[test]
fn removed_entry_misses_its_verdict() {
    let mut state = state();
    let effects = user(&mut state, UserAction::SelectDocuments(Vec::new()));
    let batch_id = analysis_batch(&effects);
    let first = state.documents.iter().map(|doc| doc.id).next().expect("doc");

    let effects = user(&mut state, UserAction::RemoveDocument(first));
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, PortalEffect::CancelAnalysis { .. })));
    runtime(&mut state, RuntimeAction::ApplyDocumentVerdicts { batch_id });

    assert_eq!(state.documents.len(), 2);
    assert!(state.documents.get(first).is_none());
}

#[test]
fn unknown_document_removal_is_a_no_op() {
    let mut state = state();
    assert!(user(&mut state, UserAction::RemoveDocument(99)).is_empty());
}
