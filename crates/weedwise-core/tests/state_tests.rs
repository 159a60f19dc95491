//! Session State Tests
//!
//! Transition table checks per state, plus property tests over every
//! state pair and over random operation sequences on a live session.

use proptest::prelude::*;
use weedwise_core::state_machine::{allowed_transitions, validate_transition, SessionState};
use weedwise_core::{PipelineError, PipelineSession};
use weedwise_test_utils::{fast_config, png_file, text_file, UnreadableFile};

#[test]
fn test_empty_transitions() {
    assert!(validate_transition(SessionState::Empty, SessionState::ImageSelected).is_ok());

    // Invalid
    assert!(validate_transition(SessionState::Empty, SessionState::Analyzing).is_err());
    assert!(validate_transition(SessionState::Empty, SessionState::ResultReady).is_err());
    assert!(validate_transition(SessionState::Empty, SessionState::Empty).is_err());
}

#[test]
fn test_image_selected_transitions() {
    assert!(validate_transition(SessionState::ImageSelected, SessionState::ImageSelected).is_ok());
    assert!(validate_transition(SessionState::ImageSelected, SessionState::Empty).is_ok());
    assert!(validate_transition(SessionState::ImageSelected, SessionState::Analyzing).is_ok());

    assert!(validate_transition(SessionState::ImageSelected, SessionState::ResultReady).is_err());
}

#[test]
fn test_analyzing_transitions() {
    assert!(validate_transition(SessionState::Analyzing, SessionState::ResultReady).is_ok());
    assert!(validate_transition(SessionState::Analyzing, SessionState::ImageSelected).is_ok());

    // A running analysis cannot be dropped or restarted
    assert!(validate_transition(SessionState::Analyzing, SessionState::Empty).is_err());
    assert!(validate_transition(SessionState::Analyzing, SessionState::Analyzing).is_err());
}

#[test]
fn test_result_ready_transitions() {
    assert!(validate_transition(SessionState::ResultReady, SessionState::ImageSelected).is_ok());
    assert!(validate_transition(SessionState::ResultReady, SessionState::Empty).is_ok());

    assert!(validate_transition(SessionState::ResultReady, SessionState::Analyzing).is_err());
}

fn any_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::Empty),
        Just(SessionState::ImageSelected),
        Just(SessionState::Analyzing),
        Just(SessionState::ResultReady),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    SelectImage(usize),
    SelectText,
    SelectUnreadable,
    Remove,
    Reset,
    Analyze,
    Cancel,
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..512).prop_map(Op::SelectImage),
        Just(Op::SelectText),
        Just(Op::SelectUnreadable),
        Just(Op::Remove),
        Just(Op::Reset),
        Just(Op::Analyze),
        Just(Op::Cancel),
    ]
}

async fn apply(session: &PipelineSession, op: Op) {
    // Errors are part of the walk; only the resulting state matters here.
    let _ = match op {
        Op::SelectImage(len) => session.select_file(Some(png_file(len))).await.map(|_| ()),
        Op::SelectText => session.select_file(Some(text_file())).await.map(|_| ()),
        Op::SelectUnreadable => session.select_file(Some(UnreadableFile)).await.map(|_| ()),
        Op::Remove => session.remove_image(),
        Op::Reset => session.reset(),
        Op::Analyze => session.analyze().await.map(|_| ()),
        Op::Cancel => {
            session.cancel_analysis();
            Ok::<(), PipelineError>(())
        }
    };
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(from in any_state(), to in any_state()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
            let is_illegal = matches!(res, Err(PipelineError::IllegalTransition { .. }));
            prop_assert!(is_illegal);
        }
    }

    #[test]
    fn prop_session_state_matches_its_contents(ops in proptest::collection::vec(any_op(), 0..24)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let session = PipelineSession::new(fast_config());

        for op in ops {
            runtime.block_on(apply(&session, op));

            let snapshot = session.snapshot();
            prop_assert!(!snapshot.processing);
            prop_assert_eq!(snapshot.image.is_some(), snapshot.state != SessionState::Empty);
            prop_assert_eq!(snapshot.result.is_some(), snapshot.state == SessionState::ResultReady);
            if let (Some(image), Some(result)) = (&snapshot.image, &snapshot.result) {
                prop_assert_eq!(&result.original_image, image);
            }
        }
    }
}
