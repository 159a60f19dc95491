use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Lifecycle of one intake session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No image
    Empty,
    /// An encoded image is previewed and ready for analysis
    ImageSelected,
    /// Analysis in flight
    Analyzing,
    /// Analysis finished; the result is on display
    ResultReady,
}

impl SessionState {
    /// Observers must render a distinct processing state
    #[inline]
    #[must_use]
    pub fn is_processing(self) -> bool {
        self == Self::Analyzing
    }
}

/// Validates a state transition.
///
/// Illegal transitions are reported as errors rather than panics so the
/// session can refuse them and stay where it is.
pub fn validate_transition(from: SessionState, to: SessionState) -> Result<(), PipelineError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(PipelineError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        Empty => vec![ImageSelected],
        ImageSelected => vec![ImageSelected, Empty, Analyzing],
        Analyzing => vec![ResultReady, ImageSelected],
        ResultReady => vec![ImageSelected, Empty],
    }
}

fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    #[test]
    fn analyzing_is_entered_only_from_image_selected() {
        for from in [Empty, ImageSelected, Analyzing, ResultReady] {
            let expected = from == ImageSelected;
            assert_eq!(validate_transition(from, Analyzing).is_ok(), expected, "{from:?}");
        }
    }

    #[test]
    fn result_ready_is_reached_only_from_analyzing() {
        assert!(validate_transition(Analyzing, ResultReady).is_ok());
        assert!(validate_transition(ImageSelected, ResultReady).is_err());
        assert!(validate_transition(Empty, ResultReady).is_err());
    }

    #[test]
    fn illegal_transition_reports_both_ends() {
        match validate_transition(Empty, Analyzing) {
            Err(PipelineError::IllegalTransition { from, to }) => {
                assert_eq!(from, Empty);
                assert_eq!(to, Analyzing);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_analyzing_is_processing() {
        assert!(Analyzing.is_processing());
        assert!(!ImageSelected.is_processing());
        assert!(!ResultReady.is_processing());
    }
}
