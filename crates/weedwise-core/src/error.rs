//! Error types for the pipeline
//!
//! Every error here is local to the session: it is logged, translated
//! into a [`Notice`](crate::Notice), the session falls back to the nearest
//! safe state, and the error is returned to the caller. None is fatal.

use crate::state_machine::SessionState;
use weedwise_intake::IntakeError;
use weedwise_model::ModelError;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Selected file was rejected or could not be read
    #[error(transparent)]
    Intake(#[from] IntakeError),

    /// Analysis requested before any image was accepted
    #[error("no image selected")]
    NoImageSelected,

    /// Only one analysis may be in flight per session
    #[error("an analysis is already in progress")]
    AnalysisInProgress,

    /// Backend failed, timed out or returned an invalid result
    #[error("analysis failed: {0}")]
    AnalysisFailed(#[from] AnalysisError),

    /// Transition not allowed by the session state machine
    #[error("illegal state transition: {from:?} -> {to:?}")]
    IllegalTransition {
        from: SessionState,
        to: SessionState,
    },
}

impl PipelineError {
    /// Check if the user can simply try again
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AnalysisFailed(err) => err.is_retryable(),
            Self::Intake(IntakeError::EncodeFailed { .. }) | Self::AnalysisInProgress => true,
            _ => false,
        }
    }

    /// Short machine-readable kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Intake(err) => err.kind(),
            Self::NoImageSelected => "no_image_selected",
            Self::AnalysisInProgress => "analysis_in_progress",
            Self::AnalysisFailed(_) => "analysis_failed",
            Self::IllegalTransition { .. } => "illegal_transition",
        }
    }
}

/// Analysis backend failures
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Backend did not answer within the configured timeout
    #[error("analysis timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Backend could not be reached
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a result that breaks the contract
    #[error("malformed analysis result: {0}")]
    MalformedResult(#[from] ModelError),

    /// Any other backend failure
    #[error("analysis backend error: {0}")]
    Backend(String),
}

impl AnalysisError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable(_))
    }
}
