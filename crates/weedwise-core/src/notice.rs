//! User-facing notices
//!
//! Every error the session reports and every completed analysis is
//! translated into a short title/description pair that presentation can
//! show as-is.

use crate::error::{AnalysisError, PipelineError};
use serde::{Deserialize, Serialize};
use weedwise_intake::IntakeError;
use weedwise_model::AnalysisResult;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Destructive,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    /// Notice for a finished analysis
    #[must_use]
    pub fn analysis_complete(result: &AnalysisResult) -> Self {
        Self::info(
            "Analysis complete",
            format!(
                "Detected {} weed species in your image.",
                result.detections.len()
            ),
        )
    }

    /// Notice for an analysis the user abandoned
    #[must_use]
    pub fn analysis_cancelled() -> Self {
        Self::info("Analysis cancelled", "The image is still ready to analyze.")
    }
}

impl From<&PipelineError> for Notice {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::Intake(IntakeError::InvalidType { .. }) => Self::destructive(
                "Invalid file type",
                "Please upload an image file (JPEG, PNG, etc.)",
            ),
            PipelineError::Intake(IntakeError::TooLarge { limit, .. }) => Self::destructive(
                "File too large",
                format!("Please upload an image less than {}", format_limit(*limit)),
            ),
            PipelineError::Intake(IntakeError::EncodeFailed { .. }) => Self::destructive(
                "Could not read file",
                "Please try selecting the image again.",
            ),
            PipelineError::NoImageSelected => {
                Self::destructive("No image selected", "Please upload an image to analyze.")
            }
            PipelineError::AnalysisInProgress => Self::destructive(
                "Analysis in progress",
                "Please wait for the current analysis to finish.",
            ),
            PipelineError::AnalysisFailed(AnalysisError::Timeout { .. }) => Self::destructive(
                "Analysis failed",
                "The analysis took too long. Please try again.",
            ),
            PipelineError::AnalysisFailed(inner) => {
                Self::destructive("Analysis failed", inner.to_string())
            }
            PipelineError::IllegalTransition { .. } => {
                Self::destructive("Action not available", err.to_string())
            }
        }
    }
}

/// `10485760` renders as `10MB`; limits that are not whole MiB stay in bytes
fn format_limit(limit: u64) -> String {
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{limit} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weedwise_model::{build_mock_result, ImageReference};

    #[test]
    fn rejection_notices_use_the_familiar_wording() {
        let invalid = Notice::from(&PipelineError::from(IntakeError::InvalidType {
            media_type: "text/plain".into(),
        }));
        assert_eq!(invalid.title, "Invalid file type");
        assert_eq!(invalid.description, "Please upload an image file (JPEG, PNG, etc.)");
        assert_eq!(invalid.severity, Severity::Destructive);

        let too_large = Notice::from(&PipelineError::from(IntakeError::TooLarge {
            size: 11 * MIB,
            limit: 10 * MIB,
        }));
        assert_eq!(too_large.title, "File too large");
        assert_eq!(too_large.description, "Please upload an image less than 10MB");
    }

    #[test]
    fn odd_limits_render_in_bytes() {
        assert_eq!(format_limit(1500), "1500 bytes");
        assert_eq!(format_limit(2 * MIB), "2MB");
    }

    #[test]
    fn no_image_notice() {
        let notice = Notice::from(&PipelineError::NoImageSelected);
        assert_eq!(notice.title, "No image selected");
        assert_eq!(notice.description, "Please upload an image to analyze.");
    }

    #[test]
    fn completion_notice_counts_detections() {
        let result = build_mock_result(&ImageReference::encode("image/png", b"field"));
        let notice = Notice::analysis_complete(&result);

        assert_eq!(notice.title, "Analysis complete");
        assert_eq!(notice.description, "Detected 3 weed species in your image.");
        assert_eq!(notice.severity, Severity::Info);
    }

    #[test]
    fn analysis_failure_carries_error_text() {
        let notice = Notice::from(&PipelineError::from(AnalysisError::Unavailable(
            "connection refused".into(),
        )));
        assert_eq!(notice.title, "Analysis failed");
        assert!(notice.description.contains("connection refused"));
    }
}
