//! Error types for image intake

/// Why a file was refused or could not be turned into a preview
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// MIME type is not `image/*`
    #[error("invalid file type: {media_type:?} is not an image")]
    InvalidType { media_type: String },

    /// File exceeds the upload limit
    #[error("file too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    /// Reading the file failed
    #[error("could not read {name}: {source}")]
    EncodeFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl IntakeError {
    /// Refused by policy, as opposed to an I/O failure
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::TooLarge { .. })
    }

    /// Short machine-readable kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => "invalid_type",
            Self::TooLarge { .. } => "too_large",
            Self::EncodeFailed { .. } => "encode_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_error_display() {
        let err = IntakeError::TooLarge {
            size: 11,
            limit: 10,
        };
        assert!(err.to_string().contains("too large"));
        assert!(err.is_rejection());
        assert_eq!(err.kind(), "too_large");
    }

    #[test]
    fn encode_failure_is_not_a_rejection() {
        let err = IntakeError::EncodeFailed {
            name: "a.png".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "revoked"),
        };
        assert!(!err.is_rejection());
        assert!(err.to_string().contains("a.png"));
    }
}
