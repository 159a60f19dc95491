//! Intake validation
//!
//! Two rules, checked in order:
//! 1. the MIME type must be `image/<subtype>`
//! 2. the declared size must not exceed the policy limit
//!
//! Validation has no side effects. Surfacing a rejection to the user is
//! the caller's job.

use crate::error::IntakeError;
use crate::file::ImageFile;
use serde::{Deserialize, Serialize};

/// Default upload limit: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Type/size policy applied to every intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// Largest accepted file, inclusive
    pub max_upload_bytes: u64,
}

impl IntakePolicy {
    /// Create policy with a custom size limit
    #[inline]
    #[must_use]
    pub const fn new(max_upload_bytes: u64) -> Self {
        Self { max_upload_bytes }
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// A file that passed validation
///
/// Only accepted files can be encoded.
#[derive(Debug)]
pub struct Accepted<F> {
    file: F,
}

impl<F: ImageFile> Accepted<F> {
    /// The validated file
    #[inline]
    #[must_use]
    pub fn file(&self) -> &F {
        &self.file
    }

    /// Unwrap the validated file
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> F {
        self.file
    }
}

/// Check a file against the intake policy
///
/// # Errors
/// - `IntakeError::InvalidType` if the MIME type is not `image/*`
/// - `IntakeError::TooLarge` if the size exceeds `policy.max_upload_bytes`
pub fn validate<F: ImageFile>(file: F, policy: &IntakePolicy) -> Result<Accepted<F>, IntakeError> {
    if !is_image_media_type(file.media_type()) {
        tracing::warn!(
            file = file.name(),
            media_type = file.media_type(),
            "rejected: not an image"
        );
        return Err(IntakeError::InvalidType {
            media_type: file.media_type().to_string(),
        });
    }

    if file.byte_size() > policy.max_upload_bytes {
        tracing::warn!(
            file = file.name(),
            size = file.byte_size(),
            limit = policy.max_upload_bytes,
            "rejected: too large"
        );
        return Err(IntakeError::TooLarge {
            size: file.byte_size(),
            limit: policy.max_upload_bytes,
        });
    }

    tracing::debug!(file = file.name(), size = file.byte_size(), "accepted");
    Ok(Accepted { file })
}

/// `image/<subtype>`, case-insensitive, parameters ignored
#[must_use]
pub fn is_image_media_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((kind, subtype)) => {
            kind.eq_ignore_ascii_case("image")
                && !subtype.is_empty()
                && !subtype.contains('/')
                && !subtype.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MemoryFile;
    use proptest::prelude::*;

    fn file(media_type: &str, size: u64) -> MemoryFile {
        MemoryFile::new("upload", media_type, Vec::new()).with_declared_size(size)
    }

    #[test]
    fn image_media_types() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("IMAGE/JPEG"));
        assert!(is_image_media_type("image/svg+xml; charset=utf-8"));

        assert!(!is_image_media_type(""));
        assert!(!is_image_media_type("image"));
        assert!(!is_image_media_type("image/"));
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type("application/x-image"));
    }

    #[test]
    fn accepts_image_within_limit() {
        let accepted = validate(file("image/png", 2_000_000), &IntakePolicy::default()).unwrap();
        assert_eq!(accepted.file().byte_size(), 2_000_000);
    }

    #[test]
    fn limit_is_inclusive() {
        let policy = IntakePolicy::default();
        assert!(validate(file("image/png", DEFAULT_MAX_UPLOAD_BYTES), &policy).is_ok());
        assert!(matches!(
            validate(file("image/png", DEFAULT_MAX_UPLOAD_BYTES + 1), &policy),
            Err(IntakeError::TooLarge { size, limit })
                if size == DEFAULT_MAX_UPLOAD_BYTES + 1 && limit == DEFAULT_MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn type_is_checked_before_size() {
        let result = validate(file("text/plain", u64::MAX), &IntakePolicy::default());
        assert!(matches!(result, Err(IntakeError::InvalidType { .. })));
    }

    #[test]
    fn custom_policy_limit() {
        let policy = IntakePolicy::new(1024);
        assert!(validate(file("image/gif", 1024), &policy).is_ok());
        assert!(validate(file("image/gif", 1025), &policy).is_err());
    }

    proptest! {
        #[test]
        fn prop_non_image_types_never_accepted(
            kind in "(text|application|audio|video|font|model)",
            subtype in "[a-z0-9.+-]{1,12}",
            size in 0u64..=DEFAULT_MAX_UPLOAD_BYTES,
        ) {
            let media_type = format!("{kind}/{subtype}");
            let result = validate(file(&media_type, size), &IntakePolicy::default());
            prop_assert!(
                matches!(result, Err(IntakeError::InvalidType { .. })),
                "expected InvalidType rejection"
            );
        }

        #[test]
        fn prop_oversized_images_rejected(
            subtype in "(png|jpeg|gif|webp|tiff)",
            excess in 1u64..=u64::from(u32::MAX),
        ) {
            let media_type = format!("image/{subtype}");
            let size = DEFAULT_MAX_UPLOAD_BYTES + excess;
            let result = validate(file(&media_type, size), &IntakePolicy::default());
            prop_assert!(
                matches!(result, Err(IntakeError::TooLarge { .. })),
                "expected TooLarge rejection"
            );
        }
    }
}
