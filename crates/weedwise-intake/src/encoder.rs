//! Preview encoding
//!
//! Reads an accepted file and produces a base64 `data:` URI that serves
//! both as the live preview and as the input to analysis. Completion is a
//! single terminal event: a reference, or an error.

use crate::error::IntakeError;
use crate::file::ImageFile;
use crate::validator::{Accepted, IntakePolicy};
use weedwise_model::ImageReference;

/// Encode an accepted file as a displayable image reference
///
/// # Errors
/// - `IntakeError::EncodeFailed` if reading the file fails
/// - `IntakeError::TooLarge` if the bytes read exceed the policy limit,
///   whatever size the file declared
pub async fn encode<F: ImageFile>(
    accepted: &Accepted<F>,
    policy: &IntakePolicy,
) -> Result<ImageReference, IntakeError> {
    let file = accepted.file();

    let bytes = file
        .read_bytes()
        .await
        .map_err(|source| IntakeError::EncodeFailed {
            name: file.name().to_string(),
            source,
        })?;

    let size = bytes.len() as u64;
    if size > policy.max_upload_bytes {
        tracing::warn!(
            file = file.name(),
            declared = file.byte_size(),
            actual = size,
            "read more bytes than declared"
        );
        return Err(IntakeError::TooLarge {
            size,
            limit: policy.max_upload_bytes,
        });
    }

    let image = ImageReference::encode(file.media_type(), &bytes);
    tracing::debug!(
        file = file.name(),
        bytes = size,
        fingerprint = %image.fingerprint().short(),
        "preview encoded"
    );
    Ok(image)
}
