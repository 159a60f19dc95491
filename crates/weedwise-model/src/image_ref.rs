//! Displayable image references
//!
//! An [`ImageReference`] is a `data:<media-type>;base64,<payload>` URI. It
//! embeds the full image, so it can be handed to any renderer without a
//! further fetch. The string is shared behind an `Arc`; clones are cheap
//! even for multi-megabyte images.

use crate::error::ModelError;
use crate::fingerprint::ImageFingerprint;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Self-contained base64 `data:` URI
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageReference {
    uri: Arc<str>,
    /// Byte offset of the payload inside `uri`
    payload_start: usize,
}

impl ImageReference {
    /// Encode raw bytes under the given media type
    #[must_use]
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        let mut uri = String::with_capacity(
            SCHEME.len() + media_type.len() + BASE64_MARKER.len() + bytes.len().div_ceil(3) * 4,
        );
        uri.push_str(SCHEME);
        uri.push_str(media_type);
        uri.push_str(BASE64_MARKER);
        let payload_start = uri.len();
        STANDARD.encode_string(bytes, &mut uri);

        Self {
            uri: uri.into(),
            payload_start,
        }
    }

    /// Parse an existing `data:` URI
    ///
    /// Only the structure is checked here; payload validity is checked by
    /// [`ImageReference::decode`].
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidImageReference`] if the string is not a
    /// base64 `data:` URI.
    pub fn parse(uri: impl Into<String>) -> Result<Self, ModelError> {
        let uri = uri.into();

        let Some(rest) = uri.strip_prefix(SCHEME) else {
            return Err(ModelError::InvalidImageReference(
                "missing data: scheme".to_string(),
            ));
        };
        let Some(marker) = rest.find(BASE64_MARKER) else {
            return Err(ModelError::InvalidImageReference(
                "payload is not base64 encoded".to_string(),
            ));
        };
        if marker == 0 {
            return Err(ModelError::InvalidImageReference(
                "missing media type".to_string(),
            ));
        }

        let payload_start = SCHEME.len() + marker + BASE64_MARKER.len();
        Ok(Self {
            uri: uri.into(),
            payload_start,
        })
    }

    /// The full URI
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Media type declared in the URI (e.g. `image/png`)
    #[inline]
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.uri[SCHEME.len()..self.payload_start - BASE64_MARKER.len()]
    }

    /// Base64 payload
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.uri[self.payload_start..]
    }

    /// Decode the payload back into the original bytes
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidImageReference`] if the payload is not
    /// valid standard base64.
    pub fn decode(&self) -> Result<Vec<u8>, ModelError> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| ModelError::InvalidImageReference(e.to_string()))
    }

    /// Blake3 fingerprint of the whole URI
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> ImageFingerprint {
        ImageFingerprint::compute(self.uri.as_bytes())
    }

    /// Length of the URI in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.uri.len()
    }

    /// Always false for a parsed or encoded reference
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uri.is_empty()
    }
}

impl Debug for ImageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageReference")
            .field("media_type", &self.media_type())
            .field("len", &self.len())
            .finish()
    }
}

impl Display for ImageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for ImageReference {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl TryFrom<String> for ImageReference {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImageReference> for String {
    fn from(value: ImageReference) -> Self {
        value.uri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_builds_data_uri() {
        let image = ImageReference::encode("image/png", b"hello");
        assert_eq!(image.as_str(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.payload(), "aGVsbG8=");
    }

    #[test]
    fn parse_accepts_data_uri() {
        let image = ImageReference::parse("data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(image.media_type(), "image/jpeg");
        assert_eq!(image.decode().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn parse_rejects_non_data_uris() {
        assert!(ImageReference::parse("https://example.com/a.png").is_err());
        assert!(ImageReference::parse("data:image/png,raw").is_err());
        assert!(ImageReference::parse("data:;base64,AAEC").is_err());
    }

    #[test]
    fn decode_rejects_corrupt_payload() {
        let image = ImageReference::parse("data:image/png;base64,@@@").unwrap();
        assert!(matches!(
            image.decode(),
            Err(ModelError::InvalidImageReference(_))
        ));
    }

    #[test]
    fn debug_does_not_dump_payload() {
        let image = ImageReference::encode("image/png", &[7u8; 4096]);
        let debug = format!("{image:?}");
        assert!(debug.contains("image/png"));
        assert!(debug.len() < 100);
    }

    #[test]
    fn serde_as_plain_string() {
        let image = ImageReference::encode("image/gif", b"GIF89a");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, format!("\"{}\"", image.as_str()));

        let back: ImageReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
        assert!(serde_json::from_str::<ImageReference>("\"not a uri\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_decode_reproduces_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let image = ImageReference::encode("image/webp", &bytes);
            prop_assert_eq!(image.decode().unwrap(), bytes);
            prop_assert_eq!(image.media_type(), "image/webp");
        }
    }
}
