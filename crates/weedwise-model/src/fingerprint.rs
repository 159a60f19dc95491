//! Content fingerprints for image references
//!
//! Provides [`ImageFingerprint`], a 32-byte Blake3 digest used to key
//! cached analysis results and to identify images in logs without
//! printing megabytes of base64.

use std::fmt::{self, Display, Formatter};

/// A 32-byte content fingerprint (Blake3)
///
/// Immutable and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageFingerprint([u8; 32]);

impl ImageFingerprint {
    /// Create a fingerprint from raw digest bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the Blake3 fingerprint of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self::new(*blake3::hash(data).as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ImageFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = ImageFingerprint::compute(b"field.png");
        let b = ImageFingerprint::compute(b"field.png");
        let c = ImageFingerprint::compute(b"field.jpg");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fingerprint_display() {
        let fp = ImageFingerprint::compute(b"data");
        assert_eq!(fp.to_string().len(), 64);
        assert_eq!(fp.short().len(), 16);
        assert!(fp.to_string().starts_with(&fp.short()));
    }
}
