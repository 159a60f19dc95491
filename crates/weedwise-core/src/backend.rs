//! Analysis backends
//!
//! [`AnalysisBackend`] is the seam where a real detection service plugs
//! in. The session only sees `Arc<dyn AnalysisBackend>`, so backends can
//! be swapped or layered ([`CachedBackend`] wraps any other backend).

use crate::error::AnalysisError;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use weedwise_model::{build_mock_result, AnalysisResult, ImageFingerprint, ImageReference};

/// Something that turns an image reference into an analysis result
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze one image
    ///
    /// Timeouts and result validation are applied by the caller.
    async fn analyze(&self, image: &ImageReference) -> Result<AnalysisResult, AnalysisError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Simulated analyzer: waits, then returns the fixed demonstration result
#[derive(Debug, Clone, Copy)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl MockAnalyzer {
    /// Create analyzer with a custom latency
    #[inline]
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_ANALYSIS_DELAY_MS))
    }
}

#[async_trait]
impl AnalysisBackend for MockAnalyzer {
    async fn analyze(&self, image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        tokio::time::sleep(self.delay).await;
        Ok(build_mock_result(image))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Memoizes results of another backend per image fingerprint
///
/// Failures are not cached.
#[derive(Clone)]
pub struct CachedBackend {
    inner: Arc<dyn AnalysisBackend>,
    cache: Cache<ImageFingerprint, Arc<AnalysisResult>>,
}

impl CachedBackend {
    /// Wrap `inner`, keeping at most `capacity` results
    #[must_use]
    pub fn new(inner: Arc<dyn AnalysisBackend>, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    /// Drop every cached result
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of cached results
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl fmt::Debug for CachedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedBackend")
            .field("inner", &self.inner.name())
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl AnalysisBackend for CachedBackend {
    async fn analyze(&self, image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        let fingerprint = image.fingerprint();
        if let Some(hit) = self.cache.get(&fingerprint).await {
            tracing::debug!(fingerprint = %fingerprint.short(), "analysis cache hit");
            return Ok((*hit).clone());
        }

        let result = self.inner.analyze(image).await?;
        self.cache.insert(fingerprint, Arc::new(result.clone())).await;
        Ok(result)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
