//! Testing utilities for the WeedWise workspace
//!
//! Shared fixtures, controllable files and scripted analysis backends.

#![allow(missing_docs)]

use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};
use weedwise_core::{AnalysisBackend, AnalysisError, MockAnalyzer, PipelineConfig, PipelineSession};
use weedwise_intake::{ImageFile, MemoryFile};
use weedwise_model::{build_mock_result, AnalysisResult, ImageReference};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// `len` bytes starting with the PNG signature
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let head = len.min(PNG_SIGNATURE.len());
    bytes[..head].copy_from_slice(&PNG_SIGNATURE[..head]);
    bytes
}

pub fn png_file(len: usize) -> MemoryFile {
    MemoryFile::new("field.png", "image/png", png_bytes(len))
}

pub fn named_png(name: &str, len: usize) -> MemoryFile {
    MemoryFile::new(name, "image/png", png_bytes(len))
}

pub fn text_file() -> MemoryFile {
    MemoryFile::new("notes.txt", "text/plain", b"not an image".to_vec())
}

/// Default config with the analysis delay removed
pub fn fast_config() -> PipelineConfig {
    PipelineConfig::new().with_analysis_delay(Duration::ZERO)
}

pub fn setup_test_session() -> PipelineSession {
    PipelineSession::new(fast_config())
}

pub fn session_with(backend: Arc<dyn AnalysisBackend>) -> PipelineSession {
    PipelineSession::with_backend(fast_config(), backend)
}

/// Releases a [`GatedFile`]
#[derive(Debug, Clone)]
pub struct Gate {
    opened: Arc<Semaphore>,
    reading: Arc<Notify>,
}

impl Gate {
    /// Let the pending read finish
    pub fn open(&self) {
        self.opened.add_permits(1);
    }

    /// Resolves once the file's content is being read
    pub async fn wait_until_reading(&self) {
        self.reading.notified().await;
    }
}

/// File whose read blocks until its [`Gate`] is opened
#[derive(Debug)]
pub struct GatedFile {
    inner: MemoryFile,
    gate: Gate,
}

impl GatedFile {
    pub fn new(inner: MemoryFile) -> (Self, Gate) {
        let gate = Gate {
            opened: Arc::new(Semaphore::new(0)),
            reading: Arc::new(Notify::new()),
        };
        (
            Self {
                inner,
                gate: gate.clone(),
            },
            gate,
        )
    }
}

#[async_trait]
impl ImageFile for GatedFile {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn media_type(&self) -> &str {
        self.inner.media_type()
    }

    fn byte_size(&self) -> u64 {
        self.inner.byte_size()
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        self.gate.reading.notify_one();
        let _permit = self.gate.opened.acquire().await.map_err(io::Error::other)?;
        self.inner.read_bytes().await
    }
}

/// File whose read always fails
#[derive(Debug)]
pub struct UnreadableFile;

#[async_trait]
impl ImageFile for UnreadableFile {
    fn name(&self) -> &str {
        "unreadable.png"
    }

    fn media_type(&self) -> &str {
        "image/png"
    }

    fn byte_size(&self) -> u64 {
        1024
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }
}

/// Mock analyzer that counts its calls
///
/// The default instance answers without delay.
#[derive(Debug)]
pub struct CountingBackend {
    inner: MockAnalyzer,
    calls: AtomicUsize,
}

impl CountingBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockAnalyzer::new(delay),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for CountingBackend {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl AnalysisBackend for CountingBackend {
    async fn analyze(&self, image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.analyze(image).await
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Backend that never answers
#[derive(Debug, Default)]
pub struct StallingBackend {
    calls: AtomicUsize,
}

impl StallingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for StallingBackend {
    async fn analyze(&self, _image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "stalling"
    }
}

/// Backend that is always unreachable
#[derive(Debug)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for UnavailableBackend {
    async fn analyze(&self, _image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        Err(AnalysisError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

/// Backend whose results break the result contract
#[derive(Debug, Default)]
pub struct MalformedBackend;

#[async_trait]
impl AnalysisBackend for MalformedBackend {
    async fn analyze(&self, image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        let mut result = build_mock_result(image);
        if let Some(detection) = result.detections.first_mut() {
            detection.confidence = 1.5;
        }
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "malformed"
    }
}
