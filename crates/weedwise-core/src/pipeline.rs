//! Pipeline session
//!
//! One [`PipelineSession`] per user session. It owns the current image,
//! the current result and the state machine, and it is the only place
//! where asynchronous completions are applied.
//!
//! Session state sits behind a mutex that is never held across an await:
//! every operation takes the lock briefly to start (issuing a generation),
//! releases it while the file is read or the backend runs, then takes it
//! again to apply the completion if its generation is still current.

use crate::backend::{AnalysisBackend, CachedBackend, MockAnalyzer};
use crate::config::PipelineConfig;
use crate::error::{AnalysisError, PipelineError};
use crate::generation::{Generation, GenerationCounter};
use crate::notice::Notice;
use crate::state_machine::{validate_transition, SessionState};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Notify};
use ulid::Ulid;
use weedwise_intake::{encode, validate, ImageFile, IntakeError, IntakePolicy};
use weedwise_model::{AnalysisResult, ImageReference};

const NOTICE_CAPACITY: usize = 32;

/// Unique session identifier (ULID, sortable by creation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(Ulid);

impl SessionId {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// What presentation renders
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Live preview; also the analysis input
    pub image: Option<ImageReference>,
    pub result: Option<Arc<AnalysisResult>>,
    /// True exactly while an analysis is in flight
    pub processing: bool,
}

/// How an operation that may be overtaken ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The completion took effect
    Applied(T),
    /// A newer operation, a cancel or a reset overtook this one
    Superseded,
    /// Nothing to do (no file was supplied)
    Ignored,
}

impl<T> Outcome<T> {
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[inline]
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    /// The applied value, if any
    #[inline]
    #[must_use]
    pub fn into_applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Superseded | Self::Ignored => None,
        }
    }
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    image: Option<ImageReference>,
    result: Option<Arc<AnalysisResult>>,
    intake: GenerationCounter,
    analysis: GenerationCounter,
    /// Cancel signal of the in-flight analysis only
    cancel: Option<Arc<Notify>>,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            state: SessionState::Empty,
            image: None,
            result: None,
            intake: GenerationCounter::new(),
            analysis: GenerationCounter::new(),
            cancel: None,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            image: self.image.clone(),
            result: self.result.clone(),
            processing: self.state.is_processing(),
        }
    }
}

/// Intake-and-analysis session
///
/// All operations take `&self`; share the session behind an `Arc` to
/// drive it from several tasks.
pub struct PipelineSession {
    id: SessionId,
    config: PipelineConfig,
    policy: IntakePolicy,
    backend: Arc<dyn AnalysisBackend>,
    inner: Mutex<SessionInner>,
    snapshots: watch::Sender<SessionSnapshot>,
    notices: broadcast::Sender<Notice>,
}

impl PipelineSession {
    /// Create a session backed by the mock analyzer
    ///
    /// The analyzer is wrapped in a [`CachedBackend`] when
    /// `result_cache_capacity` is non-zero.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        let mock: Arc<dyn AnalysisBackend> = Arc::new(MockAnalyzer::new(config.analysis_delay()));
        let backend: Arc<dyn AnalysisBackend> = if config.result_cache_capacity > 0 {
            Arc::new(CachedBackend::new(mock, config.result_cache_capacity))
        } else {
            mock
        };
        Self::with_backend(config, backend)
    }

    /// Create a session with a custom backend
    #[must_use]
    pub fn with_backend(config: PipelineConfig, backend: Arc<dyn AnalysisBackend>) -> Self {
        let inner = SessionInner::new();
        let (snapshots, _) = watch::channel(inner.snapshot());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let id = SessionId::new();

        tracing::debug!(session = %id, backend = backend.name(), "session created");

        Self {
            id,
            policy: config.intake_policy(),
            config,
            backend,
            inner: Mutex::new(inner),
            snapshots,
            notices,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.state().is_processing()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    /// Watch every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Receive every notice published from now on
    #[must_use]
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Validate and encode a newly selected file
    ///
    /// `None` (the user dismissed the picker) does nothing. A newer
    /// selection, a removal, a reset or an analysis started while the
    /// file is being read supersedes this one, and its result is dropped.
    ///
    /// # Errors
    /// - `AnalysisInProgress` while an analysis is in flight
    /// - `Intake(InvalidType | TooLarge)`: the session falls back to `Empty`
    /// - `Intake(EncodeFailed)`: the session is left unchanged
    pub async fn select_file<F: ImageFile>(
        &self,
        file: Option<F>,
    ) -> Result<Outcome<ImageReference>, PipelineError> {
        let Some(file) = file else {
            tracing::debug!(session = %self.id, "selection dismissed");
            return Ok(Outcome::Ignored);
        };

        let generation = self.begin_intake().map_err(|err| self.report(err))?;
        tracing::debug!(
            session = %self.id,
            %generation,
            file = file.name(),
            media_type = file.media_type(),
            size = file.byte_size(),
            "intake started"
        );

        let encoded = match validate(file, &self.policy) {
            Ok(accepted) => encode(&accepted, &self.policy).await,
            Err(err) => Err(err),
        };

        self.finish_intake(generation, encoded)
            .map_err(|err| self.report(err))
    }

    /// Drop the current image and any pending selection
    ///
    /// # Errors
    /// `AnalysisInProgress` while an analysis is in flight.
    pub fn remove_image(&self) -> Result<(), PipelineError> {
        self.clear_session().map_err(|err| self.report(err))
    }

    /// Start over: image and result are discarded
    ///
    /// # Errors
    /// `AnalysisInProgress` while an analysis is in flight.
    pub fn reset(&self) -> Result<(), PipelineError> {
        self.clear_session().map_err(|err| self.report(err))
    }

    /// Analyze the current image
    ///
    /// Any previous result is cleared before the backend is called.
    /// Returns `Superseded` if [`cancel_analysis`](Self::cancel_analysis)
    /// was called meanwhile.
    ///
    /// # Errors
    /// - `NoImageSelected`: no async work is started
    /// - `AnalysisInProgress`: the running analysis is unaffected
    /// - `AnalysisFailed`: the session returns to `ImageSelected`
    pub async fn analyze(&self) -> Result<Outcome<Arc<AnalysisResult>>, PipelineError> {
        let (generation, image, cancel) =
            self.begin_analysis().map_err(|err| self.report(err))?;
        tracing::info!(
            session = %self.id,
            %generation,
            backend = self.backend.name(),
            image = %image.fingerprint().short(),
            "analysis started"
        );

        let outcome = tokio::select! {
            outcome = self.run_backend(&image) => outcome,
            () = cancel.notified() => {
                tracing::info!(session = %self.id, %generation, "analysis abandoned");
                return Ok(Outcome::Superseded);
            }
        };

        self.finish_analysis(generation, outcome)
            .map_err(|err| self.report(err))
    }

    /// Abandon the in-flight analysis
    ///
    /// Returns `false` if nothing was running.
    pub fn cancel_analysis(&self) -> bool {
        let cancel = {
            let mut inner = self.inner.lock();
            if !inner.state.is_processing()
                || self
                    .transition(&mut inner, SessionState::ImageSelected)
                    .is_err()
            {
                return false;
            }
            inner.analysis.invalidate();
            self.publish(&inner);
            inner.cancel.take()
        };

        // Stores a permit, so an analysis not yet waiting still sees it.
        if let Some(cancel) = cancel {
            cancel.notify_one();
        }
        self.notify(Notice::analysis_cancelled());
        true
    }

    fn begin_intake(&self) -> Result<Generation, PipelineError> {
        let mut inner = self.inner.lock();
        if inner.state.is_processing() {
            return Err(PipelineError::AnalysisInProgress);
        }
        Ok(inner.intake.issue())
    }

    fn finish_intake(
        &self,
        generation: Generation,
        encoded: Result<ImageReference, IntakeError>,
    ) -> Result<Outcome<ImageReference>, PipelineError> {
        let mut inner = self.inner.lock();
        if !inner.intake.is_current(generation) {
            tracing::debug!(
                session = %self.id,
                %generation,
                latest = inner.intake.latest(),
                "intake superseded"
            );
            return Ok(Outcome::Superseded);
        }

        match encoded {
            Ok(image) => {
                self.transition(&mut inner, SessionState::ImageSelected)?;
                inner.image = Some(image.clone());
                inner.result = None;
                self.publish(&inner);
                Ok(Outcome::Applied(image))
            }
            Err(err) => {
                if err.is_rejection() {
                    self.clear(&mut inner)?;
                }
                Err(err.into())
            }
        }
    }

    fn clear_session(&self) -> Result<(), PipelineError> {
        let mut inner = self.inner.lock();
        if inner.state.is_processing() {
            return Err(PipelineError::AnalysisInProgress);
        }
        inner.intake.invalidate();
        self.clear(&mut inner)
    }

    fn clear(&self, inner: &mut SessionInner) -> Result<(), PipelineError> {
        if inner.state == SessionState::Empty {
            return Ok(());
        }
        self.transition(inner, SessionState::Empty)?;
        inner.image = None;
        inner.result = None;
        self.publish(inner);
        Ok(())
    }

    fn begin_analysis(&self) -> Result<(Generation, ImageReference, Arc<Notify>), PipelineError> {
        let mut inner = self.inner.lock();
        if inner.state.is_processing() {
            return Err(PipelineError::AnalysisInProgress);
        }
        let Some(image) = inner.image.clone() else {
            return Err(PipelineError::NoImageSelected);
        };

        if inner.state == SessionState::ResultReady {
            self.transition(&mut inner, SessionState::ImageSelected)?;
            inner.result = None;
        }
        self.transition(&mut inner, SessionState::Analyzing)?;

        // A selection still being read must not replace the image under analysis.
        inner.intake.invalidate();
        let generation = inner.analysis.issue();
        let cancel = Arc::new(Notify::new());
        inner.cancel = Some(Arc::clone(&cancel));
        self.publish(&inner);
        Ok((generation, image, cancel))
    }

    async fn run_backend(&self, image: &ImageReference) -> Result<AnalysisResult, AnalysisError> {
        let started = tokio::time::Instant::now();
        let call = self.backend.analyze(image);

        let result = match self.config.analysis_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome?,
                Err(_) => {
                    return Err(AnalysisError::Timeout {
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
            None => call.await?,
        };
        result.validate()?;

        tracing::debug!(
            session = %self.id,
            backend = self.backend.name(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            detections = result.detections.len(),
            "backend answered"
        );
        Ok(result)
    }

    fn finish_analysis(
        &self,
        generation: Generation,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<Outcome<Arc<AnalysisResult>>, PipelineError> {
        let mut inner = self.inner.lock();
        if !inner.analysis.is_current(generation) {
            tracing::debug!(session = %self.id, %generation, "analysis result discarded");
            return Ok(Outcome::Superseded);
        }
        inner.cancel = None;

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                self.transition(&mut inner, SessionState::ResultReady)?;
                inner.result = Some(Arc::clone(&result));
                self.publish(&inner);
                drop(inner);

                self.notify(Notice::analysis_complete(&result));
                Ok(Outcome::Applied(result))
            }
            Err(err) => {
                self.transition(&mut inner, SessionState::ImageSelected)?;
                self.publish(&inner);
                Err(err.into())
            }
        }
    }

    fn transition(&self, inner: &mut SessionInner, to: SessionState) -> Result<(), PipelineError> {
        validate_transition(inner.state, to)?;
        tracing::info!(session = %self.id, from = ?inner.state, to = ?to, "state transition");
        inner.state = to;
        Ok(())
    }

    fn publish(&self, inner: &SessionInner) {
        self.snapshots.send_replace(inner.snapshot());
    }

    fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            tracing::trace!(session = %self.id, "no notice subscribers");
        }
    }

    fn report(&self, err: PipelineError) -> PipelineError {
        tracing::warn!(session = %self.id, kind = err.kind(), error = %err, "pipeline error");
        self.notify(Notice::from(&err));
        err
    }
}

impl fmt::Debug for PipelineSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineSession")
            .field("id", &self.id)
            .field("backend", &self.backend.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use weedwise_intake::MemoryFile;

    fn session() -> PipelineSession {
        PipelineSession::new(PipelineConfig::new().with_analysis_delay(Duration::ZERO))
    }

    fn png(bytes: &[u8]) -> Option<MemoryFile> {
        Some(MemoryFile::new("field.png", "image/png", bytes.to_vec()))
    }

    #[tokio::test]
    async fn fresh_session_is_empty() {
        let session = session();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.state, SessionState::Empty);
        assert!(snapshot.image.is_none());
        assert!(snapshot.result.is_none());
        assert!(!snapshot.processing);
    }

    #[tokio::test]
    async fn dismissed_picker_is_ignored() {
        let session = session();
        let outcome = session.select_file(None::<MemoryFile>).await.unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn select_then_analyze_reaches_result_ready() {
        let session = session();

        let image = session.select_file(png(b"field")).await.unwrap();
        let image = image.into_applied().unwrap();
        assert_eq!(session.state(), SessionState::ImageSelected);

        let result = session.analyze().await.unwrap().into_applied().unwrap();
        assert_eq!(result.original_image, image);
        assert_eq!(session.state(), SessionState::ResultReady);
        assert_eq!(session.snapshot().result, Some(result));
    }

    #[tokio::test]
    async fn rejection_clears_the_previous_image() {
        let session = session();
        session.select_file(png(b"field")).await.unwrap();

        let text = Some(MemoryFile::new("notes.txt", "text/plain", b"hi".to_vec()));
        let err = session.select_file(text).await.unwrap_err();

        assert!(matches!(err, PipelineError::Intake(IntakeError::InvalidType { .. })));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.snapshot().image.is_none());
    }

    #[tokio::test]
    async fn analyze_without_image_changes_nothing() {
        let session = session();
        let err = session.analyze().await.unwrap_err();

        assert!(matches!(err, PipelineError::NoImageSelected));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn reset_and_remove() {
        let session = session();
        session.select_file(png(b"field")).await.unwrap();
        session.analyze().await.unwrap();

        session.reset().unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, SessionState::Empty);
        assert!(snapshot.result.is_none());
        assert!(snapshot.image.is_none());

        session.select_file(png(b"other")).await.unwrap();
        session.remove_image().unwrap();
        assert_eq!(session.state(), SessionState::Empty);

        // Already empty: nothing to do
        session.reset().unwrap();
    }

    #[tokio::test]
    async fn cancel_without_analysis_is_a_no_op() {
        let session = session();
        assert!(!session.cancel_analysis());
    }

    #[test]
    fn outcome_helpers() {
        assert!(Outcome::Applied(1).is_applied());
        assert!(Outcome::<u8>::Superseded.is_superseded());
        assert_eq!(Outcome::<u8>::Ignored.into_applied(), None);
        assert_eq!(Outcome::Applied(7).into_applied(), Some(7));
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
