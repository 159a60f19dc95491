//! WeedWise Core - Intake & Analysis Pipeline
//!
//! The orchestrating session that:
//! - Validates and encodes user-selected images
//! - Runs analysis through a replaceable [`AnalysisBackend`]
//! - Enforces the session state machine and the single in-flight analysis
//! - Discards stale completions through generation tokens
//! - Publishes snapshots and user-facing notices to presentation
//!
//! # Example
//!
//! ```rust,ignore
//! use weedwise_core::{PipelineConfig, PipelineSession};
//! use weedwise_intake::MemoryFile;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = PipelineSession::new(PipelineConfig::new());
//!
//! session.select_file(Some(MemoryFile::new("field.png", "image/png", bytes))).await?;
//! let outcome = session.analyze().await?;
//!
//! if let Some(result) = outcome.into_applied() {
//!     println!("Detected {} weeds", result.detections.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod backend;
pub mod config;
pub mod error;
pub mod generation;
pub mod notice;
pub mod pipeline;
pub mod state_machine;

// Re-exports for convenience
pub use backend::{AnalysisBackend, CachedBackend, MockAnalyzer};
pub use config::{ConfigError, PipelineConfig};
pub use error::{AnalysisError, PipelineError};
pub use generation::{Generation, GenerationCounter};
pub use notice::{Notice, Severity};
pub use pipeline::{Outcome, PipelineSession, SessionId, SessionSnapshot};
pub use state_machine::{allowed_transitions, validate_transition, SessionState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a pipeline session
    pub use crate::{
        AnalysisBackend, Notice, Outcome, PipelineConfig, PipelineError, PipelineSession,
        SessionSnapshot, SessionState,
    };
    pub use weedwise_intake::{DiskFile, ImageFile, MemoryFile};
    pub use weedwise_model::{AnalysisResult, ImageReference};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
