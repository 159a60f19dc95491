//! WeedWise Result Model
//!
//! The data contract produced by weed analysis and consumed by presentation:
//!
//! - [`WeedSpecies`], [`GrowthStage`], [`CostLevel`]: closed enumerations
//! - [`WeedDetection`], [`Recommendation`], [`RoiImpact`]: per-image findings
//! - [`AnalysisResult`]: the immutable aggregate for one analysed image
//! - [`ImageReference`]: a self-contained `data:` URI usable as a render source
//! - [`build_mock_result`]: the deterministic stand-in for real inference
//!
//! # Example
//!
//! ```rust
//! use weedwise_model::{build_mock_result, ImageReference};
//!
//! let image = ImageReference::encode("image/png", b"\x89PNG");
//! let result = build_mock_result(&image);
//!
//! assert_eq!(result.detections.len(), 3);
//! assert!(result.validate().is_ok());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod error;
mod fingerprint;
mod image_ref;
mod mock;
mod result;
mod taxonomy;

// Re-exports
pub use error::ModelError;
pub use fingerprint::ImageFingerprint;
pub use image_ref::ImageReference;
pub use mock::build_mock_result;
pub use result::{
    AnalysisResult, BoundingBox, Recommendation, RoiImpact, WeedDetection, YieldImpact,
};
pub use taxonomy::{ControlOutlook, CostLevel, GrowthStage, WeedSpecies};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
